//! Model identifier convention used by the registry.
//!
//! Model repositories and bundle directories are named `eos` followed by a
//! non-zero digit and three lowercase alphanumerics, e.g. `eos1ax2`.

use once_cell::sync::Lazy;
use regex::Regex;

static MODEL_ID: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^eos[1-9][a-z0-9]{3}$").expect("model id pattern is valid"));

/// Whether `candidate` names a model repository.
pub fn is_model_id(candidate: &str) -> bool {
    MODEL_ID.is_match(candidate)
}

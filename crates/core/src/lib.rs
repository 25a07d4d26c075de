//! modelhub_core - Core library for model discovery
//!
//! This crate provides:
//! - A catalog aggregating the registry, local bundles and the serving daemon
//! - The persisted active-model session
//! - Model identifier matching and card lookups

pub mod cards;
pub mod catalog;
pub mod config;
pub mod error;
pub mod identifier;
pub mod session;
pub mod sources;
pub mod table;

pub use cards::{CardLookup, ModelCard};
pub use catalog::{CatalogSettings, MissingCardPolicy, ModelCatalog};
pub use config::Config;
pub use error::{HubError, Result};
pub use identifier::is_model_id;
pub use session::{SessionRecord, SessionStore};
pub use table::{CatalogOutput, CatalogTable, OutputMode};

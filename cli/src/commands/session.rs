use anyhow::Result;
use modelhub_core::{is_model_id, Config, SessionStore};

use crate::SessionAction;

pub async fn execute(action: SessionAction) -> Result<()> {
    let config = Config::load()?;
    let store = SessionStore::from_config(&config);

    match action {
        SessionAction::Open { model } => {
            if !is_model_id(&model) {
                tracing::warn!("'{}' does not look like a model identifier", model);
            }
            let session = store.open(&model)?;
            println!("Session {} opened for {}", session.identifier, session.model_id);
        }
        SessionAction::Show => match store.get()? {
            Some(session) => println!("{}", serde_json::to_string_pretty(&session)?),
            None => println!("No active session."),
        },
        SessionAction::Current => match store.current_model_id()? {
            Some(model_id) => println!("{}", model_id),
            None => println!("No active session."),
        },
        SessionAction::Close => {
            store.close()?;
            println!("Session closed.");
        }
    }

    Ok(())
}

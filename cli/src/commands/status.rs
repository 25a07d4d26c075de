use anyhow::Result;
use modelhub_core::{Config, ModelCatalog, SessionStore};

pub async fn execute() -> Result<()> {
    println!("modelhub status\n");

    let config = Config::load()?;

    // Active session
    let store = SessionStore::from_config(&config);
    match store.current_model_id()? {
        Some(model_id) => println!("Active model: {}", model_id),
        None => println!("Active model: none"),
    }

    // Local bundles
    let catalog = ModelCatalog::from_config(&config)?;
    let bundles = catalog.bundle_ids()?;
    println!("Installed bundles: {}", bundles.len());
    println!("Bundles directory: {:?}", config.local.bundles_dir);

    println!("Registry: {}/users/{}", config.hub.api_base, config.hub.organization);
    println!(
        "Registry token: {}",
        if config.github_token().is_some() { "set" } else { "not set" }
    );
    println!("Serving tool: {}", config.serving.tool);

    if bundles.is_empty() {
        println!("\nRun `modelhub catalog hub` to see published models.");
    }

    Ok(())
}

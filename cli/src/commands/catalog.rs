use anyhow::{Context, Result};
use modelhub_core::{CatalogOutput, Config, ModelCatalog, OutputMode};

use crate::CatalogSource;

pub async fn execute(source: CatalogSource, json: bool) -> Result<()> {
    let config = Config::load()?;
    let mode = if json {
        OutputMode::Table
    } else {
        OutputMode::Text
    };
    let catalog = ModelCatalog::from_config(&config)?.with_output(mode);

    let output = match source {
        CatalogSource::Hub => Some(
            catalog
                .hub()
                .await
                .context("Could not list models from the registry")?,
        ),
        CatalogSource::Local => Some(
            catalog
                .local()
                .await
                .context("Could not list local model bundles")?,
        ),
        CatalogSource::Services => catalog
            .bentoml()
            .await
            .context("Could not list models from the serving daemon")?,
        CatalogSource::Github => {
            let ids = catalog
                .github()
                .await
                .context("Could not list model repositories")?;
            if ids.is_empty() {
                println!("No models found.");
            } else if json {
                println!("{}", serde_json::to_string_pretty(&ids)?);
            } else {
                for id in ids {
                    println!("{}", id);
                }
            }
            return Ok(());
        }
        CatalogSource::Spreadsheet => {
            println!("{}", catalog.spreadsheet());
            return Ok(());
        }
    };

    match output {
        Some(output) if !output.is_empty() => print_output(&output)?,
        _ => {
            println!("No models found.");
            if matches!(source, CatalogSource::Local) {
                println!("\nBundles directory: {:?}", catalog.settings().bundles_dir);
            }
        }
    }

    Ok(())
}

fn print_output(output: &CatalogOutput) -> Result<()> {
    match output {
        CatalogOutput::Table(table) => println!("{}", serde_json::to_string_pretty(table)?),
        CatalogOutput::Text { text, .. } => println!("{}", text),
    }
    Ok(())
}

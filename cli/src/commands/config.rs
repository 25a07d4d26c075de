use anyhow::Result;
use modelhub_core::Config;

pub async fn execute(key: Option<&str>, value: Option<&str>) -> Result<()> {
    let mut config = Config::load()?;

    match (key, value) {
        // Show all config
        (None, None) => {
            println!("Configuration file: {:?}\n", Config::config_path()?);
            println!("[hub]");
            println!("  organization = \"{}\"", config.hub.organization);
            println!("  api_base = \"{}\"", config.hub.api_base);
            println!("  cards_base = \"{}\"", config.hub.cards_base);
            println!(
                "  github_token = {}",
                config.hub.github_token.as_ref().map(|_| "***").unwrap_or("(not set)")
            );
            println!("  skip_missing_cards = {}", config.hub.skip_missing_cards);
            println!();
            println!("[local]");
            println!("  bundles_dir = {:?}", config.local.bundles_dir);
            println!("  skip_missing_cards = {}", config.local.skip_missing_cards);
            println!();
            println!("[serving]");
            println!("  tool = \"{}\"", config.serving.tool);
            println!();
            println!("[session]");
            println!("  path = {:?}", config.session.path);
        }

        // Get a specific key
        (Some(key), None) => {
            let value = config.get_value(key)?;
            println!("{}", value);
        }

        // Set a specific key
        (Some(key), Some(value)) => {
            config.set_value(key, value)?;
            config.save()?;
            println!("Set {} = {}", key, value);
        }

        _ => unreachable!(),
    }

    Ok(())
}

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(name = "modelhub")]
#[command(author, version, about = "Discover models in the hub, on disk and in the serving daemon", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List models from one source
    #[command(alias = "ls")]
    Catalog {
        /// Where to look for models
        #[arg(value_enum, default_value = "hub")]
        source: CatalogSource,

        /// Print the structured table as JSON instead of a text table
        #[arg(long)]
        json: bool,
    },

    /// Manage the active model session
    Session {
        #[command(subcommand)]
        action: SessionAction,
    },

    /// Show the active session and local bundle location
    Status,

    /// View or set configuration
    Config {
        /// Config key (e.g., "hub.organization", "serving.tool")
        key: Option<String>,

        /// Value to set (if omitted, shows current value)
        value: Option<String>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
pub enum CatalogSource {
    /// Models published in the registry
    Hub,
    /// Models installed in the local bundle directory
    Local,
    /// Models running under the serving daemon
    Services,
    /// Model repository names only, without cards
    Github,
    /// Link to the curated model spreadsheet
    Spreadsheet,
}

#[derive(Subcommand)]
pub enum SessionAction {
    /// Make a model the active one
    Open {
        /// Model identifier (e.g., "eos1ax2")
        model: String,
    },
    /// Print the full session record
    Show,
    /// Print the active model identifier
    Current,
    /// End the active session
    Close,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Catalog { source, json } => {
            commands::catalog::execute(source, json).await?;
        }
        Commands::Session { action } => {
            commands::session::execute(action).await?;
        }
        Commands::Status => {
            commands::status::execute().await?;
        }
        Commands::Config { key, value } => {
            commands::config::execute(key.as_deref(), value.as_deref()).await?;
        }
    }

    Ok(())
}

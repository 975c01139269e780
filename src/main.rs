use clap::Parser;
use kitchen_agent::{
    cli::{commands, Cli, Commands},
    config::Settings,
    Result,
};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file if it exists
    // Silently ignore if file doesn't exist
    let _ = dotenvy::dotenv();

    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,kitchen_agent=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Parse CLI arguments
    let cli = Cli::parse();

    match cli.command {
        Commands::Setup { index, dataset } => {
            let mut settings = Settings::from_env()?;

            // Override settings with CLI arguments
            if let Some(index) = index {
                settings.index.name = index;
            }
            if let Some(dataset) = dataset {
                settings.index.dataset_path = dataset;
            }
            settings.validate()?;

            let report = commands::setup(settings).await?;
            if report.is_complete() {
                info!("Setup complete");
            } else {
                warn!("Setup finished with failures - fix them and re-run, every step is idempotent");
            }
        }
        Commands::Agent {
            format,
            show_secrets,
        } => {
            let settings = load_settings()?;
            println!("{}", commands::agent(&settings, format, show_secrets)?);
        }
        Commands::Tools => {
            let settings = load_settings()?;
            commands::tools(&settings).await?;
        }
        // Dataset checks work offline, without platform credentials
        Commands::ValidateDataset { path } => {
            commands::validate_dataset(&path)?;
        }
    }

    Ok(())
}

fn load_settings() -> Result<Settings> {
    let settings = Settings::from_env()?;
    settings.validate()?;
    Ok(settings)
}

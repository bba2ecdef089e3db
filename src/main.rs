//! lingo CLI entry point.

use anyhow::Result;
use clap::Parser;
use lingo::cli::{commands, Cli, Commands};
use lingo::config::Settings;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let settings = Settings::load_from(cli.config.as_ref())?;

    // Initialize logging; -v overrides the configured level
    let log_level = match cli.verbose {
        0 => settings.general.log_level.as_str(),
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| format!("lingo={}", log_level)),
        ))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    // Ensure data directory exists
    std::fs::create_dir_all(settings.data_dir())?;

    // Execute command
    match cli.command {
        Commands::Detect { input, output } => {
            commands::run_detect(input, output, settings)?;
        }

        Commands::Augment { input, output } => {
            commands::run_augment(input, output, settings).await?;
        }

        Commands::Playlists {
            languages,
            input,
            min_size,
            dry_run,
        } => {
            commands::run_playlists(&languages, input, min_size, dry_run, settings).await?;
        }

        Commands::Run {
            languages,
            catalog,
            min_size,
        } => {
            commands::run_pipeline(&languages, catalog, min_size, settings).await?;
        }

        Commands::Summary { file } => {
            commands::run_summary(&file)?;
        }

        Commands::Doctor => {
            commands::run_doctor(cli.config.as_ref(), &settings)?;
        }

        Commands::Config { action } => {
            commands::run_config(&action, cli.config.as_ref(), &settings)?;
        }
    }

    Ok(())
}

//! Viralcast CLI binary.
//!
//! This binary provides command-line access to Viralcast's functionality:
//! - List configured providers
//! - Produce posts for a channel and optionally publish them

use clap::Parser;
use viralcast::{ObservabilityConfig, ViralcastConfig, init_observability_with_config};

mod cli;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    use cli::{Cli, Commands, generate_posts, list_providers};

    // Load .env before anything reads the environment
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    let _telemetry = init_observability_with_config(
        ObservabilityConfig::new("viralcast")
            .with_log_level(log_level)
            .with_json_logs(cli.json_logs)
            .with_telemetry_export(cli.telemetry),
    )?;

    let config = match &cli.provider_config {
        Some(path) => ViralcastConfig::load_with(path)?,
        None => ViralcastConfig::load()?,
    };

    match cli.command {
        Commands::Providers => list_providers(&config),
        Commands::Generate {
            config: bot_config,
            count,
            publish,
        } => {
            generate_posts(&config, &bot_config, count, publish).await?;
        }
    }

    Ok(())
}

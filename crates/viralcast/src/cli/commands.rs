//! CLI command definitions.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Viralcast - marketing posts from whichever AI provider is answering
#[derive(Parser, Debug)]
#[command(name = "viralcast")]
#[command(about = "Generate and publish marketing posts with multi-provider failover", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Extra provider configuration file, layered over the defaults
    #[arg(long, global = true, env = "VIRALCAST_CONFIG")]
    pub provider_config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    pub json_logs: bool,

    /// Export spans and metrics to stdout
    #[arg(long, global = true)]
    pub telemetry: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List text providers and image generators with their availability
    Providers,

    /// Produce posts for a channel and print them as JSON
    Generate {
        /// Path to the bot TOML file
        #[arg(long)]
        config: PathBuf,

        /// Number of posts (defaults to the channel's batch size)
        #[arg(long)]
        count: Option<usize>,

        /// Deliver each post to the channel's Telegram chat
        #[arg(long)]
        publish: bool,
    },
}

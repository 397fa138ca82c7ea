//! Command-line interface module.
//!
//! This module provides the CLI structure and command handlers for the viralcast binary.

mod commands;
mod generate;
mod providers;

pub use commands::{Cli, Commands};
pub use generate::generate_posts;
pub use providers::list_providers;

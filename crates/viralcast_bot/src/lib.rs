//! Post production for Viralcast channels.
//!
//! [`MarketingService`] turns a [`ChannelProfile`](viralcast_core::ChannelProfile)
//! into finished posts: it researches the niche, writes the copy as structured
//! output, illustrates it and optionally hands it to a
//! [`PostPublisher`](viralcast_interface::PostPublisher).
//! [`providers`] builds the routers from a
//! [`ViralcastConfig`](viralcast_rate_limit::ViralcastConfig).

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod metrics;
mod prompts;
pub mod providers;
mod service;

pub use config::{BotConfig, DEFAULT_TOKEN_ENV, TelegramConfig};
pub use metrics::BotMetrics;
pub use prompts::{ANALYSIS_FALLBACK, gemini_post_schema, post_schema};
pub use service::{MarketAnalysis, MarketingService, PostDraft};
pub use viralcast_interface::PostPublisher;

//! Viralcast - multi-provider failover generation of social media posts
//!
//! Viralcast writes and illustrates marketing posts with whichever AI backend
//! is currently willing to answer. Text and image providers sit behind
//! round-robin routers that pass over rate-limited providers, heal them once
//! they answer again, and only give up when every provider has failed.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use viralcast::{MarketingService, ViralcastConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ViralcastConfig::load()?;
//!     let service = MarketingService::from_config(&config);
//!
//!     let image = service
//!         .generate_image("a tubular steel chair", viralcast::NicheType::Design)
//!         .await?;
//!     println!("{}", image.to_uri());
//!     Ok(())
//! }
//! ```
//!
//! # Architecture
//!
//! - `viralcast_error` - Error types
//! - `viralcast_core` - Data model (posts, options, image references)
//! - `viralcast_interface` - `TextProvider`, `ImageProvider`, `PostPublisher` traits
//! - `viralcast_rate_limit` - Failure classification, blocklist, configuration
//! - `viralcast_models` - Gemini, OpenAI-compatible and image providers
//! - `viralcast_router` - Text and image failover routers
//! - `viralcast_social` - Telegram delivery
//! - `viralcast_bot` - Post production pipeline
//!
//! This crate re-exports everything for convenience.

pub use viralcast_bot::{
    BotConfig, BotMetrics, MarketAnalysis, MarketingService, PostDraft, TelegramConfig, providers,
};
pub use viralcast_core::*;
pub use viralcast_error::*;
pub use viralcast_interface::*;
pub use viralcast_models::{
    Dalle3Provider, FreeImageProvider, GeminiImageProvider, GeminiProvider,
    OpenAiCompatibleProvider, OpenAiFlavor, StableDiffusionFreeProvider, StableDiffusionProvider,
    extract_json_object,
};
pub use viralcast_rate_limit::{
    Blocklist, FailureClass, ProviderConfig, RouterConfig, ViralcastConfig, classify,
    is_rate_limited,
};
pub use viralcast_router::{ImageRouter, RouterMetrics, TextRouter};
pub use viralcast_social::TelegramClient;

mod observability;

pub use observability::{
    ObservabilityConfig, ObservabilityGuard, init_observability, init_observability_with_config,
};

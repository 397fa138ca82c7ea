//! Round-robin failover routing across text and image providers.
//!
//! A router owns a fixed list of providers, a cursor that persists across
//! calls and a blocklist of providers that recently hit a rate limit. Each
//! call tries providers in turn until one succeeds; individual provider
//! failures never reach the caller, only the terminal router errors do.
//!
//! ```
//! use viralcast_error::ViralcastErrorKind;
//! use viralcast_router::TextRouter;
//! use viralcast_core::TextOptions;
//!
//! # #[tokio::main]
//! # async fn main() {
//! let router = TextRouter::new(Vec::new());
//! assert_eq!(router.current_provider_name(), "None");
//!
//! let err = router
//!     .generate_text("hello", None, &TextOptions::default())
//!     .await
//!     .unwrap_err();
//! assert!(matches!(err.kind(), ViralcastErrorKind::Router(_)));
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod failover;
mod image;
mod metrics;
mod text;

pub use image::ImageRouter;
pub use metrics::RouterMetrics;
pub use text::TextRouter;

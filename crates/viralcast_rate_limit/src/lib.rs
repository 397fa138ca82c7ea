//! Failure classification and routing configuration.
//!
//! This crate decides which provider failures count as rate limiting, keeps
//! the per-router blocklist of providers that hit a limit, and loads the
//! layered TOML configuration that tells each provider where its credentials
//! live and how generous the routers' attempt budgets are.
//!
//! ```
//! use viralcast_error::{ProviderError, ViralcastError};
//! use viralcast_rate_limit::is_rate_limited;
//!
//! let err: ViralcastError = ProviderError::upstream("Groq", Some(429), "slow down").into();
//! assert!(is_rate_limited(&err));
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod blocklist;
mod classifier;
mod config;

pub use blocklist::Blocklist;
pub use classifier::{FailureClass, RATE_LIMIT_MARKERS, classify, is_rate_limited};
pub use config::{ProviderConfig, RouterConfig, ViralcastConfig, is_usable_api_key};

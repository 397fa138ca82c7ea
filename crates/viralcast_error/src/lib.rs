//! Error types for the Viralcast library.
//!
//! This crate provides the foundation error types used throughout the Viralcast workspace.
//!
//! # Error Hierarchy
//!
//! All errors follow the `ErrorKind` + wrapper struct pattern:
//! - `*ErrorKind` enum defines specific error conditions
//! - `*Error` struct wraps the kind with source location tracking
//! - All constructors use `#[track_caller]` for automatic location capture
//!
//! # Examples
//!
//! ```
//! use viralcast_error::{ViralcastResult, ProviderError, ProviderErrorKind};
//!
//! fn call_upstream() -> ViralcastResult<String> {
//!     Err(ProviderError::new(ProviderErrorKind::EmptyResponse("Groq".to_string())))?
//! }
//!
//! assert!(call_upstream().is_err());
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod error;
mod http;
mod json;
mod provider;
mod router;
mod telegram;

pub use config::ConfigError;
pub use error::{ViralcastError, ViralcastErrorKind, ViralcastResult};
pub use http::HttpError;
pub use json::JsonError;
pub use provider::{ProviderError, ProviderErrorKind};
pub use router::{RouterError, RouterErrorKind};
pub use telegram::{TelegramError, TelegramErrorKind};

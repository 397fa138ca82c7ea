//! Core data types for the Viralcast library.
//!
//! This crate provides the data model shared by providers, routers and the
//! orchestration layer: generation envelopes, request options, image
//! references and the marketing post itself.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod image;
mod options;
mod post;
mod result;
mod strategy;

pub use image::ImageReference;
pub use options::TextOptions;
pub use post::{Post, PostStatus};
pub use result::{GenerationResult, ProviderOutput};
pub use strategy::{ChannelProfile, ContentTone, MarketingStrategy, NicheType, SupportedLanguage};

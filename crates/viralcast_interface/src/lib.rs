//! Trait definitions for the Viralcast library.
//!
//! Every text backend implements [`TextProvider`] and every image backend
//! implements [`ImageProvider`]. Routers only ever see these traits.
//! Finished posts leave the system through a [`PostPublisher`].

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod traits;

pub use traits::{ImageProvider, PostPublisher, TextProvider};

//! Terminal routing errors.

/// Failure conditions surfaced by the text and image routers.
///
/// Individual provider failures never escape a router; only these do.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub enum RouterErrorKind {
    /// Every eligible text provider failed within the attempt budget
    #[display("All AI providers failed. Last error: {}", last_error)]
    AllProvidersExhausted {
        /// Message of the last real error observed
        last_error: String,
    },
    /// Every eligible image generator failed within the attempt budget
    #[display("All image generators failed. Last error: {}", last_error)]
    AllGeneratorsExhausted {
        /// Message of the last real error observed
        last_error: String,
    },
    /// The router was built with no available text provider
    #[display("No AI providers available")]
    NoProviderAvailable,
    /// The router was built with no available image generator
    #[display("No image generators available")]
    NoGeneratorAvailable,
}

/// Router error with location tracking.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Router Error: {} at line {} in {}", kind, line, file)]
pub struct RouterError {
    /// The specific error kind
    pub kind: RouterErrorKind,
    /// Line number where error occurred
    pub line: u32,
    /// Source file where error occurred
    pub file: &'static str,
}

impl RouterError {
    /// Create a new router error.
    #[track_caller]
    pub fn new(kind: RouterErrorKind) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            kind,
            line: loc.line(),
            file: loc.file(),
        }
    }
}

//! Provider-level error types raised by individual text and image backends.

use std::fmt;

/// Error conditions a single provider call can end in.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ProviderErrorKind {
    /// Provider was invoked without the configuration it needs (usually an API key).
    Unavailable(String),
    /// Upstream responded with a non-success status or the transport failed.
    UpstreamCallFailed {
        /// Provider name
        provider: String,
        /// HTTP status, when the upstream answered at all
        status: Option<u16>,
        /// Upstream error message
        message: String,
    },
    /// Upstream succeeded but returned nothing usable.
    EmptyResponse(String),
    /// Structured output could not be extracted from the raw text.
    MalformedStructuredOutput {
        /// The raw text the normalizer was given
        raw: String,
    },
}

impl fmt::Display for ProviderErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProviderErrorKind::Unavailable(provider) => {
                write!(f, "{} API key not configured", provider)
            }
            ProviderErrorKind::UpstreamCallFailed {
                provider,
                status: Some(status),
                message,
            } => write!(f, "{} call failed with HTTP {}: {}", provider, status, message),
            ProviderErrorKind::UpstreamCallFailed {
                provider,
                status: None,
                message,
            } => write!(f, "{} call failed: {}", provider, message),
            ProviderErrorKind::EmptyResponse(provider) => {
                write!(f, "Empty response from {}", provider)
            }
            ProviderErrorKind::MalformedStructuredOutput { raw } => write!(
                f,
                "Could not extract a JSON object from response (length: {})",
                raw.len()
            ),
        }
    }
}

/// Provider error with location tracking.
///
/// # Examples
///
/// ```
/// use viralcast_error::{ProviderError, ProviderErrorKind};
///
/// let err = ProviderError::new(ProviderErrorKind::UpstreamCallFailed {
///     provider: "Groq".to_string(),
///     status: Some(429),
///     message: "Rate limit reached".to_string(),
/// });
/// assert_eq!(err.status(), Some(429));
/// assert!(format!("{}", err).contains("Rate limit reached"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Provider Error: {} at line {} in {}", kind, line, file)]
pub struct ProviderError {
    /// The specific error kind
    pub kind: ProviderErrorKind,
    /// Line number where error occurred
    pub line: u32,
    /// Source file where error occurred
    pub file: &'static str,
}

impl ProviderError {
    /// Create a new provider error.
    #[track_caller]
    pub fn new(kind: ProviderErrorKind) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            kind,
            line: loc.line(),
            file: loc.file(),
        }
    }

    /// Shorthand for an upstream failure.
    #[track_caller]
    pub fn upstream(
        provider: impl Into<String>,
        status: Option<u16>,
        message: impl Into<String>,
    ) -> Self {
        Self::new(ProviderErrorKind::UpstreamCallFailed {
            provider: provider.into(),
            status,
            message: message.into(),
        })
    }

    /// HTTP status carried by an upstream failure.
    pub fn status(&self) -> Option<u16> {
        match &self.kind {
            ProviderErrorKind::UpstreamCallFailed { status, .. } => *status,
            _ => None,
        }
    }
}

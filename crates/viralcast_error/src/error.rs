//! Top-level error wrapper types.

use crate::{ConfigError, HttpError, JsonError, ProviderError, RouterError, TelegramError};

/// The union of every error kind in the workspace.
///
/// # Examples
///
/// ```
/// use viralcast_error::{ViralcastError, HttpError};
///
/// let http_err = HttpError::new("Connection failed");
/// let err: ViralcastError = http_err.into();
/// assert!(format!("{}", err).contains("HTTP Error"));
/// ```
#[derive(Debug, derive_more::From, derive_more::Display, derive_more::Error)]
pub enum ViralcastErrorKind {
    /// HTTP transport error
    #[from(HttpError)]
    Http(HttpError),
    /// JSON serialization/deserialization error
    #[from(JsonError)]
    Json(JsonError),
    /// Configuration error
    #[from(ConfigError)]
    Config(ConfigError),
    /// Single provider failure
    #[from(ProviderError)]
    Provider(ProviderError),
    /// Terminal routing failure
    #[from(RouterError)]
    Router(RouterError),
    /// Telegram delivery failure
    #[from(TelegramError)]
    Telegram(TelegramError),
}

/// Viralcast error with kind discrimination.
///
/// # Examples
///
/// ```
/// use viralcast_error::{ViralcastResult, ConfigError};
///
/// fn might_fail() -> ViralcastResult<()> {
///     Err(ConfigError::new("Missing field"))?
/// }
///
/// assert!(might_fail().is_err());
/// ```
#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("Viralcast Error: {}", _0)]
pub struct ViralcastError(Box<ViralcastErrorKind>);

impl ViralcastError {
    /// Create a new error from a kind.
    pub fn new(kind: ViralcastErrorKind) -> Self {
        Self(Box::new(kind))
    }

    /// Get the error kind.
    pub fn kind(&self) -> &ViralcastErrorKind {
        &self.0
    }

    /// HTTP status attached to the failure, if any.
    ///
    /// # Examples
    ///
    /// ```
    /// use viralcast_error::{ProviderError, ViralcastError};
    ///
    /// let err: ViralcastError = ProviderError::upstream("OpenAI", Some(403), "forbidden").into();
    /// assert_eq!(err.status_code(), Some(403));
    /// ```
    pub fn status_code(&self) -> Option<u16> {
        match self.kind() {
            ViralcastErrorKind::Provider(e) => e.status(),
            ViralcastErrorKind::Telegram(e) => match &e.kind {
                crate::TelegramErrorKind::Api { status, .. } => Some(*status),
                _ => None,
            },
            _ => None,
        }
    }

    /// The error message without source location.
    pub fn detail(&self) -> String {
        match self.kind() {
            ViralcastErrorKind::Http(e) => e.message.clone(),
            ViralcastErrorKind::Json(e) => e.message.clone(),
            ViralcastErrorKind::Config(e) => e.message.clone(),
            ViralcastErrorKind::Provider(e) => e.kind.to_string(),
            ViralcastErrorKind::Router(e) => e.kind.to_string(),
            ViralcastErrorKind::Telegram(e) => e.kind.to_string(),
        }
    }
}

// Generic From implementation for any type that converts to ViralcastErrorKind
impl<T> From<T> for ViralcastError
where
    T: Into<ViralcastErrorKind>,
{
    fn from(err: T) -> Self {
        Self::new(err.into())
    }
}

/// Result type for Viralcast operations.
pub type ViralcastResult<T> = std::result::Result<T, ViralcastError>;

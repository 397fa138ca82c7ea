//! Telegram delivery error types.

/// Telegram-specific error conditions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub enum TelegramErrorKind {
    /// Bot token missing or still a placeholder
    #[display("Invalid Telegram Token")]
    InvalidToken,
    /// Bot API answered with an error
    #[display("Telegram Error ({}): {}", status, description)]
    Api {
        /// HTTP status code
        status: u16,
        /// `description` field of the Bot API error body
        description: String,
    },
    /// Request never reached the Bot API
    #[display("Network Error: {}", _0)]
    Transport(String),
    /// The post image could not be loaded for upload
    #[display("Failed to load post image: {}", _0)]
    ImageFetch(String),
}

/// Telegram error with source location tracking.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Telegram Error: {} at line {} in {}", kind, line, file)]
pub struct TelegramError {
    /// The kind of error that occurred
    pub kind: TelegramErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl TelegramError {
    /// Create a new TelegramError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: TelegramErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}

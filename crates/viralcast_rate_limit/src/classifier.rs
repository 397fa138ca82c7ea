//! Rate-limit classification of provider failures.

use viralcast_error::ViralcastError;

/// Message fragments (lower case) that mark a failure as rate-limit class.
pub const RATE_LIMIT_MARKERS: &[&str] = &[
    "429",
    "rate limit",
    "quota",
    "exhausted",
    "limit exceeded",
    "insufficient quota",
];

/// Coarse class of a provider failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr)]
#[strum(serialize_all = "snake_case")]
pub enum FailureClass {
    /// Quota or rate limit hit; the provider gets blocklisted.
    RateLimit,
    /// Anything else: network failure, 5xx, empty or malformed payload.
    Other,
}

/// Classifies a provider failure.
///
/// Status 429 or 403 is rate-limit class, as is any message containing one of
/// [`RATE_LIMIT_MARKERS`] (case-insensitive). The message is read without its
/// source location so file paths never match.
pub fn classify(error: &ViralcastError) -> FailureClass {
    if matches!(error.status_code(), Some(429) | Some(403)) {
        return FailureClass::RateLimit;
    }

    let detail = error.detail().to_lowercase();
    if RATE_LIMIT_MARKERS.iter().any(|marker| detail.contains(marker)) {
        FailureClass::RateLimit
    } else {
        FailureClass::Other
    }
}

/// Whether a failure is rate-limit class.
pub fn is_rate_limited(error: &ViralcastError) -> bool {
    classify(error) == FailureClass::RateLimit
}

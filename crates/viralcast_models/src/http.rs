//! Shared plumbing for mapping HTTP failures onto provider errors.

use reqwest::Response;
use serde_json::Value;
use tracing::error;
use viralcast_error::{ProviderError, ProviderErrorKind, ViralcastError};

/// Error for a provider invoked without its credentials.
#[track_caller]
pub(crate) fn unavailable(provider: &str) -> ViralcastError {
    ProviderError::new(ProviderErrorKind::Unavailable(provider.to_string())).into()
}

/// Error for a request that never produced an HTTP response.
#[track_caller]
pub(crate) fn transport_error(provider: &str, err: reqwest::Error) -> ViralcastError {
    error!(provider, error = ?err, "Request failed before a response arrived");
    ProviderError::upstream(provider, err.status().map(|s| s.as_u16()), err.to_string()).into()
}

/// Error for a non-success HTTP response.
///
/// The message is taken from the body's `error.message` (or a bare `error`
/// string) when present, with any `error.status` code name appended, and
/// otherwise falls back to `"<provider> API error: <status>"`. The HTTP status
/// is always preserved.
pub(crate) async fn upstream_error(provider: &str, response: Response) -> ViralcastError {
    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();
    error!(provider, status, body = %body, "Provider API returned error");

    let message = serde_json::from_str::<Value>(&body)
        .ok()
        .and_then(|value| error_message(&value))
        .unwrap_or_else(|| format!("{} API error: {}", provider, status));

    ProviderError::upstream(provider, Some(status), message).into()
}

/// Pulls a human-readable message out of a JSON error body.
pub(crate) fn error_message(body: &Value) -> Option<String> {
    let error = body.get("error")?;
    if let Some(message) = error.as_str() {
        return Some(message.to_string());
    }

    let message = error.get("message").and_then(Value::as_str)?;
    match error.get("status").and_then(Value::as_str) {
        Some(code) => Some(format!("{} ({})", message, code)),
        None => Some(message.to_string()),
    }
}

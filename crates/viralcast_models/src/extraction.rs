//! Utilities for extracting structured data from provider responses.
//!
//! Chat-completion backends asked for JSON often wrap it in markdown code
//! blocks or surround it with explanatory text. This module recovers the
//! JSON value from those common response shapes.

use regex::Regex;
use serde_json::Value;
use std::sync::LazyLock;
use tracing::{debug, warn};
use viralcast_error::{ProviderError, ProviderErrorKind, ViralcastResult};

static CODE_FENCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"```(?:json)?\s*([\s\S]*?)\s*```").expect("Valid code fence regex")
});

/// Extract a JSON value from a response that may contain markdown or extra text.
///
/// Strategies, applied in order to the trimmed response:
/// 1. Take the contents of the first fenced code block (```` ```json ```` or bare ```` ``` ````)
/// 2. Narrow to the span from the first `{` to the last `}`
/// 3. Parse the candidate; if that fails, parse the untouched response
///
/// # Errors
///
/// Returns [`ProviderErrorKind::MalformedStructuredOutput`] carrying the raw
/// response when no strategy yields valid JSON.
///
/// # Examples
///
/// ```
/// use viralcast_models::extract_json_object;
///
/// let response = "Here is the result:\n```json\n{\"a\":1,\"b\":[2,3]}\n```\nThanks";
/// let value = extract_json_object(response).unwrap();
/// assert_eq!(value["b"][1], 3);
///
/// assert!(extract_json_object("no json here").is_err());
/// ```
pub fn extract_json_object(raw: &str) -> ViralcastResult<Value> {
    let mut candidate = raw.trim();

    if let Some(inner) = CODE_FENCE.captures(candidate).and_then(|c| c.get(1)) {
        debug!("Found fenced code block in response");
        candidate = inner.as_str();
    }

    if let (Some(start), Some(end)) = (candidate.find('{'), candidate.rfind('}')) {
        if start < end {
            candidate = &candidate[start..=end];
        }
    }

    match serde_json::from_str(candidate) {
        Ok(value) => Ok(value),
        Err(first) => {
            warn!(error = %first, "Extracted candidate is not valid JSON, trying the raw response");
            serde_json::from_str(raw).map_err(|_| {
                ProviderError::new(ProviderErrorKind::MalformedStructuredOutput {
                    raw: raw.to_string(),
                })
                .into()
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use viralcast_error::ViralcastErrorKind;

    #[test]
    fn test_fenced_json_block() {
        let response = "Here is the result:\n```json\n{\"a\":1,\"b\":[2,3]}\n```\nThanks";
        assert_eq!(extract_json_object(response).unwrap(), json!({"a": 1, "b": [2, 3]}));
    }

    #[test]
    fn test_bare_fence() {
        let response = "```\n{\"hook\": \"Stop scrolling\"}\n```";
        assert_eq!(
            extract_json_object(response).unwrap(),
            json!({"hook": "Stop scrolling"})
        );
    }

    #[test]
    fn test_embedded_object() {
        let response = "sure, {\"x\":true} done";
        assert_eq!(extract_json_object(response).unwrap(), json!({"x": true}));
    }

    #[test]
    fn test_nested_braces_span_first_to_last() {
        let response = "Result: {\"outer\": {\"inner\": [1, {\"deep\": null}]}} -- end";
        assert_eq!(
            extract_json_object(response).unwrap(),
            json!({"outer": {"inner": [1, {"deep": null}]}})
        );
    }

    #[test]
    fn test_plain_array_falls_back_to_raw() {
        assert_eq!(extract_json_object(" [1, 2, 3] ").unwrap(), json!([1, 2, 3]));
    }

    #[test]
    fn test_unparseable_carries_raw_text() {
        let err = extract_json_object("no json here").unwrap_err();
        match err.kind() {
            ViralcastErrorKind::Provider(e) => assert_eq!(
                e.kind,
                ProviderErrorKind::MalformedStructuredOutput {
                    raw: "no json here".to_string()
                }
            ),
            other => panic!("unexpected error kind: {other:?}"),
        }
    }

    #[test]
    fn test_two_objects_is_malformed() {
        assert!(extract_json_object("{\"a\":1} and {\"b\":2}").is_err());
    }
}

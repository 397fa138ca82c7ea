//! Image references produced by image generators.

use base64::{Engine as _, engine::general_purpose::STANDARD};
use serde::{Deserialize, Serialize};

/// Where a generated image lives.
///
/// Generators either hand back a remote URL or the image bytes themselves.
///
/// # Examples
///
/// ```
/// use viralcast_core::ImageReference;
///
/// let inline = ImageReference::inline("image/png", vec![1, 2, 3]);
/// assert_eq!(inline.to_uri(), "data:image/png;base64,AQID");
///
/// let parsed = ImageReference::parse("data:image/png;base64,AQID");
/// assert_eq!(parsed, inline);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ImageReference {
    /// Image hosted at a remote URL.
    Remote {
        /// Absolute URL
        url: String,
    },
    /// Image bytes carried inline.
    Inline {
        /// MIME type of the image
        mime: String,
        /// Binary image data
        #[serde(with = "base64_bytes")]
        data: Vec<u8>,
    },
}

impl ImageReference {
    /// Creates a remote reference.
    pub fn remote(url: impl Into<String>) -> Self {
        Self::Remote { url: url.into() }
    }

    /// Creates an inline reference.
    pub fn inline(mime: impl Into<String>, data: Vec<u8>) -> Self {
        Self::Inline {
            mime: mime.into(),
            data,
        }
    }

    /// Parses a URI. `data:<mime>;base64,<payload>` URIs with a decodable
    /// payload become [`ImageReference::Inline`], everything else is remote.
    pub fn parse(uri: &str) -> Self {
        uri.strip_prefix("data:")
            .and_then(|rest| rest.split_once(";base64,"))
            .and_then(|(mime, payload)| {
                STANDARD
                    .decode(payload.trim())
                    .ok()
                    .map(|data| Self::inline(mime, data))
            })
            .unwrap_or_else(|| Self::remote(uri))
    }

    /// Renders the reference as a URI (a data URI for inline images).
    pub fn to_uri(&self) -> String {
        match self {
            Self::Remote { url } => url.clone(),
            Self::Inline { mime, data } => format!("data:{};base64,{}", mime, STANDARD.encode(data)),
        }
    }

    /// Whether the image bytes are carried inline.
    pub fn is_inline(&self) -> bool {
        matches!(self, Self::Inline { .. })
    }
}

mod base64_bytes {
    use base64::{Engine as _, engine::general_purpose::STANDARD};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(data: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&STANDARD.encode(data))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let encoded = String::deserialize(deserializer)?;
        STANDARD.decode(encoded).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_remote_url() {
        let image = ImageReference::parse("https://picsum.photos/seed/42/1024/1024");
        assert_eq!(
            image,
            ImageReference::remote("https://picsum.photos/seed/42/1024/1024")
        );
        assert!(!image.is_inline());
    }

    #[test]
    fn test_parse_bad_base64_stays_remote() {
        let image = ImageReference::parse("data:image/png;base64,@@@");
        assert!(!image.is_inline());
    }

    #[test]
    fn test_inline_serializes_as_base64() {
        let image = ImageReference::inline("image/jpeg", b"abc".to_vec());
        let json = serde_json::to_value(&image).unwrap();
        assert_eq!(json["type"], "inline");
        assert_eq!(json["data"], "YWJj");
    }
}

//! Keyless stock-photo provider with an offline gradient renderer.

use async_trait::async_trait;
use tracing::{debug, instrument};
use viralcast_core::ImageReference;
use viralcast_error::ViralcastResult;
use viralcast_interface::ImageProvider;
use viralcast_rate_limit::ProviderConfig;

const PROVIDER_NAME: &str = "Free Images";
const SIZE: u32 = 1024;

/// Deterministic seed in `0..1000` for a prompt.
///
/// Uses the 32-bit `hash * 31 + code unit` string hash over UTF-16 code units
/// with wrapping arithmetic, so the same prompt always maps to the same photo.
///
/// # Examples
///
/// ```
/// use viralcast_models::prompt_seed;
///
/// assert_eq!(prompt_seed(""), 0);
/// assert_eq!(prompt_seed("a"), 97);
/// assert_eq!(prompt_seed("ab"), 105);
/// ```
pub fn prompt_seed(text: &str) -> u32 {
    let hash = text.encode_utf16().fold(0i32, |hash, unit| {
        hash.wrapping_shl(5)
            .wrapping_sub(hash)
            .wrapping_add(i32::from(unit))
    });
    (i64::from(hash).unsigned_abs() % 1000) as u32
}

/// Lorem Picsum URL for a seed.
pub fn picsum_url(seed: u32) -> String {
    format!("https://picsum.photos/seed/{}/{}/{}", seed, SIZE, SIZE)
}

fn color_schemes(niche: &str) -> [(&'static str, &'static str); 4] {
    match niche {
        "MOVIES" => [
            ("#fa709a", "#fee140"),
            ("#30cfd0", "#330867"),
            ("#a8edea", "#fed6e3"),
            ("#ff9a9e", "#fecfef"),
        ],
        "NEWS" => [
            ("#667eea", "#764ba2"),
            ("#f093fb", "#f5576c"),
            ("#4facfe", "#00f2fe"),
            ("#a8edea", "#fed6e3"),
        ],
        _ => [
            ("#667eea", "#764ba2"),
            ("#f093fb", "#f5576c"),
            ("#4facfe", "#00f2fe"),
            ("#43e97b", "#38f9d7"),
        ],
    }
}

/// Renders a square radial-gradient SVG with seed-placed decorations.
///
/// Colours come from the niche's scheme, chosen by `seed`.
pub fn gradient_svg(niche: &str, seed: u32) -> String {
    let schemes = color_schemes(niche);
    let (inner, outer) = schemes[seed as usize % schemes.len()];

    let mut svg = format!(
        concat!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{size}" height="{size}" viewBox="0 0 {size} {size}">"#,
            r#"<defs><radialGradient id="bg" cx="512" cy="512" r="724" gradientUnits="userSpaceOnUse">"#,
            r#"<stop offset="0" stop-color="{inner}"/><stop offset="1" stop-color="{outer}"/>"#,
            r#"</radialGradient></defs><rect width="{size}" height="{size}" fill="url(#bg)"/>"#,
        ),
        size = SIZE,
        inner = inner,
        outer = outer,
    );

    for i in 0..20 {
        let x = (seed + i * 73) % SIZE;
        let y = (seed + i * 137) % SIZE;
        let radius = (seed + i * 31) % 100 + 40;
        svg.push_str(&format!(
            r#"<circle cx="{}" cy="{}" r="{}" fill="rgba(255,255,255,0.15)"/>"#,
            x, y, radius
        ));
    }

    for i in 0..5 {
        let size = (seed + i * 47) % 150 + 50;
        let x = ((seed + i * 151) % SIZE) as i64 - i64::from(size / 2);
        let y = ((seed + i * 211) % SIZE) as i64 - i64::from(size / 2);
        svg.push_str(&format!(
            r#"<rect x="{}" y="{}" width="{}" height="{}" fill="none" stroke="rgba(255,255,255,0.2)" stroke-width="3"/>"#,
            x, y, size, size
        ));
    }

    svg.push_str("</svg>");
    svg
}

/// Keyless image source that never fails.
///
/// Online it points at a Lorem Picsum photo seeded from the prompt and niche;
/// offline it renders a gradient placeholder inline. Always available and part
/// of the always-available fallback class.
///
/// # Examples
///
/// ```
/// use viralcast_interface::ImageProvider;
/// use viralcast_models::FreeImageProvider;
///
/// let provider = FreeImageProvider::new();
/// assert!(provider.is_available());
/// assert!(provider.is_always_available_fallback());
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct FreeImageProvider {
    offline: bool,
}

impl FreeImageProvider {
    /// Creates an online provider.
    pub fn new() -> Self {
        Self { offline: false }
    }

    /// Creates a provider that only renders gradient placeholders.
    pub fn offline() -> Self {
        Self { offline: true }
    }

    /// Creates a provider from its configuration table.
    pub fn from_config(config: &ProviderConfig) -> Self {
        Self {
            offline: config.offline,
        }
    }

    /// Whether this provider renders placeholders instead of fetching photos.
    pub fn is_offline(&self) -> bool {
        self.offline
    }
}

#[async_trait]
impl ImageProvider for FreeImageProvider {
    fn name(&self) -> &str {
        PROVIDER_NAME
    }

    fn is_available(&self) -> bool {
        true
    }

    fn is_always_available_fallback(&self) -> bool {
        true
    }

    #[instrument(skip(self, prompt, _style), fields(provider = PROVIDER_NAME, offline = self.offline))]
    async fn generate_image(
        &self,
        prompt: &str,
        niche: &str,
        _style: Option<&str>,
    ) -> ViralcastResult<ImageReference> {
        let seed = prompt_seed(&format!("{}{}", prompt, niche));

        if self.offline {
            debug!(seed, "Rendering gradient placeholder");
            let svg = gradient_svg(niche, seed);
            return Ok(ImageReference::inline("image/svg+xml", svg.into_bytes()));
        }

        debug!(seed, "Using Picsum image service");
        Ok(ImageReference::remote(picsum_url(seed)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seed_matches_wrapping_string_hash() {
        // "hello" hashes to 99162322 under the 31-multiplier string hash.
        assert_eq!(prompt_seed("hello"), 322);
        assert!(prompt_seed("A very long prompt about minimalist interior design DESIGN") < 1000);
    }

    #[test]
    fn test_seed_uses_utf16_code_units() {
        // U+1F600 is the surrogate pair D83D DE00.
        let expected = {
            let h = 0xD83Di32;
            let h = h.wrapping_shl(5).wrapping_sub(h).wrapping_add(0xDE00);
            (i64::from(h).unsigned_abs() % 1000) as u32
        };
        assert_eq!(prompt_seed("\u{1F600}"), expected);
    }

    #[test]
    fn test_picsum_url() {
        assert_eq!(picsum_url(42), "https://picsum.photos/seed/42/1024/1024");
    }

    #[test]
    fn test_gradient_uses_niche_scheme() {
        let movies = gradient_svg("MOVIES", 0);
        assert!(movies.contains("#fa709a"));
        assert!(movies.starts_with("<svg"));
        assert!(movies.ends_with("</svg>"));
        assert_eq!(movies.matches("<circle").count(), 20);

        let unknown = gradient_svg("SPORTS", 3);
        assert!(unknown.contains("#43e97b"));
    }

    #[tokio::test]
    async fn test_online_and_offline_output() -> anyhow::Result<()> {
        let seed = prompt_seed("coffee shopDESIGN");

        let online = FreeImageProvider::new()
            .generate_image("coffee shop", "DESIGN", None)
            .await?;
        assert_eq!(online, ImageReference::remote(picsum_url(seed)));

        let offline = FreeImageProvider::offline()
            .generate_image("coffee shop", "DESIGN", None)
            .await?;
        match offline {
            ImageReference::Inline { mime, data } => {
                assert_eq!(mime, "image/svg+xml");
                assert_eq!(String::from_utf8(data)?, gradient_svg("DESIGN", seed));
            }
            other => panic!("expected inline image, got {other:?}"),
        }
        Ok(())
    }
}

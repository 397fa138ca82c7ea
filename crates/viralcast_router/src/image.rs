//! Failover router over image providers.

use crate::failover::{Failover, RouterKind};
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};
use viralcast_core::ImageReference;
use viralcast_error::ViralcastResult;
use viralcast_interface::ImageProvider;
use viralcast_rate_limit::RouterConfig;

/// Routes image generation across providers with round-robin failover.
///
/// Works like [`crate::TextRouter`] with two differences: the attempt budget
/// is larger (twice the provider count by default) because free image backends
/// fail transiently more often, and providers flagged as always-available
/// fallbacks are never blocklisted nor skipped.
pub struct ImageRouter {
    inner: Failover<dyn ImageProvider>,
}

impl ImageRouter {
    /// Creates a router with default attempt budgets.
    pub fn new(providers: Vec<Arc<dyn ImageProvider>>) -> Self {
        Self::with_config(providers, RouterConfig::default())
    }

    /// Creates a router with explicit attempt budgets.
    pub fn with_config(providers: Vec<Arc<dyn ImageProvider>>, config: RouterConfig) -> Self {
        let available: Vec<Arc<dyn ImageProvider>> = providers
            .into_iter()
            .filter(|provider| {
                let available = provider.is_available();
                if !available {
                    debug!(provider = provider.name(), "Dropping unavailable image provider");
                }
                available
            })
            .collect();

        if available.is_empty() {
            warn!("No image generators available");
        } else {
            info!(
                generators = ?available.iter().map(|p| p.name()).collect::<Vec<_>>(),
                "Image router initialized"
            );
        }

        Self {
            inner: Failover::new(RouterKind::Image, available, config),
        }
    }

    /// Generates one image with the first provider that succeeds.
    ///
    /// # Errors
    ///
    /// `NoGeneratorAvailable` when the router holds no provider, otherwise
    /// `AllGeneratorsExhausted` carrying the last provider error.
    #[instrument(skip_all, fields(router = "image", niche = %niche))]
    pub async fn generate_image(
        &self,
        prompt: &str,
        niche: &str,
        style: Option<&str>,
    ) -> ViralcastResult<ImageReference> {
        let budget = self.inner.config().image_attempts(self.len());
        let (image, _provider) = self
            .inner
            .route("generate_image", budget, |provider| async move {
                provider.generate_image(prompt, niche, style).await
            })
            .await?;

        Ok(image)
    }

    /// Name of the generator the next call starts with, or "None".
    pub fn current_generator_name(&self) -> &str {
        self.inner.current_name()
    }

    /// Names of the generators this router cycles through, in order.
    pub fn generator_names(&self) -> Vec<&str> {
        self.inner.providers().iter().map(|p| p.name()).collect()
    }

    /// Number of available generators.
    pub fn len(&self) -> usize {
        self.inner.providers().len()
    }

    /// Whether the router holds no generator.
    pub fn is_empty(&self) -> bool {
        self.inner.providers().is_empty()
    }

    /// Sorted names of currently blocklisted generators.
    pub fn blocked_generators(&self) -> Vec<String> {
        self.inner.blocklist().snapshot()
    }

    /// Unlists every generator.
    pub fn clear_blocklist(&self) {
        self.inner.blocklist().clear();
    }
}

impl std::fmt::Debug for ImageRouter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageRouter")
            .field("generators", &self.generator_names())
            .field("current", &self.current_generator_name())
            .field("blocked", &self.blocked_generators())
            .finish()
    }
}

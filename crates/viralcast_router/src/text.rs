//! Failover router over text providers.

use crate::failover::{Failover, RouterKind};
use std::sync::Arc;
use tracing::{debug, info, instrument};
use viralcast_core::{GenerationResult, TextOptions};
use viralcast_error::ViralcastResult;
use viralcast_interface::TextProvider;
use viralcast_rate_limit::RouterConfig;

/// Routes text and JSON generation across providers with round-robin failover.
///
/// Providers that report themselves unavailable are dropped at construction.
/// Each call starts at the provider the cursor points at, passes over
/// blocklisted providers without spending an attempt, blocklists providers that
/// fail with a rate-limit class error and unlists providers that succeed. The
/// cursor keeps moving across calls, so load spreads over every provider.
///
/// # Examples
///
/// ```no_run
/// use std::sync::Arc;
/// use viralcast_core::TextOptions;
/// use viralcast_interface::TextProvider;
/// use viralcast_models::OpenAiCompatibleProvider;
/// use viralcast_router::TextRouter;
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let providers: Vec<Arc<dyn TextProvider>> = vec![
///     Arc::new(OpenAiCompatibleProvider::groq(std::env::var("GROQ_API_KEY")?)),
///     Arc::new(OpenAiCompatibleProvider::deepseek(std::env::var("DEEPSEEK_API_KEY")?)),
/// ];
/// let router = TextRouter::new(providers);
/// let result = router
///     .generate_text("Write a hook about coffee", None, &TextOptions::default())
///     .await?;
/// println!("{} answered: {}", result.provider, result.text);
/// # Ok(())
/// # }
/// ```
pub struct TextRouter {
    inner: Failover<dyn TextProvider>,
}

impl TextRouter {
    /// Creates a router with default attempt budgets.
    pub fn new(providers: Vec<Arc<dyn TextProvider>>) -> Self {
        Self::with_config(providers, RouterConfig::default())
    }

    /// Creates a router with explicit attempt budgets.
    pub fn with_config(providers: Vec<Arc<dyn TextProvider>>, config: RouterConfig) -> Self {
        let available: Vec<Arc<dyn TextProvider>> = providers
            .into_iter()
            .filter(|provider| {
                let available = provider.is_available();
                if !available {
                    debug!(provider = provider.name(), "Dropping unavailable text provider");
                }
                available
            })
            .collect();

        info!(
            providers = ?available.iter().map(|p| p.name()).collect::<Vec<_>>(),
            "Text router initialized"
        );

        Self {
            inner: Failover::new(RouterKind::Text, available, config),
        }
    }

    /// Generates text with the first provider that succeeds.
    ///
    /// # Errors
    ///
    /// `NoProviderAvailable` when the router holds no provider, otherwise
    /// `AllProvidersExhausted` carrying the last provider error.
    #[instrument(skip_all, fields(router = "text"))]
    pub async fn generate_text(
        &self,
        prompt: &str,
        system_instruction: Option<&str>,
        options: &TextOptions,
    ) -> ViralcastResult<GenerationResult> {
        let (output, provider) = self
            .inner
            .route("generate_text", self.budget(), |provider| async move {
                provider
                    .generate_text(prompt, system_instruction, options)
                    .await
            })
            .await?;

        Ok(output.with_provider(provider))
    }

    /// Generates a structured value with the first provider that succeeds.
    ///
    /// # Errors
    ///
    /// Same as [`TextRouter::generate_text`].
    #[instrument(skip_all, fields(router = "text"))]
    pub async fn generate_json(
        &self,
        prompt: &str,
        schema: &serde_json::Value,
        system_instruction: Option<&str>,
    ) -> ViralcastResult<serde_json::Value> {
        let (value, _provider) = self
            .inner
            .route("generate_json", self.budget(), |provider| async move {
                provider
                    .generate_json(prompt, schema, system_instruction)
                    .await
            })
            .await?;

        Ok(value)
    }

    /// Name of the provider the next call starts with, or "None".
    pub fn current_provider_name(&self) -> &str {
        self.inner.current_name()
    }

    /// Names of the providers this router cycles through, in order.
    pub fn provider_names(&self) -> Vec<&str> {
        self.inner.providers().iter().map(|p| p.name()).collect()
    }

    /// Number of available providers.
    pub fn len(&self) -> usize {
        self.inner.providers().len()
    }

    /// Whether the router holds no provider.
    pub fn is_empty(&self) -> bool {
        self.inner.providers().is_empty()
    }

    /// Sorted names of currently blocklisted providers.
    pub fn blocked_providers(&self) -> Vec<String> {
        self.inner.blocklist().snapshot()
    }

    /// Unlists every provider.
    pub fn clear_blocklist(&self) {
        self.inner.blocklist().clear();
    }

    fn budget(&self) -> usize {
        self.inner.config().text_attempts(self.len())
    }
}

impl std::fmt::Debug for TextRouter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TextRouter")
            .field("providers", &self.provider_names())
            .field("current", &self.current_provider_name())
            .field("blocked", &self.blocked_providers())
            .finish()
    }
}

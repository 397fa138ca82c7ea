//! Round-robin failover loop shared by the text and image routers.

use crate::RouterMetrics;
use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::{debug, error, info, warn};
use viralcast_error::{RouterError, RouterErrorKind, ViralcastError, ViralcastResult};
use viralcast_interface::{ImageProvider, TextProvider};
use viralcast_rate_limit::{Blocklist, FailureClass, RouterConfig, classify};

/// Message carried by an exhaustion error when no provider was actually called.
pub(crate) const NOTHING_ATTEMPTED: &str = "no eligible provider (all blocklisted)";

/// Which router a loop belongs to; picks error kinds and metric labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display, strum::AsRefStr)]
#[strum(serialize_all = "snake_case")]
pub(crate) enum RouterKind {
    Text,
    Image,
}

impl RouterKind {
    fn none_available(self) -> RouterErrorKind {
        match self {
            Self::Text => RouterErrorKind::NoProviderAvailable,
            Self::Image => RouterErrorKind::NoGeneratorAvailable,
        }
    }

    fn exhausted(self, last_error: String) -> RouterErrorKind {
        match self {
            Self::Text => RouterErrorKind::AllProvidersExhausted { last_error },
            Self::Image => RouterErrorKind::AllGeneratorsExhausted { last_error },
        }
    }
}

/// What the loop needs to know about a provider.
pub(crate) trait Routable: Send + Sync {
    fn route_name(&self) -> &str;

    /// Providers exempt from blocklisting are never listed and never skipped.
    fn never_blocklisted(&self) -> bool {
        false
    }
}

impl Routable for dyn TextProvider {
    fn route_name(&self) -> &str {
        self.name()
    }
}

impl Routable for dyn ImageProvider {
    fn route_name(&self) -> &str {
        self.name()
    }

    fn never_blocklisted(&self) -> bool {
        self.is_always_available_fallback()
    }
}

/// Providers, cursor and blocklist of one router instance.
pub(crate) struct Failover<P: ?Sized> {
    kind: RouterKind,
    providers: Vec<Arc<P>>,
    cursor: AtomicUsize,
    blocklist: Blocklist,
    config: RouterConfig,
}

impl<P: Routable + ?Sized> Failover<P> {
    pub(crate) fn new(kind: RouterKind, providers: Vec<Arc<P>>, config: RouterConfig) -> Self {
        Self {
            kind,
            providers,
            cursor: AtomicUsize::new(0),
            blocklist: Blocklist::default(),
            config,
        }
    }

    pub(crate) fn providers(&self) -> &[Arc<P>] {
        &self.providers
    }

    pub(crate) fn config(&self) -> &RouterConfig {
        &self.config
    }

    pub(crate) fn blocklist(&self) -> &Blocklist {
        &self.blocklist
    }

    /// Name of the provider the cursor points at, or "None".
    pub(crate) fn current_name(&self) -> &str {
        self.providers
            .get(self.cursor.load(Ordering::SeqCst))
            .map(|p| p.route_name())
            .unwrap_or("None")
    }

    /// Moves the cursor one step, wrapping at the end of the list.
    fn advance(&self) {
        let len = self.providers.len();
        if len == 0 {
            return;
        }
        // The closure always yields a value, so the update cannot fail.
        let _ = self
            .cursor
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |c| Some((c + 1) % len));
    }

    /// Runs `call` against providers in round-robin order until one succeeds.
    ///
    /// Only real invocations count toward `budget`; blocklisted providers are
    /// passed over for free, but the loop never runs more than the configured
    /// iteration cap. Returns the value and the name of the provider that
    /// produced it.
    pub(crate) async fn route<T, F, Fut>(
        &self,
        operation: &str,
        budget: usize,
        mut call: F,
    ) -> ViralcastResult<(T, String)>
    where
        F: FnMut(Arc<P>) -> Fut,
        Fut: Future<Output = ViralcastResult<T>>,
    {
        let router = self.kind.as_ref();
        if self.providers.is_empty() {
            warn!(router, operation, "No providers available");
            return Err(RouterError::new(self.kind.none_available()).into());
        }

        let metrics = RouterMetrics::get();
        let cooldown = self.config.blocklist_cooldown();
        let cap = self.config.iteration_cap(budget);
        let mut attempts = 0;
        let mut iterations = 0;
        let mut last_error: Option<ViralcastError> = None;

        while attempts < budget && iterations < cap {
            iterations += 1;
            let index = self.cursor.load(Ordering::SeqCst) % self.providers.len();
            let provider = Arc::clone(&self.providers[index]);
            let name = provider.route_name().to_string();
            let exempt = provider.never_blocklisted();

            if !exempt && self.blocklist.is_blocking(&name, cooldown) {
                debug!(router, provider = %name, "Skipping blocklisted provider");
                metrics.record_skip(router, &name);
                self.advance();
                continue;
            }

            attempts += 1;
            metrics.record_attempt(router, &name);
            debug!(router, operation, provider = %name, cursor = index, attempt = attempts, "Trying provider");

            match call(provider).await {
                Ok(value) => {
                    info!(router, operation, provider = %name, "Provider succeeded");
                    self.blocklist.remove(&name);
                    self.advance();
                    return Ok((value, name));
                }
                Err(e) => {
                    let class = classify(&e);
                    metrics.record_failure(router, &name, class);
                    warn!(router, operation, provider = %name, error = %e.detail(), class = %class, "Provider failed");

                    if class == FailureClass::RateLimit && !exempt {
                        warn!(router, provider = %name, "Rate limit hit, blocklisting provider");
                        self.blocklist.insert(&name);
                    }

                    self.advance();
                    last_error = Some(e);
                }
            }
        }

        metrics.record_exhausted(router);
        let last_error = last_error
            .map(|e| e.detail())
            .unwrap_or_else(|| NOTHING_ATTEMPTED.to_string());
        error!(router, operation, attempts, iterations, last_error = %last_error, "All providers failed");
        Err(RouterError::new(self.kind.exhausted(last_error)).into())
    }
}

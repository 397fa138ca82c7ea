//! Configuration structures for providers and routers.
//!
//! This module provides TOML-based configuration. The configuration system supports:
//! - Bundled defaults (include_str! from viralcast.toml)
//! - User overrides (./viralcast.toml or ~/.config/viralcast/viralcast.toml)
//! - Automatic merging with user values taking precedence
//!
//! Credentials are normally not written into the file; each provider names the
//! environment variables its key is read from.

use config::{Config, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;
use tracing::{debug, instrument};
use viralcast_error::{ConfigError, ViralcastError, ViralcastResult};

/// Whether an API key is plausible enough to attempt a call with.
///
/// A key is usable when it is non-empty, is not the literal `"undefined"`
/// (what unset build-time variables render as) and is longer than 10 characters.
///
/// # Examples
///
/// ```
/// use viralcast_rate_limit::is_usable_api_key;
///
/// assert!(is_usable_api_key("gsk_0123456789abcdef"));
/// assert!(!is_usable_api_key("undefined"));
/// assert!(!is_usable_api_key("short"));
/// ```
pub fn is_usable_api_key(key: &str) -> bool {
    !key.is_empty() && key != "undefined" && key.len() > 10
}

/// Configuration for a single provider.
///
/// ```toml
/// [providers.openai]
/// api_key_env = ["OPENAI_API_KEY"]
/// base_url_env = "OPENAI_BASE_URL"
/// model = "gpt-4o-mini"
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, Default)]
pub struct ProviderConfig {
    /// Inline API key (takes precedence over `api_key_env`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Environment variables to read the key from, first non-empty wins
    #[serde(default)]
    pub api_key_env: Vec<String>,

    /// Inline endpoint override
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,

    /// Environment variable holding an endpoint override
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url_env: Option<String>,

    /// Default model override
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,

    /// Serve locally rendered output instead of calling the upstream
    #[serde(default)]
    pub offline: bool,
}

impl ProviderConfig {
    /// Resolves the API key from the process environment.
    pub fn resolve_api_key(&self) -> Option<String> {
        self.resolve_api_key_with(|name| std::env::var(name).ok())
    }

    /// Resolves the API key with a custom variable lookup.
    ///
    /// # Examples
    ///
    /// ```
    /// use viralcast_rate_limit::ProviderConfig;
    ///
    /// let config = ProviderConfig {
    ///     api_key_env: vec!["GEMINI_API_KEY".into(), "API_KEY".into()],
    ///     ..Default::default()
    /// };
    /// let key = config.resolve_api_key_with(|name| {
    ///     (name == "API_KEY").then(|| "fallback-key-123".to_string())
    /// });
    /// assert_eq!(key.as_deref(), Some("fallback-key-123"));
    /// ```
    pub fn resolve_api_key_with<F>(&self, lookup: F) -> Option<String>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(key) = self.api_key.as_ref().filter(|k| !k.is_empty()) {
            return Some(key.clone());
        }
        self.api_key_env
            .iter()
            .filter_map(|name| lookup(name))
            .find(|value| !value.is_empty())
    }

    /// Resolves the endpoint override from the process environment.
    pub fn resolve_base_url(&self) -> Option<String> {
        self.resolve_base_url_with(|name| std::env::var(name).ok())
    }

    /// Resolves the endpoint override with a custom variable lookup.
    pub fn resolve_base_url_with<F>(&self, lookup: F) -> Option<String>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = self.base_url.as_ref().filter(|u| !u.is_empty()) {
            return Some(url.clone());
        }
        self.base_url_env
            .as_deref()
            .and_then(lookup)
            .filter(|value| !value.is_empty())
    }
}

/// Attempt budgets for the routers.
///
/// A router with `N` available providers makes at most `multiplier × N` real
/// provider calls per request, and walks at most `iteration_cap_multiplier ×`
/// that many positions (real calls plus blocklist skips) before giving up.
///
/// ```toml
/// [router]
/// text_attempt_multiplier = 1
/// image_attempt_multiplier = 2
/// iteration_cap_multiplier = 2
/// blocklist_cooldown_secs = 60
/// ```
///
/// A provider blocklisted after a rate-limit failure is skipped for
/// `blocklist_cooldown_secs`; after that it is eligible again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct RouterConfig {
    /// Real attempts per text provider
    #[serde(default = "default_text_multiplier")]
    pub text_attempt_multiplier: usize,

    /// Real attempts per image provider
    #[serde(default = "default_image_multiplier")]
    pub image_attempt_multiplier: usize,

    /// Total iterations per real attempt
    #[serde(default = "default_cap_multiplier")]
    pub iteration_cap_multiplier: usize,

    /// Seconds a blocklisted provider is skipped before being retried
    #[serde(default = "default_cooldown_secs")]
    pub blocklist_cooldown_secs: u64,
}

fn default_text_multiplier() -> usize {
    1
}

fn default_image_multiplier() -> usize {
    2
}

fn default_cap_multiplier() -> usize {
    2
}

fn default_cooldown_secs() -> u64 {
    60
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            text_attempt_multiplier: default_text_multiplier(),
            image_attempt_multiplier: default_image_multiplier(),
            iteration_cap_multiplier: default_cap_multiplier(),
            blocklist_cooldown_secs: default_cooldown_secs(),
        }
    }
}

impl RouterConfig {
    /// Real attempt budget for a text router over `providers` providers.
    ///
    /// # Examples
    ///
    /// ```
    /// use viralcast_rate_limit::RouterConfig;
    ///
    /// let config = RouterConfig::default();
    /// assert_eq!(config.text_attempts(3), 3);
    /// assert_eq!(config.image_attempts(3), 6);
    /// assert_eq!(config.iteration_cap(6), 12);
    /// ```
    pub fn text_attempts(&self, providers: usize) -> usize {
        self.text_attempt_multiplier.max(1) * providers
    }

    /// Real attempt budget for an image router over `providers` providers.
    pub fn image_attempts(&self, providers: usize) -> usize {
        self.image_attempt_multiplier.max(1) * providers
    }

    /// Bound on total loop iterations for a given attempt budget.
    pub fn iteration_cap(&self, attempts: usize) -> usize {
        self.iteration_cap_multiplier.max(1) * attempts
    }

    /// How long a blocklisted provider is skipped.
    pub fn blocklist_cooldown(&self) -> Duration {
        Duration::from_secs(self.blocklist_cooldown_secs)
    }

    /// Same budgets with a different cooldown.
    ///
    /// The cooldown is kept in whole seconds; a fractional duration rounds up,
    /// so only [`Duration::ZERO`] turns blocking off.
    pub fn with_blocklist_cooldown(mut self, cooldown: Duration) -> Self {
        self.blocklist_cooldown_secs =
            cooldown.as_secs() + u64::from(cooldown.subsec_nanos() > 0);
        self
    }
}

/// Top-level Viralcast configuration.
///
/// Loads configuration from TOML files with a precedence system:
/// 1. Bundled defaults (include_str! from viralcast.toml)
/// 2. User override (./viralcast.toml or ~/.config/viralcast/viralcast.toml)
///
/// # Example
///
/// ```no_run
/// use viralcast_rate_limit::ViralcastConfig;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let config = ViralcastConfig::load()?;
/// let groq = config.provider("groq");
/// println!("Groq key configured: {}", groq.resolve_api_key().is_some());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, Default)]
pub struct ViralcastConfig {
    /// Map of provider key to provider configuration
    #[serde(default)]
    pub providers: HashMap<String, ProviderConfig>,

    /// Router attempt budgets
    #[serde(default)]
    pub router: RouterConfig,
}

impl ViralcastConfig {
    /// Load configuration from a specific file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<std::path::Path>) -> ViralcastResult<Self> {
        debug!("Loading configuration from file");

        Config::builder()
            .add_source(File::from(path.as_ref()))
            .build()
            .map_err(|e| {
                ViralcastError::from(ConfigError::new(format!(
                    "Failed to read configuration from {}: {}",
                    path.as_ref().display(),
                    e
                )))
            })?
            .try_deserialize()
            .map_err(|e| {
                ViralcastError::from(ConfigError::new(format!(
                    "Failed to parse configuration: {}",
                    e
                )))
            })
    }

    /// Load configuration with precedence: user override > bundled default.
    ///
    /// Configuration sources in order of precedence (later sources override earlier):
    /// 1. Bundled defaults (viralcast.toml shipped with library)
    /// 2. User config in home directory (~/.config/viralcast/viralcast.toml)
    /// 3. User config in current directory (./viralcast.toml)
    ///
    /// User config files are optional and silently skipped if not found.
    #[instrument]
    pub fn load() -> ViralcastResult<Self> {
        debug!("Loading configuration with precedence: current dir > home dir > bundled defaults");
        Self::layered(None)
    }

    /// [`load`](Self::load) with `extra` layered on top of every other source.
    ///
    /// Tables missing from `extra` keep their bundled or user values, so a file
    /// holding only `[router]` still sees every provider.
    ///
    /// # Errors
    ///
    /// Returns an error if `extra` is missing or any source fails to parse.
    #[instrument(skip(extra), fields(path = %extra.as_ref().display()))]
    pub fn load_with(extra: impl AsRef<std::path::Path>) -> ViralcastResult<Self> {
        debug!("Loading configuration with an extra layer");
        Self::layered(Some(extra.as_ref()))
    }

    fn layered(extra: Option<&std::path::Path>) -> ViralcastResult<Self> {
        const DEFAULT_CONFIG: &str = include_str!("../../../viralcast.toml");

        let mut builder =
            Config::builder().add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml));

        if let Some(home) = dirs::home_dir() {
            let home_config = home.join(".config/viralcast/viralcast.toml");
            builder = builder.add_source(File::from(home_config).required(false));
        }

        builder = builder.add_source(File::with_name("viralcast").required(false));

        if let Some(path) = extra {
            builder = builder.add_source(File::from(path));
        }

        builder
            .build()
            .map_err(|e| {
                ViralcastError::from(ConfigError::new(format!(
                    "Failed to build configuration: {}",
                    e
                )))
            })?
            .try_deserialize()
            .map_err(|e| {
                ViralcastError::from(ConfigError::new(format!(
                    "Failed to parse configuration: {}",
                    e
                )))
            })
    }

    /// Bundled defaults only, ignoring user files.
    pub fn bundled() -> ViralcastResult<Self> {
        const DEFAULT_CONFIG: &str = include_str!("../../../viralcast.toml");

        Config::builder()
            .add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml))
            .build()
            .and_then(Config::try_deserialize)
            .map_err(|e| {
                ViralcastError::from(ConfigError::new(format!(
                    "Failed to parse bundled configuration: {}",
                    e
                )))
            })
    }

    /// Configuration for a provider key (e.g., `"groq"`), or an empty one.
    pub fn provider(&self, key: &str) -> ProviderConfig {
        let config = self.providers.get(key).cloned();
        debug!(provider = key, found = config.is_some(), "Looking up provider configuration");
        config.unwrap_or_default()
    }
}

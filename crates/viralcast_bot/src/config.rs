//! Bot configuration: which channel to serve and where to deliver.

use serde::{Deserialize, Serialize};
use std::path::Path;
use viralcast_core::ChannelProfile;
use viralcast_error::{ConfigError, ViralcastResult};
use viralcast_social::TelegramClient;

/// Environment variable read when the config carries no inline token.
pub const DEFAULT_TOKEN_ENV: &str = "TELEGRAM_BOT_TOKEN";

/// Configuration for one bot run.
///
/// # Example
///
/// ```toml
/// [channel]
/// id = "design-daily"
/// name = "Design Daily"
/// channelId = "@design_daily"
/// niche = "DESIGN"
///
/// [channel.strategy]
/// tone = "LUXURY"
/// regions = ["Russia", "Kazakhstan"]
/// language = "ru"
///
/// [telegram]
/// token_env = "TELEGRAM_BOT_TOKEN"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BotConfig {
    /// Channel served by this bot
    pub channel: ChannelProfile,
    /// Telegram delivery settings
    #[serde(default)]
    pub telegram: TelegramConfig,
}

impl BotConfig {
    /// Load bot configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> ViralcastResult<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::new(format!("Failed to read config file: {}", e)))?;

        Self::from_toml(&content)
    }

    /// Parse bot configuration from TOML text.
    pub fn from_toml(content: &str) -> ViralcastResult<Self> {
        Ok(toml::from_str(content)
            .map_err(|e| ConfigError::new(format!("Failed to parse config: {}", e)))?)
    }

    /// Telegram client for the configured channel.
    ///
    /// # Errors
    ///
    /// `InvalidToken` when no usable token is configured.
    pub fn telegram_client(&self) -> ViralcastResult<TelegramClient> {
        let token = self.telegram.resolve_token().unwrap_or_default();
        let client = TelegramClient::new(token, self.channel.channel_id.clone())?;
        Ok(match &self.telegram.base_url {
            Some(base_url) => client.with_base_url(base_url),
            None => client,
        })
    }
}

/// Telegram credentials and endpoint.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TelegramConfig {
    /// Inline bot token
    #[serde(default)]
    pub token: Option<String>,
    /// Environment variable holding the token (defaults to [`DEFAULT_TOKEN_ENV`])
    #[serde(default)]
    pub token_env: Option<String>,
    /// Bot API server override
    #[serde(default)]
    pub base_url: Option<String>,
}

impl TelegramConfig {
    /// Inline token if set, otherwise the environment variable.
    pub fn resolve_token(&self) -> Option<String> {
        self.resolve_token_with(|name| std::env::var(name).ok())
    }

    /// Like [`TelegramConfig::resolve_token`] with a custom variable lookup.
    pub fn resolve_token_with<F>(&self, lookup: F) -> Option<String>
    where
        F: Fn(&str) -> Option<String>,
    {
        let inline = self.token.clone().filter(|t| !t.trim().is_empty());
        inline.or_else(|| {
            lookup(self.token_env.as_deref().unwrap_or(DEFAULT_TOKEN_ENV))
                .filter(|t| !t.trim().is_empty())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use viralcast_core::{ContentTone, NicheType, SupportedLanguage};

    const SAMPLE: &str = r#"
[channel]
id = "design-daily"
name = "Design Daily"
channelId = "@design_daily"
niche = "DESIGN"

[channel.strategy]
tone = "LUXURY"
regions = ["Russia", "Kazakhstan"]
language = "en"

[telegram]
token_env = "MY_BOT_TOKEN"
"#;

    #[test]
    fn test_parse_sample() {
        let config = BotConfig::from_toml(SAMPLE).expect("sample parses");
        assert_eq!(config.channel.niche, NicheType::Design);
        assert_eq!(config.channel.strategy.tone, ContentTone::Luxury);
        assert_eq!(config.channel.strategy.language, SupportedLanguage::En);
        assert_eq!(config.channel.strategy.batch_size, 1);
        assert!(config.channel.is_active);
    }

    #[test]
    fn test_token_resolution() {
        let config = BotConfig::from_toml(SAMPLE).expect("sample parses");
        let lookup = |name: &str| (name == "MY_BOT_TOKEN").then(|| "123:abc".to_string());
        assert_eq!(config.telegram.resolve_token_with(lookup), Some("123:abc".to_string()));

        let inline = TelegramConfig {
            token: Some("999:inline".to_string()),
            ..TelegramConfig::default()
        };
        assert_eq!(inline.resolve_token_with(lookup), Some("999:inline".to_string()));
        assert_eq!(TelegramConfig::default().resolve_token_with(|_| None), None);
    }

    #[test]
    fn test_invalid_toml_is_config_error() {
        let err = BotConfig::from_toml("[channel]\nid = 1").expect_err("missing fields");
        assert!(err.to_string().contains("Failed to parse config"));
    }
}

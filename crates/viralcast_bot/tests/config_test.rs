//! Loading bot configuration from disk.

use std::io::Write;
use viralcast_bot::{BotConfig, TelegramConfig};
use viralcast_core::{NicheType, SupportedLanguage};
use viralcast_error::{TelegramErrorKind, ViralcastErrorKind};

const BOT_TOML: &str = r#"
[channel]
id = "cinema"
name = "Cinema Club"
channelId = "@cinema_club"
niche = "MOVIES"

[channel.strategy]
tone = "AGGRESSIVE"
batchSize = 3
language = "kg"

[telegram]
token = "123456:from-file"
base_url = "http://localhost:8081"
"#;

#[test]
fn test_from_file() -> anyhow::Result<()> {
    let mut file = tempfile::Builder::new().suffix(".toml").tempfile()?;
    file.write_all(BOT_TOML.as_bytes())?;

    let config = BotConfig::from_file(file.path())?;
    assert_eq!(config.channel.niche, NicheType::Movies);
    assert_eq!(config.channel.strategy.batch_size, 3);
    assert_eq!(config.channel.strategy.language, SupportedLanguage::Kg);

    let client = config.telegram_client()?;
    assert_eq!(client.chat_id(), "@cinema_club");
    Ok(())
}

#[test]
fn test_missing_file() {
    let err = BotConfig::from_file("/definitely/not/here/bot.toml").expect_err("file is missing");
    assert!(err.to_string().contains("Failed to read config file"));
}

#[test]
fn test_placeholder_token_is_rejected() -> anyhow::Result<()> {
    let mut config = BotConfig::from_toml(BOT_TOML)?;
    config.telegram = TelegramConfig {
        token: Some("PASTE_TOKEN_HERE".to_string()),
        ..TelegramConfig::default()
    };

    let err = config.telegram_client().expect_err("placeholder token");
    match err.kind() {
        ViralcastErrorKind::Telegram(e) => assert_eq!(e.kind, TelegramErrorKind::InvalidToken),
        other => panic!("unexpected error: {:?}", other),
    }
    Ok(())
}

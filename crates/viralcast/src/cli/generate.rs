//! `viralcast generate` handler.

use std::path::Path;
use tracing::info;
use viralcast::{BotConfig, MarketingService, PostPublisher, ViralcastConfig, ViralcastResult};

/// Produces posts for the configured channel and prints them as JSON.
pub async fn generate_posts(
    config: &ViralcastConfig,
    bot_config: &Path,
    count: Option<usize>,
    publish: bool,
) -> ViralcastResult<()> {
    let bot = BotConfig::from_file(bot_config)?;
    let count = count.unwrap_or(bot.channel.strategy.batch_size as usize);

    let publisher = if publish {
        Some(bot.telegram_client()?)
    } else {
        None
    };

    let service = MarketingService::from_config(config);
    info!(
        channel = %bot.channel.id,
        count,
        publish,
        text_provider = service.current_provider(),
        image_generator = service.current_image_generator(),
        "Generating posts"
    );

    let posts = service
        .produce_batch(
            &bot.channel,
            count,
            publisher.as_ref().map(|p| p as &dyn PostPublisher),
        )
        .await?;

    let json = serde_json::to_string_pretty(&posts)
        .map_err(|e| viralcast::JsonError::new(format!("Failed to serialize posts: {}", e)))?;
    println!("{}", json);
    Ok(())
}

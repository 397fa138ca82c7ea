//! Failover behaviour of the text router.

mod test_utils;

use std::sync::Arc;
use std::time::Duration;
use test_utils::{MockResponse, MockTextProvider, router_kind};
use viralcast_core::TextOptions;
use viralcast_error::RouterErrorKind;
use viralcast_interface::TextProvider;
use viralcast_rate_limit::RouterConfig;
use viralcast_router::TextRouter;

fn router(providers: &[&Arc<MockTextProvider>]) -> TextRouter {
    router_with(providers, RouterConfig::default())
}

fn router_with(providers: &[&Arc<MockTextProvider>], config: RouterConfig) -> TextRouter {
    let providers: Vec<Arc<dyn TextProvider>> = providers
        .iter()
        .map(|p| Arc::clone(*p) as Arc<dyn TextProvider>)
        .collect();
    TextRouter::with_config(providers, config)
}

#[tokio::test]
async fn test_no_providers_fails_immediately() -> anyhow::Result<()> {
    let router = TextRouter::new(vec![]);
    assert!(router.is_empty());
    assert_eq!(router.current_provider_name(), "None");

    let err = router
        .generate_text("hi", None, &TextOptions::default())
        .await
        .expect_err("empty router must fail");
    assert_eq!(router_kind(&err), Some(&RouterErrorKind::NoProviderAvailable));

    let err = router
        .generate_json("hi", &serde_json::json!({}), None)
        .await
        .expect_err("empty router must fail");
    assert_eq!(router_kind(&err), Some(&RouterErrorKind::NoProviderAvailable));
    Ok(())
}

#[tokio::test]
async fn test_unavailable_providers_are_dropped() -> anyhow::Result<()> {
    let offline = Arc::new(MockTextProvider::unavailable("Offline"));
    let online = Arc::new(MockTextProvider::succeeding("Online"));
    let router = router(&[&offline, &online]);

    assert_eq!(router.provider_names(), vec!["Online"]);
    let result = router
        .generate_text("hi", None, &TextOptions::default())
        .await?;
    assert_eq!(result.provider, "Online");
    assert_eq!(offline.call_count(), 0);
    Ok(())
}

#[tokio::test]
async fn test_rate_limited_provider_is_blocklisted() -> anyhow::Result<()> {
    let a = Arc::new(MockTextProvider::rate_limited("A"));
    let b = Arc::new(MockTextProvider::succeeding("B"));
    let router = router(&[&a, &b]);

    let result = router
        .generate_text("hi", None, &TextOptions::default())
        .await?;

    assert_eq!(result.provider, "B");
    assert_eq!(result.text, "B text");
    assert_eq!(result.model, "mock-model");
    assert_eq!(router.blocked_providers(), vec!["A".to_string()]);
    // Cursor moved past B and wrapped.
    assert_eq!(router.current_provider_name(), "A");
    Ok(())
}

#[tokio::test]
async fn test_all_rate_limited_exhausts() -> anyhow::Result<()> {
    let a = Arc::new(MockTextProvider::rate_limited("A"));
    let b = Arc::new(MockTextProvider::rate_limited("B"));
    let router = router(&[&a, &b]);

    let err = router
        .generate_text("hi", None, &TextOptions::default())
        .await
        .expect_err("every provider is rate limited");

    match router_kind(&err) {
        Some(RouterErrorKind::AllProvidersExhausted { last_error }) => {
            assert!(last_error.contains("B rate limit reached"), "{}", last_error);
        }
        other => panic!("unexpected error kind: {:?}", other),
    }
    assert_eq!(router.blocked_providers(), vec!["A".to_string(), "B".to_string()]);
    assert_eq!(a.call_count(), 1);
    assert_eq!(b.call_count(), 1);
    Ok(())
}

#[tokio::test]
async fn test_generic_failure_is_not_blocklisted() -> anyhow::Result<()> {
    let a = Arc::new(MockTextProvider::failing("A"));
    let b = Arc::new(MockTextProvider::succeeding("B"));
    let router = router(&[&a, &b]);

    let result = router
        .generate_text("hi", None, &TextOptions::default())
        .await?;
    assert_eq!(result.provider, "B");
    assert!(router.blocked_providers().is_empty());
    Ok(())
}

#[tokio::test]
async fn test_success_on_kth_attempt() -> anyhow::Result<()> {
    let a = Arc::new(MockTextProvider::failing("A"));
    let b = Arc::new(MockTextProvider::failing("B"));
    let c = Arc::new(MockTextProvider::succeeding("C"));
    let router = router(&[&a, &b, &c]);

    let result = router
        .generate_text("hi", None, &TextOptions::default())
        .await?;
    assert_eq!(result.provider, "C");
    assert!(!router.blocked_providers().contains(&"C".to_string()));
    assert_eq!((a.call_count(), b.call_count(), c.call_count()), (1, 1, 1));
    Ok(())
}

#[tokio::test]
async fn test_round_robin_continues_across_calls() -> anyhow::Result<()> {
    let a = Arc::new(MockTextProvider::succeeding("A"));
    let b = Arc::new(MockTextProvider::succeeding("B"));
    let router = router(&[&a, &b]);
    let options = TextOptions::default();

    assert_eq!(router.current_provider_name(), "A");
    assert_eq!(router.generate_text("1", None, &options).await?.provider, "A");
    assert_eq!(router.current_provider_name(), "B");
    assert_eq!(router.generate_text("2", None, &options).await?.provider, "B");
    assert_eq!(router.current_provider_name(), "A");
    Ok(())
}

#[tokio::test]
async fn test_text_and_json_share_the_cursor() -> anyhow::Result<()> {
    let a = Arc::new(MockTextProvider::succeeding("A"));
    let b = Arc::new(MockTextProvider::succeeding("B"));
    let router = router(&[&a, &b]);

    router
        .generate_text("hi", None, &TextOptions::default())
        .await?;
    let value = router
        .generate_json("hi", &serde_json::json!({"type": "object"}), None)
        .await?;
    assert_eq!(value["provider"], "B");
    Ok(())
}

#[tokio::test]
async fn test_generate_json_fails_over() -> anyhow::Result<()> {
    let a = Arc::new(MockTextProvider::rate_limited("A"));
    let b = Arc::new(MockTextProvider::succeeding("B"));
    let router = router(&[&a, &b]);

    let value = router
        .generate_json("hi", &serde_json::json!({}), Some("be brief"))
        .await?;
    assert_eq!(value["provider"], "B");
    assert_eq!(router.blocked_providers(), vec!["A".to_string()]);
    Ok(())
}

#[tokio::test]
async fn test_blocked_skips_do_not_spend_attempts() -> anyhow::Result<()> {
    let a = Arc::new(MockTextProvider::rate_limited("A"));
    let b = Arc::new(MockTextProvider::rate_limited("B"));
    let c = Arc::new(MockTextProvider::new(
        "C",
        vec![MockResponse::Success, MockResponse::Failure, MockResponse::Success],
    ));
    let router = router(&[&a, &b, &c]);
    let options = TextOptions::default();

    // A and B end up blocklisted, C answers.
    assert_eq!(router.generate_text("1", None, &options).await?.provider, "C");

    // Two skips, C fails, two skips, C answers: six iterations, two attempts.
    assert_eq!(router.generate_text("2", None, &options).await?.provider, "C");
    assert_eq!((a.call_count(), b.call_count(), c.call_count()), (1, 1, 3));
    Ok(())
}

#[tokio::test]
async fn test_all_blocked_terminates_without_calls() -> anyhow::Result<()> {
    let a = Arc::new(MockTextProvider::rate_limited("A"));
    let b = Arc::new(MockTextProvider::rate_limited("B"));
    let router = router(&[&a, &b]);
    let options = TextOptions::default();

    assert!(router.generate_text("1", None, &options).await.is_err());

    let err = router
        .generate_text("2", None, &options)
        .await
        .expect_err("both providers are blocklisted");
    match router_kind(&err) {
        Some(RouterErrorKind::AllProvidersExhausted { last_error }) => {
            assert!(last_error.contains("all blocklisted"), "{}", last_error);
        }
        other => panic!("unexpected error kind: {:?}", other),
    }
    assert_eq!((a.call_count(), b.call_count()), (1, 1));
    Ok(())
}

#[tokio::test]
async fn test_blocklisted_provider_heals_after_cooldown() -> anyhow::Result<()> {
    let a = Arc::new(MockTextProvider::new(
        "A",
        vec![
            MockResponse::RateLimited,
            MockResponse::Success,
            MockResponse::RateLimited,
        ],
    ));
    let config = RouterConfig::default().with_blocklist_cooldown(Duration::ZERO);
    let router = router_with(&[&a], config);
    let options = TextOptions::default();

    assert!(router.generate_text("1", None, &options).await.is_err());
    assert_eq!(router.blocked_providers(), vec!["A".to_string()]);

    // Retried once the cooldown lapses; success unlists it.
    assert_eq!(router.generate_text("2", None, &options).await?.provider, "A");
    assert!(router.blocked_providers().is_empty());

    // Another rate limit lists it again.
    assert!(router.generate_text("3", None, &options).await.is_err());
    assert_eq!(router.blocked_providers(), vec!["A".to_string()]);
    assert_eq!(a.call_count(), 3);
    Ok(())
}

#[tokio::test]
async fn test_clear_blocklist_restores_provider() -> anyhow::Result<()> {
    let a = Arc::new(MockTextProvider::new(
        "A",
        vec![MockResponse::RateLimited, MockResponse::Success],
    ));
    let router = router(&[&a]);
    let options = TextOptions::default();

    assert!(router.generate_text("1", None, &options).await.is_err());
    assert!(router.generate_text("2", None, &options).await.is_err());
    assert_eq!(a.call_count(), 1);

    router.clear_blocklist();
    assert_eq!(router.generate_text("3", None, &options).await?.provider, "A");
    Ok(())
}

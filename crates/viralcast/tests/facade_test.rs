//! Wiring of providers and routers from configuration.

use viralcast::{
    ImageProvider, MarketingService, NicheType, RouterErrorKind, SupportedLanguage, TextProvider,
    ViralcastConfig, ViralcastErrorKind, providers,
};

#[test]
fn test_registry_order() {
    let config = ViralcastConfig::default();

    let text: Vec<String> = providers::text_providers(&config)
        .iter()
        .map(|p| p.name().to_string())
        .collect();
    assert_eq!(text, vec!["Gemini", "DeepSeek", "OpenAI", "Groq"]);

    let images = providers::image_providers(&config);
    let names: Vec<&str> = images.iter().map(|g| g.name()).collect();
    assert_eq!(
        names,
        vec![
            "DALL-E 3",
            "Gemini Image",
            "Stable Diffusion",
            "Stable Diffusion Free",
            "Free Images"
        ]
    );
    let fallbacks: Vec<bool> = images
        .iter()
        .map(|g| g.is_always_available_fallback())
        .collect();
    assert_eq!(fallbacks, vec![false, false, false, true, true]);
}

#[test]
fn test_unconfigured_service_keeps_only_free_generators() {
    let service = MarketingService::from_config(&ViralcastConfig::default());

    assert!(service.text_router().is_empty());
    assert_eq!(service.current_provider(), "None");
    assert_eq!(
        service.image_router().generator_names(),
        vec!["Stable Diffusion Free", "Free Images"]
    );
    assert_eq!(service.current_image_generator(), "Stable Diffusion Free");
    assert!(providers::gemini(&ViralcastConfig::default()).is_none());
}

#[tokio::test]
async fn test_unconfigured_analysis_fails_fast() -> anyhow::Result<()> {
    let service = MarketingService::from_config(&ViralcastConfig::default());

    let err = service
        .analyze_market(NicheType::Design, &[], "@c", SupportedLanguage::En)
        .await
        .expect_err("no text provider is configured");
    match err.kind() {
        ViralcastErrorKind::Router(e) => assert_eq!(e.kind, RouterErrorKind::NoProviderAvailable),
        other => panic!("unexpected error: {:?}", other),
    }
    Ok(())
}

#[test]
fn test_bundled_config_parses() -> anyhow::Result<()> {
    let config = ViralcastConfig::bundled()?;
    assert_eq!(config.router.blocklist_cooldown_secs, 60);
    assert!(config.providers.contains_key("free_images"));
    Ok(())
}

//! HTTP-level tests for the keyed and keyless image providers.

use serde_json::json;
use viralcast_core::ImageReference;
use viralcast_interface::ImageProvider;
use viralcast_models::{Dalle3Provider, StableDiffusionFreeProvider, StableDiffusionProvider};
use viralcast_rate_limit::is_rate_limited;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{body_partial_json, header, method, path},
};

const KEY: &str = "sk-test-0123456789";

#[tokio::test]
async fn test_dalle3_downloads_generated_image() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    let image_url = format!("{}/files/generated.png", server.uri());

    Mock::given(method("POST"))
        .and(path("/images/generations"))
        .and(body_partial_json(json!({
            "model": "dall-e-3",
            "size": "1024x1024",
            "quality": "hd",
            "style": "vivid",
            "n": 1
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "created": 1700000000,
            "data": [{"url": image_url, "revised_prompt": "a chair"}]
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/files/generated.png"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(vec![137u8, 80, 78, 71], "image/png"))
        .expect(1)
        .mount(&server)
        .await;

    let image = Dalle3Provider::new(KEY)
        .with_base_url(server.uri())
        .generate_image("a chair", "DESIGN", None)
        .await?;
    assert_eq!(image, ImageReference::inline("image/png", vec![137, 80, 78, 71]));
    Ok(())
}

#[tokio::test]
async fn test_dalle3_falls_back_to_url_when_download_fails() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    let image_url = format!("{}/files/missing.png", server.uri());

    Mock::given(method("POST"))
        .and(path("/images/generations"))
        .and(body_partial_json(json!({"style": "natural"})))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"data": [{"url": image_url.clone()}]})),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/files/missing.png"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let image = Dalle3Provider::new(KEY)
        .with_base_url(server.uri())
        .generate_image("a chair", "DESIGN", Some("natural"))
        .await?;
    assert_eq!(image, ImageReference::remote(image_url));
    Ok(())
}

#[tokio::test]
async fn test_dalle3_quota_error_is_rate_limited() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": {"message": "Billing hard limit has been reached: insufficient quota"}
        })))
        .mount(&server)
        .await;

    let err = Dalle3Provider::new(KEY)
        .with_base_url(server.uri())
        .generate_image("a chair", "NEWS", None)
        .await
        .expect_err("quota error");
    assert_eq!(err.status_code(), Some(400));
    assert!(is_rate_limited(&err));
    Ok(())
}

#[tokio::test]
async fn test_stable_diffusion_sends_parameters() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/sdxl"))
        .and(header("authorization", format!("Bearer {}", KEY).as_str()))
        .and(body_partial_json(json!({
            "parameters": {
                "width": 1024,
                "height": 1024,
                "num_inference_steps": 30,
                "guidance_scale": 7.5
            }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_raw(vec![255u8, 216, 255], "image/jpeg"))
        .expect(1)
        .mount(&server)
        .await;

    let image = StableDiffusionProvider::new(KEY)
        .with_endpoint(format!("{}/sdxl", server.uri()))
        .generate_image("a movie set", "MOVIES", None)
        .await?;
    assert_eq!(image, ImageReference::inline("image/jpeg", vec![255, 216, 255]));
    Ok(())
}

#[tokio::test]
async fn test_stable_diffusion_reports_loading_model() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(503).set_body_json(json!({
            "error": "Model stabilityai/stable-diffusion-xl-base-1.0 is currently loading",
            "estimated_time": 20.0
        })))
        .mount(&server)
        .await;

    let err = StableDiffusionProvider::new(KEY)
        .with_endpoint(server.uri())
        .generate_image("a movie set", "MOVIES", None)
        .await
        .expect_err("model loading");
    assert_eq!(err.status_code(), Some(503));
    assert!(err.detail().contains("Model is loading, please wait: 20 seconds"));
    assert!(!is_rate_limited(&err));
    Ok(())
}

#[tokio::test]
async fn test_stable_diffusion_free_needs_no_key() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(vec![1u8, 2], "image/png"))
        .expect(1)
        .mount(&server)
        .await;

    let provider = StableDiffusionFreeProvider::new().with_endpoint(server.uri());
    assert!(provider.is_available());
    assert!(provider.is_always_available_fallback());

    let image = provider.generate_image("news desk", "NEWS", None).await?;
    assert_eq!(image, ImageReference::inline("image/png", vec![1, 2]));

    let requests = server.received_requests().await.unwrap_or_default();
    assert!(!requests[0].headers.contains_key("authorization"));
    Ok(())
}

#[test]
fn test_keyed_providers_require_usable_keys() {
    assert!(!Dalle3Provider::new("").is_available());
    assert!(!StableDiffusionProvider::new("undefined").is_available());
    assert!(StableDiffusionProvider::new(KEY).is_available());
    assert!(!StableDiffusionProvider::new(KEY).is_always_available_fallback());
}

//! Telegram Bot API client.

use super::message::{render_caption, render_message};
use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, info, instrument, warn};
use viralcast_core::{ImageReference, Post};
use viralcast_error::{TelegramError, TelegramErrorKind, ViralcastResult};
use viralcast_interface::PostPublisher;

/// Default Bot API endpoint.
pub const TELEGRAM_API_URL: &str = "https://api.telegram.org";

const PHOTO_FILE_NAME: &str = "post-image.png";

/// Envelope every Bot API method answers with.
#[derive(Debug, Deserialize)]
struct ApiResponse {
    ok: bool,
    #[serde(default)]
    description: Option<String>,
}

/// Posts finished content to one Telegram chat or channel.
///
/// # Example
/// ```no_run
/// use viralcast_social::TelegramClient;
///
/// # async fn run(post: viralcast_core::Post) -> Result<(), Box<dyn std::error::Error>> {
/// let token = std::env::var("TELEGRAM_BOT_TOKEN")?;
/// let client = TelegramClient::new(token, "@my_channel")?;
/// client.send_post(&post).await?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct TelegramClient {
    client: reqwest::Client,
    token: String,
    chat_id: String,
    base_url: String,
}

impl TelegramClient {
    /// Creates a client for `chat_id`.
    ///
    /// # Errors
    ///
    /// `InvalidToken` when the token is empty or still a `PASTE...` placeholder.
    pub fn new(token: impl Into<String>, chat_id: impl Into<String>) -> ViralcastResult<Self> {
        let token = token.into();
        if token.trim().is_empty() || token.contains("PASTE") {
            return Err(TelegramError::new(TelegramErrorKind::InvalidToken).into());
        }

        Ok(Self {
            client: reqwest::Client::new(),
            token,
            chat_id: chat_id.into(),
            base_url: TELEGRAM_API_URL.to_string(),
        })
    }

    /// Points the client at another Bot API server.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Target chat.
    pub fn chat_id(&self) -> &str {
        &self.chat_id
    }

    /// Delivers `post`, with its image when it has one.
    ///
    /// A post whose full text does not fit a photo caption is sent as the photo
    /// with a short caption followed by the full text as a separate message.
    #[instrument(skip_all, fields(post_id = %post.id, chat_id = %self.chat_id))]
    pub async fn send_post(&self, post: &Post) -> ViralcastResult<()> {
        let Some(image) = &post.image else {
            debug!("Post has no image, sending text only");
            return self.send_message(&render_message(post)).await;
        };

        let (caption, split) = render_caption(post);
        let (mime, data) = self.load_image(image).await?;
        self.send_photo(data, &mime, &caption).await?;

        if split {
            debug!("Caption shortened, sending full text separately");
            self.send_message(&render_message(post)).await?;
        }

        info!("Post delivered");
        Ok(())
    }

    /// Sends an HTML-formatted text message.
    #[instrument(skip_all, fields(chat_id = %self.chat_id, len = text.len()))]
    pub async fn send_message(&self, text: &str) -> ViralcastResult<()> {
        let body = serde_json::json!({
            "chat_id": self.chat_id,
            "text": text,
            "parse_mode": "HTML",
        });

        let response = self
            .client
            .post(self.endpoint("sendMessage"))
            .json(&body)
            .send()
            .await
            .map_err(transport)?;

        check(response).await
    }

    /// Uploads a photo with an HTML caption.
    #[instrument(skip_all, fields(chat_id = %self.chat_id, bytes = data.len()))]
    pub async fn send_photo(&self, data: Vec<u8>, mime: &str, caption: &str) -> ViralcastResult<()> {
        let photo = reqwest::multipart::Part::bytes(data)
            .file_name(PHOTO_FILE_NAME)
            .mime_str(mime)
            .map_err(|e| TelegramError::new(TelegramErrorKind::ImageFetch(e.to_string())))?;

        let form = reqwest::multipart::Form::new()
            .text("chat_id", self.chat_id.clone())
            .part("photo", photo)
            .text("caption", caption.to_string())
            .text("parse_mode", "HTML");

        let response = self
            .client
            .post(self.endpoint("sendPhoto"))
            .multipart(form)
            .send()
            .await
            .map_err(transport)?;

        check(response).await
    }

    /// Bytes and MIME type of the image to upload.
    async fn load_image(&self, image: &ImageReference) -> ViralcastResult<(String, Vec<u8>)> {
        match image {
            ImageReference::Inline { mime, data } => Ok((mime.clone(), data.clone())),
            ImageReference::Remote { url } => {
                let image_error = |message: String| TelegramError::new(TelegramErrorKind::ImageFetch(message));

                let response = self
                    .client
                    .get(url)
                    .send()
                    .await
                    .map_err(|e| image_error(e.to_string()))?;
                if !response.status().is_success() {
                    return Err(image_error(format!("{} returned {}", url, response.status())).into());
                }

                let mime = response
                    .headers()
                    .get(reqwest::header::CONTENT_TYPE)
                    .and_then(|value| value.to_str().ok())
                    .unwrap_or("image/png")
                    .to_string();
                let bytes = response.bytes().await.map_err(|e| image_error(e.to_string()))?;
                Ok((mime, bytes.to_vec()))
            }
        }
    }

    fn endpoint(&self, method: &str) -> String {
        format!("{}/bot{}/{}", self.base_url, self.token, method)
    }
}

impl std::fmt::Debug for TelegramClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TelegramClient")
            .field("chat_id", &self.chat_id)
            .field("base_url", &self.base_url)
            .field("token", &"[REDACTED]")
            .finish()
    }
}

#[async_trait]
impl PostPublisher for TelegramClient {
    fn name(&self) -> &str {
        "Telegram"
    }

    async fn publish(&self, post: &Post) -> ViralcastResult<()> {
        self.send_post(post).await
    }
}

/// Transport failure; the URL is stripped because it carries the token.
fn transport(error: reqwest::Error) -> TelegramError {
    TelegramError::new(TelegramErrorKind::Transport(error.without_url().to_string()))
}

/// Maps a non-success Bot API answer to an `Api` error.
async fn check(response: reqwest::Response) -> ViralcastResult<()> {
    let status = response.status();
    let body: Option<ApiResponse> = response.json().await.ok();

    match body {
        Some(ApiResponse { ok: true, .. }) if status.is_success() => Ok(()),
        body => {
            let description = body
                .and_then(|b| b.description)
                .unwrap_or_else(|| status.canonical_reason().unwrap_or("Unknown error").to_string());
            warn!(status = status.as_u16(), description = %description, "Telegram API error");
            Err(TelegramError::new(TelegramErrorKind::Api {
                status: status.as_u16(),
                description,
            })
            .into())
        }
    }
}

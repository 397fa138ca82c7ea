//! Text and image provider integrations for Viralcast.
//!
//! Every provider implements one of the capability contracts from
//! `viralcast_interface` and can be handed to a router as a trait object.
//!
//! # Available Providers
//!
//! Text:
//! - **Gemini** - Generative Language API with a model cascade and native JSON output
//! - **OpenAI**, **DeepSeek**, **Groq** - OpenAI-compatible chat completions
//!
//! Image:
//! - **DALL-E 3**, **Gemini Image**, **Stable Diffusion** - keyed generators
//! - **Stable Diffusion Free**, **Free Images** - keyless fallbacks
//!
//! # Example
//!
//! ```no_run
//! use viralcast_core::TextOptions;
//! use viralcast_interface::TextProvider;
//! use viralcast_models::OpenAiCompatibleProvider;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let groq = OpenAiCompatibleProvider::groq(std::env::var("GROQ_API_KEY")?);
//! let output = groq
//!     .generate_text("Write a hook about coffee", None, &TextOptions::default())
//!     .await?;
//! println!("{} ({})", output.text, output.model);
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod extraction;
mod gemini;
mod http;
mod images;
mod metrics;
mod openai_compat;

pub use extraction::extract_json_object;
pub use gemini::{
    Candidate, Content, GEMINI_API_URL, GEMINI_TEXT_MODELS, GeminiProvider,
    GenerateContentRequest, GenerateContentResponse, GenerationConfig, GoogleSearch, ImageConfig,
    InlineData, Part, ThinkingConfig, Tool,
};
pub use images::{
    Dalle3Provider, FreeImageProvider, GeminiImageProvider, NicheStyles, SDXL_ENDPOINT,
    StableDiffusionFreeProvider, StableDiffusionProvider, gradient_svg, picsum_url, prompt_seed,
};
pub use metrics::ProviderMetrics;
pub use openai_compat::{
    ChatChoice, ChatChoiceMessage, ChatMessage, ChatMessageBuilder, ChatRequest,
    ChatRequestBuilder, ChatResponse, OpenAiCompatibleProvider, OpenAiFlavor,
};

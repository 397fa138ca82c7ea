//! Google Gemini providers over the Generative Language REST API.

mod client;
mod dto;

pub use client::{GEMINI_API_URL, GEMINI_TEXT_MODELS, GeminiProvider};
pub use dto::{
    Candidate, Content, GenerateContentRequest, GenerateContentResponse, GenerationConfig,
    GoogleSearch, ImageConfig, InlineData, Part, ThinkingConfig, Tool,
};

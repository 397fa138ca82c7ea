//! OpenAI-compatible chat completions providers (OpenAI, DeepSeek, Groq).

mod client;
mod dto;

pub use client::{OpenAiCompatibleProvider, OpenAiFlavor};
pub use dto::{
    ChatChoice, ChatChoiceMessage, ChatMessage, ChatMessageBuilder, ChatRequest,
    ChatRequestBuilder, ChatResponse,
};

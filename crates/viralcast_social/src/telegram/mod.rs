//! Telegram Bot API delivery.

mod client;
mod message;

pub use client::{TELEGRAM_API_URL, TelegramClient};
pub use message::{CAPTION_LIMIT, FULL_TEXT_POINTER, escape_html, render_caption, render_message};

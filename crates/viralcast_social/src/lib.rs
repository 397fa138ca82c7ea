//! Social media delivery for Viralcast.
//!
//! Currently a single sink: [`TelegramClient`] posts finished content to a
//! Telegram channel through the Bot API.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod telegram;

pub use telegram::{
    CAPTION_LIMIT, FULL_TEXT_POINTER, TELEGRAM_API_URL, TelegramClient, escape_html,
    render_caption, render_message,
};

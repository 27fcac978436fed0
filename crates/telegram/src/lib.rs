//! Minimal Telegram Bot API client used as the bot's chat transport.

#![forbid(unsafe_code)]

pub mod client;
pub mod error;
pub mod types;

pub use client::{Poller, TelegramClient};
pub use error::TelegramError;
pub use types::{BotUser, Chat, Message, Update};

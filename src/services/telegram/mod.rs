//! Telegram Bot API notification channel

pub mod client;

pub use client::{split_message, DeliveryReport, TelegramClient, MAX_MESSAGE_CHARS};

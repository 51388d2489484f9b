//! Telegram `sendMessage` client with payload chunking.

use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{error, info};

use crate::config::TelegramConfig;
use crate::error::ScreenResult;

/// Chunk size, kept under Telegram's 4096 character limit.
pub const MAX_MESSAGE_CHARS: usize = 4000;

#[derive(Debug, Serialize)]
struct SendMessageRequest<'a> {
    chat_id: &'a str,
    text: &'a str,
    parse_mode: &'a str,
}

#[derive(Debug, Deserialize)]
struct ApiResponse {
    ok: bool,
    #[serde(default)]
    description: Option<String>,
}

/// Outcome of sending one logical message as a sequence of chunks.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DeliveryReport {
    pub chunks: usize,
    pub sent: usize,
    /// (chunk index, error) for every chunk that was not delivered.
    pub failed: Vec<(usize, String)>,
}

impl DeliveryReport {
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}

pub struct TelegramClient {
    api_base: String,
    bot_token: String,
    chat_id: String,
    client: Client,
}

impl TelegramClient {
    pub fn new(config: &TelegramConfig, timeout: Duration) -> ScreenResult<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self::with_client(config, client))
    }

    pub fn with_client(config: &TelegramConfig, client: Client) -> Self {
        Self {
            api_base: config.api_base.trim_end_matches('/').to_string(),
            bot_token: config.bot_token.clone(),
            chat_id: config.chat_id.clone(),
            client,
        }
    }

    /// Send `message`, split into chunks of at most [`MAX_MESSAGE_CHARS`].
    ///
    /// Chunks go out in order. A failed chunk is recorded and the remaining
    /// chunks are still attempted; nothing already sent is retracted.
    pub async fn send_message(&self, message: &str, parse_mode: &str) -> DeliveryReport {
        let chunks = split_message(message, MAX_MESSAGE_CHARS);
        let mut report = DeliveryReport {
            chunks: chunks.len(),
            ..Default::default()
        };

        for (index, chunk) in chunks.iter().enumerate() {
            match self.send_chunk(chunk, parse_mode).await {
                Ok(()) => {
                    report.sent += 1;
                    info!(chunk = index + 1, total = report.chunks, "Telegram message sent");
                }
                Err(e) => {
                    error!(chunk = index + 1, total = report.chunks, error = %e, "Telegram message failed");
                    report.failed.push((index, e));
                }
            }
        }

        report
    }

    async fn send_chunk(&self, text: &str, parse_mode: &str) -> Result<(), String> {
        let url = format!("{}/bot{}/sendMessage", self.api_base, self.bot_token);
        let payload = SendMessageRequest {
            chat_id: &self.chat_id,
            text,
            parse_mode,
        };

        let response = self
            .client
            .post(&url)
            .json(&payload)
            .send()
            .await
            .map_err(|e| format!("request failed: {}", e.without_url()))?;
        let status = response.status();
        let body = response.text().await.unwrap_or_default();

        let api: Option<ApiResponse> = serde_json::from_str(&body).ok();
        match api {
            Some(api) if status.is_success() && api.ok => Ok(()),
            Some(api) => Err(format!(
                "HTTP {}: {}",
                status,
                api.description.unwrap_or_else(|| "no description".to_string())
            )),
            None => Err(format!("HTTP {}: {}", status, body)),
        }
    }
}

/// Split `text` into pieces of at most `max_chars` characters.
///
/// Pieces break after a newline when one is available, otherwise at the
/// character limit, moved back so no HTML tag or entity is cut in half.
/// Concatenating the pieces gives back `text`.
pub fn split_message(text: &str, max_chars: usize) -> Vec<String> {
    if text.chars().count() <= max_chars || max_chars == 0 {
        return vec![text.to_string()];
    }

    let mut chunks = Vec::new();
    let mut rest = text;
    while !rest.is_empty() {
        // byte offset just past the first max_chars characters
        let limit = rest
            .char_indices()
            .nth(max_chars)
            .map(|(i, _)| i)
            .unwrap_or(rest.len());
        if limit == rest.len() {
            chunks.push(rest.to_string());
            break;
        }

        let cut = rest[..limit]
            .rfind('\n')
            .map(|i| i + 1)
            .unwrap_or_else(|| markup_safe_cut(&rest[..limit]));
        chunks.push(rest[..cut].to_string());
        rest = &rest[cut..];
    }
    chunks
}

/// Byte offset at which `piece` can be cut without splitting a `<tag>` or
/// an `&entity;`. Falls back to the full length when the open markup starts
/// the piece.
fn markup_safe_cut(piece: &str) -> usize {
    let open_tag = piece.rfind('<').filter(|&i| !piece[i..].contains('>'));
    let open_entity = piece.rfind('&').filter(|&i| !piece[i..].contains(';'));

    match open_tag.into_iter().chain(open_entity).min() {
        Some(i) if i > 0 => i,
        _ => piece.len(),
    }
}

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use serde::de::DeserializeOwned;

use lesson_core::model::ChatId;
use services::{ChatTransport, InboundMessage, OutboundMessage, ReplyKeyboard, TransportError};

use crate::error::TelegramError;
use crate::types::{
    ApiResponse, BotUser, GetUpdates, ReplyKeyboardMarkup, SendMessage, Update,
};

pub const DEFAULT_BASE_URL: &str = "https://api.telegram.org";

/// Slack on top of the long-poll timeout before the HTTP request gives up.
const POLL_GRACE: Duration = Duration::from_secs(10);
const SEND_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Clone)]
pub struct TelegramClient {
    client: Client,
    base_url: String,
    token: String,
}

impl std::fmt::Debug for TelegramClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TelegramClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl TelegramClient {
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self::with_base_url(token, DEFAULT_BASE_URL)
    }

    #[must_use]
    pub fn with_base_url(token: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into(),
            token: token.into(),
        }
    }

    /// Identify the bot. Used at startup to check the token.
    ///
    /// # Errors
    ///
    /// Returns `TelegramError` if the request fails or the token is rejected.
    pub async fn get_me(&self) -> Result<BotUser, TelegramError> {
        self.call("getMe", &serde_json::json!({}), SEND_TIMEOUT).await
    }

    /// Long-poll for updates after `offset`.
    ///
    /// # Errors
    ///
    /// Returns `TelegramError` if the request fails or the API reports an error.
    pub async fn get_updates(
        &self,
        offset: Option<i64>,
        timeout_secs: u64,
    ) -> Result<Vec<Update>, TelegramError> {
        let request = GetUpdates {
            offset,
            timeout: timeout_secs,
            allowed_updates: &["message"],
        };
        let timeout = Duration::from_secs(timeout_secs) + POLL_GRACE;
        self.call("getUpdates", &request, timeout).await
    }

    /// # Errors
    ///
    /// Returns `TelegramError` if the request fails or the API refuses the message.
    pub async fn send_message(
        &self,
        chat_id: ChatId,
        text: &str,
        keyboard: Option<&ReplyKeyboard>,
    ) -> Result<(), TelegramError> {
        let request = SendMessage {
            chat_id: chat_id.value(),
            text,
            reply_markup: keyboard.map(ReplyKeyboardMarkup::from),
        };
        let _sent: serde_json::Value = self.call("sendMessage", &request, SEND_TIMEOUT).await?;
        Ok(())
    }

    async fn call<B, T>(&self, method: &str, body: &B, timeout: Duration) -> Result<T, TelegramError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = format!(
            "{}/bot{}/{method}",
            self.base_url.trim_end_matches('/'),
            self.token
        );
        let response = self
            .client
            .post(url)
            .json(body)
            .timeout(timeout)
            .send()
            .await?;

        // Error replies carry a JSON envelope with a non-2xx status.
        let status = response.status();
        let envelope: ApiResponse<T> = match response.json().await {
            Ok(envelope) => envelope,
            Err(_) if !status.is_success() => return Err(TelegramError::HttpStatus(status)),
            Err(err) => return Err(err.into()),
        };

        if !envelope.ok {
            return Err(TelegramError::Api {
                code: envelope.error_code,
                description: envelope
                    .description
                    .unwrap_or_else(|| format!("{method} failed")),
            });
        }
        envelope.result.ok_or(TelegramError::MissingResult)
    }
}

#[async_trait]
impl ChatTransport for TelegramClient {
    async fn send(&self, chat_id: ChatId, message: &OutboundMessage) -> Result<(), TransportError> {
        self.send_message(chat_id, &message.text, message.keyboard.as_ref())
            .await
            .map_err(TransportError::from)
    }
}

/// Tracks the update offset across long-poll rounds.
#[derive(Debug)]
pub struct Poller {
    client: TelegramClient,
    offset: Option<i64>,
    timeout_secs: u64,
}

impl Poller {
    #[must_use]
    pub fn new(client: TelegramClient, timeout_secs: u64) -> Self {
        Self {
            client,
            offset: None,
            timeout_secs,
        }
    }

    #[must_use]
    pub fn offset(&self) -> Option<i64> {
        self.offset
    }

    /// Fetch the next batch and acknowledge it, including updates that carry
    /// no text and are therefore dropped.
    ///
    /// # Errors
    ///
    /// Returns `TelegramError` if polling fails. The offset is left unchanged.
    pub async fn poll(&mut self) -> Result<Vec<InboundMessage>, TelegramError> {
        let updates = self
            .client
            .get_updates(self.offset, self.timeout_secs)
            .await?;

        if let Some(last) = updates.iter().map(|u| u.update_id).max() {
            self.offset = Some(last + 1);
        }
        let received = updates.len();
        let messages: Vec<_> = updates.into_iter().filter_map(Update::into_inbound).collect();
        if received > 0 {
            tracing::debug!(received, text = messages.len(), offset = ?self.offset, "polled updates");
        }
        Ok(messages)
    }
}

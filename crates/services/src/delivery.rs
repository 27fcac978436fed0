//! Outbound message port and the bounded retry around it.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use lesson_core::model::ChatId;

use crate::error::TransportError;

/// One-shot choice menu shown under a prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplyKeyboard {
    pub options: Vec<String>,
    pub one_time: bool,
}

impl ReplyKeyboard {
    #[must_use]
    pub fn one_time(options: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            options: options.into_iter().map(Into::into).collect(),
            one_time: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundMessage {
    pub text: String,
    pub keyboard: Option<ReplyKeyboard>,
}

impl OutboundMessage {
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            keyboard: None,
        }
    }

    #[must_use]
    pub fn with_keyboard(mut self, keyboard: ReplyKeyboard) -> Self {
        self.keyboard = Some(keyboard);
        self
    }
}

/// Sends a single message to a chat. Implementations make one attempt;
/// retrying is `Delivery`'s job.
#[async_trait]
pub trait ChatTransport: Send + Sync {
    /// # Errors
    ///
    /// Returns `TransportError` if the message was not accepted.
    async fn send(&self, chat_id: ChatId, message: &OutboundMessage)
    -> Result<(), TransportError>;
}

/// Fixed attempt count with a fixed pause between attempts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    max_attempts: u32,
    delay: Duration,
}

impl RetryPolicy {
    pub const DEFAULT_MAX_ATTEMPTS: u32 = 5;
    pub const DEFAULT_DELAY: Duration = Duration::from_secs(5);

    /// `max_attempts` is clamped to at least one.
    #[must_use]
    pub fn new(max_attempts: u32, delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            delay,
        }
    }

    /// Retries without pausing; meant for tests.
    #[must_use]
    pub fn immediate(max_attempts: u32) -> Self {
        Self::new(max_attempts, Duration::ZERO)
    }

    #[must_use]
    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    #[must_use]
    pub fn delay(&self) -> Duration {
        self.delay
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(Self::DEFAULT_MAX_ATTEMPTS, Self::DEFAULT_DELAY)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryReport {
    Delivered { attempts: u32 },
    Dropped { attempts: u32 },
}

impl DeliveryReport {
    #[must_use]
    pub fn is_delivered(&self) -> bool {
        matches!(self, Self::Delivered { .. })
    }
}

/// Retrying front of a `ChatTransport`.
///
/// Exhausting the attempts is logged and reported, never returned as an
/// error: a dropped message must not stop the dispatch loop.
#[derive(Clone)]
pub struct Delivery {
    transport: Arc<dyn ChatTransport>,
    policy: RetryPolicy,
}

impl Delivery {
    #[must_use]
    pub fn new(transport: Arc<dyn ChatTransport>, policy: RetryPolicy) -> Self {
        Self { transport, policy }
    }

    pub async fn send(&self, chat_id: ChatId, message: &OutboundMessage) -> DeliveryReport {
        let max_attempts = self.policy.max_attempts;
        let mut attempt = 1;
        loop {
            match self.transport.send(chat_id, message).await {
                Ok(()) => return DeliveryReport::Delivered { attempts: attempt },
                Err(err) => {
                    tracing::warn!(%chat_id, attempt, max_attempts, error = %err, "message delivery failed");
                    if attempt >= max_attempts {
                        tracing::error!(%chat_id, attempts = attempt, "giving up on message after retries");
                        return DeliveryReport::Dropped { attempts: attempt };
                    }
                    if !self.policy.delay.is_zero() {
                        tokio::time::sleep(self.policy.delay).await;
                    }
                    attempt += 1;
                }
            }
        }
    }

    /// Sends `messages` in order, one at a time.
    pub async fn send_all(&self, chat_id: ChatId, messages: &[OutboundMessage]) -> Vec<DeliveryReport> {
        let mut reports = Vec::with_capacity(messages.len());
        for message in messages {
            reports.push(self.send(chat_id, message).await);
        }
        reports
    }
}

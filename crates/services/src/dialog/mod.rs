mod command;
mod controller;
mod gate;
pub mod replies;

use lesson_core::model::ChatId;

pub use command::{Command, Parsed};
pub use controller::{DialogController, DialogOutcome};
pub use gate::ChatGate;

/// A text message received from a chat.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundMessage {
    pub chat_id: ChatId,
    pub text: String,
}

impl InboundMessage {
    #[must_use]
    pub fn new(chat_id: ChatId, text: impl Into<String>) -> Self {
        Self {
            chat_id,
            text: text.into(),
        }
    }
}

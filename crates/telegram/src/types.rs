//! Wire types for the subset of the Bot API the bot uses.

use serde::{Deserialize, Serialize};

use lesson_core::model::ChatId;
use services::{InboundMessage, ReplyKeyboard};

/// Common envelope around every Bot API response.
#[derive(Debug, Deserialize)]
pub(crate) struct ApiResponse<T> {
    pub ok: bool,
    pub result: Option<T>,
    pub description: Option<String>,
    pub error_code: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct BotUser {
    pub id: i64,
    #[serde(default)]
    pub is_bot: bool,
    pub first_name: String,
    pub username: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Chat {
    pub id: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Message {
    pub message_id: i64,
    pub chat: Chat,
    pub from: Option<BotUser>,
    pub text: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Update {
    pub update_id: i64,
    pub message: Option<Message>,
}

impl Update {
    /// Text messages only; stickers, photos, edits and the like yield `None`.
    #[must_use]
    pub fn into_inbound(self) -> Option<InboundMessage> {
        let message = self.message?;
        let text = message.text?;
        Some(InboundMessage::new(ChatId::new(message.chat.id), text))
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct GetUpdates {
    pub offset: Option<i64>,
    pub timeout: u64,
    pub allowed_updates: &'static [&'static str],
}

#[derive(Debug, Serialize)]
pub(crate) struct SendMessage<'a> {
    pub chat_id: i64,
    pub text: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reply_markup: Option<ReplyKeyboardMarkup<'a>>,
}

#[derive(Debug, Serialize)]
pub(crate) struct ReplyKeyboardMarkup<'a> {
    pub keyboard: Vec<Vec<KeyboardButton<'a>>>,
    pub one_time_keyboard: bool,
    pub resize_keyboard: bool,
}

#[derive(Debug, Serialize)]
pub(crate) struct KeyboardButton<'a> {
    pub text: &'a str,
}

impl<'a> From<&'a ReplyKeyboard> for ReplyKeyboardMarkup<'a> {
    /// One option per row.
    fn from(keyboard: &'a ReplyKeyboard) -> Self {
        Self {
            keyboard: keyboard
                .options
                .iter()
                .map(|text| vec![KeyboardButton { text: text.as_str() }])
                .collect(),
            one_time_keyboard: keyboard.one_time,
            resize_keyboard: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn text_update_becomes_inbound_message() {
        let update: Update = serde_json::from_value(json!({
            "update_id": 10,
            "message": {
                "message_id": 1,
                "date": 1_700_000_000,
                "chat": { "id": -42, "type": "private" },
                "from": { "id": 7, "is_bot": false, "first_name": "Ann" },
                "text": "/start"
            }
        }))
        .unwrap();

        let inbound = update.into_inbound().expect("text message");
        assert_eq!(inbound.chat_id, ChatId::new(-42));
        assert_eq!(inbound.text, "/start");
    }

    #[test]
    fn non_text_updates_are_ignored() {
        let sticker: Update = serde_json::from_value(json!({
            "update_id": 11,
            "message": {
                "message_id": 2,
                "chat": { "id": 5 },
                "sticker": { "file_id": "abc" }
            }
        }))
        .unwrap();
        assert_eq!(sticker.into_inbound(), None);

        let edit: Update = serde_json::from_value(json!({
            "update_id": 12,
            "edited_message": { "message_id": 3, "chat": { "id": 5 }, "text": "hi" }
        }))
        .unwrap();
        assert_eq!(edit.into_inbound(), None);
    }

    #[test]
    fn keyboard_is_laid_out_one_option_per_row() {
        let keyboard = ReplyKeyboard::one_time(["Java", "SQL"]);
        let body = serde_json::to_value(SendMessage {
            chat_id: 1,
            text: "pick",
            reply_markup: Some(ReplyKeyboardMarkup::from(&keyboard)),
        })
        .unwrap();

        assert_eq!(
            body,
            json!({
                "chat_id": 1,
                "text": "pick",
                "reply_markup": {
                    "keyboard": [[{ "text": "Java" }], [{ "text": "SQL" }]],
                    "one_time_keyboard": true,
                    "resize_keyboard": true
                }
            })
        );
    }

    #[test]
    fn plain_message_omits_markup() {
        let body = serde_json::to_value(SendMessage {
            chat_id: 1,
            text: "hi",
            reply_markup: None,
        })
        .unwrap();
        assert_eq!(body, json!({ "chat_id": 1, "text": "hi" }));
    }
}

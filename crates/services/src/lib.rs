#![forbid(unsafe_code)]

pub mod content_service;
pub mod delivery;
pub mod dialog;
pub mod error;

pub use lesson_core::Clock;

pub use content_service::{
    BUILTIN_QUIZ_LINKS, ContentService, LoadReport, builtin_quiz_links, quiz_links_from_json,
};
pub use delivery::{
    ChatTransport, Delivery, DeliveryReport, OutboundMessage, ReplyKeyboard, RetryPolicy,
};
pub use dialog::{ChatGate, Command, DialogController, DialogOutcome, InboundMessage, Parsed};
pub use error::{ContentError, DialogError, TransportError};

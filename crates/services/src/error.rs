//! Shared error types for the services crate.

use thiserror::Error;

use lesson_core::model::{QuizLinkError, SessionError};
use storage::loader::LoadError;
use storage::repository::StorageError;

/// Errors a transport reports for a single send attempt.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum TransportError {
    #[error("transport unavailable: {0}")]
    Unavailable(String),
    #[error("message rejected ({code:?}): {description}")]
    Rejected {
        code: Option<i64>,
        description: String,
    },
}

/// Errors emitted by `DialogController`.
///
/// User mistakes never show up here; they are answered with a re-prompt.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum DialogError {
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Session(#[from] SessionError),
}

/// Errors emitted while loading lessons and quiz links at startup.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ContentError {
    #[error(transparent)]
    Load(#[from] LoadError),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    QuizLink(#[from] QuizLinkError),
    #[error("quiz links are not valid JSON: {0}")]
    QuizLinksParse(String),
}

use thiserror::Error;

use crate::chunk::{MAX_CHUNK_LEN, split_text};
use crate::model::{Language, LessonNumber};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum LessonError {
    #[error("lesson title cannot be empty")]
    EmptyTitle,

    #[error("lesson content cannot be empty")]
    EmptyContent,
}

/// A single lesson of the course, immutable once loaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lesson {
    language: Language,
    number: LessonNumber,
    title: String,
    content: String,
}

impl Lesson {
    /// Creates a lesson.
    ///
    /// # Errors
    ///
    /// Returns `LessonError` when the title or the content is blank.
    pub fn new(
        language: Language,
        number: LessonNumber,
        title: impl Into<String>,
        content: impl Into<String>,
    ) -> Result<Self, LessonError> {
        let title = title.into().trim().to_owned();
        if title.is_empty() {
            return Err(LessonError::EmptyTitle);
        }
        let content = content.into();
        if content.trim().is_empty() {
            return Err(LessonError::EmptyContent);
        }
        Ok(Self {
            language,
            number,
            title,
            content,
        })
    }

    #[must_use]
    pub fn language(&self) -> Language {
        self.language
    }

    #[must_use]
    pub fn number(&self) -> LessonNumber {
        self.number
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Content split into deliverable chunks, in reading order.
    #[must_use]
    pub fn chunks(&self) -> Vec<String> {
        split_text(&self.content, MAX_CHUNK_LEN)
    }

    #[must_use]
    pub fn summary(&self) -> LessonSummary {
        LessonSummary {
            number: self.number,
            title: self.title.clone(),
        }
    }
}

/// Entry of a language's lesson list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LessonSummary {
    pub number: LessonNumber,
    pub title: String,
}

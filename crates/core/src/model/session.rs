use thiserror::Error;

use crate::model::{ChatId, Language};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SessionError {
    #[error("lesson index {index} is out of range for {count} lessons")]
    IndexOutOfRange { index: usize, count: usize },
}

/// The step expected to consume a chat's next non-command message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PendingStep {
    AwaitingName,
    AwaitingLanguage,
    AwaitingLessonNumber { language: Language },
}

/// Per-chat dialog progress.
///
/// Only `display_name` outlives the process; everything else is rebuilt
/// from scratch after a restart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    chat_id: ChatId,
    display_name: Option<String>,
    selected_language: Option<Language>,
    last_lesson_index: Option<usize>,
    pending_step: Option<PendingStep>,
}

impl Session {
    #[must_use]
    pub fn new(chat_id: ChatId) -> Self {
        Self {
            chat_id,
            display_name: None,
            selected_language: None,
            last_lesson_index: None,
            pending_step: None,
        }
    }

    #[must_use]
    pub fn chat_id(&self) -> ChatId {
        self.chat_id
    }

    #[must_use]
    pub fn display_name(&self) -> Option<&str> {
        self.display_name.as_deref()
    }

    #[must_use]
    pub fn selected_language(&self) -> Option<Language> {
        self.selected_language
    }

    #[must_use]
    pub fn last_lesson_index(&self) -> Option<usize> {
        self.last_lesson_index
    }

    #[must_use]
    pub fn pending_step(&self) -> Option<PendingStep> {
        self.pending_step
    }

    pub fn set_display_name(&mut self, name: impl Into<String>) {
        self.display_name = Some(name.into());
    }

    /// Selecting a language keeps the lesson index; `/continue` bounds it
    /// against the newly selected language's lesson count.
    pub fn select_language(&mut self, language: Language) {
        self.selected_language = Some(language);
    }

    pub fn await_step(&mut self, step: PendingStep) {
        self.pending_step = Some(step);
    }

    /// Removes and returns the pending step, returning the chat to idle.
    pub fn take_pending_step(&mut self) -> Option<PendingStep> {
        self.pending_step.take()
    }

    /// Index the next `/continue` would show, if a lesson has been viewed.
    #[must_use]
    pub fn next_lesson_index(&self) -> Option<usize> {
        self.last_lesson_index.map(|index| index + 1)
    }

    /// Records that the lesson at `index` (0-based) was delivered.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::IndexOutOfRange` if `index >= lesson_count`.
    pub fn record_lesson_viewed(
        &mut self,
        index: usize,
        lesson_count: usize,
    ) -> Result<(), SessionError> {
        if index >= lesson_count {
            return Err(SessionError::IndexOutOfRange {
                index,
                count: lesson_count,
            });
        }
        self.last_lesson_index = Some(index);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_session_is_idle_and_empty() {
        let session = Session::new(ChatId::new(7));
        assert_eq!(session.chat_id(), ChatId::new(7));
        assert_eq!(session.display_name(), None);
        assert_eq!(session.selected_language(), None);
        assert_eq!(session.last_lesson_index(), None);
        assert_eq!(session.pending_step(), None);
        assert_eq!(session.next_lesson_index(), None);
    }

    #[test]
    fn take_pending_step_returns_to_idle() {
        let mut session = Session::new(ChatId::new(1));
        session.await_step(PendingStep::AwaitingLessonNumber {
            language: Language::Python,
        });
        assert_eq!(
            session.take_pending_step(),
            Some(PendingStep::AwaitingLessonNumber {
                language: Language::Python
            })
        );
        assert_eq!(session.pending_step(), None);
    }

    #[test]
    fn lesson_index_must_be_within_count() {
        let mut session = Session::new(ChatId::new(1));
        assert_eq!(
            session.record_lesson_viewed(3, 3),
            Err(SessionError::IndexOutOfRange { index: 3, count: 3 })
        );
        assert_eq!(session.last_lesson_index(), None);

        session.record_lesson_viewed(2, 3).unwrap();
        assert_eq!(session.last_lesson_index(), Some(2));
        assert_eq!(session.next_lesson_index(), Some(3));
    }

    #[test]
    fn changing_language_keeps_progress() {
        let mut session = Session::new(ChatId::new(1));
        session.select_language(Language::Python);
        session.record_lesson_viewed(4, 9).unwrap();
        session.select_language(Language::Sql);
        assert_eq!(session.selected_language(), Some(Language::Sql));
        assert_eq!(session.last_lesson_index(), Some(4));
    }
}

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use lesson_core::model::{
    ChatId, Language, Lesson, LessonNumber, LessonSummary, QuizLink, Session,
};
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("not found")]
    NotFound,

    #[error("conflict")]
    Conflict,

    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Persisted display name of a chat user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRecord {
    pub chat_id: ChatId,
    pub name: String,
    pub saved_at: DateTime<Utc>,
}

/// Read access to lessons and quizzes, plus the one-time bulk load.
#[async_trait]
pub trait ContentRepository: Send + Sync {
    /// Lessons of a language ordered by lesson number; empty if none.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be queried.
    async fn list_lessons(&self, language: Language) -> Result<Vec<LessonSummary>, StorageError>;

    /// Fetch a single lesson.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be queried.
    async fn get_lesson(
        &self,
        language: Language,
        number: LessonNumber,
    ) -> Result<Option<Lesson>, StorageError>;

    /// Quiz link of a language, if one is configured.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be queried.
    async fn get_quiz(&self, language: Language) -> Result<Option<QuizLink>, StorageError>;

    /// Atomically replace every stored lesson.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Conflict` if two lessons share a language and
    /// number, or other storage errors.
    async fn replace_lessons(&self, lessons: Vec<Lesson>) -> Result<(), StorageError>;

    /// Atomically replace every stored quiz link.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Conflict` if a language appears twice, or other
    /// storage errors.
    async fn replace_quizzes(&self, quizzes: Vec<QuizLink>) -> Result<(), StorageError>;
}

/// Durable user names keyed by chat.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert or overwrite the name stored for a chat.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the record cannot be stored.
    async fn save_user_name(&self, record: &UserRecord) -> Result<(), StorageError>;

    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be queried.
    async fn get_user_name(&self, chat_id: ChatId) -> Result<Option<String>, StorageError>;
}

/// In-place edit applied to a stored session.
pub type SessionMutator = Box<dyn FnOnce(&mut Session) + Send>;

/// Per-chat dialog state, owned by the dialog controller.
#[async_trait]
pub trait SessionRepository: Send + Sync {
    /// Returns the stored session, creating an empty one on first contact.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the store is unavailable.
    async fn get_or_create(&self, chat_id: ChatId) -> Result<Session, StorageError>;

    /// # Errors
    ///
    /// Returns `StorageError` if the store is unavailable.
    async fn get(&self, chat_id: ChatId) -> Result<Option<Session>, StorageError>;

    /// Apply `mutator` to the session of `chat_id`, creating it if needed,
    /// and return the updated copy.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the store is unavailable.
    async fn update(
        &self,
        chat_id: ChatId,
        mutator: SessionMutator,
    ) -> Result<Session, StorageError>;
}

fn poisoned<E: std::fmt::Display>(e: E) -> StorageError {
    StorageError::Connection(e.to_string())
}

/// Simple in-memory content and user repository for tests and prototyping.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    lessons: Arc<Mutex<BTreeMap<(Language, LessonNumber), Lesson>>>,
    quizzes: Arc<Mutex<HashMap<Language, QuizLink>>>,
    users: Arc<Mutex<HashMap<ChatId, UserRecord>>>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ContentRepository for InMemoryRepository {
    async fn list_lessons(&self, language: Language) -> Result<Vec<LessonSummary>, StorageError> {
        let guard = self.lessons.lock().map_err(poisoned)?;
        Ok(guard
            .range((language, LessonNumber::MIN)..=(language, LessonNumber::MAX))
            .map(|(_, lesson)| lesson.summary())
            .collect())
    }

    async fn get_lesson(
        &self,
        language: Language,
        number: LessonNumber,
    ) -> Result<Option<Lesson>, StorageError> {
        let guard = self.lessons.lock().map_err(poisoned)?;
        Ok(guard.get(&(language, number)).cloned())
    }

    async fn get_quiz(&self, language: Language) -> Result<Option<QuizLink>, StorageError> {
        let guard = self.quizzes.lock().map_err(poisoned)?;
        Ok(guard.get(&language).cloned())
    }

    async fn replace_lessons(&self, lessons: Vec<Lesson>) -> Result<(), StorageError> {
        let mut fresh = BTreeMap::new();
        for lesson in lessons {
            let key = (lesson.language(), lesson.number());
            if fresh.insert(key, lesson).is_some() {
                return Err(StorageError::Conflict);
            }
        }
        let mut guard = self.lessons.lock().map_err(poisoned)?;
        *guard = fresh;
        Ok(())
    }

    async fn replace_quizzes(&self, quizzes: Vec<QuizLink>) -> Result<(), StorageError> {
        let mut fresh = HashMap::new();
        for quiz in quizzes {
            if fresh.insert(quiz.language(), quiz).is_some() {
                return Err(StorageError::Conflict);
            }
        }
        let mut guard = self.quizzes.lock().map_err(poisoned)?;
        *guard = fresh;
        Ok(())
    }
}

#[async_trait]
impl UserRepository for InMemoryRepository {
    async fn save_user_name(&self, record: &UserRecord) -> Result<(), StorageError> {
        let mut guard = self.users.lock().map_err(poisoned)?;
        guard.insert(record.chat_id, record.clone());
        Ok(())
    }

    async fn get_user_name(&self, chat_id: ChatId) -> Result<Option<String>, StorageError> {
        let guard = self.users.lock().map_err(poisoned)?;
        Ok(guard.get(&chat_id).map(|r| r.name.clone()))
    }
}

/// Unbounded process-lifetime session map. Nothing is ever evicted.
#[derive(Clone, Default)]
pub struct InMemorySessionStore {
    sessions: Arc<Mutex<HashMap<ChatId, Session>>>,
}

impl InMemorySessionStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionRepository for InMemorySessionStore {
    async fn get_or_create(&self, chat_id: ChatId) -> Result<Session, StorageError> {
        let mut guard = self.sessions.lock().map_err(poisoned)?;
        Ok(guard
            .entry(chat_id)
            .or_insert_with(|| Session::new(chat_id))
            .clone())
    }

    async fn get(&self, chat_id: ChatId) -> Result<Option<Session>, StorageError> {
        let guard = self.sessions.lock().map_err(poisoned)?;
        Ok(guard.get(&chat_id).cloned())
    }

    async fn update(
        &self,
        chat_id: ChatId,
        mutator: SessionMutator,
    ) -> Result<Session, StorageError> {
        let mut guard = self.sessions.lock().map_err(poisoned)?;
        let session = guard
            .entry(chat_id)
            .or_insert_with(|| Session::new(chat_id));
        mutator(session);
        Ok(session.clone())
    }
}

/// Aggregates repositories behind trait objects for easy backend swapping.
///
/// Sessions always live in memory; only content and user names go to the
/// configured backend. Built by `Storage::sqlite`.
#[derive(Clone)]
pub struct Storage {
    pub content: Arc<dyn ContentRepository>,
    pub users: Arc<dyn UserRepository>,
    pub sessions: Arc<dyn SessionRepository>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use lesson_core::model::PendingStep;
    use lesson_core::time::fixed_now;

    fn lesson(language: Language, n: u32, title: &str) -> Lesson {
        Lesson::new(
            language,
            LessonNumber::new(n).unwrap(),
            title,
            format!("{title} body"),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn lists_lessons_in_number_order_per_language() {
        let repo = InMemoryRepository::new();
        repo.replace_lessons(vec![
            lesson(Language::Python, 2, "Basics"),
            lesson(Language::Java, 1, "Intro to Java"),
            lesson(Language::Python, 1, "Intro"),
        ])
        .await
        .unwrap();

        let python = repo.list_lessons(Language::Python).await.unwrap();
        let titles: Vec<_> = python.iter().map(|l| l.title.as_str()).collect();
        assert_eq!(titles, vec!["Intro", "Basics"]);
        assert!(repo.list_lessons(Language::Sql).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn replace_lessons_rejects_duplicates_and_keeps_old_content() {
        let repo = InMemoryRepository::new();
        repo.replace_lessons(vec![lesson(Language::Sql, 1, "Select")])
            .await
            .unwrap();

        let err = repo
            .replace_lessons(vec![
                lesson(Language::Sql, 1, "A"),
                lesson(Language::Sql, 1, "B"),
            ])
            .await
            .unwrap_err();
        assert!(matches!(err, StorageError::Conflict));

        let sql = repo.list_lessons(Language::Sql).await.unwrap();
        assert_eq!(sql.len(), 1);
        assert_eq!(sql[0].title, "Select");
    }

    #[tokio::test]
    async fn quiz_lookup_is_per_language() {
        let repo = InMemoryRepository::new();
        repo.replace_quizzes(vec![
            QuizLink::new(Language::Python, "https://example.com/python").unwrap(),
        ])
        .await
        .unwrap();

        let quiz = repo.get_quiz(Language::Python).await.unwrap().unwrap();
        assert_eq!(quiz.url(), "https://example.com/python");
        assert!(repo.get_quiz(Language::Java).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn user_names_overwrite() {
        let repo = InMemoryRepository::new();
        let chat_id = ChatId::new(5);
        assert_eq!(repo.get_user_name(chat_id).await.unwrap(), None);

        for name in ["Alex", "Sasha"] {
            repo.save_user_name(&UserRecord {
                chat_id,
                name: name.into(),
                saved_at: fixed_now(),
            })
            .await
            .unwrap();
        }
        assert_eq!(repo.get_user_name(chat_id).await.unwrap().as_deref(), Some("Sasha"));
    }

    #[tokio::test]
    async fn session_store_creates_once_and_applies_mutators() {
        let store = InMemorySessionStore::new();
        let chat_id = ChatId::new(9);
        assert!(store.get(chat_id).await.unwrap().is_none());

        let created = store.get_or_create(chat_id).await.unwrap();
        assert_eq!(created, Session::new(chat_id));

        let updated = store
            .update(
                chat_id,
                Box::new(|s| {
                    s.select_language(Language::Python);
                    s.await_step(PendingStep::AwaitingLanguage);
                }),
            )
            .await
            .unwrap();
        assert_eq!(updated.selected_language(), Some(Language::Python));

        let again = store.get_or_create(chat_id).await.unwrap();
        assert_eq!(again, updated);
    }
}

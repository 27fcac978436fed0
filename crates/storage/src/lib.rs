#![forbid(unsafe_code)]

pub mod docx;
pub mod loader;
pub mod repository;
pub mod sqlite;

pub use loader::{LessonLoader, LoadError};
pub use repository::{
    ContentRepository, InMemoryRepository, InMemorySessionStore, SessionMutator,
    SessionRepository, Storage, StorageError, UserRecord, UserRepository,
};

mod catalog;
mod ids;
mod language;
mod lesson;
mod locale;
mod quiz;
mod session;

pub use catalog::{CatalogError, LessonCatalog};
pub use ids::{ChatId, LessonNumber, LessonNumberError};
pub use language::{Language, LanguageError};
pub use lesson::{Lesson, LessonError, LessonSummary};
pub use locale::{Locale, LocaleError};
pub use quiz::{QuizLink, QuizLinkError};
pub use session::{PendingStep, Session, SessionError};

use std::collections::BTreeMap;
use std::sync::Arc;

use lesson_core::model::{Language, LessonCatalog, QuizLink};
use storage::loader::LessonLoader;
use storage::repository::ContentRepository;

use crate::error::ContentError;

/// Quiz pages the bot links to unless configured otherwise.
pub const BUILTIN_QUIZ_LINKS: [(Language, &str); 6] = [
    (Language::JavaScript, "https://itproger.com/test/javascript#google_vignette"),
    (Language::Java, "https://itproger.com/practice/java"),
    (Language::Python, "https://itproger.com/practice/python"),
    (Language::Cpp, "https://itproger.com/practice/cpp"),
    (Language::CSharp, "https://itproger.com/practice/csharp"),
    (Language::Sql, "https://itproger.com/practice/sql"),
];

/// Validates the built-in quiz links.
///
/// # Errors
///
/// Returns `ContentError::QuizLink` if a link does not parse.
pub fn builtin_quiz_links() -> Result<Vec<QuizLink>, ContentError> {
    BUILTIN_QUIZ_LINKS
        .iter()
        .map(|(language, url)| QuizLink::new(*language, url).map_err(ContentError::from))
        .collect()
}

/// Parses `{"Python": "https://...", ...}`.
///
/// # Errors
///
/// Returns `ContentError::QuizLinksParse` for malformed JSON or unknown
/// languages, `ContentError::QuizLink` for invalid URLs.
pub fn quiz_links_from_json(raw: &str) -> Result<Vec<QuizLink>, ContentError> {
    let links: BTreeMap<Language, String> =
        serde_json::from_str(raw).map_err(|e| ContentError::QuizLinksParse(e.to_string()))?;
    links
        .into_iter()
        .map(|(language, url)| QuizLink::new(language, &url).map_err(ContentError::from))
        .collect()
}

/// What a bootstrap stored.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LoadReport {
    pub lessons: BTreeMap<Language, usize>,
    pub quizzes: usize,
}

impl LoadReport {
    #[must_use]
    pub fn total_lessons(&self) -> usize {
        self.lessons.values().sum()
    }
}

/// One-time population of the content store.
#[derive(Clone)]
pub struct ContentService {
    content: Arc<dyn ContentRepository>,
}

impl ContentService {
    #[must_use]
    pub fn new(content: Arc<dyn ContentRepository>) -> Self {
        Self { content }
    }

    /// Load lesson files and replace stored lessons and quizzes.
    ///
    /// Must finish before the dispatch loop starts so chats never see a
    /// half-loaded catalog.
    ///
    /// # Errors
    ///
    /// Returns `ContentError` if files cannot be read or storage fails.
    pub async fn bootstrap(
        &self,
        loader: &LessonLoader,
        catalog: &LessonCatalog,
        quizzes: Vec<QuizLink>,
    ) -> Result<LoadReport, ContentError> {
        let lessons = loader.load(catalog).await?;

        let mut report = LoadReport {
            quizzes: quizzes.len(),
            ..LoadReport::default()
        };
        for lesson in &lessons {
            *report.lessons.entry(lesson.language()).or_default() += 1;
        }

        self.content.replace_lessons(lessons).await?;
        self.content.replace_quizzes(quizzes).await?;

        for language in Language::ALL {
            let count = report.lessons.get(&language).copied().unwrap_or(0);
            if count == 0 {
                tracing::warn!(%language, "no lessons available");
            } else {
                tracing::info!(%language, count, "lessons ready");
            }
        }
        Ok(report)
    }
}

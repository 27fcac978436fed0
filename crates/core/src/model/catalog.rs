use std::collections::BTreeMap;

use thiserror::Error;

use crate::model::{Language, Locale};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum CatalogError {
    #[error("catalog is not valid JSON: {0}")]
    Parse(String),

    #[error("lesson {position} of {language} has an empty title")]
    EmptyTitle { language: Language, position: usize },
}

/// Ordered lesson titles per language.
///
/// Lesson `n` of a language is the `n`-th title (1-based); the loader looks
/// for its body in `<Language>/<n>.docx` (or `.txt`, `.md`).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LessonCatalog {
    entries: BTreeMap<Language, Vec<String>>,
}

impl LessonCatalog {
    /// Builds a catalog from explicit titles.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::EmptyTitle` for blank titles.
    pub fn new(entries: BTreeMap<Language, Vec<String>>) -> Result<Self, CatalogError> {
        for (language, titles) in &entries {
            if let Some(pos) = titles.iter().position(|t| t.trim().is_empty()) {
                return Err(CatalogError::EmptyTitle {
                    language: *language,
                    position: pos + 1,
                });
            }
        }
        Ok(Self { entries })
    }

    /// Parses a catalog of the form `{"Python": ["Intro", ...], ...}`.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Parse` for malformed JSON or unknown language keys.
    pub fn from_json(raw: &str) -> Result<Self, CatalogError> {
        let entries: BTreeMap<Language, Vec<String>> =
            serde_json::from_str(raw).map_err(|e| CatalogError::Parse(e.to_string()))?;
        Self::new(entries)
    }

    /// The course outline the bot ships with, titled in `locale`.
    ///
    /// Both locales describe the same lessons in the same order, so one
    /// content directory serves either.
    #[must_use]
    pub fn builtin(locale: Locale) -> Self {
        let outline: &[(Language, &[&str])] = match locale {
            Locale::En => BUILTIN_EN,
            Locale::Uk => BUILTIN_UK,
        };
        let entries = outline
            .iter()
            .map(|(language, titles)| (*language, owned(titles)))
            .collect();
        Self { entries }
    }

    #[must_use]
    pub fn titles(&self, language: Language) -> &[String] {
        self.entries.get(&language).map_or(&[], Vec::as_slice)
    }

    pub fn languages(&self) -> impl Iterator<Item = Language> + '_ {
        self.entries.keys().copied()
    }
}

const BUILTIN_EN: &[(Language, &[&str])] = &[
    (
        Language::Java,
        &[
            "Getting to know Java",
            "Java basics: data types, variables, arrays",
            "Operations",
            "Operators",
            "OOP in Java",
            "Classes",
            "Class hierarchy",
        ],
    ),
    (
        Language::JavaScript,
        &[
            "What you need to know",
            "Variables and comments",
            "Operators",
            "Conditions",
            "Functions",
            "Events",
            "Changing images",
        ],
    ),
    (
        Language::Python,
        &[
            "Getting to know Python",
            "Language basics",
            "Numeric data",
            "Exceptions",
            "Branching",
            "Loops",
            "Data structures",
            "Functions",
            "Files",
        ],
    ),
    (
        Language::CSharp,
        &[
            "Introduction",
            "Comments",
            "Instances in memory",
            "Variables",
            "Typing",
            "Operators and expressions",
            "Operator precedence",
            "Conditional operators",
            "Statements",
        ],
    ),
    (
        Language::Cpp,
        &[
            "Getting to know the language",
            "Data types",
            "Constants",
            "Variables",
            "Streams",
            "Operations",
            "Conditions",
            "Functions",
            "Loops",
            "Recursion",
            "Processing sequences",
            "Program structure",
        ],
    ),
    (
        Language::Sql,
        &[
            "Introduction",
            "Data types",
            "Simple queries",
            "Aggregate functions",
            "Modifying data",
            "Altering table definitions",
        ],
    ),
];

const BUILTIN_UK: &[(Language, &[&str])] = &[
    (
        Language::Java,
        &[
            "Знайомство з мовою Java",
            "Основи мови Java: Типи даних, змінні, масиви",
            "Операції",
            "Оператори",
            "ООП мовою Java",
            "Класи",
            "Ієрархія класів",
        ],
    ),
    (
        Language::JavaScript,
        &[
            "Що треба знати?",
            "Змінні та коментарі",
            "Оператори",
            "Умови",
            "Функції",
            "Події",
            "Зміна зображення",
        ],
    ),
    (
        Language::Python,
        &[
            "Знайомство з мовою Python",
            "Основи мови",
            "Числові дані",
            "Винятки",
            "Організація розгалужень",
            "Циклічні оператори",
            "Структури даних",
            "Функції",
            "Файли",
        ],
    ),
    (
        Language::CSharp,
        &[
            "Ознайомлення",
            "Коментарі",
            "Розміщення екземплярів у пам’яті",
            "Змінні",
            "Типізація",
            "Оператори та вирази",
            "Пріоритетність операторів",
            "Оператори для умов",
            "Інструкції",
        ],
    ),
    (
        Language::Cpp,
        &[
            "Знайомство з мовою",
            "Типи даних",
            "Константи",
            "Змінні величини",
            "Поняття потоку",
            "Операції",
            "Умови",
            "Функції",
            "Циклічні алгоритми",
            "Рекурсія",
            "Обробка послідовностей",
            "Структурна організація програм",
        ],
    ),
    (
        Language::Sql,
        &[
            "Ознайомлення",
            "Типи даних",
            "Прості запити",
            "Статичні функції",
            "Внесення змін",
            "Зміна визначення таблиці",
        ],
    ),
];

fn owned(titles: &[&str]) -> Vec<String> {
    titles.iter().map(|t| (*t).to_owned()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_covers_every_language() {
        let catalog = LessonCatalog::builtin(Locale::En);
        for lang in Language::ALL {
            assert!(!catalog.titles(lang).is_empty(), "{lang} has no lessons");
        }
        assert_eq!(catalog.titles(Language::Cpp).len(), 12);
        assert_eq!(catalog.titles(Language::Sql).len(), 6);
    }

    #[test]
    fn both_locales_describe_the_same_lessons() {
        let en = LessonCatalog::builtin(Locale::En);
        let uk = LessonCatalog::builtin(Locale::Uk);
        assert!(en.languages().eq(uk.languages()));
        for lang in Language::ALL {
            assert_eq!(en.titles(lang).len(), uk.titles(lang).len(), "{lang}");
        }
        assert_eq!(uk.titles(Language::Python)[0], "Знайомство з мовою Python");
        assert_eq!(uk.titles(Language::Sql)[2], "Прості запити");
    }

    #[test]
    fn parses_json_catalog() {
        let catalog =
            LessonCatalog::from_json(r#"{"Python": ["Intro", "Loops"], "C#": ["Basics"]}"#)
                .unwrap();
        assert_eq!(catalog.titles(Language::Python), ["Intro", "Loops"]);
        assert_eq!(catalog.titles(Language::CSharp), ["Basics"]);
        assert!(catalog.titles(Language::Java).is_empty());
    }

    #[test]
    fn rejects_unknown_language_and_blank_titles() {
        assert!(matches!(
            LessonCatalog::from_json(r#"{"Rust": ["Ownership"]}"#),
            Err(CatalogError::Parse(_))
        ));
        assert_eq!(
            LessonCatalog::from_json(r#"{"SQL": ["Select", " "]}"#),
            Err(CatalogError::EmptyTitle {
                language: Language::Sql,
                position: 2
            })
        );
    }
}

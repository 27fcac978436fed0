//! Reads lesson bodies from a content directory.
//!
//! Layout: `<base>/<Language>/<n>.docx` (or `.txt`, `.md`), where `<Language>`
//! is the display name (`C++`, `C#`, ...) and `n` the 1-based catalog
//! position. When several exist, the first in that order wins.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use lesson_core::model::{Language, Lesson, LessonCatalog, LessonError, LessonNumber};
use thiserror::Error;

use crate::docx::{self, DocxError};

const EXTENSIONS: [&str; 3] = ["docx", "txt", "md"];

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum LoadError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to extract text from {path}: {source}")]
    Docx {
        path: PathBuf,
        #[source]
        source: DocxError,
    },

    #[error("too many lessons for {language}")]
    TooManyLessons { language: Language },

    #[error("invalid lesson {number} for {language}: {source}")]
    Lesson {
        language: Language,
        number: LessonNumber,
        #[source]
        source: LessonError,
    },
}

#[derive(Debug, Clone)]
pub struct LessonLoader {
    base_dir: PathBuf,
}

impl LessonLoader {
    #[must_use]
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    /// Loads every catalog lesson whose body file exists.
    ///
    /// Missing language directories, missing files and blank files are
    /// skipped with a warning.
    ///
    /// # Errors
    ///
    /// Returns `LoadError::Io` when an existing file cannot be read and
    /// `LoadError::Docx` when a `.docx` file is corrupt.
    pub async fn load(&self, catalog: &LessonCatalog) -> Result<Vec<Lesson>, LoadError> {
        let mut lessons = Vec::new();

        for language in catalog.languages() {
            let dir = self.base_dir.join(language.display_name());
            if !is_dir(&dir).await {
                tracing::warn!(%language, dir = %dir.display(), "lesson directory missing, skipping language");
                continue;
            }

            for (pos, title) in catalog.titles(language).iter().enumerate() {
                let number = u32::try_from(pos + 1)
                    .ok()
                    .and_then(|n| LessonNumber::new(n).ok())
                    .ok_or(LoadError::TooManyLessons { language })?;

                let Some((path, body)) = read_lesson_body(&dir, number).await? else {
                    tracing::warn!(%language, %number, "lesson file missing, skipping");
                    continue;
                };
                if body.trim().is_empty() {
                    tracing::warn!(%language, %number, path = %path.display(), "lesson file is empty, skipping");
                    continue;
                }

                let lesson = Lesson::new(language, number, title.as_str(), body).map_err(
                    |source| LoadError::Lesson {
                        language,
                        number,
                        source,
                    },
                )?;
                lessons.push(lesson);
            }
        }

        tracing::info!(base_dir = %self.base_dir.display(), count = lessons.len(), "loaded lessons");
        Ok(lessons)
    }
}

async fn is_dir(path: &Path) -> bool {
    tokio::fs::metadata(path)
        .await
        .map(|m| m.is_dir())
        .unwrap_or(false)
}

async fn read_lesson_body(
    dir: &Path,
    number: LessonNumber,
) -> Result<Option<(PathBuf, String)>, LoadError> {
    for ext in EXTENSIONS {
        let path = dir.join(format!("{number}.{ext}"));
        let bytes = match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == ErrorKind::NotFound => continue,
            Err(source) => return Err(LoadError::Io { path, source }),
        };

        let body = if ext == "docx" {
            docx::extract_text(&bytes).map_err(|source| LoadError::Docx {
                path: path.clone(),
                source,
            })?
        } else {
            String::from_utf8(bytes).map_err(|err| LoadError::Io {
                path: path.clone(),
                source: std::io::Error::new(ErrorKind::InvalidData, err),
            })?
        };
        return Ok(Some((path, body)));
    }
    Ok(None)
}

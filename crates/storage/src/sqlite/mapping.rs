use lesson_core::model::{Language, Lesson, LessonNumber, LessonSummary, QuizLink};
use sqlx::Row;
use sqlx::sqlite::SqliteRow;

use crate::repository::StorageError;

pub(crate) fn ser<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Serialization(e.to_string())
}

pub(crate) fn conn<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Connection(e.to_string())
}

pub(crate) fn parse_language(s: &str) -> Result<Language, StorageError> {
    Language::from_display(s)
        .ok_or_else(|| StorageError::Serialization(format!("invalid language: {s}")))
}

pub(crate) fn lesson_number_from_i64(v: i64) -> Result<LessonNumber, StorageError> {
    let raw = u32::try_from(v)
        .map_err(|_| StorageError::Serialization(format!("invalid lesson_number: {v}")))?;
    LessonNumber::new(raw).map_err(ser)
}

pub(crate) fn map_summary_row(row: &SqliteRow) -> Result<LessonSummary, StorageError> {
    Ok(LessonSummary {
        number: lesson_number_from_i64(row.try_get("lesson_number").map_err(ser)?)?,
        title: row.try_get("title").map_err(ser)?,
    })
}

pub(crate) fn map_lesson_row(row: &SqliteRow) -> Result<Lesson, StorageError> {
    let language: String = row.try_get("language").map_err(ser)?;
    Lesson::new(
        parse_language(&language)?,
        lesson_number_from_i64(row.try_get("lesson_number").map_err(ser)?)?,
        row.try_get::<String, _>("title").map_err(ser)?,
        row.try_get::<String, _>("content").map_err(ser)?,
    )
    .map_err(ser)
}

pub(crate) fn map_quiz_row(row: &SqliteRow) -> Result<QuizLink, StorageError> {
    let language: String = row.try_get("language").map_err(ser)?;
    let link: String = row.try_get("quiz_link").map_err(ser)?;
    QuizLink::new(parse_language(&language)?, &link).map_err(ser)
}

/// Unique-constraint violations surface as `Conflict`, everything else as a
/// connection problem.
pub(crate) fn write_err(e: sqlx::Error) -> StorageError {
    match e.as_database_error() {
        Some(db) if db.is_unique_violation() => StorageError::Conflict,
        _ => StorageError::Connection(e.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_unknown_language_and_bad_numbers() {
        assert!(matches!(
            parse_language("python"),
            Err(StorageError::Serialization(_))
        ));
        assert_eq!(parse_language("C++").unwrap(), Language::Cpp);
        assert!(lesson_number_from_i64(0).is_err());
        assert!(lesson_number_from_i64(-4).is_err());
        assert_eq!(lesson_number_from_i64(3).unwrap().value(), 3);
    }
}

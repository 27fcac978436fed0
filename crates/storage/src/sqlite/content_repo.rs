use async_trait::async_trait;
use lesson_core::model::{Language, Lesson, LessonNumber, LessonSummary, QuizLink};

use super::SqliteRepository;
use super::mapping::{conn, map_lesson_row, map_quiz_row, map_summary_row, write_err};
use crate::repository::{ContentRepository, StorageError};

#[async_trait]
impl ContentRepository for SqliteRepository {
    async fn list_lessons(&self, language: Language) -> Result<Vec<LessonSummary>, StorageError> {
        let rows = sqlx::query(
            r"
            SELECT lesson_number, title
            FROM lessons
            WHERE language = ?1
            ORDER BY lesson_number ASC
            ",
        )
        .bind(language.display_name())
        .fetch_all(&self.pool)
        .await
        .map_err(conn)?;

        rows.iter().map(map_summary_row).collect()
    }

    async fn get_lesson(
        &self,
        language: Language,
        number: LessonNumber,
    ) -> Result<Option<Lesson>, StorageError> {
        let row = sqlx::query(
            r"
            SELECT language, lesson_number, title, content
            FROM lessons
            WHERE language = ?1 AND lesson_number = ?2
            ",
        )
        .bind(language.display_name())
        .bind(i64::from(number.value()))
        .fetch_optional(&self.pool)
        .await
        .map_err(conn)?;

        row.as_ref().map(map_lesson_row).transpose()
    }

    async fn get_quiz(&self, language: Language) -> Result<Option<QuizLink>, StorageError> {
        let row = sqlx::query("SELECT language, quiz_link FROM quizzes WHERE language = ?1")
            .bind(language.display_name())
            .fetch_optional(&self.pool)
            .await
            .map_err(conn)?;

        row.as_ref().map(map_quiz_row).transpose()
    }

    async fn replace_lessons(&self, lessons: Vec<Lesson>) -> Result<(), StorageError> {
        let mut tx = self.pool.begin().await.map_err(conn)?;

        sqlx::query("DELETE FROM lessons")
            .execute(&mut *tx)
            .await
            .map_err(conn)?;

        for lesson in &lessons {
            sqlx::query(
                r"
                INSERT INTO lessons (language, lesson_number, title, content)
                VALUES (?1, ?2, ?3, ?4)
                ",
            )
            .bind(lesson.language().display_name())
            .bind(i64::from(lesson.number().value()))
            .bind(lesson.title())
            .bind(lesson.content())
            .execute(&mut *tx)
            .await
            .map_err(write_err)?;
        }

        tx.commit().await.map_err(conn)?;
        tracing::debug!(count = lessons.len(), "replaced lessons");
        Ok(())
    }

    async fn replace_quizzes(&self, quizzes: Vec<QuizLink>) -> Result<(), StorageError> {
        let mut tx = self.pool.begin().await.map_err(conn)?;

        sqlx::query("DELETE FROM quizzes")
            .execute(&mut *tx)
            .await
            .map_err(conn)?;

        for quiz in &quizzes {
            sqlx::query("INSERT INTO quizzes (language, quiz_link) VALUES (?1, ?2)")
                .bind(quiz.language().display_name())
                .bind(quiz.url())
                .execute(&mut *tx)
                .await
                .map_err(write_err)?;
        }

        tx.commit().await.map_err(conn)?;
        tracing::debug!(count = quizzes.len(), "replaced quizzes");
        Ok(())
    }
}

use async_trait::async_trait;
use lesson_core::model::ChatId;
use sqlx::Row;

use super::SqliteRepository;
use super::mapping::{conn, ser};
use crate::repository::{StorageError, UserRecord, UserRepository};

#[async_trait]
impl UserRepository for SqliteRepository {
    async fn save_user_name(&self, record: &UserRecord) -> Result<(), StorageError> {
        sqlx::query(
            r"
            INSERT INTO users (user_id, user_name, saved_at)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(user_id) DO UPDATE SET
                user_name = excluded.user_name,
                saved_at = excluded.saved_at
            ",
        )
        .bind(record.chat_id.value())
        .bind(&record.name)
        .bind(record.saved_at)
        .execute(&self.pool)
        .await
        .map_err(conn)?;

        Ok(())
    }

    async fn get_user_name(&self, chat_id: ChatId) -> Result<Option<String>, StorageError> {
        let row = sqlx::query("SELECT user_name FROM users WHERE user_id = ?1")
            .bind(chat_id.value())
            .fetch_optional(&self.pool)
            .await
            .map_err(conn)?;

        row.map(|row| row.try_get::<String, _>("user_name").map_err(ser))
            .transpose()
    }
}

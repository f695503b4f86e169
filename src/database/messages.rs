//! Localized message CRUD operations.

use anyhow::Result;
use sqlx::Row;

use super::records::MessageRecord;
use super::Database;

impl Database {
    pub async fn get_message(&self, language: &str) -> Result<Option<MessageRecord>> {
        let row = sqlx::query(
            r#"
            SELECT language, heading, description, countdown_label, updated_at
            FROM messages
            WHERE language = ?
            "#,
        )
        .bind(language)
        .fetch_optional(&self.pool)
        .await?;

        if let Some(row) = row {
            Ok(Some(Self::row_to_message_record(&row)?))
        } else {
            Ok(None)
        }
    }

    pub async fn get_all_messages(&self) -> Result<Vec<MessageRecord>> {
        let rows = sqlx::query(
            r#"
            SELECT language, heading, description, countdown_label, updated_at
            FROM messages
            ORDER BY language
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        let mut messages = Vec::new();
        for row in rows {
            messages.push(Self::row_to_message_record(&row)?);
        }
        Ok(messages)
    }

    fn row_to_message_record(row: &sqlx::sqlite::SqliteRow) -> Result<MessageRecord> {
        Ok(MessageRecord {
            language: row.try_get("language")?,
            heading: row.try_get("heading")?,
            description: row.try_get("description")?,
            countdown_label: row.try_get("countdown_label")?,
            updated_at: row.try_get("updated_at")?,
        })
    }

    pub async fn upsert_message(&self, message: &MessageRecord) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO messages (language, heading, description, countdown_label, updated_at)
            VALUES (?, ?, ?, ?, ?)
            ON CONFLICT(language) DO UPDATE SET
                heading = excluded.heading,
                description = excluded.description,
                countdown_label = excluded.countdown_label,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(&message.language)
        .bind(&message.heading)
        .bind(&message.description)
        .bind(&message.countdown_label)
        .bind(message.updated_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    pub async fn delete_message(&self, language: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM messages WHERE language = ?")
            .bind(language)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

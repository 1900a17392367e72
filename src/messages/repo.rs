use async_trait::async_trait;
use uuid::Uuid;

use crate::db::PgStore;
use crate::error::{ModelError, ModelResult};
use crate::messages::repo_types::Message;
use crate::storage::MessageRepo;

#[async_trait]
impl MessageRepo for PgStore {
    async fn insert_message(&self, user_id: Uuid, text: &str) -> ModelResult<Message> {
        sqlx::query_as::<_, Message>(
            r#"
            INSERT INTO messages (user_id, text)
            VALUES ($1, $2)
            RETURNING id, user_id, text, created_at
            "#,
        )
        .bind(user_id)
        .bind(text)
        .fetch_one(&self.db)
        .await
        .map_err(ModelError::from_db)
    }

    async fn messages_of(&self, user_id: Uuid) -> ModelResult<Vec<Message>> {
        let rows = sqlx::query_as::<_, Message>(
            r#"
            SELECT id, user_id, text, created_at
            FROM messages
            WHERE user_id = $1
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.db)
        .await?;
        Ok(rows)
    }
}

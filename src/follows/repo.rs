use async_trait::async_trait;
use uuid::Uuid;

use crate::db::PgStore;
use crate::error::{ModelError, ModelResult};
use crate::storage::FollowRepo;
use crate::users::repo_types::User;

#[async_trait]
impl FollowRepo for PgStore {
    async fn insert_follow(&self, follower_id: Uuid, followed_id: Uuid) -> ModelResult<bool> {
        let res = sqlx::query(
            r#"
            INSERT INTO follows (follower_id, followed_id)
            VALUES ($1, $2)
            ON CONFLICT (follower_id, followed_id) DO NOTHING
            "#,
        )
        .bind(follower_id)
        .bind(followed_id)
        .execute(&self.db)
        .await
        .map_err(ModelError::from_db)?;
        Ok(res.rows_affected() == 1)
    }

    async fn delete_follow(&self, follower_id: Uuid, followed_id: Uuid) -> ModelResult<bool> {
        let res = sqlx::query("DELETE FROM follows WHERE follower_id = $1 AND followed_id = $2")
            .bind(follower_id)
            .bind(followed_id)
            .execute(&self.db)
            .await?;
        Ok(res.rows_affected() == 1)
    }

    async fn follow_exists(&self, follower_id: Uuid, followed_id: Uuid) -> ModelResult<bool> {
        let exists: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM follows WHERE follower_id = $1 AND followed_id = $2
            )
            "#,
        )
        .bind(follower_id)
        .bind(followed_id)
        .fetch_one(&self.db)
        .await?;
        Ok(exists)
    }

    async fn following_of(&self, user_id: Uuid) -> ModelResult<Vec<User>> {
        let rows = sqlx::query_as::<_, User>(
            r#"
            SELECT u.id, u.username, u.email, u.password_hash, u.image_url, u.header_image_url,
                   u.bio, u.location, u.created_at
            FROM follows f
            JOIN users u ON u.id = f.followed_id
            WHERE f.follower_id = $1
            ORDER BY u.username
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.db)
        .await?;
        Ok(rows)
    }

    async fn followers_of(&self, user_id: Uuid) -> ModelResult<Vec<User>> {
        let rows = sqlx::query_as::<_, User>(
            r#"
            SELECT u.id, u.username, u.email, u.password_hash, u.image_url, u.header_image_url,
                   u.bio, u.location, u.created_at
            FROM follows f
            JOIN users u ON u.id = f.follower_id
            WHERE f.followed_id = $1
            ORDER BY u.username
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.db)
        .await?;
        Ok(rows)
    }
}

use async_trait::async_trait;
use uuid::Uuid;

use crate::db::PgStore;
use crate::error::{ModelError, ModelResult};
use crate::storage::UserRepo;
use crate::users::repo_types::{NewUser, User, DEFAULT_HEADER_IMAGE_URL, DEFAULT_IMAGE_URL};

#[async_trait]
impl UserRepo for PgStore {
    async fn insert_user(&self, new: NewUser) -> ModelResult<User> {
        sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (username, email, password_hash, image_url, header_image_url, bio, location)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, username, email, password_hash, image_url, header_image_url,
                      bio, location, created_at
            "#,
        )
        .bind(&new.username)
        .bind(&new.email)
        .bind(&new.password_hash)
        .bind(new.image_url.as_deref().unwrap_or(DEFAULT_IMAGE_URL))
        .bind(new.header_image_url.as_deref().unwrap_or(DEFAULT_HEADER_IMAGE_URL))
        .bind(&new.bio)
        .bind(&new.location)
        .fetch_one(&self.db)
        .await
        .map_err(ModelError::from_db)
    }

    async fn user_by_id(&self, id: Uuid) -> ModelResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, email, password_hash, image_url, header_image_url,
                   bio, location, created_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await?;
        Ok(user)
    }

    async fn user_by_username(&self, username: &str) -> ModelResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, email, password_hash, image_url, header_image_url,
                   bio, location, created_at
            FROM users
            WHERE username = $1
            "#,
        )
        .bind(username)
        .fetch_optional(&self.db)
        .await?;
        Ok(user)
    }

    async fn delete_user(&self, id: Uuid) -> ModelResult<bool> {
        // follows and messages go with the user via ON DELETE CASCADE
        let res = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.db)
            .await?;
        Ok(res.rows_affected() > 0)
    }

    async fn count_users(&self) -> ModelResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&self.db)
            .await?;
        Ok(count)
    }
}

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::ModelResult;
use crate::messages::repo_types::Message;
use crate::users::repo_types::{NewUser, User};

#[async_trait]
pub trait UserRepo: Send + Sync {
    async fn insert_user(&self, new: NewUser) -> ModelResult<User>;
    async fn user_by_id(&self, id: Uuid) -> ModelResult<Option<User>>;
    async fn user_by_username(&self, username: &str) -> ModelResult<Option<User>>;
    /// Returns false when no such user existed.
    async fn delete_user(&self, id: Uuid) -> ModelResult<bool>;
    async fn count_users(&self) -> ModelResult<i64>;
}

#[async_trait]
pub trait FollowRepo: Send + Sync {
    /// Inserts the edge `follower -> followed`; false if it was already there.
    async fn insert_follow(&self, follower_id: Uuid, followed_id: Uuid) -> ModelResult<bool>;
    async fn delete_follow(&self, follower_id: Uuid, followed_id: Uuid) -> ModelResult<bool>;
    async fn follow_exists(&self, follower_id: Uuid, followed_id: Uuid) -> ModelResult<bool>;
    /// Users that `user_id` follows, sorted by username.
    async fn following_of(&self, user_id: Uuid) -> ModelResult<Vec<User>>;
    /// Users following `user_id`, sorted by username.
    async fn followers_of(&self, user_id: Uuid) -> ModelResult<Vec<User>>;
}

#[async_trait]
pub trait MessageRepo: Send + Sync {
    async fn insert_message(&self, user_id: Uuid, text: &str) -> ModelResult<Message>;
    /// Newest first.
    async fn messages_of(&self, user_id: Uuid) -> ModelResult<Vec<Message>>;
}

/// A complete persistence backend.
pub trait Store: UserRepo + FollowRepo + MessageRepo {}

impl<T> Store for T where T: UserRepo + FollowRepo + MessageRepo {}

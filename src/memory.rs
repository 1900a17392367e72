use std::collections::{BTreeSet, HashMap};

use async_trait::async_trait;
use time::OffsetDateTime;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::{ModelError, ModelResult};
use crate::messages::repo_types::Message;
use crate::storage::{FollowRepo, MessageRepo, UserRepo};
use crate::users::repo_types::{NewUser, User, DEFAULT_HEADER_IMAGE_URL, DEFAULT_IMAGE_URL};

/// In-process store enforcing the same constraints as the Postgres schema:
/// unique username/email, one edge per ordered pair, no self-follow, and
/// cascading deletes.
#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<Tables>,
}

#[derive(Default)]
struct Tables {
    users: HashMap<Uuid, User>,
    // (follower_id, followed_id)
    follows: BTreeSet<(Uuid, Uuid)>,
    messages: Vec<Message>,
}

impl Tables {
    fn sorted_users(&self, ids: impl Iterator<Item = Uuid>) -> Vec<User> {
        let mut out: Vec<User> = ids.filter_map(|id| self.users.get(&id).cloned()).collect();
        out.sort_by(|a, b| a.username.cmp(&b.username));
        out
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepo for MemoryStore {
    async fn insert_user(&self, new: NewUser) -> ModelResult<User> {
        let mut t = self.inner.write().await;
        if t.users.values().any(|u| u.username == new.username) {
            return Err(ModelError::UsernameTaken);
        }
        if t.users.values().any(|u| u.email == new.email) {
            return Err(ModelError::EmailTaken);
        }
        let user = User {
            id: Uuid::new_v4(),
            username: new.username,
            email: new.email,
            password_hash: new.password_hash,
            image_url: new.image_url.unwrap_or_else(|| DEFAULT_IMAGE_URL.to_string()),
            header_image_url: new
                .header_image_url
                .unwrap_or_else(|| DEFAULT_HEADER_IMAGE_URL.to_string()),
            bio: new.bio,
            location: new.location,
            created_at: OffsetDateTime::now_utc(),
        };
        t.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn user_by_id(&self, id: Uuid) -> ModelResult<Option<User>> {
        Ok(self.inner.read().await.users.get(&id).cloned())
    }

    async fn user_by_username(&self, username: &str) -> ModelResult<Option<User>> {
        let t = self.inner.read().await;
        Ok(t.users.values().find(|u| u.username == username).cloned())
    }

    async fn delete_user(&self, id: Uuid) -> ModelResult<bool> {
        let mut t = self.inner.write().await;
        if t.users.remove(&id).is_none() {
            return Ok(false);
        }
        t.follows.retain(|&(a, b)| a != id && b != id);
        t.messages.retain(|m| m.user_id != id);
        Ok(true)
    }

    async fn count_users(&self) -> ModelResult<i64> {
        Ok(self.inner.read().await.users.len() as i64)
    }
}

#[async_trait]
impl FollowRepo for MemoryStore {
    async fn insert_follow(&self, follower_id: Uuid, followed_id: Uuid) -> ModelResult<bool> {
        let mut t = self.inner.write().await;
        if !t.users.contains_key(&follower_id) || !t.users.contains_key(&followed_id) {
            return Err(ModelError::UserNotFound);
        }
        if follower_id == followed_id {
            return Err(ModelError::SelfFollow);
        }
        Ok(t.follows.insert((follower_id, followed_id)))
    }

    async fn delete_follow(&self, follower_id: Uuid, followed_id: Uuid) -> ModelResult<bool> {
        Ok(self
            .inner
            .write()
            .await
            .follows
            .remove(&(follower_id, followed_id)))
    }

    async fn follow_exists(&self, follower_id: Uuid, followed_id: Uuid) -> ModelResult<bool> {
        Ok(self
            .inner
            .read()
            .await
            .follows
            .contains(&(follower_id, followed_id)))
    }

    async fn following_of(&self, user_id: Uuid) -> ModelResult<Vec<User>> {
        let t = self.inner.read().await;
        let ids = t
            .follows
            .iter()
            .filter(|(follower, _)| *follower == user_id)
            .map(|&(_, followed)| followed);
        Ok(t.sorted_users(ids))
    }

    async fn followers_of(&self, user_id: Uuid) -> ModelResult<Vec<User>> {
        let t = self.inner.read().await;
        let ids = t
            .follows
            .iter()
            .filter(|(_, followed)| *followed == user_id)
            .map(|&(follower, _)| follower);
        Ok(t.sorted_users(ids))
    }
}

#[async_trait]
impl MessageRepo for MemoryStore {
    async fn insert_message(&self, user_id: Uuid, text: &str) -> ModelResult<Message> {
        let mut t = self.inner.write().await;
        if !t.users.contains_key(&user_id) {
            return Err(ModelError::UserNotFound);
        }
        let msg = Message {
            id: Uuid::new_v4(),
            user_id,
            text: text.to_string(),
            created_at: OffsetDateTime::now_utc(),
        };
        t.messages.push(msg.clone());
        Ok(msg)
    }

    async fn messages_of(&self, user_id: Uuid) -> ModelResult<Vec<Message>> {
        let t = self.inner.read().await;
        // insertion order is creation order
        Ok(t.messages
            .iter()
            .rev()
            .filter(|m| m.user_id == user_id)
            .cloned()
            .collect())
    }
}

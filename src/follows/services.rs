use tracing::{debug, info, instrument};

use crate::error::{ModelError, ModelResult};
use crate::follows::dto::FollowStats;
use crate::storage::Store;
use crate::users::repo_types::User;

impl User {
    /// Adds `other` to this user's following. Returns false if the edge
    /// already existed.
    #[instrument(skip_all, fields(follower = %self.id, followed = %other.id))]
    pub async fn follow(&self, store: &dyn Store, other: &User) -> ModelResult<bool> {
        if self.id == other.id {
            return Err(ModelError::SelfFollow);
        }
        let created = store.insert_follow(self.id, other.id).await?;
        if created {
            info!("follow created");
        } else {
            debug!("follow already present");
        }
        Ok(created)
    }

    /// Removes `other` from this user's following. Returns false if there was
    /// no such edge.
    #[instrument(skip_all, fields(follower = %self.id, followed = %other.id))]
    pub async fn unfollow(&self, store: &dyn Store, other: &User) -> ModelResult<bool> {
        let removed = store.delete_follow(self.id, other.id).await?;
        if removed {
            info!("follow removed");
        }
        Ok(removed)
    }

    /// True iff this user follows `other`.
    pub async fn is_following(&self, store: &dyn Store, other: &User) -> ModelResult<bool> {
        store.follow_exists(self.id, other.id).await
    }

    /// True iff `other` follows this user.
    pub async fn is_followed_by(&self, store: &dyn Store, other: &User) -> ModelResult<bool> {
        store.follow_exists(other.id, self.id).await
    }

    pub async fn following(&self, store: &dyn Store) -> ModelResult<Vec<User>> {
        store.following_of(self.id).await
    }

    pub async fn followers(&self, store: &dyn Store) -> ModelResult<Vec<User>> {
        store.followers_of(self.id).await
    }

    /// Follow counters for this user plus the relation to `viewer`.
    pub async fn follow_stats(&self, store: &dyn Store, viewer: &User) -> ModelResult<FollowStats> {
        let followers = store.followers_of(self.id).await?;
        let following = store.following_of(self.id).await?;
        Ok(FollowStats {
            user: self.clone().into(),
            followers_count: followers.len(),
            following_count: following.len(),
            is_following: followers.iter().any(|u| u.id == viewer.id),
            is_followed_by: following.iter().any(|u| u.id == viewer.id),
        })
    }
}

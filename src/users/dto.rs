use serde::Serialize;
use uuid::Uuid;

use crate::users::repo_types::User;

/// User fields safe to show to other users.
#[derive(Debug, Clone, Serialize)]
pub struct PublicUser {
    pub id: Uuid,
    pub username: String,
    pub image_url: String,
    pub bio: Option<String>,
    pub location: Option<String>,
}

impl From<User> for PublicUser {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            username: u.username,
            image_url: u.image_url,
            bio: u.bio,
            location: u.location,
        }
    }
}

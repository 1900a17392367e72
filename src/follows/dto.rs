use serde::Serialize;

use crate::users::dto::PublicUser;

/// A user's follow counters, as seen by a viewer.
#[derive(Debug, Clone, Serialize)]
pub struct FollowStats {
    pub user: PublicUser,
    pub followers_count: usize,
    pub following_count: usize,
    pub is_following: bool,   // viewer follows user
    pub is_followed_by: bool, // user follows viewer
}

use lazy_static::lazy_static;
use regex::Regex;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::error::{ModelError, ModelResult};
use crate::storage::Store;
use crate::users::password::{hash_password, is_long_enough, verify_password};
use crate::users::repo_types::{NewUser, User};

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

/// Trims and lowercases `email`, rejecting it if it does not look like an address.
fn normalize_email(email: &str) -> ModelResult<String> {
    let email = email.trim().to_lowercase();
    if !is_valid_email(&email) {
        warn!(%email, "invalid email");
        return Err(ModelError::InvalidEmail);
    }
    Ok(email)
}

impl User {
    /// Validates the credentials, hashes the password and persists the user.
    ///
    /// `image_url: None` falls back to the default profile picture.
    #[instrument(skip(store, password))]
    pub async fn signup(
        store: &dyn Store,
        username: &str,
        email: &str,
        password: &str,
        image_url: Option<&str>,
    ) -> ModelResult<User> {
        let username = username.trim();
        if username.is_empty() {
            return Err(ModelError::InvalidUsername);
        }

        let email = normalize_email(email)?;

        if !is_long_enough(password) {
            warn!("password too short");
            return Err(ModelError::PasswordTooShort);
        }

        let hash = hash_password(password)?;
        let mut new = NewUser::new(username, &email, &hash);
        new.image_url = image_url.map(str::to_string);

        let user = store.insert_user(new).await.map_err(|e| {
            warn!(error = %e, "signup rejected");
            e
        })?;
        info!(user_id = %user.id, username = %user.username, "user signed up");
        Ok(user)
    }

    /// Persists a user whose password is already hashed.
    pub async fn create(store: &dyn Store, mut new: NewUser) -> ModelResult<User> {
        new.email = normalize_email(&new.email)?;
        let user = store.insert_user(new).await?;
        info!(user_id = %user.id, username = %user.username, "user created");
        Ok(user)
    }

    /// Returns the user when `username` exists and `password` matches.
    #[instrument(skip(store, password))]
    pub async fn authenticate(
        store: &dyn Store,
        username: &str,
        password: &str,
    ) -> ModelResult<Option<User>> {
        let Some(user) = store.user_by_username(username.trim()).await? else {
            warn!("authenticate unknown username");
            return Ok(None);
        };

        if verify_password(password, &user.password_hash)? {
            Ok(Some(user))
        } else {
            warn!(user_id = %user.id, "authenticate invalid password");
            Ok(None)
        }
    }

    pub async fn find(store: &dyn Store, id: Uuid) -> ModelResult<Option<User>> {
        store.user_by_id(id).await
    }

    pub async fn find_by_username(store: &dyn Store, username: &str) -> ModelResult<Option<User>> {
        store.user_by_username(username).await
    }

    /// Deletes the user together with its follows edges and messages.
    #[instrument(skip(store))]
    pub async fn delete(store: &dyn Store, id: Uuid) -> ModelResult<()> {
        if !store.delete_user(id).await? {
            return Err(ModelError::UserNotFound);
        }
        info!(user_id = %id, "user deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryStore;
    use crate::storage::UserRepo;
    use crate::users::repo_types::DEFAULT_IMAGE_URL;

    #[test]
    fn email_validation() {
        assert!(is_valid_email("test1@test.nil"));
        assert!(!is_valid_email("test1.test.nil"));
        assert!(!is_valid_email("a b@test.nil"));
    }

    #[tokio::test]
    async fn signup_hashes_password_and_applies_defaults() {
        let store = MemoryStore::new();
        let user = User::signup(&store, "user1", " Test1@Test.nil ", "testpw", None)
            .await
            .expect("signup");

        assert_eq!(user.username, "user1");
        assert_eq!(user.email, "test1@test.nil");
        assert_eq!(user.image_url, DEFAULT_IMAGE_URL);
        assert_ne!(user.password_hash, "testpw");
        assert!(user.password_hash.starts_with("$argon2"));
    }

    #[tokio::test]
    async fn signup_keeps_custom_image() {
        let store = MemoryStore::new();
        let user = User::signup(&store, "user1", "test1@test.nil", "testpw", Some("/me.png"))
            .await
            .expect("signup");
        assert_eq!(user.image_url, "/me.png");
    }

    #[tokio::test]
    async fn signup_rejects_duplicate_username() {
        let store = MemoryStore::new();
        User::signup(&store, "user1", "test1@test.nil", "testpw", None)
            .await
            .expect("signup");

        let err = User::signup(&store, "user1", "other@test.nil", "testpw", None)
            .await
            .unwrap_err();
        assert!(matches!(err, ModelError::UsernameTaken));
    }

    #[tokio::test]
    async fn signup_rejects_duplicate_email() {
        let store = MemoryStore::new();
        User::signup(&store, "user1", "test1@test.nil", "testpw", None)
            .await
            .expect("signup");

        let err = User::signup(&store, "user2", "TEST1@test.nil", "testpw", None)
            .await
            .unwrap_err();
        assert!(matches!(err, ModelError::EmailTaken));
    }

    #[tokio::test]
    async fn signup_validates_input() {
        let store = MemoryStore::new();
        let err = User::signup(&store, "  ", "a@b.co", "testpw", None).await.unwrap_err();
        assert!(matches!(err, ModelError::InvalidUsername));

        let err = User::signup(&store, "user1", "nope", "testpw", None).await.unwrap_err();
        assert!(matches!(err, ModelError::InvalidEmail));

        let err = User::signup(&store, "user1", "a@b.co", "short", None).await.unwrap_err();
        assert!(matches!(err, ModelError::PasswordTooShort));

        assert_eq!(store.count_users().await.expect("count"), 0);
    }

    #[tokio::test]
    async fn signup_counts_password_characters() {
        let store = MemoryStore::new();
        let err = User::signup(&store, "u", "u@test.nil", "ééé", None).await.unwrap_err();
        assert!(matches!(err, ModelError::PasswordTooShort));

        User::signup(&store, "u", "u@test.nil", "éééééé", None)
            .await
            .expect("six characters is enough");
    }

    #[tokio::test]
    async fn create_normalizes_email() {
        let store = MemoryStore::new();
        let user = User::create(&store, NewUser::new("b", " Test@Test.COM ", "HASHED_PASSWORD"))
            .await
            .expect("create");
        assert_eq!(user.email, "test@test.com");

        let err = User::create(&store, NewUser::new("c", "not-an-email", "HASHED_PASSWORD"))
            .await
            .unwrap_err();
        assert!(matches!(err, ModelError::InvalidEmail));
    }

    #[tokio::test]
    async fn create_rejects_case_variant_of_taken_email() {
        let store = MemoryStore::new();
        User::signup(&store, "a", "test@test.com", "testpw", None)
            .await
            .expect("signup");

        let err = User::create(&store, NewUser::new("b", "TEST@test.com", "HASHED_PASSWORD"))
            .await
            .unwrap_err();
        assert!(matches!(err, ModelError::EmailTaken));
        assert_eq!(store.count_users().await.expect("count"), 1);
    }

    #[tokio::test]
    async fn authenticate_checks_password() {
        let store = MemoryStore::new();
        let user = User::signup(&store, "user1", "test1@test.nil", "testpw", None)
            .await
            .expect("signup");

        let ok = User::authenticate(&store, "user1", "testpw").await.expect("auth");
        assert_eq!(ok.map(|u| u.id), Some(user.id));

        let bad = User::authenticate(&store, "user1", "wrongpw").await.expect("auth");
        assert!(bad.is_none());

        let unknown = User::authenticate(&store, "nobody", "testpw").await.expect("auth");
        assert!(unknown.is_none());
    }

    #[tokio::test]
    async fn delete_unknown_user_is_not_found() {
        let store = MemoryStore::new();
        let err = User::delete(&store, Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, ModelError::UserNotFound));
    }

    #[test]
    fn password_hash_is_not_serialized() {
        let user = User {
            id: Uuid::new_v4(),
            username: "testuser".into(),
            email: "test@test.com".into(),
            password_hash: "HASHED_PASSWORD".into(),
            image_url: DEFAULT_IMAGE_URL.into(),
            header_image_url: "/h.jpg".into(),
            bio: None,
            location: None,
            created_at: time::OffsetDateTime::now_utc(),
        };
        let json = serde_json::to_string(&user).unwrap();
        assert!(json.contains("testuser"));
        assert!(!json.contains("HASHED_PASSWORD"));
    }
}

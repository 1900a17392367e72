use thiserror::Error;

/// Errors surfaced by the user/follows model.
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("username must not be empty")]
    InvalidUsername,
    #[error("invalid email")]
    InvalidEmail,
    #[error("password too short")]
    PasswordTooShort,
    #[error("username already taken")]
    UsernameTaken,
    #[error("email already registered")]
    EmailTaken,
    #[error("user not found")]
    UserNotFound,
    #[error("a user cannot follow themselves")]
    SelfFollow,
    #[error("message text must be between 1 and 140 characters")]
    InvalidMessage,
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

pub type ModelResult<T> = Result<T, ModelError>;

const USERNAME_KEY: &str = "users_username_key";
const EMAIL_KEY: &str = "users_email_key";
const NO_SELF_FOLLOW: &str = "follows_no_self_follow";

impl ModelError {
    /// Maps constraint violations reported by Postgres onto model errors.
    pub(crate) fn from_db(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            if db_err.is_unique_violation() {
                match db_err.constraint() {
                    Some(USERNAME_KEY) => return ModelError::UsernameTaken,
                    Some(EMAIL_KEY) => return ModelError::EmailTaken,
                    _ => {}
                }
            }
            if db_err.is_foreign_key_violation() {
                return ModelError::UserNotFound;
            }
            if db_err.is_check_violation() && db_err.constraint() == Some(NO_SELF_FOLLOW) {
                return ModelError::SelfFollow;
            }
        }
        ModelError::Database(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_database_errors_pass_through() {
        let err = ModelError::from_db(sqlx::Error::RowNotFound);
        assert!(matches!(err, ModelError::Database(sqlx::Error::RowNotFound)));
    }

    #[test]
    fn messages_are_human_readable() {
        assert_eq!(ModelError::UsernameTaken.to_string(), "username already taken");
        assert_eq!(ModelError::EmailTaken.to_string(), "email already registered");
    }
}

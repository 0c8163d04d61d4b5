//! Authentication error types.

use assistly_shared::{StoreError, UniqueField};
use thiserror::Error;

use super::password::PasswordError;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Email already registered")]
    DuplicateEmail,

    #[error("Username already taken")]
    DuplicateUsername,

    /// Same error for an unknown email and a wrong password
    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Account is disabled")]
    AccountDisabled,

    /// Token absent, malformed, expired or revoked; never distinguished
    #[error("Authentication required")]
    NoToken,

    #[error("User not found")]
    UserNotFound,

    #[error("Registration is currently disabled")]
    SignupDisabled,

    #[error("{0}")]
    Validation(String),

    #[error("Password hashing failed: {0}")]
    Hashing(String),

    #[error("Store error: {0}")]
    Store(StoreError),
}

impl From<StoreError> for AuthError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Conflict(UniqueField::Email) => AuthError::DuplicateEmail,
            StoreError::Conflict(UniqueField::Username) => AuthError::DuplicateUsername,
            other => AuthError::Store(other),
        }
    }
}

impl From<PasswordError> for AuthError {
    fn from(err: PasswordError) -> Self {
        match err {
            PasswordError::Hashing(msg) => AuthError::Hashing(msg),
        }
    }
}

impl AuthError {
    /// Whether this is an infrastructure failure rather than a user-facing outcome
    pub fn is_internal(&self) -> bool {
        matches!(self, AuthError::Hashing(_) | AuthError::Store(_))
    }
}

pub type AuthResult<T> = Result<T, AuthError>;

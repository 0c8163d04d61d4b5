//! Authentication module for Assistly

pub mod config;
pub mod error;
pub mod middleware;
pub mod password;
pub mod service;
pub mod sessions;
pub mod tokens;
pub mod validation;

pub use config::AuthConfig;
pub use error::{AuthError, AuthResult};
pub use middleware::{extract_bearer_token, require_auth, AuthState, AuthUser};
pub use password::{validate_password, PasswordAlgorithm, PasswordError, PasswordHasher};
pub use service::AuthService;
pub use sessions::spawn_session_reaper;
pub use tokens::{hash_token, SessionTokenGenerator};

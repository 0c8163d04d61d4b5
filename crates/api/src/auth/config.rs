//! Authentication configuration.

use time::Duration;

use super::password::PasswordAlgorithm;

/// Configuration for the authentication service.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// Fixed lifetime of a session from issuance (default: 7 days).
    pub session_ttl: Duration,
    /// Algorithm and work factor for new password hashes (default: bcrypt, cost 12).
    pub password_algorithm: PasswordAlgorithm,
    /// When false, `register` is refused.
    pub enable_signup: bool,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            session_ttl: Duration::days(7),
            password_algorithm: PasswordAlgorithm::default(),
            enable_signup: true,
        }
    }
}

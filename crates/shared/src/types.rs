//! Common types used across Assistly

use std::fmt;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

// =============================================================================
// Enums
// =============================================================================

/// Platform role of a user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "VARCHAR", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    User,
    Admin,
}

impl Default for UserRole {
    fn default() -> Self {
        Self::User
    }
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Admin => "admin",
        }
    }

    /// Whether this role may use the admin panel
    pub fn is_admin(&self) -> bool {
        matches!(self, Self::Admin)
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Settings
// =============================================================================

/// Per-user preferences edited from the settings dialog.
///
/// The well-known keys are typed; anything else the UI stores is kept
/// verbatim in `extra` so older backends never drop newer settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSettings {
    /// Preferred assistant model, e.g. `gpt-4o`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auto_save: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dark_mode: Option<bool>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

// =============================================================================
// Core Models
// =============================================================================

/// User record as persisted by the store.
///
/// Carries the password hash, so it must never cross the service boundary.
/// Convert with [`UserPublic::from`] (or `.into()`) before handing it to callers.
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub is_active: bool,
    pub settings: UserSettings,
    pub role: UserRole,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

/// The subset of [`User`] that is safe to return to clients
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPublic {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub settings: UserSettings,
    pub role: UserRole,
    pub is_active: bool,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl From<User> for UserPublic {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            settings: user.settings,
            role: user.role,
            is_active: user.is_active,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

/// Input for creating a user; the password is already hashed
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password_hash: String,
}

/// Session model, keyed by the SHA-256 digest of the bearer token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub token_hash: String,
    pub user_id: Uuid,
    pub expires_at: OffsetDateTime,
    pub created_at: OffsetDateTime,
}

impl Session {
    /// A session stops being valid at `expires_at`, not after it
    pub fn is_expired_at(&self, now: OffsetDateTime) -> bool {
        now >= self.expires_at
    }
}

/// Input for creating a session
#[derive(Debug, Clone)]
pub struct NewSession {
    pub token_hash: String,
    pub user_id: Uuid,
    pub expires_at: OffsetDateTime,
}

// =============================================================================
// API Request/Response Types
// =============================================================================

/// Registration request
#[derive(Clone, Deserialize)]
pub struct RegisterData {
    pub username: String,
    pub email: String,
    pub password: String,
}

impl fmt::Debug for RegisterData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegisterData")
            .field("username", &self.username)
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// Login request
#[derive(Clone, Deserialize)]
pub struct LoginData {
    pub email: String,
    pub password: String,
}

impl fmt::Debug for LoginData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginData")
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// Result of a successful register or login
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthSession {
    pub user: UserPublic,
    pub token: String,
    #[serde(with = "time::serde::rfc3339")]
    pub expires_at: OffsetDateTime,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use time::Duration;

    fn sample_user() -> User {
        let now = OffsetDateTime::now_utc();
        User {
            id: Uuid::new_v4(),
            username: "alice".to_string(),
            email: "a@x.com".to_string(),
            password_hash: "$2b$12$abcdefghijklmnopqrstuuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ".to_string(),
            is_active: true,
            settings: UserSettings::default(),
            role: UserRole::User,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_user_role_default() {
        assert_eq!(UserRole::default(), UserRole::User);
        assert!(!UserRole::User.is_admin());
        assert!(UserRole::Admin.is_admin());
    }

    #[test]
    fn test_user_role_serialization() {
        assert_eq!(serde_json::to_string(&UserRole::Admin).unwrap(), "\"admin\"");
        let role: UserRole = serde_json::from_str("\"user\"").unwrap();
        assert_eq!(role, UserRole::User);
    }

    #[test]
    fn test_public_user_has_no_password_field() {
        let user = sample_user();
        let json = serde_json::to_value(UserPublic::from(user.clone())).unwrap();
        let object = json.as_object().unwrap();

        assert!(!object.contains_key("password"));
        assert!(!object.contains_key("passwordHash"));
        assert!(!object.contains_key("password_hash"));
        assert!(!json.to_string().contains(&user.password_hash));

        for key in [
            "id",
            "username",
            "email",
            "settings",
            "role",
            "isActive",
            "createdAt",
            "updatedAt",
        ] {
            assert!(object.contains_key(key), "missing {key}");
        }
    }

    #[test]
    fn test_public_user_copies_record_fields() {
        let user = sample_user();
        let public: UserPublic = user.clone().into();

        assert_eq!(public.id, user.id);
        assert_eq!(public.username, user.username);
        assert_eq!(public.email, user.email);
        assert_eq!(public.settings, user.settings);
        assert_eq!(public.role, user.role);
        assert_eq!(public.is_active, user.is_active);
        assert_eq!(public.created_at, user.created_at);
        assert_eq!(public.updated_at, user.updated_at);
    }

    #[test]
    fn test_settings_keep_unknown_keys() {
        let raw = serde_json::json!({
            "model": "gpt-4o",
            "autoSave": true,
            "darkMode": false,
            "language": "de"
        });
        let settings: UserSettings = serde_json::from_value(raw.clone()).unwrap();

        assert_eq!(settings.model.as_deref(), Some("gpt-4o"));
        assert_eq!(settings.auto_save, Some(true));
        assert_eq!(settings.dark_mode, Some(false));
        assert_eq!(settings.extra.get("language"), Some(&serde_json::json!("de")));
        assert_eq!(serde_json::to_value(&settings).unwrap(), raw);
    }

    #[test]
    fn test_empty_settings_serialize_to_empty_object() {
        let json = serde_json::to_value(UserSettings::default()).unwrap();
        assert_eq!(json, serde_json::json!({}));
    }

    #[test]
    fn test_session_expiry_boundary() {
        let now = OffsetDateTime::now_utc();
        let session = Session {
            token_hash: "h".repeat(64),
            user_id: Uuid::new_v4(),
            expires_at: now,
            created_at: now - Duration::days(7),
        };

        assert!(session.is_expired_at(now));
        assert!(session.is_expired_at(now + Duration::seconds(1)));
        assert!(!session.is_expired_at(now - Duration::seconds(1)));
    }

    #[test]
    fn test_credentials_debug_redacts_password() {
        let register = RegisterData {
            username: "alice".to_string(),
            email: "a@x.com".to_string(),
            password: "secret123".to_string(),
        };
        let login = LoginData {
            email: "a@x.com".to_string(),
            password: "secret123".to_string(),
        };

        assert!(!format!("{register:?}").contains("secret123"));
        assert!(!format!("{login:?}").contains("secret123"));
        assert!(format!("{login:?}").contains("[REDACTED]"));
    }
}

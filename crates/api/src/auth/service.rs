//! Authentication service: registration, login, logout and per-request
//! token resolution.

use std::sync::Arc;

use assistly_shared::{
    AuthSession, LoginData, NewSession, NewUser, RegisterData, SessionStore, User, UserPublic,
    UserRole, UserSettings, UserStore,
};
use time::OffsetDateTime;
use uuid::Uuid;

use super::config::AuthConfig;
use super::error::{AuthError, AuthResult};
use super::password::{validate_password, PasswordHasher};
use super::tokens::{hash_token, is_well_formed, SessionTokenGenerator};
use super::validation::{is_valid_email, is_valid_username, normalize_email, normalize_username};

/// Authentication service.
///
/// Holds no mutable state of its own; every rule is evaluated against the
/// injected stores, so one instance is shared by all request handlers.
pub struct AuthService {
    users: Arc<dyn UserStore>,
    sessions: Arc<dyn SessionStore>,
    hasher: PasswordHasher,
    tokens: SessionTokenGenerator,
    config: AuthConfig,
    decoy_hash: String,
}

impl AuthService {
    pub fn new(
        users: Arc<dyn UserStore>,
        sessions: Arc<dyn SessionStore>,
        config: AuthConfig,
    ) -> AuthResult<Self> {
        let hasher = PasswordHasher::new(config.password_algorithm);
        let decoy_hash = hasher.impossible_hash()?;

        Ok(Self {
            users,
            sessions,
            hasher,
            tokens: SessionTokenGenerator::new(),
            config,
            decoy_hash,
        })
    }

    pub fn config(&self) -> &AuthConfig {
        &self.config
    }

    /// Create an account and log it in.
    ///
    /// Every check runs before the first write, and the new user is deleted
    /// again if its session cannot be stored. The duplicate lookups are a
    /// fast path only; a concurrent registration that slips past them is
    /// still rejected by the store's unique constraint.
    pub async fn register(&self, data: RegisterData) -> AuthResult<AuthSession> {
        if !self.config.enable_signup {
            return Err(AuthError::SignupDisabled);
        }

        let username = normalize_username(&data.username);
        let email = normalize_email(&data.email);

        if !is_valid_username(&username) {
            return Err(AuthError::Validation(
                "Username must be 3-32 characters of letters, digits, '_', '.' or '-'".to_string(),
            ));
        }
        if !is_valid_email(&email) {
            return Err(AuthError::Validation("Invalid email format".to_string()));
        }
        validate_password(&data.password).map_err(|e| AuthError::Validation(e.to_string()))?;

        if self.users.find_user_by_email(&email).await?.is_some() {
            tracing::info!("register: email already registered");
            return Err(AuthError::DuplicateEmail);
        }
        if self.users.find_user_by_username(&username).await?.is_some() {
            tracing::info!(username = %username, "register: username already taken");
            return Err(AuthError::DuplicateUsername);
        }

        let password_hash = self.hasher.hash_blocking(data.password).await?;

        let user = self
            .users
            .create_user(NewUser {
                username,
                email,
                password_hash,
            })
            .await
            .map_err(|e| {
                let err = AuthError::from(e);
                if !err.is_internal() {
                    tracing::info!(error = %err, "register: lost uniqueness race");
                }
                err
            })?;

        tracing::info!(user_id = %user.id, username = %user.username, "register: user created");

        let user_id = user.id;
        match self.issue_session(user).await {
            Ok(session) => Ok(session),
            Err(err) => {
                // Undo the user insert; sessions cascade with it.
                match self.users.delete_user(user_id).await {
                    Ok(_) => tracing::warn!(
                        user_id = %user_id,
                        error = %err,
                        "register: session creation failed, user removed"
                    ),
                    Err(cleanup) => tracing::error!(
                        user_id = %user_id,
                        error = %err,
                        cleanup_error = %cleanup,
                        "register: session creation failed and user could not be removed"
                    ),
                }
                Err(err)
            }
        }
    }

    /// Authenticate with email and password and open a new session.
    ///
    /// Earlier sessions of the same user stay valid.
    pub async fn login(&self, data: LoginData) -> AuthResult<AuthSession> {
        let email = normalize_email(&data.email);

        let Some(user) = self.users.find_user_by_email(&email).await? else {
            // Pay the same hashing cost as a real account before answering
            self.hasher
                .verify_blocking(data.password, self.decoy_hash.clone())
                .await?;
            tracing::warn!("login: unknown email");
            return Err(AuthError::InvalidCredentials);
        };

        if !user.is_active {
            tracing::warn!(user_id = %user.id, "login: account disabled");
            return Err(AuthError::AccountDisabled);
        }

        let valid = self
            .hasher
            .verify_blocking(data.password, user.password_hash.clone())
            .await?;

        if !valid {
            tracing::warn!(user_id = %user.id, "login: invalid password");
            return Err(AuthError::InvalidCredentials);
        }

        tracing::info!(user_id = %user.id, "login: password verified");

        self.issue_session(user).await
    }

    /// Revoke the session behind `token`. Unknown tokens are not an error.
    pub async fn logout(&self, token: &str) -> AuthResult<()> {
        if !is_well_formed(token) {
            return Ok(());
        }

        let removed = self.sessions.delete_session(&hash_token(token)).await?;
        tracing::debug!(removed, "logout: session deleted");

        Ok(())
    }

    /// Resolve a bearer token to the user it was issued for.
    ///
    /// `None` covers every reason a token is unusable: malformed, unknown,
    /// expired, or belonging to a missing or disabled user. Nothing is
    /// written; expiry is fixed at issuance and never extended here.
    pub async fn resolve(&self, token: &str) -> AuthResult<Option<UserPublic>> {
        if !is_well_formed(token) {
            return Ok(None);
        }

        let Some(session) = self.sessions.find_session(&hash_token(token)).await? else {
            return Ok(None);
        };

        if session.is_expired_at(OffsetDateTime::now_utc()) {
            tracing::debug!(user_id = %session.user_id, "resolve: session expired");
            return Ok(None);
        }

        match self.users.find_user_by_id(session.user_id).await? {
            Some(user) if user.is_active => Ok(Some(user.into())),
            Some(_) => {
                tracing::debug!(user_id = %session.user_id, "resolve: user disabled");
                Ok(None)
            }
            None => {
                tracing::debug!(user_id = %session.user_id, "resolve: user missing");
                Ok(None)
            }
        }
    }

    /// [`resolve`](Self::resolve) for protected calls: an absent or unusable
    /// token is `NoToken`.
    pub async fn authenticate(&self, token: Option<&str>) -> AuthResult<UserPublic> {
        let token = token.ok_or(AuthError::NoToken)?;
        self.resolve(token).await?.ok_or(AuthError::NoToken)
    }

    /// Revoke every session of a user, returning how many were removed
    pub async fn logout_all(&self, user_id: Uuid) -> AuthResult<u64> {
        let revoked = self.sessions.delete_user_sessions(user_id).await?;
        tracing::info!(user_id = %user_id, revoked, "logout_all: sessions revoked");
        Ok(revoked)
    }

    pub async fn update_settings(
        &self,
        user_id: Uuid,
        settings: UserSettings,
    ) -> AuthResult<UserPublic> {
        let user = self
            .users
            .update_user_settings(user_id, settings)
            .await?
            .ok_or(AuthError::UserNotFound)?;
        Ok(user.into())
    }

    /// Enable or disable an account.
    ///
    /// Disabling takes effect on the next resolution of any of the user's
    /// tokens; the sessions themselves are left in place.
    pub async fn set_user_active(&self, user_id: Uuid, is_active: bool) -> AuthResult<UserPublic> {
        let user = self
            .users
            .set_user_active(user_id, is_active)
            .await?
            .ok_or(AuthError::UserNotFound)?;
        tracing::info!(user_id = %user_id, is_active, "set_user_active: account updated");
        Ok(user.into())
    }

    pub async fn set_user_role(&self, user_id: Uuid, role: UserRole) -> AuthResult<UserPublic> {
        let user = self
            .users
            .set_user_role(user_id, role)
            .await?
            .ok_or(AuthError::UserNotFound)?;
        tracing::info!(user_id = %user_id, role = %role, "set_user_role: role updated");
        Ok(user.into())
    }

    /// Delete expired sessions. Storage hygiene only; resolution already
    /// rejects them.
    pub async fn reap_expired_sessions(&self) -> AuthResult<u64> {
        let deleted = self
            .sessions
            .delete_expired_sessions(OffsetDateTime::now_utc())
            .await?;
        if deleted > 0 {
            tracing::info!(count = deleted, "Cleaned up expired sessions");
        }
        Ok(deleted)
    }

    /// Readiness of the backing store
    pub async fn ping(&self) -> AuthResult<()> {
        self.users.ping().await?;
        Ok(())
    }

    async fn issue_session(&self, user: User) -> AuthResult<AuthSession> {
        let token = self.tokens.generate();
        let expires_at = OffsetDateTime::now_utc() + self.config.session_ttl;

        self.sessions
            .create_session(NewSession {
                token_hash: hash_token(&token),
                user_id: user.id,
                expires_at,
            })
            .await?;

        tracing::info!(user_id = %user.id, expires_at = %expires_at, "Session created");

        Ok(AuthSession {
            user: user.into(),
            token,
            expires_at,
        })
    }
}

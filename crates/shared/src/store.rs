//! Storage capabilities required by the auth service.
//!
//! Both traits are object safe so the service can hold them as
//! `Arc<dyn ...>` and tests can swap in [`crate::MemoryStore`].
//! Implementations own the uniqueness guarantees: a `create_user` that
//! collides on email or username must fail with
//! [`StoreError::Conflict`](crate::StoreError::Conflict) even when the
//! caller has already checked.

use async_trait::async_trait;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::error::StoreResult;
use crate::types::{NewSession, NewUser, Session, User, UserRole, UserSettings};

#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_user_by_id(&self, id: Uuid) -> StoreResult<Option<User>>;

    /// `email` is matched exactly; callers normalise before lookup.
    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>>;

    async fn find_user_by_username(&self, username: &str) -> StoreResult<Option<User>>;

    /// Insert a new active user with default settings and the `user` role.
    async fn create_user(&self, input: NewUser) -> StoreResult<User>;

    /// Remove the user along with every session they own. Returns whether
    /// a user was removed.
    async fn delete_user(&self, id: Uuid) -> StoreResult<bool>;

    /// Returns `None` when no user has this id.
    async fn set_user_active(&self, id: Uuid, is_active: bool) -> StoreResult<Option<User>>;

    async fn set_user_role(&self, id: Uuid, role: UserRole) -> StoreResult<Option<User>>;

    async fn update_user_settings(
        &self,
        id: Uuid,
        settings: UserSettings,
    ) -> StoreResult<Option<User>>;

    /// Cheap connectivity check for readiness probes.
    async fn ping(&self) -> StoreResult<()> {
        Ok(())
    }
}

#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn create_session(&self, input: NewSession) -> StoreResult<Session>;

    async fn find_session(&self, token_hash: &str) -> StoreResult<Option<Session>>;

    /// Returns whether a row was removed.
    async fn delete_session(&self, token_hash: &str) -> StoreResult<bool>;

    async fn delete_user_sessions(&self, user_id: Uuid) -> StoreResult<u64>;

    /// Remove sessions with `expires_at <= now`.
    async fn delete_expired_sessions(&self, now: OffsetDateTime) -> StoreResult<u64>;
}

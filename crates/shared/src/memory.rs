//! In-process store used for local development and tests.
//!
//! All indexes live behind a single lock so the uniqueness check and the
//! insert in `create_user` are one atomic step.

use std::collections::HashMap;

use async_trait::async_trait;
use time::OffsetDateTime;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::{StoreError, StoreResult, UniqueField};
use crate::store::{SessionStore, UserStore};
use crate::types::{NewSession, NewUser, Session, User, UserRole, UserSettings};

#[derive(Default)]
struct Tables {
    users: HashMap<Uuid, User>,
    by_email: HashMap<String, Uuid>,
    by_username: HashMap<String, Uuid>,
    sessions: HashMap<String, Session>,
}

#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn user_count(&self) -> usize {
        self.tables.read().await.users.len()
    }

    pub async fn session_count(&self) -> usize {
        self.tables.read().await.sessions.len()
    }

    async fn update_user<F>(&self, id: Uuid, apply: F) -> StoreResult<Option<User>>
    where
        F: FnOnce(&mut User) + Send,
    {
        let mut tables = self.tables.write().await;
        Ok(tables.users.get_mut(&id).map(|user| {
            apply(user);
            user.updated_at = OffsetDateTime::now_utc();
            user.clone()
        }))
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn find_user_by_id(&self, id: Uuid) -> StoreResult<Option<User>> {
        Ok(self.tables.read().await.users.get(&id).cloned())
    }

    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        let tables = self.tables.read().await;
        Ok(tables
            .by_email
            .get(email)
            .and_then(|id| tables.users.get(id))
            .cloned())
    }

    async fn find_user_by_username(&self, username: &str) -> StoreResult<Option<User>> {
        let tables = self.tables.read().await;
        Ok(tables
            .by_username
            .get(username)
            .and_then(|id| tables.users.get(id))
            .cloned())
    }

    async fn create_user(&self, input: NewUser) -> StoreResult<User> {
        let mut tables = self.tables.write().await;

        if tables.by_email.contains_key(&input.email) {
            return Err(StoreError::Conflict(UniqueField::Email));
        }
        if tables.by_username.contains_key(&input.username) {
            return Err(StoreError::Conflict(UniqueField::Username));
        }

        let now = OffsetDateTime::now_utc();
        let user = User {
            id: Uuid::new_v4(),
            username: input.username,
            email: input.email,
            password_hash: input.password_hash,
            is_active: true,
            settings: UserSettings::default(),
            role: UserRole::User,
            created_at: now,
            updated_at: now,
        };

        tables.by_email.insert(user.email.clone(), user.id);
        tables.by_username.insert(user.username.clone(), user.id);
        tables.users.insert(user.id, user.clone());

        Ok(user)
    }

    async fn delete_user(&self, id: Uuid) -> StoreResult<bool> {
        let mut tables = self.tables.write().await;
        let Some(user) = tables.users.remove(&id) else {
            return Ok(false);
        };

        tables.by_email.remove(&user.email);
        tables.by_username.remove(&user.username);
        tables.sessions.retain(|_, s| s.user_id != id);

        Ok(true)
    }

    async fn set_user_active(&self, id: Uuid, is_active: bool) -> StoreResult<Option<User>> {
        self.update_user(id, |user| user.is_active = is_active).await
    }

    async fn set_user_role(&self, id: Uuid, role: UserRole) -> StoreResult<Option<User>> {
        self.update_user(id, |user| user.role = role).await
    }

    async fn update_user_settings(
        &self,
        id: Uuid,
        settings: UserSettings,
    ) -> StoreResult<Option<User>> {
        self.update_user(id, |user| user.settings = settings).await
    }
}

#[async_trait]
impl SessionStore for MemoryStore {
    async fn create_session(&self, input: NewSession) -> StoreResult<Session> {
        let mut tables = self.tables.write().await;

        if tables.sessions.contains_key(&input.token_hash) {
            return Err(StoreError::Conflict(UniqueField::SessionToken));
        }

        let session = Session {
            token_hash: input.token_hash,
            user_id: input.user_id,
            expires_at: input.expires_at,
            created_at: OffsetDateTime::now_utc(),
        };
        tables
            .sessions
            .insert(session.token_hash.clone(), session.clone());

        Ok(session)
    }

    async fn find_session(&self, token_hash: &str) -> StoreResult<Option<Session>> {
        Ok(self.tables.read().await.sessions.get(token_hash).cloned())
    }

    async fn delete_session(&self, token_hash: &str) -> StoreResult<bool> {
        Ok(self
            .tables
            .write()
            .await
            .sessions
            .remove(token_hash)
            .is_some())
    }

    async fn delete_user_sessions(&self, user_id: Uuid) -> StoreResult<u64> {
        let mut tables = self.tables.write().await;
        let before = tables.sessions.len();
        tables.sessions.retain(|_, s| s.user_id != user_id);
        Ok((before - tables.sessions.len()) as u64)
    }

    async fn delete_expired_sessions(&self, now: OffsetDateTime) -> StoreResult<u64> {
        let mut tables = self.tables.write().await;
        let before = tables.sessions.len();
        tables.sessions.retain(|_, s| !s.is_expired_at(now));
        Ok((before - tables.sessions.len()) as u64)
    }
}

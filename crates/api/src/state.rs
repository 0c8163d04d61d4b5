//! Shared application state

use std::sync::Arc;

use crate::auth::{AuthService, AuthState};
use crate::config::Config;

/// State shared by every handler
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub auth: Arc<AuthService>,
}

impl AppState {
    pub fn new(config: Config, auth: Arc<AuthService>) -> Self {
        Self {
            config: Arc::new(config),
            auth,
        }
    }

    /// State for the auth middleware
    pub fn auth_state(&self) -> AuthState {
        AuthState {
            auth: self.auth.clone(),
        }
    }
}

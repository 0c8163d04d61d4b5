//! Assistly API Library
//!
//! This crate contains the authentication service and the HTTP server
//! components for Assistly.

pub mod auth;
pub mod config;
pub mod error;
pub mod routes;
pub mod security;
pub mod state;

pub use config::Config;
pub use error::{ApiError, ApiResult};
pub use routes::create_router;
pub use state::AppState;

//! Assistly Shared Types and Utilities
//!
//! This crate contains the user/session data model, the storage traits the
//! auth service depends on, and the in-memory and PostgreSQL stores.

pub mod db;
pub mod error;
pub mod memory;
pub mod pg;
pub mod store;
pub mod types;

pub use db::*;
pub use error::*;
pub use memory::MemoryStore;
pub use pg::PgStore;
pub use store::{SessionStore, UserStore};
pub use types::*;

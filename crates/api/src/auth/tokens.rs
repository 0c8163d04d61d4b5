//! Opaque session tokens
//!
//! The raw token is handed to the client once and never stored; the session
//! table is keyed by its SHA-256 digest.

use rand::{rngs::OsRng, RngCore};
use sha2::{Digest, Sha256};

/// Random bytes per token (256 bits)
pub const TOKEN_BYTES: usize = 32;

/// Length of the hex-encoded token
pub const TOKEN_LENGTH: usize = TOKEN_BYTES * 2;

#[derive(Debug, Clone, Copy, Default)]
pub struct SessionTokenGenerator;

impl SessionTokenGenerator {
    pub fn new() -> Self {
        Self
    }

    /// Generate a secure random token
    ///
    /// Returns a 32-byte hex-encoded token (64 characters)
    pub fn generate(&self) -> String {
        let mut bytes = [0u8; TOKEN_BYTES];
        OsRng.fill_bytes(&mut bytes);
        hex::encode(bytes)
    }
}

/// Hash a token using SHA-256
pub fn hash_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    hex::encode(hasher.finalize())
}

/// Whether `token` could have come from [`SessionTokenGenerator::generate`]
pub fn is_well_formed(token: &str) -> bool {
    token.len() == TOKEN_LENGTH && token.bytes().all(|b| b.is_ascii_hexdigit())
}

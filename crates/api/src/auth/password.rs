//! Password hashing with bcrypt (default) or Argon2id

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher as _, PasswordVerifier, SaltString},
    Algorithm, Argon2, Params, Version,
};

/// bcrypt work factor used when nothing else is configured
pub const DEFAULT_BCRYPT_COST: u32 = 12;

/// OWASP baseline for Argon2id: 19 MiB, 2 passes
pub const DEFAULT_ARGON2_MEMORY_KIB: u32 = 19_456;
pub const DEFAULT_ARGON2_ITERATIONS: u32 = 2;

pub const MIN_PASSWORD_LENGTH: usize = 8;

/// bcrypt only reads the first 72 bytes of its input
pub const MAX_PASSWORD_BYTES: usize = 72;

/// Algorithm and work factor for newly created hashes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PasswordAlgorithm {
    Bcrypt { cost: u32 },
    Argon2id { memory_kib: u32, iterations: u32 },
}

impl Default for PasswordAlgorithm {
    fn default() -> Self {
        Self::Bcrypt {
            cost: DEFAULT_BCRYPT_COST,
        }
    }
}

/// Format of a stored hash, detected from its prefix
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum HashFormat {
    Bcrypt,
    Argon2,
}

impl HashFormat {
    fn detect(hash: &str) -> Option<Self> {
        if hash.starts_with("$2a$") || hash.starts_with("$2b$") || hash.starts_with("$2y$") {
            Some(Self::Bcrypt)
        } else if hash.starts_with("$argon2") {
            Some(Self::Argon2)
        } else {
            None
        }
    }
}

/// Salted, adaptive-cost password hashing.
///
/// New hashes use the configured algorithm. Verification follows whatever
/// algorithm and parameters are embedded in the stored hash, so changing the
/// configuration never locks out existing accounts.
#[derive(Debug, Clone, Copy, Default)]
pub struct PasswordHasher {
    algorithm: PasswordAlgorithm,
}

impl PasswordHasher {
    pub fn new(algorithm: PasswordAlgorithm) -> Self {
        Self { algorithm }
    }

    pub fn algorithm(&self) -> PasswordAlgorithm {
        self.algorithm
    }

    /// Hash a password with a fresh random salt
    pub fn hash(&self, password: &str) -> Result<String, PasswordError> {
        match self.algorithm {
            PasswordAlgorithm::Bcrypt { cost } => bcrypt::hash(password, cost)
                .map_err(|e| PasswordError::Hashing(e.to_string())),
            PasswordAlgorithm::Argon2id {
                memory_kib,
                iterations,
            } => {
                let params = Params::new(memory_kib, iterations, 1, None)
                    .map_err(|e| PasswordError::Hashing(e.to_string()))?;
                let salt = SaltString::generate(&mut OsRng);

                Argon2::new(Algorithm::Argon2id, Version::V0x13, params)
                    .hash_password(password.as_bytes(), &salt)
                    .map(|hash| hash.to_string())
                    .map_err(|e| PasswordError::Hashing(e.to_string()))
            }
        }
    }

    /// Verify a password against a stored hash.
    ///
    /// Returns `false` for a mismatch and for any hash it cannot parse.
    pub fn verify(&self, password: &str, stored_hash: &str) -> bool {
        match HashFormat::detect(stored_hash) {
            Some(HashFormat::Bcrypt) => bcrypt::verify(password, stored_hash).unwrap_or(false),
            Some(HashFormat::Argon2) => PasswordHash::new(stored_hash)
                .map(|parsed| {
                    Argon2::default()
                        .verify_password(password.as_bytes(), &parsed)
                        .is_ok()
                })
                .unwrap_or(false),
            None => false,
        }
    }

    /// Run [`hash`](Self::hash) on the blocking pool
    pub async fn hash_blocking(&self, password: String) -> Result<String, PasswordError> {
        let hasher = *self;
        tokio::task::spawn_blocking(move || hasher.hash(&password))
            .await
            .map_err(|e| PasswordError::Hashing(format!("Task join error: {e}")))?
    }

    /// Run [`verify`](Self::verify) on the blocking pool
    pub async fn verify_blocking(
        &self,
        password: String,
        stored_hash: String,
    ) -> Result<bool, PasswordError> {
        let hasher = *self;
        tokio::task::spawn_blocking(move || hasher.verify(&password, &stored_hash))
            .await
            .map_err(|e| PasswordError::Hashing(format!("Task join error: {e}")))
    }

    /// Hash of 64 random bytes nobody knows the preimage of.
    ///
    /// Used as a decoy so a login for an unknown email costs the same as
    /// one with a wrong password.
    pub fn impossible_hash(&self) -> Result<String, PasswordError> {
        use argon2::password_hash::rand_core::RngCore;

        let mut random_bytes = [0u8; 64];
        OsRng.fill_bytes(&mut random_bytes);

        // bcrypt reads 72 bytes at most; 72 hex chars keep the full input meaningful
        let random_password = hex::encode(random_bytes);
        self.hash(&random_password[..MAX_PASSWORD_BYTES])
    }
}

/// Enforce the password length policy
pub fn validate_password(password: &str) -> Result<(), PasswordValidationError> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(PasswordValidationError::TooShort);
    }

    if password.len() > MAX_PASSWORD_BYTES {
        return Err(PasswordValidationError::TooLong);
    }

    Ok(())
}

#[derive(Debug, thiserror::Error)]
pub enum PasswordError {
    #[error("Password hashing failed: {0}")]
    Hashing(String),
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum PasswordValidationError {
    #[error("Password must be at least 8 characters")]
    TooShort,
    #[error("Password must be at most 72 bytes")]
    TooLong,
}

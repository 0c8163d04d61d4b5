//! Application configuration

use std::env;
use std::str::FromStr;

use crate::auth::{
    password::{DEFAULT_ARGON2_ITERATIONS, DEFAULT_ARGON2_MEMORY_KIB, DEFAULT_BCRYPT_COST},
    AuthConfig, PasswordAlgorithm,
};

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    // Server
    pub bind_address: String,
    pub cors_allowed_origins: Vec<String>,

    // Database
    pub database_url: Option<String>,
    pub database_max_connections: u32,

    // Authentication
    pub session_ttl_hours: i64,
    pub password_algorithm: PasswordAlgorithm,
    pub login_min_response_ms: u64,
    pub session_reap_interval_secs: u64,

    // Feature flags
    pub enable_signup: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:3000".to_string(),
            cors_allowed_origins: vec!["http://localhost:5173".to_string()],
            database_url: None,
            database_max_connections: 20,
            session_ttl_hours: 168,
            password_algorithm: PasswordAlgorithm::default(),
            login_min_response_ms: 500,
            session_reap_interval_secs: 3600,
            enable_signup: true,
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        let session_ttl_hours: i64 = parse_var("SESSION_TTL_HOURS", 168)?;
        if session_ttl_hours <= 0 {
            return Err(ConfigError::Invalid(
                "SESSION_TTL_HOURS",
                "must be a positive number of hours".to_string(),
            ));
        }

        Ok(Self {
            // Server
            bind_address: env::var("BIND_ADDRESS").unwrap_or_else(|_| "0.0.0.0:3000".to_string()),
            cors_allowed_origins: env::var("CORS_ALLOWED_ORIGINS")
                .unwrap_or_else(|_| "http://localhost:5173".to_string())
                .split(',')
                .map(str::trim)
                .filter(|origin| !origin.is_empty())
                .map(str::to_string)
                .collect(),

            // Database
            database_url: env::var("DATABASE_URL").ok().filter(|url| !url.is_empty()),
            database_max_connections: parse_var("DATABASE_MAX_CONNECTIONS", 20)?,

            // Authentication
            session_ttl_hours,
            password_algorithm: password_algorithm_from_env()?,
            login_min_response_ms: parse_var("LOGIN_MIN_RESPONSE_MS", 500)?,
            session_reap_interval_secs: parse_var("SESSION_REAP_INTERVAL_SECS", 3600)?,

            // Feature flags
            enable_signup: parse_var("ENABLE_SIGNUP", true)?,
        })
    }

    /// Settings handed to [`AuthService`](crate::auth::AuthService)
    pub fn auth_config(&self) -> AuthConfig {
        AuthConfig {
            session_ttl: time::Duration::hours(self.session_ttl_hours),
            password_algorithm: self.password_algorithm,
            enable_signup: self.enable_signup,
        }
    }
}

fn parse_var<T: FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid(name, format!("cannot parse '{}'", raw))),
        Err(_) => Ok(default),
    }
}

fn password_algorithm_from_env() -> Result<PasswordAlgorithm, ConfigError> {
    let name = env::var("PASSWORD_ALGORITHM").unwrap_or_else(|_| "bcrypt".to_string());

    match name.trim().to_ascii_lowercase().as_str() {
        "bcrypt" => {
            let cost: u32 = parse_var("PASSWORD_HASH_COST", DEFAULT_BCRYPT_COST)?;
            if !(4..=31).contains(&cost) {
                return Err(ConfigError::Invalid(
                    "PASSWORD_HASH_COST",
                    "bcrypt cost must be between 4 and 31".to_string(),
                ));
            }
            Ok(PasswordAlgorithm::Bcrypt { cost })
        }
        "argon2id" | "argon2" => {
            let memory_kib: u32 = parse_var("ARGON2_MEMORY_KIB", DEFAULT_ARGON2_MEMORY_KIB)?;
            let iterations: u32 = parse_var("ARGON2_ITERATIONS", DEFAULT_ARGON2_ITERATIONS)?;
            if iterations == 0 || memory_kib < 8 {
                return Err(ConfigError::Invalid(
                    "ARGON2_MEMORY_KIB",
                    "Argon2id needs at least 8 KiB and one iteration".to_string(),
                ));
            }
            Ok(PasswordAlgorithm::Argon2id {
                memory_kib,
                iterations,
            })
        }
        other => Err(ConfigError::Invalid(
            "PASSWORD_ALGORITHM",
            format!("unknown algorithm '{}', expected bcrypt or argon2id", other),
        )),
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}: {1}")]
    Invalid(&'static str, String),
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serial_test::serial;

    const VARS: &[&str] = &[
        "BIND_ADDRESS",
        "CORS_ALLOWED_ORIGINS",
        "DATABASE_URL",
        "DATABASE_MAX_CONNECTIONS",
        "SESSION_TTL_HOURS",
        "PASSWORD_ALGORITHM",
        "PASSWORD_HASH_COST",
        "ARGON2_MEMORY_KIB",
        "ARGON2_ITERATIONS",
        "LOGIN_MIN_RESPONSE_MS",
        "SESSION_REAP_INTERVAL_SECS",
        "ENABLE_SIGNUP",
    ];

    fn clear_env() {
        for var in VARS {
            env::remove_var(var);
        }
    }

    #[test]
    #[serial]
    fn test_defaults() {
        clear_env();

        let config = Config::from_env().unwrap();
        assert_eq!(config.bind_address, "0.0.0.0:3000");
        assert_eq!(config.database_url, None);
        assert_eq!(config.session_ttl_hours, 168);
        assert_eq!(
            config.password_algorithm,
            PasswordAlgorithm::Bcrypt { cost: 12 }
        );
        assert!(config.enable_signup);
        assert_eq!(config.cors_allowed_origins, vec!["http://localhost:5173"]);

        let auth = config.auth_config();
        assert_eq!(auth.session_ttl, time::Duration::days(7));
    }

    #[test]
    #[serial]
    fn test_overrides() {
        clear_env();
        env::set_var("SESSION_TTL_HOURS", "1");
        env::set_var("PASSWORD_ALGORITHM", "argon2id");
        env::set_var("ARGON2_MEMORY_KIB", "8192");
        env::set_var("ENABLE_SIGNUP", "false");
        env::set_var("CORS_ALLOWED_ORIGINS", "https://a.example, https://b.example,");
        env::set_var("DATABASE_URL", "");

        let config = Config::from_env().unwrap();
        assert_eq!(config.session_ttl_hours, 1);
        assert_eq!(
            config.password_algorithm,
            PasswordAlgorithm::Argon2id {
                memory_kib: 8192,
                iterations: 2
            }
        );
        assert!(!config.enable_signup);
        assert_eq!(
            config.cors_allowed_origins,
            vec!["https://a.example", "https://b.example"]
        );
        assert_eq!(config.database_url, None);

        clear_env();
    }

    #[test]
    #[serial]
    fn test_invalid_values_are_rejected() {
        clear_env();

        env::set_var("PASSWORD_HASH_COST", "3");
        assert!(matches!(
            Config::from_env(),
            Err(ConfigError::Invalid("PASSWORD_HASH_COST", _))
        ));

        env::set_var("PASSWORD_HASH_COST", "32");
        assert!(Config::from_env().is_err());
        env::remove_var("PASSWORD_HASH_COST");

        env::set_var("PASSWORD_ALGORITHM", "md5");
        assert!(matches!(
            Config::from_env(),
            Err(ConfigError::Invalid("PASSWORD_ALGORITHM", _))
        ));
        env::remove_var("PASSWORD_ALGORITHM");

        env::set_var("SESSION_TTL_HOURS", "0");
        assert!(matches!(
            Config::from_env(),
            Err(ConfigError::Invalid("SESSION_TTL_HOURS", _))
        ));

        env::set_var("SESSION_TTL_HOURS", "soon");
        assert!(Config::from_env().is_err());

        clear_env();
    }
}

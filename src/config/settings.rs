//! Application settings loaded from the environment.

use std::env;

use super::constants::{
    DEFAULT_ACTIVATION_BASE_URL, DEFAULT_DATABASE_URL, DEFAULT_JWT_EXPIRATION_HOURS,
    MIN_JWT_SECRET_LENGTH,
};

/// Runtime configuration.
///
/// The bind address lives on the serve subcommand; everything the core
/// consumes is here. The token secret stays private to this struct and
/// is only handed out as bytes.
#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    jwt_secret: String,
    pub jwt_expiration_hours: i64,
    /// Base URL activation links are built against
    pub activation_base_url: String,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("database_url", &"[REDACTED]")
            .field("jwt_secret", &"[REDACTED]")
            .field("jwt_expiration_hours", &self.jwt_expiration_hours)
            .field("activation_base_url", &self.activation_base_url)
            .finish()
    }
}

impl Config {
    /// Load configuration from environment variables (a `.env` file is
    /// honored when present).
    ///
    /// # Panics
    /// Panics when `JWT_SECRET` is missing in a release build or shorter
    /// than the required minimum.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        Self {
            database_url: env_or("DATABASE_URL", DEFAULT_DATABASE_URL),
            jwt_secret: load_jwt_secret(),
            jwt_expiration_hours: env::var("JWT_EXPIRATION_HOURS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_JWT_EXPIRATION_HOURS),
            activation_base_url: env_or("ACTIVATION_BASE_URL", DEFAULT_ACTIVATION_BASE_URL),
        }
    }

    /// JWT secret bytes for token signing and verification.
    pub fn jwt_secret_bytes(&self) -> &[u8] {
        self.jwt_secret.as_bytes()
    }
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn load_jwt_secret() -> String {
    let secret = env::var("JWT_SECRET").unwrap_or_else(|_| {
        if cfg!(debug_assertions) {
            tracing::warn!("JWT_SECRET not set, using insecure default for development");
            "dev-secret-key-minimum-32-chars!!".to_string()
        } else {
            panic!("JWT_SECRET environment variable must be set in production");
        }
    });

    if secret.len() < MIN_JWT_SECRET_LENGTH {
        panic!(
            "JWT_SECRET must be at least {} characters long",
            MIN_JWT_SECRET_LENGTH
        );
    }

    secret
}

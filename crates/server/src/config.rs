//! Server configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All variables are optional; the server runs with an in-memory store and
//! no Stripe integration when nothing is configured.
//!
//! - `GROWTHPRO_HOST` - Bind address (default: 127.0.0.1)
//! - `GROWTHPRO_PORT` - Listen port (default: 5000)
//! - `DATABASE_URL` - `PostgreSQL` connection string; absence selects the
//!   in-memory entity store
//! - `STRIPE_SECRET_KEY` - Stripe API secret key; absence degrades
//!   payment-intent creation to a hard failure
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment tag (e.g., production)

use std::net::{IpAddr, SocketAddr};

use secrecy::SecretString;
use thiserror::Error;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Funnel API server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// `PostgreSQL` connection URL (contains password); selects the
    /// persistent store when present
    pub database_url: Option<SecretString>,
    /// Stripe API secret key
    pub stripe_secret_key: Option<SecretString>,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment tag
    pub sentry_environment: Option<String>,
}

impl ServerConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is present but unparseable.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let host = get_env_or_default("GROWTHPRO_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar("GROWTHPRO_HOST".to_string(), e.to_string()))?;
        let port = get_env_or_default("GROWTHPRO_PORT", "5000")
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar("GROWTHPRO_PORT".to_string(), e.to_string()))?;

        Ok(Self {
            host,
            port,
            database_url: get_optional_secret("DATABASE_URL"),
            stripe_secret_key: get_optional_secret("STRIPE_SECRET_KEY"),
            sentry_dsn: get_optional_env("SENTRY_DSN"),
            sentry_environment: get_optional_env("SENTRY_ENVIRONMENT"),
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Get an optional environment variable as a secret.
fn get_optional_secret(key: &str) -> Option<SecretString> {
    std::env::var(key).ok().map(SecretString::from)
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn test_config() -> ServerConfig {
        ServerConfig {
            host: "127.0.0.1".parse().unwrap(),
            port: 5000,
            database_url: None,
            stripe_secret_key: None,
            sentry_dsn: None,
            sentry_environment: None,
        }
    }

    #[test]
    fn test_socket_addr() {
        let config = test_config();
        let addr = config.socket_addr();
        assert_eq!(addr.ip().to_string(), "127.0.0.1");
        assert_eq!(addr.port(), 5000);
    }

    #[test]
    fn test_get_env_or_default_falls_back() {
        // A variable this name is never set in the test environment
        let value = get_env_or_default("GROWTHPRO_TEST_UNSET_VAR", "fallback");
        assert_eq!(value, "fallback");
    }

    #[test]
    fn test_get_optional_env_absent() {
        assert!(get_optional_env("GROWTHPRO_TEST_UNSET_VAR").is_none());
    }
}

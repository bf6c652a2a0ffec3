//! services/api/src/config.rs
//!
//! Defines the application's configuration structure and loading logic.
//!
//! All configuration is loaded from environment variables at startup. The
//! `.env` file is used for local development.

use std::net::SocketAddr;
use std::time::Duration;
use tracing::Level;

/// A custom error type for configuration loading failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing the environment variable {0}")]
    MissingVar(String),
    #[error("Invalid value for the environment variable {0}: {1}")]
    InvalidValue(String, String),
}

/// SMTP transport settings for the outbound mailer.
#[derive(Clone, Debug)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    /// `true` selects implicit TLS (port 465 style); otherwise STARTTLS.
    pub secure: bool,
    pub user: Option<String>,
    pub pass: Option<String>,
    from: Option<String>,
    pub timeout: Duration,
}

impl SmtpConfig {
    /// The from-address: `SMTP_FROM`, falling back to `SMTP_USER`.
    pub fn from_address(&self) -> Option<&str> {
        self.from.as_deref().or(self.user.as_deref())
    }
}

/// Holds all configuration loaded from the environment at startup.
#[derive(Clone, Debug)]
pub struct Config {
    pub bind_address: SocketAddr,
    pub log_level: Level,
    pub cors_origin: String,
    pub smtp: SmtpConfig,
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// It will look for a `.env` file in the current directory for
    /// development, but this is skipped in test environments to ensure tests
    /// are hermetic.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Only load from .env in non-test mode to avoid contamination.
        if !cfg!(test) {
            dotenvy::dotenv().ok();
        }

        // --- Load Server Settings ---
        let bind_address_str =
            std::env::var("BIND_ADDRESS").unwrap_or_else(|_| "0.0.0.0:3000".to_string());
        let bind_address = bind_address_str
            .parse::<SocketAddr>()
            .map_err(|e| ConfigError::InvalidValue("BIND_ADDRESS".to_string(), e.to_string()))?;

        let log_level_str = std::env::var("RUST_LOG").unwrap_or_else(|_| "INFO".to_string());
        let log_level = log_level_str.parse::<Level>().map_err(|_| {
            ConfigError::InvalidValue(
                "RUST_LOG".to_string(),
                format!("'{}' is not a valid log level", log_level_str),
            )
        })?;

        let cors_origin = std::env::var("CORS_ORIGIN")
            .unwrap_or_else(|_| "http://localhost:3000".to_string());

        // --- Load SMTP Settings ---
        let host = std::env::var("SMTP_HOST").unwrap_or_else(|_| "smtp.gmail.com".to_string());
        let port_str = std::env::var("SMTP_PORT").unwrap_or_else(|_| "587".to_string());
        let port = port_str
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidValue("SMTP_PORT".to_string(), e.to_string()))?;
        let secure = std::env::var("SMTP_SECURE")
            .map(|v| v == "true")
            .unwrap_or(false);
        let user = std::env::var("SMTP_USER").ok();
        let pass = std::env::var("SMTP_PASS").ok();
        let from = std::env::var("SMTP_FROM").ok();
        let timeout_str =
            std::env::var("SMTP_TIMEOUT_SECS").unwrap_or_else(|_| "30".to_string());
        let timeout_secs = timeout_str.parse::<u64>().map_err(|e| {
            ConfigError::InvalidValue("SMTP_TIMEOUT_SECS".to_string(), e.to_string())
        })?;

        Ok(Self {
            bind_address,
            log_level,
            cors_origin,
            smtp: SmtpConfig {
                host,
                port,
                secure,
                user,
                pass,
                from,
                timeout: Duration::from_secs(timeout_secs),
            },
        })
    }
}

#[cfg(test)]
impl Config {
    /// A fixed configuration for handler-level tests; nothing is read from
    /// the environment.
    pub(crate) fn test_default() -> Self {
        Self {
            bind_address: "127.0.0.1:3000".parse().expect("valid test address"),
            log_level: Level::INFO,
            cors_origin: "http://localhost:3000".to_string(),
            smtp: SmtpConfig {
                host: "localhost".to_string(),
                port: 2525,
                secure: false,
                user: None,
                pass: None,
                from: None,
                timeout: Duration::from_secs(5),
            },
        }
    }
}

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {name}: {message}")]
    InvalidValue { name: String, message: String },
    #[error("failed to parse {name} as integer: {source}")]
    ParseInt {
        name: String,
        #[source]
        source: std::num::ParseIntError,
    },
}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    // Database
    /// PostgreSQL connection string. `None` is a supported state: the board
    /// renders a configuration page instead of failing.
    pub pg_dsn: Option<String>,
    pub db_max_connections: Option<u32>,
    pub db_acquire_timeout: Duration,

    // Web Server
    pub web_host: String,
    pub web_port: u16,
    pub static_dir: Option<PathBuf>,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if a numeric variable is set but cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            // Database
            pg_dsn: optional_env("PG_DSN"),
            db_max_connections: parse_optional_env_u32("DB_MAX_CONNECTIONS")?,
            db_acquire_timeout: Duration::from_secs(parse_env_u64("DB_ACQUIRE_TIMEOUT_SECS", 30)?),

            // Web Server
            web_host: env_or_default("WEB_HOST", "0.0.0.0"),
            web_port: parse_env_u16("PORT", 8080)?,
            static_dir: optional_env("STATIC_DIR").map(PathBuf::from),
        })
    }

    /// Validate that the configuration is usable.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.db_max_connections == Some(0) {
            return Err(ConfigError::InvalidValue {
                name: "DB_MAX_CONNECTIONS".to_string(),
                message: "must be at least 1".to_string(),
            });
        }
        if self.db_acquire_timeout.is_zero() {
            return Err(ConfigError::InvalidValue {
                name: "DB_ACQUIRE_TIMEOUT_SECS".to_string(),
                message: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }

    /// Address the web server binds to.
    #[must_use]
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.web_host, self.web_port)
    }
}

fn optional_env(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|s| !s.is_empty())
}

fn env_or_default(name: &str, default: &str) -> String {
    std::env::var(name)
        .ok()
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| default.to_string())
}

fn parse_env_u64(name: &str, default: u64) -> Result<u64, ConfigError> {
    match std::env::var(name) {
        Ok(val) if !val.is_empty() => val.parse().map_err(|e| ConfigError::ParseInt {
            name: name.to_string(),
            source: e,
        }),
        _ => Ok(default),
    }
}

fn parse_env_u16(name: &str, default: u16) -> Result<u16, ConfigError> {
    match std::env::var(name) {
        Ok(val) if !val.is_empty() => val.parse().map_err(|e| ConfigError::ParseInt {
            name: name.to_string(),
            source: e,
        }),
        _ => Ok(default),
    }
}

fn parse_optional_env_u32(name: &str) -> Result<Option<u32>, ConfigError> {
    match std::env::var(name) {
        Ok(val) if !val.is_empty() => {
            val.parse()
                .map(Some)
                .map_err(|e| ConfigError::ParseInt {
                    name: name.to_string(),
                    source: e,
                })
        }
        _ => Ok(None),
    }
}

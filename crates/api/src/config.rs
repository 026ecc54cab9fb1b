//! Service settings.
//!
//! Built once at startup and passed into [`crate::app::build_app`]; nothing
//! reads the environment after that.

use std::net::SocketAddr;

use catalog_infra::db::DbConfig;
use thiserror::Error;

pub const DEFAULT_DATABASE_URL: &str = "sqlite://./dev.db";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{var} must be a boolean, got {value:?}")]
    InvalidBool { var: &'static str, value: String },

    #[error("{var} must be a socket address, got {value:?}")]
    InvalidAddr { var: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Deployment label (`ENV`), informational only.
    pub env: String,
    /// SQLite connection string (`DATABASE_URL`).
    pub database_url: String,
    /// Echo every SQL statement at `info` (`SQL_ECHO`).
    pub sql_echo: bool,
    /// `false` selects the in-memory repository (`USE_PERSISTENT_STORES`).
    pub use_persistent_stores: bool,
    /// Listen address (`BIND_ADDR`).
    pub bind_addr: SocketAddr,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            env: "dev".to_string(),
            database_url: DEFAULT_DATABASE_URL.to_string(),
            sql_echo: false,
            use_persistent_stores: true,
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 8080)),
        }
    }
}

impl Settings {
    /// Load from the process environment, after merging a local `.env` file.
    ///
    /// Variables already set in the environment take precedence over `.env`.
    pub fn from_env() -> Result<Self, ConfigError> {
        match dotenvy::dotenv() {
            Ok(path) => tracing::debug!(path = %path.display(), "loaded .env"),
            Err(e) if e.not_found() => {}
            Err(e) => tracing::warn!("ignoring unreadable .env: {e}"),
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load from an arbitrary key lookup (tests pass a map here).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let bind_addr = match lookup("BIND_ADDR") {
            Some(v) => v.trim().parse().map_err(|_| ConfigError::InvalidAddr {
                var: "BIND_ADDR",
                value: v.clone(),
            })?,
            None => defaults.bind_addr,
        };

        Ok(Self {
            env: lookup("ENV").unwrap_or(defaults.env),
            database_url: lookup("DATABASE_URL").unwrap_or(defaults.database_url),
            sql_echo: parse_bool(&lookup, "SQL_ECHO", defaults.sql_echo)?,
            use_persistent_stores: parse_bool(
                &lookup,
                "USE_PERSISTENT_STORES",
                defaults.use_persistent_stores,
            )?,
            bind_addr,
        })
    }

    /// In-memory backend, ephemeral port. Used by tests.
    pub fn in_memory() -> Self {
        Self {
            use_persistent_stores: false,
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 0)),
            ..Self::default()
        }
    }

    pub fn db_config(&self) -> DbConfig {
        DbConfig {
            url: self.database_url.clone(),
            echo: self.sql_echo,
        }
    }
}

fn parse_bool(
    lookup: &impl Fn(&str) -> Option<String>,
    var: &'static str,
    default: bool,
) -> Result<bool, ConfigError> {
    let Some(raw) = lookup(var) else {
        return Ok(default);
    };
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidBool { var, value: raw }),
    }
}

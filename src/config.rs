//! Runtime configuration read from the environment.

use std::net::SocketAddr;
use std::path::PathBuf;

pub const DEFAULT_DATABASE_URL: &str = "postgres://eax@localhost/eax";
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:5000";
pub const DEFAULT_STATIC_DIR: &str = "static";
pub const DEFAULT_ADMIN_LOGIN: &str = "admin";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid bind address {value:?}: {source}")]
    InvalidBindAddr {
        value: String,
        source: std::net::AddrParseError,
    },
}

/// Server configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// SeaORM connection URL (`postgres://...` or `sqlite:...`)
    pub database_url: String,
    pub bind_addr: SocketAddr,
    /// Directory served under `/static`
    pub static_dir: PathBuf,
    /// Login recorded as creator of submitted themes
    pub admin_login: String,
}

impl Config {
    /// Load from process environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load using an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str, default: &str| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(|| default.to_string())
        };

        let bind = get("THEMES_BIND_ADDR", DEFAULT_BIND_ADDR);
        let bind_addr = bind
            .parse()
            .map_err(|source| ConfigError::InvalidBindAddr {
                value: bind.clone(),
                source,
            })?;

        Ok(Self {
            database_url: get("THEMES_DATABASE_URL", DEFAULT_DATABASE_URL),
            bind_addr,
            static_dir: PathBuf::from(get("THEMES_STATIC_DIR", DEFAULT_STATIC_DIR)),
            admin_login: get("THEMES_ADMIN_LOGIN", DEFAULT_ADMIN_LOGIN),
        })
    }
}

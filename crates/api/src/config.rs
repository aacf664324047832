//! Process configuration, read from the environment.
//!
//! | Variable | Default | Meaning |
//! |----------|---------|---------|
//! | `BIND_ADDR` | `0.0.0.0:3000` | listen address |
//! | `USE_PERSISTENT_STORES` | `false` | use Postgres instead of the in-memory store |
//! | `DATABASE_URL` | — | required when persistent stores are enabled |
//! | `LOG_FORMAT` | `json` | `json` or `pretty` |
//! | `RUST_LOG` | `info` | tracing filter (read by the observability crate) |

use std::net::SocketAddr;

use thiserror::Error;

use stockroom_observability::LogFormat;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid {var}: {reason}")]
    Invalid { var: &'static str, reason: String },

    #[error("{0} must be set when USE_PERSISTENT_STORES=true")]
    Missing(&'static str),
}

/// Where products are kept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageConfig {
    InMemory,
    Postgres { database_url: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    pub bind_addr: SocketAddr,
    pub storage: StorageConfig,
    pub log_format: LogFormat,
}

impl ApiConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the config from an arbitrary variable source (tests pass a map).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let bind_raw = lookup("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr = bind_raw.parse().map_err(|e| ConfigError::Invalid {
            var: "BIND_ADDR",
            reason: format!("{bind_raw:?}: {e}"),
        })?;

        let use_persistent = match lookup("USE_PERSISTENT_STORES") {
            None => false,
            Some(raw) => raw.trim().parse::<bool>().map_err(|_| ConfigError::Invalid {
                var: "USE_PERSISTENT_STORES",
                reason: format!("{raw:?} is not true/false"),
            })?,
        };

        let storage = if use_persistent {
            let database_url = lookup("DATABASE_URL")
                .filter(|url| !url.trim().is_empty())
                .ok_or(ConfigError::Missing("DATABASE_URL"))?;
            StorageConfig::Postgres { database_url }
        } else {
            StorageConfig::InMemory
        };

        let log_format = match lookup("LOG_FORMAT") {
            None => LogFormat::default(),
            Some(raw) => raw.parse().map_err(|reason| ConfigError::Invalid {
                var: "LOG_FORMAT",
                reason,
            })?,
        };

        Ok(Self {
            bind_addr,
            storage,
            log_format,
        })
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 3000)),
            storage: StorageConfig::InMemory,
            log_format: LogFormat::default(),
        }
    }
}

//! Application settings loaded via OrthoConfig.
//!
//! Values are layered from CLI flags, `CINEGRAPH_*` environment variables and
//! an optional configuration file. The port defaults to 8080, the remaining
//! accessors supply their own defaults and [`AppSettings::storage_plan`]
//! validates the storage choice.

use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;

use ortho_config::OrthoConfig;
use serde::Deserialize;

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_POOL_MAX_SIZE: u32 = 10;

/// Storage backend selected at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StorageBackend {
    /// Process-local store; data is lost on restart.
    #[default]
    Memory,
    /// PostgreSQL through the Diesel repositories.
    Postgres,
}

impl StorageBackend {
    /// Lower-case name accepted by the `storage` setting.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Memory => "memory",
            Self::Postgres => "postgres",
        }
    }
}

impl fmt::Display for StorageBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StorageBackend {
    type Err = SettingsError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "memory" => Ok(Self::Memory),
            "postgres" | "postgresql" => Ok(Self::Postgres),
            _ => Err(SettingsError::UnknownStorage {
                value: value.to_owned(),
            }),
        }
    }
}

/// Invalid combination of settings.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SettingsError {
    /// `storage` names neither backend.
    #[error("unknown storage backend `{value}`; expected `memory` or `postgres`")]
    UnknownStorage { value: String },

    /// `host` is not an IP address.
    #[error("invalid host `{value}`")]
    InvalidHost { value: String },

    /// PostgreSQL was selected without a connection URL.
    #[error("storage `postgres` requires CINEGRAPH_DATABASE_URL")]
    MissingDatabaseUrl,

    /// `pool_max_size` is zero.
    #[error("pool_max_size must be positive")]
    EmptyPool,
}

/// Resolved storage configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoragePlan {
    /// Serve from a fresh in-memory store.
    Memory,
    /// Connect to PostgreSQL.
    Postgres {
        /// Connection URL passed to the pool and the migration runner.
        database_url: String,
        /// Upper bound on pooled connections.
        pool_max_size: u32,
    },
}

/// Server and storage settings.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "CINEGRAPH")]
pub struct AppSettings {
    /// Address to bind; defaults to `0.0.0.0`.
    pub host: Option<String>,
    /// Port to bind.
    #[ortho_config(default = 8080)]
    pub port: u16,
    /// `memory` (default) or `postgres`.
    pub storage: Option<String>,
    /// PostgreSQL connection URL; required for `postgres` storage.
    pub database_url: Option<String>,
    /// Maximum pooled connections; defaults to 10.
    pub pool_max_size: Option<u32>,
}

impl AppSettings {
    /// Socket address the server binds to.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::InvalidHost`] when the host is not an IP
    /// address.
    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        let host = self.host.as_deref().unwrap_or(DEFAULT_HOST);
        let ip: IpAddr = host.parse().map_err(|_| SettingsError::InvalidHost {
            value: host.to_owned(),
        })?;
        Ok(SocketAddr::new(ip, self.port))
    }

    /// Selected backend, defaulting to memory.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::UnknownStorage`] for unrecognised names.
    pub fn storage(&self) -> Result<StorageBackend, SettingsError> {
        self.storage
            .as_deref()
            .map_or(Ok(StorageBackend::default()), str::parse)
    }

    /// Validate the storage selection together with its connection settings.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError`] when the backend is unknown, PostgreSQL is
    /// selected without a database URL, or the pool size is zero.
    pub fn storage_plan(&self) -> Result<StoragePlan, SettingsError> {
        match self.storage()? {
            StorageBackend::Memory => Ok(StoragePlan::Memory),
            StorageBackend::Postgres => {
                let database_url = self
                    .database_url
                    .clone()
                    .filter(|url| !url.trim().is_empty())
                    .ok_or(SettingsError::MissingDatabaseUrl)?;
                let pool_max_size = self.pool_max_size.unwrap_or(DEFAULT_POOL_MAX_SIZE);
                if pool_max_size == 0 {
                    return Err(SettingsError::EmptyPool);
                }
                Ok(StoragePlan::Postgres {
                    database_url,
                    pool_max_size,
                })
            }
        }
    }
}

//! Entity store selection

use serde::Deserialize;

use crate::{get_env_or_default, parse_env_flag, ConfigError, ConfigResult};

/// Which entity store backs the API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    /// Process-local store, lost on restart
    #[default]
    Memory,
    /// PostgreSQL through the connection pool
    Postgres,
}

impl std::str::FromStr for StoreBackend {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "memory" | "mem" => Ok(Self::Memory),
            "postgres" | "postgresql" | "pg" => Ok(Self::Postgres),
            other => Err(ConfigError::InvalidValue(
                "STORE_BACKEND".to_string(),
                format!("expected 'memory' or 'postgres', got '{}'", other),
            )),
        }
    }
}

impl StoreBackend {
    /// Canonical lowercase name
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Memory => "memory",
            Self::Postgres => "postgres",
        }
    }
}

impl std::fmt::Display for StoreBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Entity store configuration
#[derive(Debug, Clone, Default)]
pub struct StoreConfig {
    /// Selected backend
    pub backend: StoreBackend,

    /// Insert the sample library on startup (idempotent)
    pub seed_on_startup: bool,
}

impl StoreConfig {
    /// Load store configuration from environment variables
    pub fn from_env() -> ConfigResult<Self> {
        Ok(Self {
            backend: get_env_or_default("STORE_BACKEND", "memory").parse()?,
            seed_on_startup: parse_env_flag("SEED_ON_STARTUP", true)?,
        })
    }
}

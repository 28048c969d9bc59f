//! API server configuration

use std::env;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use bookshelf_shared_config::{
    parse_env, CommonConfig, DatabaseConfig, Environment, StoreBackend, StoreConfig,
};

use crate::graphql::loaders::{LoaderSettings, DEFAULT_BATCH_DELAY, DEFAULT_MAX_BATCH_SIZE};
use crate::services::{AuthorDeletePolicy, MutationPolicy, TitlePolicy};

/// Default maximum GraphQL query depth
pub const DEFAULT_MAX_DEPTH: usize = 10;

/// API server configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    /// Common configuration shared with other services
    pub common: CommonConfig,

    /// Server port (default: 8080)
    pub port: u16,

    /// Batch window and size of the per-request loaders
    pub loader: LoaderSettings,

    /// Maximum depth of a GraphQL query
    pub max_depth: usize,

    /// Title and author deletion policies
    pub policy: MutationPolicy,

    /// CORS allowed origins (optional)
    pub cors_allowed_origins: Option<Vec<String>>,
}

impl Config {
    /// Load configuration from environment variables
    ///
    /// In production mode `DATABASE_URL` must be set when the store backend
    /// is `postgres`. Every other setting has a default.
    pub fn from_env() -> Result<Self> {
        let environment = Environment::from_str(
            &env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string()),
        )
        .unwrap_or_default();

        let common = CommonConfig::from_env()
            .map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;

        if environment.is_production() && common.store.backend == StoreBackend::Postgres {
            Self::validate_database_url()?;
        }

        Ok(Self {
            common,

            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .context("Invalid PORT value")?,

            loader: Self::load_loader_settings()?,

            max_depth: parse_env("GRAPHQL_MAX_DEPTH", DEFAULT_MAX_DEPTH)?,

            policy: Self::load_policy()?,

            cors_allowed_origins: env::var("CORS_ORIGINS").ok().map(|s| {
                s.split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect()
            }),
        })
    }

    /// Load LOADER_BATCH_DELAY_MS and LOADER_MAX_BATCH_SIZE
    fn load_loader_settings() -> Result<LoaderSettings> {
        let delay_ms: u64 =
            parse_env("LOADER_BATCH_DELAY_MS", DEFAULT_BATCH_DELAY.as_millis() as u64)?;
        let max_batch_size: usize = parse_env("LOADER_MAX_BATCH_SIZE", DEFAULT_MAX_BATCH_SIZE)?;

        if delay_ms == 0 {
            bail!("LOADER_BATCH_DELAY_MS must be at least 1");
        }
        if max_batch_size == 0 {
            bail!("LOADER_MAX_BATCH_SIZE must be at least 1");
        }

        Ok(LoaderSettings {
            delay: Duration::from_millis(delay_ms),
            max_batch_size,
        })
    }

    /// Load BOOK_TITLE_POLICY and AUTHOR_DELETE_POLICY
    fn load_policy() -> Result<MutationPolicy> {
        let titles = match env::var("BOOK_TITLE_POLICY") {
            Ok(value) => TitlePolicy::from_str(&value)
                .map_err(|e| anyhow::anyhow!("Invalid BOOK_TITLE_POLICY: {}", e))?,
            Err(_) => TitlePolicy::default(),
        };
        let author_deletion = match env::var("AUTHOR_DELETE_POLICY") {
            Ok(value) => AuthorDeletePolicy::from_str(&value)
                .map_err(|e| anyhow::anyhow!("Invalid AUTHOR_DELETE_POLICY: {}", e))?,
            Err(_) => AuthorDeletePolicy::default(),
        };

        Ok(MutationPolicy {
            titles,
            author_deletion,
        })
    }

    /// Validate that DATABASE_URL is explicitly set in production
    fn validate_database_url() -> Result<()> {
        match env::var("DATABASE_URL") {
            Ok(url) if !url.is_empty() => Ok(()),
            _ => {
                bail!(
                    "DATABASE_URL environment variable is required in production \
                     when STORE_BACKEND is postgres."
                );
            }
        }
    }

    // Convenience accessors for common config fields

    /// Get database configuration
    pub fn database(&self) -> &DatabaseConfig {
        &self.common.database
    }

    /// Get store configuration
    pub fn store(&self) -> &StoreConfig {
        &self.common.store
    }

    /// Get environment mode
    pub fn environment(&self) -> Environment {
        self.common.environment
    }
}

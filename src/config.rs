//! Database configuration read from the environment.
//!
//! | Variable                            | Default                  |
//! |-------------------------------------|--------------------------|
//! | `TASKDESK_DATABASE_URL`             | falls back to `DATABASE_URL` |
//! | `TASKDESK_DB_POOL_SIZE`             | 10                       |
//! | `TASKDESK_DB_CONNECT_TIMEOUT_SECS`  | 30                       |

use crate::task::adapters::postgres::TaskPgPool;
use diesel::PgConnection;
use diesel::r2d2::{ConnectionManager, Pool, PoolError};
use std::time::Duration;
use thiserror::Error;
use tracing::info;

/// Primary database URL variable.
pub const DATABASE_URL_VAR: &str = "TASKDESK_DATABASE_URL";
/// Conventional fallback database URL variable.
pub const FALLBACK_DATABASE_URL_VAR: &str = "DATABASE_URL";
/// Maximum pool size variable.
pub const POOL_SIZE_VAR: &str = "TASKDESK_DB_POOL_SIZE";
/// Connection checkout timeout variable, in seconds.
pub const CONNECT_TIMEOUT_VAR: &str = "TASKDESK_DB_CONNECT_TIMEOUT_SECS";

/// Errors raised while loading configuration or building the pool.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Neither database URL variable is set.
    #[error("database URL is not configured; set {DATABASE_URL_VAR} or {FALLBACK_DATABASE_URL_VAR}")]
    MissingDatabaseUrl,

    /// A variable holds a value that cannot be used.
    #[error("invalid value '{value}' for {key}")]
    InvalidValue {
        /// Variable name.
        key: &'static str,
        /// Rejected raw value.
        value: String,
    },

    /// The connection pool could not be created.
    #[error("failed to build database pool: {0}")]
    Pool(#[from] PoolError),
}

/// Connection settings for the `PostgreSQL` task store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseConfig {
    url: String,
    pool_size: u32,
    connect_timeout: Duration,
}

impl DatabaseConfig {
    /// Default maximum number of pooled connections.
    pub const DEFAULT_POOL_SIZE: u32 = 10;
    /// Default connection checkout timeout.
    pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(30);

    /// Creates a configuration with default pool settings.
    #[must_use]
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            pool_size: Self::DEFAULT_POOL_SIZE,
            connect_timeout: Self::DEFAULT_CONNECT_TIMEOUT,
        }
    }

    /// Sets the maximum pool size.
    #[must_use]
    pub const fn with_pool_size(mut self, pool_size: u32) -> Self {
        self.pool_size = pool_size;
        self
    }

    /// Sets the connection checkout timeout.
    #[must_use]
    pub const fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Reads the configuration from process environment variables.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when no URL is set or a numeric setting does
    /// not parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads the configuration through `lookup`, which maps a variable name
    /// to its value.
    ///
    /// Blank values are treated as unset.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when no URL is set or a numeric setting does
    /// not parse.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let read = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let url = read(DATABASE_URL_VAR)
            .or_else(|| read(FALLBACK_DATABASE_URL_VAR))
            .ok_or(ConfigError::MissingDatabaseUrl)?;

        let mut config = Self::new(url);
        if let Some(raw) = read(POOL_SIZE_VAR) {
            config.pool_size = parse_positive(POOL_SIZE_VAR, &raw)?;
        }
        if let Some(raw) = read(CONNECT_TIMEOUT_VAR) {
            let seconds = parse_positive(CONNECT_TIMEOUT_VAR, &raw)?;
            config.connect_timeout = Duration::from_secs(u64::from(seconds));
        }
        Ok(config)
    }

    /// Returns the database URL.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Returns the maximum pool size.
    #[must_use]
    pub const fn pool_size(&self) -> u32 {
        self.pool_size
    }

    /// Returns the connection checkout timeout.
    #[must_use]
    pub const fn connect_timeout(&self) -> Duration {
        self.connect_timeout
    }

    /// Builds the r2d2 pool used by
    /// [`PostgresTaskRepository`](crate::task::adapters::postgres::PostgresTaskRepository).
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Pool`] when the initial connections cannot be
    /// established.
    pub fn build_pool(&self) -> Result<TaskPgPool, ConfigError> {
        info!(
            pool_size = self.pool_size,
            connect_timeout_secs = self.connect_timeout.as_secs(),
            "building task database pool"
        );
        let manager = ConnectionManager::<PgConnection>::new(self.url.as_str());
        let pool = Pool::builder()
            .max_size(self.pool_size)
            .connection_timeout(self.connect_timeout)
            .build(manager)?;
        Ok(pool)
    }
}

fn parse_positive(key: &'static str, raw: &str) -> Result<u32, ConfigError> {
    raw.trim()
        .parse::<u32>()
        .ok()
        .filter(|value| *value > 0)
        .ok_or_else(|| ConfigError::InvalidValue {
            key,
            value: raw.to_owned(),
        })
}

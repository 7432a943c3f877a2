//! PostgreSQL database service
//!
//! Owns the connection pool used by the search endpoints:
//! - Connection pooling with min/max bounds
//! - Idle connection cleanup
//! - Connection lifetime cycling
//! - Query timeout protection
//!
//! The schema is owned by the collection's loader; this service never
//! creates or migrates tables.

pub mod error;
pub mod repositories;

pub use error::PostgresError;
pub use sqlx::PgPool;

use std::sync::Arc;
use std::time::Duration;

use sqlx::ConnectOptions;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::log::LevelFilter;

use crate::core::config::PostgresConfig;
use crate::core::constants::{
    POSTGRES_DEFAULT_ACQUIRE_TIMEOUT_SECS, POSTGRES_DEFAULT_IDLE_TIMEOUT_SECS,
    POSTGRES_DEFAULT_MAX_CONNECTIONS, POSTGRES_DEFAULT_MAX_LIFETIME_SECS,
    POSTGRES_DEFAULT_MIN_CONNECTIONS, POSTGRES_DEFAULT_STATEMENT_TIMEOUT_SECS,
    POSTGRES_HEALTH_CHECK_INTERVAL_SECS,
};

/// Pool settings after falling back to defaults for unset (zero) values
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolSettings {
    pub max_connections: u32,
    pub min_connections: u32,
    pub acquire_timeout_secs: u64,
    pub idle_timeout_secs: u64,
    pub max_lifetime_secs: u64,
    pub statement_timeout_secs: u64,
}

impl PoolSettings {
    pub fn from_config(config: &PostgresConfig) -> Self {
        fn or_default<T: PartialEq + Default>(value: T, default: T) -> T {
            if value == T::default() { default } else { value }
        }

        let max_connections = or_default(config.max_connections, POSTGRES_DEFAULT_MAX_CONNECTIONS);
        Self {
            max_connections,
            // never keep more idle connections than the pool can hold
            min_connections: or_default(config.min_connections, POSTGRES_DEFAULT_MIN_CONNECTIONS)
                .min(max_connections),
            acquire_timeout_secs: or_default(
                config.acquire_timeout_secs,
                POSTGRES_DEFAULT_ACQUIRE_TIMEOUT_SECS,
            ),
            idle_timeout_secs: or_default(
                config.idle_timeout_secs,
                POSTGRES_DEFAULT_IDLE_TIMEOUT_SECS,
            ),
            max_lifetime_secs: or_default(
                config.max_lifetime_secs,
                POSTGRES_DEFAULT_MAX_LIFETIME_SECS,
            ),
            statement_timeout_secs: or_default(
                config.statement_timeout_secs,
                POSTGRES_DEFAULT_STATEMENT_TIMEOUT_SECS,
            ),
        }
    }

    fn pool_options(&self) -> PgPoolOptions {
        PgPoolOptions::new()
            .max_connections(self.max_connections)
            .min_connections(self.min_connections)
            .acquire_timeout(Duration::from_secs(self.acquire_timeout_secs))
            .idle_timeout(Duration::from_secs(self.idle_timeout_secs))
            .max_lifetime(Duration::from_secs(self.max_lifetime_secs))
    }

    fn session_options(&self, config: &PostgresConfig) -> Result<PgConnectOptions, PostgresError> {
        Ok(connect_options(config)?.options([(
            "statement_timeout",
            format!("{}s", self.statement_timeout_secs),
        )]))
    }
}

/// PostgreSQL database service
///
/// Should be created once at server startup and shared across all modules.
pub struct PostgresService {
    pool: PgPool,
    statement_timeout_secs: u64,
}

impl PostgresService {
    /// Connect to the collection database
    pub async fn init(config: &PostgresConfig) -> Result<Self, PostgresError> {
        let settings = PoolSettings::from_config(config);
        let pool = settings
            .pool_options()
            .connect_with(settings.session_options(config)?)
            .await?;

        tracing::debug!(
            max_connections = settings.max_connections,
            min_connections = settings.min_connections,
            acquire_timeout_secs = settings.acquire_timeout_secs,
            idle_timeout_secs = settings.idle_timeout_secs,
            max_lifetime_secs = settings.max_lifetime_secs,
            statement_timeout_secs = settings.statement_timeout_secs,
            "PostgresService initialized"
        );
        Ok(Self {
            pool,
            statement_timeout_secs: settings.statement_timeout_secs,
        })
    }

    /// Build the service without opening a connection
    ///
    /// Connections are established on first use.
    pub fn connect_lazy(config: &PostgresConfig) -> Result<Self, PostgresError> {
        let settings = PoolSettings::from_config(config);
        let pool = settings
            .pool_options()
            .min_connections(0)
            .connect_lazy_with(settings.session_options(config)?);
        Ok(Self {
            pool,
            statement_timeout_secs: settings.statement_timeout_secs,
        })
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Server-side `statement_timeout` set on every connection
    pub fn statement_timeout_secs(&self) -> u64 {
        self.statement_timeout_secs
    }

    /// Close the connection pool gracefully
    pub async fn close(&self) {
        self.pool.close().await;
        tracing::debug!("PostgreSQL pool closed");
    }

    /// Start a background health check task
    pub fn start_health_check_task(
        self: &Arc<Self>,
        mut shutdown_rx: watch::Receiver<bool>,
    ) -> JoinHandle<()> {
        let db = Arc::clone(self);
        tokio::spawn(async move {
            let mut interval =
                tokio::time::interval(Duration::from_secs(POSTGRES_HEALTH_CHECK_INTERVAL_SECS));
            loop {
                tokio::select! {
                    biased;
                    _ = shutdown_rx.changed() => {
                        if *shutdown_rx.borrow() {
                            tracing::debug!("PostgreSQL health check task shutting down");
                            break;
                        }
                    }
                    _ = interval.tick() => {
                        if let Err(e) = sqlx::query("SELECT 1").execute(&db.pool).await {
                            tracing::warn!("PostgreSQL health check failed: {}", e);
                        }
                    }
                }
            }
        })
    }
}

fn connect_options(config: &PostgresConfig) -> Result<PgConnectOptions, PostgresError> {
    let url = config.url.trim();
    if url.is_empty() {
        return Err(PostgresError::Config("PostgreSQL URL is required".into()));
    }
    let options: PgConnectOptions = url
        .parse()
        .map_err(|e| PostgresError::Config(format!("Invalid PostgreSQL URL: {}", e)))?;
    Ok(options.log_statements(LevelFilter::Trace))
}

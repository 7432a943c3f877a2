//! PostgreSQL error types

use thiserror::Error;

/// SQLSTATE raised when `statement_timeout` cancels a query
const QUERY_CANCELED: &str = "57014";

#[derive(Error, Debug)]
pub enum PostgresError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Statement cancelled after {timeout_secs}s")]
    StatementTimeout { timeout_secs: u64 },

    #[error("Configuration error: {0}")]
    Config(String),
}

impl PostgresError {
    /// Classify an error returned while running a query
    pub fn from_query(e: sqlx::Error, timeout_secs: u64) -> Self {
        let canceled = matches!(
            &e,
            sqlx::Error::Database(db) if db.code().as_deref() == Some(QUERY_CANCELED)
        );
        if canceled {
            Self::StatementTimeout { timeout_secs }
        } else {
            Self::Database(e)
        }
    }
}

//! Advanced search over the iconography collection
//!
//! Requests flow through two stages:
//!
//! 1. [`sanitize`] validates the raw JSON parameters against the allow-list
//!    and normalizes them into [`FilterParams`]
//! 2. [`compile`] turns the parameters into a [`CompiledSearch`], which
//!    renders to a single parameterized PostgreSQL statement
//!
//! Both stages are pure. [`compile_and_execute`] runs the statement.

pub mod compile;
pub mod error;
pub mod interval;
pub mod params;
pub mod query;
pub mod sanitize;
pub mod schema;

#[cfg(test)]
mod tests;

pub use compile::{CompiledSearch, compile};
pub use error::SearchError;
pub use interval::{DateInterval, inclusive_to_interval, interval_to_inclusive};
pub use params::{BooleanOp, DateFilter, Field, FilterParams};
pub use query::{SqlParams, SqlValue};
pub use sanitize::{sanitize, sanitize_date};
pub use schema::{ICONOGRAPHY, SearchSchema};

use crate::data::{DataError, PostgresService};
use crate::data::postgres::repositories::iconography as iconography_repo;
use crate::data::types::IconographyRow;

/// A rendered statement and its bind values
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedSearch {
    pub sql: String,
    pub values: Vec<SqlValue>,
}

/// Compile and render sanitized parameters
pub fn prepare(schema: &SearchSchema, params: &FilterParams) -> PreparedSearch {
    let compiled = compile(schema, params);
    let mut sql_params = SqlParams::default();
    let sql = compiled.to_sql(&mut sql_params);
    PreparedSearch {
        sql,
        values: sql_params.values,
    }
}

/// Run a search against the collection database.
///
/// Rows are distinct by id and ordered by id.
pub async fn compile_and_execute(
    db: &PostgresService,
    schema: &SearchSchema,
    params: &FilterParams,
) -> Result<Vec<IconographyRow>, DataError> {
    let prepared = prepare(schema, params);
    tracing::trace!(sql = %prepared.sql, values = ?prepared.values, "Executing search");

    let rows = iconography_repo::search_iconography(db, &prepared.sql, prepared.values).await?;
    tracing::debug!(rows = rows.len(), "Search completed");
    Ok(rows)
}

//! Iconography repository for PostgreSQL operations

use sqlx::Row;
use sqlx::postgres::PgRow;

use crate::data::postgres::{PostgresError, PostgresService};
use crate::data::types::IconographyRow;
use crate::domain::search::query::SqlValue;

/// Run a compiled iconography search
///
/// `sql` must select the iconography row columns; `values` are bound to
/// `$1..$n` in order. A query cancelled by the statement timeout is
/// reported as [`PostgresError::StatementTimeout`].
pub async fn search_iconography(
    db: &PostgresService,
    sql: &str,
    values: Vec<SqlValue>,
) -> Result<Vec<IconographyRow>, PostgresError> {
    let mut query = sqlx::query(sql);
    for value in values {
        query = match value {
            SqlValue::Text(s) => query.bind(s),
            SqlValue::TextArray(values) => query.bind(values),
            SqlValue::Int(n) => query.bind(n),
        };
    }

    let rows = query
        .fetch_all(db.pool())
        .await
        .map_err(|e| PostgresError::from_query(e, db.statement_timeout_secs()))?;
    rows.iter()
        .map(row_to_iconography)
        .collect::<Result<Vec<_>, _>>()
        .map_err(Into::into)
}

fn row_to_iconography(row: &PgRow) -> Result<IconographyRow, sqlx::Error> {
    Ok(IconographyRow {
        id: row.try_get("id")?,
        id_uuid: row.try_get("id_uuid")?,
        id_richelieu: row.try_get("id_richelieu")?,
        iiif_url: row.try_get("iiif_url")?,
        source_url: row.try_get("source_url")?,
        date_source: row.try_get("date_source")?,
        date_corr: row.try_get("date_corr")?,
        date_lower: row.try_get("date_lower")?,
        date_upper: row.try_get("date_upper")?,
        technique: row.try_get("technique")?,
        description: row.try_get("description")?,
        inscription: row.try_get("inscription")?,
        corpus: row.try_get("corpus")?,
        inventory_number: row.try_get("inventory_number")?,
        produced: row.try_get("produced")?,
        represents: row.try_get("represents")?,
        main_title: row.try_get("main_title")?,
    })
}

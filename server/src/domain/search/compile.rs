//! Boolean query compiler
//!
//! Routing of each participating field by its operator:
//!
//! - `and` narrows the shared base query in place
//! - `or` builds an independent query over the whole collection, unioned
//!   with the base at the end
//! - `not` builds an independent query, excluded from the base with
//!   `id NOT IN (...)`
//!
//! The result is `base [AND id NOT IN not_1 ...] [UNION or_1 ...]`, wrapped
//! into a select of full resource rows.

use super::params::{BooleanOp, Field, FilterParams};
use super::query::{ColumnRef, IdQuery, Predicate, SqlParams};
use super::schema::SearchSchema;

/// A compiled search, ready to render
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledSearch {
    table: &'static str,
    id: ColumnRef,
    columns: &'static [&'static str],
    /// `None` when no field participates
    base: Option<IdQuery>,
    alternatives: Vec<(Field, IdQuery)>,
    excluded: Vec<Field>,
}

impl CompiledSearch {
    /// Id query all alternatives are unioned with
    pub fn base(&self) -> Option<&IdQuery> {
        self.base.as_ref()
    }

    /// `or` queries in allow-list order
    pub fn alternatives(&self) -> &[(Field, IdQuery)] {
        &self.alternatives
    }

    /// Fields excluded from the base with `NOT IN`
    pub fn excluded(&self) -> &[Field] {
        &self.excluded
    }

    /// Render the id query (`base UNION (alt) ...`), if any field participates
    pub fn ids_to_sql(&self, params: &mut SqlParams) -> Option<String> {
        let base = self.base.as_ref()?;
        let mut sql = base.to_sql(params);
        for (_, alternative) in &self.alternatives {
            sql.push_str(" UNION (");
            sql.push_str(&alternative.to_sql(params));
            sql.push(')');
        }
        Some(sql)
    }

    /// Render the full row query
    pub fn to_sql(&self, params: &mut SqlParams) -> String {
        let columns = self.columns.join(", ");
        match self.ids_to_sql(params) {
            Some(ids) => format!(
                "SELECT {} FROM {} WHERE {} IN ({}) ORDER BY {}",
                columns, self.table, self.id, ids, self.id
            ),
            None => format!(
                "SELECT {} FROM {} ORDER BY {}",
                columns, self.table, self.id
            ),
        }
    }
}

/// Compile sanitized parameters against a schema.
///
/// Parameters must come from the sanitizer; nothing is validated here.
pub fn compile(schema: &SearchSchema, params: &FilterParams) -> CompiledSearch {
    let resource = &schema.resource;
    let mut compiled = CompiledSearch {
        table: resource.table,
        id: ColumnRef::new(resource.table, resource.id_column),
        columns: resource.columns,
        base: None,
        alternatives: Vec::new(),
        excluded: Vec::new(),
    };
    if params.is_empty() {
        return compiled;
    }

    let mut base = IdQuery::all(resource);
    let mut exclusions: Vec<IdQuery> = Vec::new();

    for field in Field::ALL {
        let Some(op) = params.operator(field) else {
            continue;
        };
        match op {
            BooleanOp::And => base = apply_field(base, schema, field, params),
            BooleanOp::Or => {
                let query = apply_field(IdQuery::all(resource), schema, field, params);
                compiled.alternatives.push((field, query));
            }
            BooleanOp::Not => {
                exclusions.push(apply_field(IdQuery::all(resource), schema, field, params));
                compiled.excluded.push(field);
            }
        }
    }

    for exclusion in exclusions {
        let id = base.id;
        base = base.filter(Predicate::NotIn(id, Box::new(exclusion)));
    }

    compiled.base = Some(base);
    compiled
}

/// Restrict `query` by one field's predicate
fn apply_field(
    query: IdQuery,
    schema: &SearchSchema,
    field: Field,
    params: &FilterParams,
) -> IdQuery {
    if field == Field::Date {
        return match params.dates() {
            Some(dates) => {
                let column = ColumnRef::new(schema.resource.table, schema.resource.date_column);
                query.filter(Predicate::Date(column, dates.filters.clone()))
            }
            None => query,
        };
    }

    match (schema.relation(field), params.field(field)) {
        (Some(relation), Some(filter)) => query.join_relation(relation, &filter.values),
        (None, Some(_)) => {
            debug_assert!(false, "no relation for field {}", field.as_str());
            tracing::error!(field = field.as_str(), "Search schema has no relation for field");
            query
        }
        _ => query,
    }
}

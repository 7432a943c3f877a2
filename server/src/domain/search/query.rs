//! Query AST and SQL rendering
//!
//! Queries are plain values. Predicates render to PostgreSQL with `$n`
//! placeholders, and bind values are collected in [`SqlParams`] in render
//! order.

use std::fmt;

use super::params::{DateFilter, Matching};
use super::schema::{FieldRelation, JoinStep, ResourceTable};

/// A bind value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SqlValue {
    Text(String),
    TextArray(Vec<String>),
    Int(i32),
}

impl fmt::Display for SqlValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(s) => write!(f, "{:?}", s),
            Self::TextArray(values) => write!(f, "{:?}", values),
            Self::Int(n) => write!(f, "{}", n),
        }
    }
}

/// Collects SQL parameters during query building (maintains insertion order)
#[derive(Debug, Default)]
pub struct SqlParams {
    pub values: Vec<SqlValue>,
}

impl SqlParams {
    /// Store a value and return its placeholder
    pub fn push(&mut self, value: SqlValue) -> String {
        self.values.push(value);
        format!("${}", self.values.len())
    }
}

/// `alias.column`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnRef {
    pub alias: &'static str,
    pub column: &'static str,
}

impl ColumnRef {
    pub fn new(alias: &'static str, column: &'static str) -> Self {
        Self { alias, column }
    }
}

impl fmt::Display for ColumnRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.alias, self.column)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Predicate {
    ColumnsEq(ColumnRef, ColumnRef),
    TextEq(ColumnRef, String),
    /// Case-insensitive match against any of the patterns
    ILikeAny(ColumnRef, Vec<String>),
    /// Equality with any of the values
    InSet(ColumnRef, Vec<String>),
    NotIn(ColumnRef, Box<IdQuery>),
    /// Any of the date filters holds for the interval column
    Date(ColumnRef, Vec<DateFilter>),
}

impl Predicate {
    pub fn to_sql(&self, params: &mut SqlParams) -> String {
        match self {
            Self::ColumnsEq(left, right) => format!("{} = {}", left, right),
            Self::TextEq(column, value) => {
                let p = params.push(SqlValue::Text(value.clone()));
                format!("{} = {}", column, p)
            }
            Self::ILikeAny(column, patterns) => {
                let p = params.push(SqlValue::TextArray(patterns.clone()));
                format!("{} ILIKE ANY({})", column, p)
            }
            Self::InSet(column, values) => {
                let p = params.push(SqlValue::TextArray(values.clone()));
                format!("{} = ANY({})", column, p)
            }
            Self::NotIn(column, subquery) => {
                format!("{} NOT IN ({})", column, subquery.to_sql(params))
            }
            Self::Date(column, filters) => {
                let parts: Vec<String> = filters
                    .iter()
                    .map(|filter| date_filter_sql(column, filter, params))
                    .collect();
                format!("({})", parts.join(" OR "))
            }
        }
    }
}

fn date_filter_sql(column: &ColumnRef, filter: &DateFilter, params: &mut SqlParams) -> String {
    match filter {
        DateFilter::Range(interval) => {
            let lower = params.push(SqlValue::Int(interval.lower()));
            let upper = params.push(SqlValue::Int(interval.upper()));
            format!(
                "NOT isempty({} * int4range({}, {}, '[)'))",
                column, lower, upper
            )
        }
        DateFilter::Exact(interval) => {
            let lower = params.push(SqlValue::Int(interval.lower()));
            let upper = params.push(SqlValue::Int(interval.upper()));
            format!("{} = int4range({}, {}, '[)')", column, lower, upper)
        }
        DateFilter::Before { year } => {
            let p = params.push(SqlValue::Int(*year));
            format!("(NOT isempty({c}) AND lower({c}) <= {p})", c = column, p = p)
        }
        DateFilter::After { year } => {
            let p = params.push(SqlValue::Int(*year));
            format!("(NOT isempty({c}) AND upper({c}) >= {p})", c = column, p = p)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Join {
    pub table: &'static str,
    pub alias: &'static str,
    pub on: Vec<Predicate>,
}

impl Join {
    pub fn to_sql(&self, params: &mut SqlParams) -> String {
        let on: Vec<String> = self.on.iter().map(|p| p.to_sql(params)).collect();
        if self.table == self.alias {
            format!("JOIN {} ON {}", self.table, on.join(" AND "))
        } else {
            format!(
                "JOIN {} AS {} ON {}",
                self.table,
                self.alias,
                on.join(" AND ")
            )
        }
    }
}

/// Query selecting distinct resource ids.
///
/// Value restrictions live in the join conditions, date and exclusion
/// predicates in the WHERE clause.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdQuery {
    pub table: &'static str,
    pub id: ColumnRef,
    pub joins: Vec<Join>,
    pub filters: Vec<Predicate>,
}

impl IdQuery {
    /// Unrestricted query over the whole resource table
    pub fn all(resource: &ResourceTable) -> Self {
        Self {
            table: resource.table,
            id: ColumnRef::new(resource.table, resource.id_column),
            joins: Vec::new(),
            filters: Vec::new(),
        }
    }

    /// Join the relation's path, restricting the last table to `values`
    pub fn join_relation(mut self, relation: &FieldRelation, values: &[String]) -> Self {
        if relation.path.is_empty() {
            return self;
        }
        for step in relation.path {
            self.joins.push(Join {
                table: step.table,
                alias: step.alias,
                on: join_condition(step),
            });
        }

        let target = ColumnRef::new(relation.target_alias(), relation.target_column);
        let restriction = match relation.matching {
            Matching::Substring => Predicate::ILikeAny(target, values.to_vec()),
            Matching::Exact => Predicate::InSet(target, values.to_vec()),
        };
        if let Some(last) = self.joins.last_mut() {
            last.on.push(restriction);
        }
        self
    }

    pub fn filter(mut self, predicate: Predicate) -> Self {
        self.filters.push(predicate);
        self
    }

    pub fn to_sql(&self, params: &mut SqlParams) -> String {
        let mut sql = format!("SELECT DISTINCT {} FROM {}", self.id, self.table);
        for join in &self.joins {
            sql.push(' ');
            sql.push_str(&join.to_sql(params));
        }
        if !self.filters.is_empty() {
            let filters: Vec<String> = self.filters.iter().map(|p| p.to_sql(params)).collect();
            sql.push_str(" WHERE ");
            sql.push_str(&filters.join(" AND "));
        }
        sql
    }
}

fn join_condition(step: &JoinStep) -> Vec<Predicate> {
    let mut on = vec![Predicate::ColumnsEq(
        ColumnRef::new(step.alias, step.column),
        ColumnRef::new(step.parent, step.parent_column),
    )];
    if let Some(role) = step.role {
        on.push(Predicate::TextEq(
            ColumnRef::new(step.alias, "role"),
            role.to_string(),
        ));
    }
    on
}

//! Canonical search parameters
//!
//! Output of the sanitizer and input of the compiler. Values in here are
//! already validated: free-text values are lower-cased `%…%` patterns,
//! vocabulary values are trimmed, date descriptors are typed.

use std::collections::BTreeMap;

use serde_json::{Map, Value, json};

use super::interval::{DateInterval, interval_to_inclusive};
use crate::utils::sql::unescape_like_pattern;

/// Suffix of the per-field operator keys (`title_boolean_op`, ...)
pub const BOOLEAN_OP_SUFFIX: &str = "_boolean_op";

/// Searchable fields.
///
/// Declaration order is the allow-list order and the order in which the
/// compiler applies predicates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Field {
    Title,
    Author,
    Publisher,
    Theme,
    NamedEntity,
    Institution,
    Date,
}

impl Field {
    pub const ALL: [Field; 7] = [
        Field::Title,
        Field::Author,
        Field::Publisher,
        Field::Theme,
        Field::NamedEntity,
        Field::Institution,
        Field::Date,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::Author => "author",
            Self::Publisher => "publisher",
            Self::Theme => "theme",
            Self::NamedEntity => "named_entity",
            Self::Institution => "institution",
            Self::Date => "date",
        }
    }

    /// Key of this field's boolean operator parameter
    pub fn operator_key(&self) -> &'static str {
        match self {
            Self::Title => "title_boolean_op",
            Self::Author => "author_boolean_op",
            Self::Publisher => "publisher_boolean_op",
            Self::Theme => "theme_boolean_op",
            Self::NamedEntity => "named_entity_boolean_op",
            Self::Institution => "institution_boolean_op",
            Self::Date => "date_boolean_op",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.as_str() == s)
    }

    /// Matching mode of a value field; `None` for the date field
    pub fn matching(&self) -> Option<Matching> {
        match self {
            Self::Title | Self::Author | Self::Publisher => Some(Matching::Substring),
            Self::Theme | Self::NamedEntity | Self::Institution => Some(Matching::Exact),
            Self::Date => None,
        }
    }
}

/// How a field's values are compared with the stored names
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Matching {
    /// Case-insensitive `%value%` match, any value may hit
    Substring,
    /// Equality with any of the values (controlled vocabulary)
    Exact,
}

/// Per-field boolean operator
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BooleanOp {
    #[default]
    And,
    Or,
    Not,
}

impl BooleanOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::And => "and",
            Self::Or => "or",
            Self::Not => "not",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "and" => Some(Self::And),
            "or" => Some(Self::Or),
            "not" => Some(Self::Not),
            _ => None,
        }
    }
}

/// Date filter kinds as named on the wire
pub const DATE_RANGE: &str = "dateRange";
pub const DATE_EXACT: &str = "dateExact";
pub const DATE_BEFORE: &str = "dateBefore";
pub const DATE_AFTER: &str = "dateAfter";

/// One validated date descriptor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateFilter {
    /// Dated resources overlapping the interval
    Range(DateInterval),
    /// Resources dated exactly this one-year interval
    Exact(DateInterval),
    /// Dated resources starting at or before the year
    Before { year: i32 },
    /// Dated resources whose exclusive upper bound is at or after the year
    After { year: i32 },
}

impl DateFilter {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Range(_) => DATE_RANGE,
            Self::Exact(_) => DATE_EXACT,
            Self::Before { .. } => DATE_BEFORE,
            Self::After { .. } => DATE_AFTER,
        }
    }

    /// Inclusive `data` list as accepted by the sanitizer
    pub fn data(&self) -> Vec<i32> {
        match self {
            Self::Range(interval) => interval_to_inclusive(Some(interval))
                .map(|pair| pair.to_vec())
                .unwrap_or_default(),
            Self::Exact(interval) => vec![interval.lower()],
            Self::Before { year } | Self::After { year } => vec![*year],
        }
    }
}

/// Values and operator of one participating value field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldFilter {
    pub values: Vec<String>,
    pub op: BooleanOp,
}

/// Retained date descriptors, OR'd together, and the date operator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateFilters {
    pub filters: Vec<DateFilter>,
    pub op: BooleanOp,
}

/// Sanitized filter parameter set.
///
/// Only participating fields are stored: a field with no values (or a date
/// list whose descriptors were all dropped) is absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterParams {
    fields: BTreeMap<Field, FieldFilter>,
    dates: Option<DateFilters>,
}

impl FilterParams {
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty() && self.dates.is_none()
    }

    pub fn field(&self, field: Field) -> Option<&FieldFilter> {
        self.fields.get(&field)
    }

    pub fn dates(&self) -> Option<&DateFilters> {
        self.dates.as_ref()
    }

    /// Value fields in allow-list order
    pub fn fields(&self) -> impl Iterator<Item = (Field, &FieldFilter)> {
        self.fields.iter().map(|(field, filter)| (*field, filter))
    }

    /// Operator of a participating field
    pub fn operator(&self, field: Field) -> Option<BooleanOp> {
        match field {
            Field::Date => self.dates.as_ref().map(|d| d.op),
            _ => self.fields.get(&field).map(|f| f.op),
        }
    }

    pub(crate) fn insert_field(&mut self, field: Field, filter: FieldFilter) {
        self.fields.insert(field, filter);
    }

    pub(crate) fn set_dates(&mut self, dates: DateFilters) {
        self.dates = Some(dates);
    }

    pub(crate) fn set_operator(&mut self, field: Field, op: BooleanOp) {
        match field {
            Field::Date => {
                if let Some(dates) = self.dates.as_mut() {
                    dates.op = op;
                }
            }
            _ => {
                if let Some(filter) = self.fields.get_mut(&field) {
                    filter.op = op;
                }
            }
        }
    }

    /// Render back into the raw request shape.
    ///
    /// Free-text patterns are unwrapped so that sanitizing the result yields
    /// these same parameters again.
    pub fn to_raw(&self) -> Map<String, Value> {
        let mut raw = Map::new();
        for (field, filter) in &self.fields {
            let values: Vec<Value> = filter
                .values
                .iter()
                .map(|v| match field.matching() {
                    Some(Matching::Substring) => Value::String(unwrap_pattern(v)),
                    _ => Value::String(v.clone()),
                })
                .collect();
            raw.insert(field.as_str().to_string(), Value::Array(values));
            raw.insert(
                field.operator_key().to_string(),
                Value::String(filter.op.as_str().to_string()),
            );
        }
        if let Some(dates) = &self.dates {
            let descriptors: Vec<Value> = dates
                .filters
                .iter()
                .map(|f| json!({ "filter": f.kind(), "data": f.data() }))
                .collect();
            raw.insert(Field::Date.as_str().to_string(), Value::Array(descriptors));
            raw.insert(
                Field::Date.operator_key().to_string(),
                Value::String(dates.op.as_str().to_string()),
            );
        }
        raw
    }
}

fn unwrap_pattern(pattern: &str) -> String {
    let inner = pattern
        .strip_prefix('%')
        .and_then(|p| p.strip_suffix('%'))
        .unwrap_or(pattern);
    unescape_like_pattern(inner)
}

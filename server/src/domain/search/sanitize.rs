//! Search parameter sanitizer
//!
//! Turns an untrusted JSON object into [`FilterParams`]. Anything outside
//! the allow-list or of the wrong shape rejects the whole request.

use std::collections::BTreeMap;

use serde_json::{Map, Value};

use super::error::SearchError;
use super::interval::{DateInterval, inclusive_to_interval};
use super::params::{
    BOOLEAN_OP_SUFFIX, BooleanOp, DATE_AFTER, DATE_BEFORE, DATE_EXACT, DATE_RANGE, DateFilter,
    DateFilters, Field, FieldFilter, FilterParams, Matching,
};
use crate::utils::sql::{escape_like_pattern, simplify_text};

/// Maximum number of values per field
pub const MAX_VALUES_PER_FIELD: usize = 50;

/// Maximum number of date descriptors per request
pub const MAX_DATE_FILTERS: usize = 20;

/// Maximum length of a single value (characters)
pub const MAX_VALUE_CHARS: usize = 256;

/// Order in which fields compete for the `or` -> `and` rewrite
/// (ascending parameter name).
const COHERENCE_ORDER: [Field; 7] = [
    Field::Author,
    Field::Date,
    Field::Institution,
    Field::NamedEntity,
    Field::Publisher,
    Field::Theme,
    Field::Title,
];

/// Validate and normalize raw search parameters.
///
/// `null` values are treated as absent. Fields left without values after
/// cleaning do not participate, whatever their operator.
pub fn sanitize(raw: &Map<String, Value>) -> Result<FilterParams, SearchError> {
    sanitize_inner(raw).inspect_err(|e| {
        tracing::debug!(error = %e, code = e.code(), "Rejected search parameters");
    })
}

fn sanitize_inner(raw: &Map<String, Value>) -> Result<FilterParams, SearchError> {
    let mut values: BTreeMap<Field, &Value> = BTreeMap::new();
    let mut operators: BTreeMap<Field, BooleanOp> = BTreeMap::new();

    for (key, value) in raw {
        if let Some(field) = Field::parse(key) {
            values.insert(field, value);
        } else if let Some(field) = key.strip_suffix(BOOLEAN_OP_SUFFIX).and_then(Field::parse) {
            operators.insert(field, parse_operator(key, value)?);
        } else {
            return Err(SearchError::InvalidParameterName(key.clone()));
        }
    }

    let mut params = FilterParams::default();
    for (field, value) in values {
        let op = operators.get(&field).copied().unwrap_or_default();
        match field.matching() {
            None => {
                let filters = sanitize_date(value)?;
                if !filters.is_empty() {
                    params.set_dates(DateFilters { filters, op });
                }
            }
            Some(matching) => {
                let values = sanitize_values(field, matching, value)?;
                if !values.is_empty() {
                    params.insert_field(field, FieldFilter { values, op });
                }
            }
        }
    }

    enforce_coherence(&mut params);
    tracing::trace!(params = ?params, "Sanitized search parameters");
    Ok(params)
}

fn parse_operator(key: &str, value: &Value) -> Result<BooleanOp, SearchError> {
    match value {
        Value::Null => Ok(BooleanOp::default()),
        Value::String(s) => BooleanOp::parse(s).ok_or_else(|| SearchError::InvalidBooleanOperator {
            name: key.to_string(),
            value: s.clone(),
        }),
        other => Err(SearchError::InvalidBooleanOperator {
            name: key.to_string(),
            value: other.to_string(),
        }),
    }
}

fn sanitize_values(
    field: Field,
    matching: Matching,
    value: &Value,
) -> Result<Vec<String>, SearchError> {
    let items = match value {
        Value::Null => return Ok(Vec::new()),
        Value::Array(items) => items,
        _ => return Err(shape_error(field.as_str(), "a list of strings")),
    };
    if items.len() > MAX_VALUES_PER_FIELD {
        return Err(SearchError::TooManyValues {
            name: field.as_str().to_string(),
            max: MAX_VALUES_PER_FIELD,
        });
    }

    let mut out: Vec<String> = Vec::with_capacity(items.len());
    for item in items {
        let Value::String(s) = item else {
            return Err(shape_error(field.as_str(), "a list of strings"));
        };
        if s.chars().count() > MAX_VALUE_CHARS {
            return Err(shape_error(
                field.as_str(),
                "a list of strings of at most 256 characters",
            ));
        }
        let cleaned = match matching {
            Matching::Substring => {
                let text = simplify_text(s);
                if text.is_empty() {
                    continue;
                }
                format!("%{}%", escape_like_pattern(&text))
            }
            Matching::Exact => {
                let text = s.trim();
                if text.is_empty() {
                    continue;
                }
                text.to_string()
            }
        };
        if !out.contains(&cleaned) {
            out.push(cleaned);
        }
    }
    Ok(out)
}

/// Validate the `date` parameter: a list of `{filter, data}` descriptors.
///
/// `data` entries are coerced to integers and sorted. Descriptors with empty
/// `data` are dropped.
pub fn sanitize_date(value: &Value) -> Result<Vec<DateFilter>, SearchError> {
    let name = Field::Date.as_str();
    let items = match value {
        Value::Null => return Ok(Vec::new()),
        Value::Array(items) => items,
        _ => return Err(shape_error(name, "a list of date filters")),
    };
    if items.len() > MAX_DATE_FILTERS {
        return Err(SearchError::TooManyValues {
            name: name.to_string(),
            max: MAX_DATE_FILTERS,
        });
    }

    let mut filters = Vec::with_capacity(items.len());
    for item in items {
        if let Some(filter) = sanitize_date_filter(item)?
            && !filters.contains(&filter)
        {
            filters.push(filter);
        }
    }
    Ok(filters)
}

fn sanitize_date_filter(item: &Value) -> Result<Option<DateFilter>, SearchError> {
    const EXPECTED: &str = "a list of {filter, data} objects";
    let name = Field::Date.as_str();

    let Value::Object(obj) = item else {
        return Err(shape_error(name, EXPECTED));
    };
    let (Some(kind), Some(data), 2) = (obj.get("filter"), obj.get("data"), obj.len()) else {
        return Err(shape_error(name, EXPECTED));
    };
    let Value::String(kind) = kind else {
        return Err(shape_error(name, EXPECTED));
    };
    let Value::Array(data) = data else {
        return Err(shape_error(name, EXPECTED));
    };

    let kind = DateKind::parse(kind)?;

    let mut years = data.iter().map(coerce_year).collect::<Result<Vec<_>, _>>()?;
    years.sort_unstable();

    let filter = match (kind, years.as_slice()) {
        (_, []) => None,
        (DateKind::Range, [_, _]) => inclusive_to_interval(&years)?.map(DateFilter::Range),
        (DateKind::Exact, [year]) => {
            Some(DateFilter::Exact(DateInterval::singleton(*year).ok_or_else(|| {
                SearchError::InvalidDateValue(format!("year {} is out of range", year))
            })?))
        }
        (DateKind::Before, [year]) => Some(DateFilter::Before { year: *year }),
        (DateKind::After, [year]) => Some(DateFilter::After { year: *year }),
        (kind, years) => {
            return Err(SearchError::InvalidDateArity {
                filter: kind.as_str(),
                expected: kind.arity(),
                got: years.len(),
            });
        }
    };
    Ok(filter)
}

/// `filter` tag of a date descriptor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DateKind {
    Range,
    Exact,
    Before,
    After,
}

impl DateKind {
    fn parse(s: &str) -> Result<Self, SearchError> {
        match s {
            DATE_RANGE => Ok(Self::Range),
            DATE_EXACT => Ok(Self::Exact),
            DATE_BEFORE => Ok(Self::Before),
            DATE_AFTER => Ok(Self::After),
            other => Err(SearchError::InvalidDateFilter(other.to_string())),
        }
    }

    fn as_str(self) -> &'static str {
        match self {
            Self::Range => DATE_RANGE,
            Self::Exact => DATE_EXACT,
            Self::Before => DATE_BEFORE,
            Self::After => DATE_AFTER,
        }
    }

    fn arity(self) -> &'static str {
        match self {
            Self::Range => "0 or 2",
            Self::Exact | Self::Before | Self::After => "0 or 1",
        }
    }
}

/// Integers and strings holding an integer are accepted
fn coerce_year(value: &Value) -> Result<i32, SearchError> {
    let year = match value {
        Value::Number(n) => n.as_i64().and_then(|n| i32::try_from(n).ok()),
        Value::String(s) => s.trim().parse::<i32>().ok(),
        _ => None,
    };
    year.ok_or_else(|| SearchError::InvalidDateValue(value.to_string()))
}

/// Anchor an all-`or` search with `and`.
///
/// When every participating field uses `or`, the first one in
/// [`COHERENCE_ORDER`] becomes `and`. Without that anchor the union would
/// start from the unfiltered collection. Any `and` or `not` field leaves
/// the operators untouched.
fn enforce_coherence(params: &mut FilterParams) {
    let operators: Vec<(Field, BooleanOp)> = COHERENCE_ORDER
        .into_iter()
        .filter_map(|field| params.operator(field).map(|op| (field, op)))
        .collect();

    if !operators.iter().all(|(_, op)| *op == BooleanOp::Or) {
        return;
    }
    if let Some((field, _)) = operators.first() {
        tracing::debug!(
            field = field.as_str(),
            "Every search field uses 'or', rewriting the first to 'and'"
        );
        params.set_operator(*field, BooleanOp::And);
    }
}

fn shape_error(name: &str, expected: &'static str) -> SearchError {
    SearchError::InvalidParameterShape {
        name: name.to_string(),
        expected,
    }
}

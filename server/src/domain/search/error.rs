//! Search parameter errors

use thiserror::Error;

/// Rejection reasons for an advanced search request.
///
/// Every variant is a client error: the request is refused as a whole and
/// no query is built.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SearchError {
    #[error("Unknown search parameter: {0}")]
    InvalidParameterName(String),

    #[error("Parameter '{name}' must be {expected}")]
    InvalidParameterShape { name: String, expected: &'static str },

    #[error("Invalid boolean operator for '{name}': {value} (expected and, or, not)")]
    InvalidBooleanOperator { name: String, value: String },

    #[error("Invalid date value: {0}")]
    InvalidDateValue(String),

    #[error("Date filter {filter} takes {expected} values, got {got}")]
    InvalidDateArity {
        filter: &'static str,
        expected: &'static str,
        got: usize,
    },

    #[error("Interval list must have 0 or 2 elements, got {0}")]
    InvalidIntervalArity(usize),

    #[error("Unknown date filter: {0} (expected dateRange, dateExact, dateBefore, dateAfter)")]
    InvalidDateFilter(String),

    #[error("Parameter '{name}' accepts at most {max} values")]
    TooManyValues { name: String, max: usize },
}

impl SearchError {
    /// Machine-readable code used in API error bodies
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidParameterName(_) => "INVALID_PARAMETER_NAME",
            Self::InvalidParameterShape { .. } => "INVALID_PARAMETER_SHAPE",
            Self::InvalidBooleanOperator { .. } => "INVALID_BOOLEAN_OPERATOR",
            Self::InvalidDateValue(_) => "INVALID_DATE_VALUE",
            Self::InvalidDateArity { .. } => "INVALID_DATE_ARITY",
            Self::InvalidIntervalArity(_) => "INVALID_INTERVAL_ARITY",
            Self::InvalidDateFilter(_) => "INVALID_DATE_FILTER",
            Self::TooManyValues { .. } => "TOO_MANY_VALUES",
        }
    }
}

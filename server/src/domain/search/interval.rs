//! Year intervals
//!
//! Dates are stored as half-open `int4range` values `[lower, upper)` and
//! exposed to clients as inclusive `[first, last]` year pairs. The two
//! conversion functions below are the only place where the off-by-one
//! translation happens.

use std::fmt;

use super::error::SearchError;

/// Half-open year interval `[lower, upper)`.
///
/// `lower <= upper` always holds; `lower == upper` is the empty interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DateInterval {
    lower: i32,
    upper: i32,
}

impl DateInterval {
    /// Returns `None` when `lower > upper`
    pub fn new(lower: i32, upper: i32) -> Option<Self> {
        (lower <= upper).then_some(Self { lower, upper })
    }

    /// The one-year interval `[year, year + 1)`
    pub fn singleton(year: i32) -> Option<Self> {
        year.checked_add(1).map(|upper| Self { lower: year, upper })
    }

    pub fn lower(&self) -> i32 {
        self.lower
    }

    pub fn upper(&self) -> i32 {
        self.upper
    }

    pub fn is_empty(&self) -> bool {
        self.lower == self.upper
    }

    /// Overlap of two intervals; empty when they do not meet
    pub fn intersection(&self, other: &Self) -> Self {
        let lower = self.lower.max(other.lower);
        let upper = self.upper.min(other.upper);
        if lower < upper {
            Self { lower, upper }
        } else {
            Self {
                lower,
                upper: lower,
            }
        }
    }
}

impl fmt::Display for DateInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            write!(f, "empty")
        } else {
            write!(f, "[{},{})", self.lower, self.upper)
        }
    }
}

/// Convert an interval to its inclusive `[first, last]` pair.
///
/// Absent and empty intervals both mean "no date" and yield `None`.
pub fn interval_to_inclusive(interval: Option<&DateInterval>) -> Option<[i32; 2]> {
    interval
        .filter(|i| !i.is_empty())
        .map(|i| [i.lower, i.upper - 1])
}

/// Convert an inclusive `[first, last]` pair to a half-open interval.
///
/// An empty slice yields `Ok(None)`. Any length other than 0 or 2 fails with
/// [`SearchError::InvalidIntervalArity`].
pub fn inclusive_to_interval(bounds: &[i32]) -> Result<Option<DateInterval>, SearchError> {
    match bounds {
        [] => Ok(None),
        [first, last] => {
            if first > last {
                return Err(SearchError::InvalidDateValue(format!(
                    "interval start {} is after its end {}",
                    first, last
                )));
            }
            let upper = last.checked_add(1).ok_or_else(|| {
                SearchError::InvalidDateValue(format!("year {} is out of range", last))
            })?;
            Ok(Some(DateInterval {
                lower: *first,
                upper,
            }))
        }
        other => Err(SearchError::InvalidIntervalArity(other.len())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inclusive_to_interval_adds_one_to_upper() {
        let interval = inclusive_to_interval(&[1800, 1810]).unwrap().unwrap();
        assert_eq!(interval.lower(), 1800);
        assert_eq!(interval.upper(), 1811);
        assert_eq!(interval.to_string(), "[1800,1811)");
    }

    #[test]
    fn test_interval_to_inclusive_restores_bounds() {
        let interval = DateInterval::new(1800, 1811).unwrap();
        assert_eq!(interval_to_inclusive(Some(&interval)), Some([1800, 1810]));
    }

    #[test]
    fn test_round_trip() {
        let pairs = [
            [1800, 1810],
            [1826, 1826],
            [-50, 50],
            [0, 0],
            [i32::MIN, i32::MIN],
            [i32::MAX - 1, i32::MAX - 1],
        ];
        for [a, b] in pairs {
            let interval = inclusive_to_interval(&[a, b]).unwrap();
            assert_eq!(interval_to_inclusive(interval.as_ref()), Some([a, b]));
        }
    }

    #[test]
    fn test_empty_list_is_absent() {
        assert_eq!(inclusive_to_interval(&[]).unwrap(), None);
        assert_eq!(interval_to_inclusive(None), None);
    }

    #[test]
    fn test_empty_interval_has_no_inclusive_form() {
        let empty = DateInterval::new(1820, 1820).unwrap();
        assert!(empty.is_empty());
        assert_eq!(interval_to_inclusive(Some(&empty)), None);
        assert_eq!(empty.to_string(), "empty");
    }

    #[test]
    fn test_bad_arity() {
        assert_eq!(
            inclusive_to_interval(&[1800]),
            Err(SearchError::InvalidIntervalArity(1))
        );
        assert_eq!(
            inclusive_to_interval(&[1800, 1801, 1802]),
            Err(SearchError::InvalidIntervalArity(3))
        );
    }

    #[test]
    fn test_reversed_bounds_rejected() {
        assert!(matches!(
            inclusive_to_interval(&[1810, 1800]),
            Err(SearchError::InvalidDateValue(_))
        ));
    }

    #[test]
    fn test_upper_overflow_rejected() {
        assert!(matches!(
            inclusive_to_interval(&[0, i32::MAX]),
            Err(SearchError::InvalidDateValue(_))
        ));
        assert_eq!(DateInterval::singleton(i32::MAX), None);
    }

    #[test]
    fn test_new_rejects_reversed() {
        assert_eq!(DateInterval::new(5, 4), None);
        assert!(DateInterval::new(4, 4).is_some());
    }

    #[test]
    fn test_singleton() {
        let year = DateInterval::singleton(1826).unwrap();
        assert_eq!(interval_to_inclusive(Some(&year)), Some([1826, 1826]));
    }

    #[test]
    fn test_intersection() {
        let a = DateInterval::new(1815, 1821).unwrap();
        let b = DateInterval::new(1820, 1830).unwrap();
        assert_eq!(a.intersection(&b), DateInterval::new(1820, 1821).unwrap());

        let c = DateInterval::new(1821, 1830).unwrap();
        assert!(a.intersection(&c).is_empty());
    }

    #[test]
    fn test_intersection_with_empty() {
        let a = DateInterval::new(1815, 1821).unwrap();
        let empty = DateInterval::new(1818, 1818).unwrap();
        assert!(a.intersection(&empty).is_empty());
    }
}

//! Iconography row types

use serde::{Deserialize, Serialize};

use crate::domain::search::interval::DateInterval;

/// Iconography row returned by a search
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IconographyRow {
    pub id: i32,
    pub id_uuid: String,
    pub id_richelieu: String,
    pub iiif_url: Option<String>,
    pub source_url: Option<String>,
    pub date_source: Option<String>,
    pub date_corr: Option<String>,
    /// `lower(date)`, NULL for absent or empty ranges
    pub date_lower: Option<i32>,
    /// `upper(date)`, exclusive
    pub date_upper: Option<i32>,
    pub technique: Option<Vec<String>>,
    pub description: Option<String>,
    pub inscription: Option<String>,
    pub corpus: Option<String>,
    pub inventory_number: Option<String>,
    pub produced: Option<bool>,
    pub represents: Option<bool>,
    pub main_title: Option<String>,
}

impl IconographyRow {
    /// Stored date as a half-open interval
    pub fn date(&self) -> Option<DateInterval> {
        match (self.date_lower, self.date_upper) {
            (Some(lower), Some(upper)) => DateInterval::new(lower, upper),
            _ => None,
        }
    }
}

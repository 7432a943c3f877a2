//! Search API types

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::data::types::IconographyRow;
use crate::domain::search::interval_to_inclusive;

/// Date filter descriptor
#[derive(Debug, Deserialize, ToSchema)]
pub struct DateFilterRequest {
    /// One of `dateRange`, `dateExact`, `dateBefore`, `dateAfter`
    pub filter: String,
    /// Inclusive years: two for `dateRange`, one otherwise, or none
    pub data: Vec<i32>,
}

/// Search parameters
///
/// Every field is optional. Each `*_boolean_op` is one of `and` (default),
/// `or`, `not`. Any other key rejects the request.
#[derive(Debug, Deserialize, ToSchema)]
pub struct SearchRequest {
    pub title: Option<Vec<String>>,
    pub title_boolean_op: Option<String>,
    pub author: Option<Vec<String>>,
    pub author_boolean_op: Option<String>,
    pub publisher: Option<Vec<String>>,
    pub publisher_boolean_op: Option<String>,
    pub theme: Option<Vec<String>>,
    pub theme_boolean_op: Option<String>,
    pub named_entity: Option<Vec<String>>,
    pub named_entity_boolean_op: Option<String>,
    pub institution: Option<Vec<String>>,
    pub institution_boolean_op: Option<String>,
    pub date: Option<Vec<DateFilterRequest>>,
    pub date_boolean_op: Option<String>,
}

/// Iconography resource as returned by search
#[derive(Debug, Serialize, ToSchema)]
pub struct IconographyItem {
    pub id: i32,
    pub id_uuid: String,
    pub id_richelieu: String,
    pub iiif_url: Option<String>,
    pub source_url: Option<String>,
    pub date_source: Option<String>,
    pub date_corr: Option<String>,
    /// Inclusive `[first, last]` years
    #[schema(value_type = Option<Vec<i32>>)]
    pub date: Option<[i32; 2]>,
    pub technique: Option<Vec<String>>,
    pub description: Option<String>,
    pub inscription: Option<String>,
    pub corpus: Option<String>,
    pub inventory_number: Option<String>,
    pub produced: Option<bool>,
    pub represents: Option<bool>,
    /// Main title, if any
    pub title: Option<String>,
}

impl From<IconographyRow> for IconographyItem {
    fn from(row: IconographyRow) -> Self {
        let date = interval_to_inclusive(row.date().as_ref());
        Self {
            id: row.id,
            id_uuid: row.id_uuid,
            id_richelieu: row.id_richelieu,
            iiif_url: row.iiif_url,
            source_url: row.source_url,
            date_source: row.date_source,
            date_corr: row.date_corr,
            date,
            technique: row.technique,
            description: row.description,
            inscription: row.inscription,
            corpus: row.corpus,
            inventory_number: row.inventory_number,
            produced: row.produced,
            represents: row.represents,
            title: row.main_title,
        }
    }
}

/// Search results
#[derive(Debug, Serialize, ToSchema)]
pub struct SearchResponse {
    pub data: Vec<IconographyItem>,
    pub total: usize,
}

impl SearchResponse {
    pub fn new(rows: Vec<IconographyRow>) -> Self {
        let data: Vec<IconographyItem> = rows.into_iter().map(Into::into).collect();
        Self {
            total: data.len(),
            data,
        }
    }
}

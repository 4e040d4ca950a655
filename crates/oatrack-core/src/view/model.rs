//! Display primitives produced by the projector.

use serde::Serialize;

use crate::filter::CompanySelector;

pub const FAVORITE_GLYPH: &str = "★";
pub const NOT_FAVORITE_GLYPH: &str = "☆";
pub const EMPTY_MESSAGE: &str = "No answers found. Add your first answer above!";

/// One table row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RowView {
    pub id: String,
    pub company: String,
    pub date: String,
    pub question: String,
    pub answer: String,
    pub favorite: bool,
    pub favorite_glyph: &'static str,
}

/// Prev/next controls and the page caption.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationView {
    pub page: usize,
    pub page_count: usize,
    pub total: usize,
    pub has_prev: bool,
    pub has_next: bool,
    pub label: String,
}

/// Everything the table layout needs to draw one page.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TableView {
    pub rows: Vec<RowView>,
    /// Present only when there is more than one page.
    pub pagination: Option<PaginationView>,
    /// Present only when the page has no rows.
    pub empty_message: Option<String>,
    pub companies: CompanySelector,
}

impl TableView {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// One entry of the card layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CardView {
    pub id: String,
    /// `company · date`
    pub header: String,
    pub question: String,
    pub answer: String,
    pub favorite_glyph: &'static str,
}

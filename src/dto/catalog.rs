use serde::Serialize;

use crate::domain::dialog::Dialog;
use crate::domain::filter::LeadFilter;
use crate::dto::leads::{CustomerSummary, LeadCard};
use crate::pagination::Paginated;

/// Bedroom tag chip in the filter panel.
#[derive(Debug, Serialize, PartialEq)]
pub struct BhkChip {
    pub label: &'static str,
    pub active: bool,
}

/// Data required to render the leads inbox.
#[derive(Debug, Serialize)]
pub struct CatalogPageData {
    pub customer: Option<CustomerSummary>,
    pub leads: Paginated<LeadCard>,
    pub filter: LeadFilter,
    /// Encoded filter, without `page`, for pagination links.
    pub filter_query: String,
    pub bhk_chips: Vec<BhkChip>,
    pub load_error: Option<String>,
    /// Purchase confirmation requested through the page query.
    pub confirm_dialog: Option<Dialog>,
}

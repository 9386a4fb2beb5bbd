use serde::Serialize;

use crate::domain::dialog::Dialog;
use crate::dto::leads::{CustomerSummary, LeadCard};

/// Data for the saved and contacted lead pages.
#[derive(Debug, Serialize)]
pub struct CollectionPageData {
    pub customer: CustomerSummary,
    /// Cards left after applying the local search.
    pub leads: Vec<LeadCard>,
    /// Number of cards left after searching.
    pub total: usize,
    pub search_query: Option<String>,
    pub load_error: Option<String>,
    /// Page URL, search included, that actions on a card return to.
    pub return_to: String,
    /// Purchase confirmation requested through the page query.
    pub confirm_dialog: Option<Dialog>,
}

use serde::Serialize;

use crate::dto::leads::CustomerSummary;

/// Data required to render the dashboard overview.
#[derive(Debug, Serialize)]
pub struct OverviewPageData {
    pub customer: CustomerSummary,
    /// Leads whose creation time falls on or after the start of today.
    pub leads_added_today: usize,
    /// Leads in the marketplace, as counted by the backend.
    pub total_available: usize,
    /// Set when the lead listing could not be loaded.
    pub load_error: Option<String>,
}

use serde::Serialize;

use crate::dto::leads::{CustomerSummary, LeadCard};

/// Data required to render the profile page.
#[derive(Debug, Serialize)]
pub struct ProfilePageData {
    pub customer: CustomerSummary,
    pub number: String,
    pub joined_on: String,
    pub purchased: Vec<LeadCard>,
    /// Set when the page fell back to the stored snapshot.
    pub load_error: Option<String>,
}

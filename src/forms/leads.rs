use chrono::NaiveDate;
use serde::Deserialize;
use validator::Validate;

use crate::domain::filter::LeadFilter;
use crate::domain::types::LeadId;
use crate::forms::FormError;

/// Leads inbox query string.
///
/// Values arrive as free text from the filter panel; anything that does
/// not parse as its expected type is treated as unset.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogQueryForm {
    #[serde(default, rename = "type")]
    pub lead_type: Option<String>,
    #[serde(default)]
    pub sub_type: Option<String>,
    /// Repeated `bhk` keys, each possibly comma-joined.
    #[serde(default)]
    pub bhk: Vec<String>,
    #[serde(default)]
    pub areas: Option<String>,
    #[serde(default)]
    pub min_price: Option<String>,
    #[serde(default)]
    pub max_price: Option<String>,
    #[serde(default)]
    pub occupancy_type: Option<String>,
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub end_date: Option<String>,
    #[serde(default)]
    pub page: Option<String>,
    /// Lead awaiting purchase confirmation.
    #[serde(default)]
    pub confirm: Option<String>,
    /// Bedroom tag to flip before loading.
    #[serde(default)]
    pub toggle_bhk: Option<String>,
    /// Clears every filter before loading when present.
    #[serde(default)]
    pub reset: Option<String>,
}

fn parse_trimmed<T: std::str::FromStr>(value: Option<&String>) -> Option<T> {
    value.and_then(|v| v.trim().parse().ok())
}

fn parse_date(value: Option<&String>) -> Option<NaiveDate> {
    value.and_then(|v| NaiveDate::parse_from_str(v.trim(), "%Y-%m-%d").ok())
}

impl CatalogQueryForm {
    pub fn parse(query: &str) -> Result<Self, FormError> {
        serde_html_form::from_str(query).map_err(|e| FormError::InvalidQuery(e.to_string()))
    }

    pub fn filter(&self) -> LeadFilter {
        let bhk = self
            .bhk
            .iter()
            .flat_map(|value| value.split(','))
            .map(str::to_string)
            .collect();

        LeadFilter::new(
            self.lead_type.clone(),
            self.sub_type.clone(),
            bhk,
            self.areas.clone(),
            parse_trimmed(self.min_price.as_ref()),
            parse_trimmed(self.max_price.as_ref()),
            self.occupancy_type.clone(),
            parse_date(self.start_date.as_ref()),
            parse_date(self.end_date.as_ref()),
        )
    }

    pub fn page(&self) -> Option<usize> {
        parse_trimmed(self.page.as_ref())
    }

    pub fn confirm(&self) -> Option<LeadId> {
        self.confirm.as_ref().and_then(|id| LeadId::new(id).ok())
    }

    pub fn toggled_bhk(&self) -> Option<String> {
        self.toggle_bhk
            .as_deref()
            .map(str::trim)
            .filter(|tag| !tag.is_empty())
            .map(str::to_string)
    }

    pub fn reset(&self) -> bool {
        self.reset.is_some()
    }
}

/// Encodes the filter as an inbox query string, without `page`.
pub fn filter_query_string(filter: &LeadFilter) -> String {
    serde_html_form::to_string(filter.to_query_pairs()).unwrap_or_else(|err| {
        log::error!("Failed to encode filter query: {err}");
        String::new()
    })
}

/// Inbox path for the given criteria and page.
pub fn inbox_path(filter: &LeadFilter, page: usize) -> String {
    let query = filter_query_string(filter);
    if query.is_empty() {
        format!("/leads-inbox?page={page}")
    } else {
        format!("/leads-inbox?{query}&page={page}")
    }
}

#[derive(Deserialize, Validate)]
/// Purchase or save action posted from a lead card.
pub struct LeadActionForm {
    #[validate(length(min = 1))]
    pub lead_id: String,
    /// Page to return to after the action.
    #[serde(default)]
    pub return_to: Option<String>,
}

impl LeadActionForm {
    pub fn lead_id(&self) -> Result<LeadId, FormError> {
        self.validate()?;
        LeadId::new(&self.lead_id).map_err(|_| FormError::InvalidLeadId)
    }

    /// Local path to redirect to, or `fallback` when missing or off-site.
    pub fn return_path(&self, fallback: &str) -> String {
        match self.return_to.as_deref().map(str::trim) {
            Some(path) if is_local_path(path) => path.to_string(),
            _ => fallback.to_string(),
        }
    }
}

/// Browsers read `\` as `/` and drop control characters, so either can turn
/// a path into a protocol-relative URL.
fn is_local_path(path: &str) -> bool {
    path.starts_with('/')
        && !path.starts_with("//")
        && !path.chars().any(|c| c == '\\' || c.is_control())
}

/// Local search box on the saved and contacted pages.
#[derive(Debug, Default, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: Option<String>,
    /// Saved lead awaiting purchase confirmation.
    #[serde(default)]
    pub confirm: Option<String>,
}

impl SearchQuery {
    pub fn confirm(&self) -> Option<LeadId> {
        self.confirm.as_deref().and_then(|id| LeadId::new(id).ok())
    }
}

/// Saved page path keeping the active search.
pub fn saved_path(query: Option<&str>) -> String {
    let encoded = serde_html_form::to_string([("q", query.unwrap_or_default())])
        .unwrap_or_else(|err| {
            log::error!("Failed to encode saved search: {err}");
            "q=".to_string()
        });
    format!("/saved?{encoded}")
}

//! Lead filter criteria and their query-string encoding.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Page size used by the catalog when the configuration does not override it.
pub const DEFAULT_PAGE_SIZE: usize = 25;

/// Bedroom-count tags offered by the filter panel.
pub const BHK_OPTIONS: &[&str] = &["1BHK", "2BHK", "3BHK", "4BHK", "5BHK", "6BHK", "6+BHK"];

pub const TYPE_OPTIONS: &[&str] = &[
    "Residential Sell",
    "Residential Rent",
    "Commercial Sell",
    "Commercial Rent",
];

pub const SUB_TYPE_OPTIONS: &[&str] = &[
    "Apartment",
    "Bungalow",
    "Tenement",
    "Penthouse",
    "Weekend Home",
    "Rowhouse",
    "Residential Plot",
    "PG",
];

pub const AREA_OPTIONS: &[&str] = &[
    "Shela",
    "SouthBopal",
    "Bopal",
    "Shilaj",
    "Gota",
    "Jagatpur",
    "GodrejGardenCity",
    "Tragad",
    "Zundal",
    "Motera",
    "New CG Road",
    "Vaishnodevi",
];

pub const OCCUPANCY_OPTIONS: &[&str] = &["Family", "Bachelor", "Any"];

/// Optional predicates applied server-side to the lead listing.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeadFilter {
    pub lead_type: Option<String>,
    pub sub_type: Option<String>,
    pub bhk: Vec<String>,
    pub areas: Option<String>,
    pub min_price: Option<u64>,
    pub max_price: Option<u64>,
    pub occupancy_type: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

impl LeadFilter {
    /// Builds a filter, dropping blank strings and duplicate bedroom tags.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        lead_type: Option<String>,
        sub_type: Option<String>,
        bhk: Vec<String>,
        areas: Option<String>,
        min_price: Option<u64>,
        max_price: Option<u64>,
        occupancy_type: Option<String>,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> Self {
        let mut tags: Vec<String> = Vec::new();
        for tag in bhk.into_iter().map(|t| t.trim().to_string()) {
            if !tag.is_empty() && !tags.contains(&tag) {
                tags.push(tag);
            }
        }

        Self {
            lead_type: non_blank(lead_type),
            sub_type: non_blank(sub_type),
            bhk: tags,
            areas: non_blank(areas),
            min_price,
            max_price,
            occupancy_type: non_blank(occupancy_type),
            start_date,
            end_date,
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    pub fn has_bhk(&self, tag: &str) -> bool {
        self.bhk.iter().any(|t| t == tag)
    }

    /// Adds the bedroom tag when absent, removes it when present.
    pub fn toggle_bhk(&mut self, tag: &str) {
        let tag = tag.trim();
        if tag.is_empty() {
            return;
        }
        if self.has_bhk(tag) {
            self.bhk.retain(|t| t != tag);
        } else {
            self.bhk.push(tag.to_string());
        }
    }

    /// Backend query parameters for the set predicates, in a stable order.
    ///
    /// Unset predicates are omitted entirely; bedroom tags are comma-joined.
    pub fn to_query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();

        if let Some(value) = &self.lead_type {
            pairs.push(("type", value.clone()));
        }
        if let Some(value) = &self.sub_type {
            pairs.push(("subType", value.clone()));
        }
        if let Some(value) = &self.areas {
            pairs.push(("areas", value.clone()));
        }
        if !self.bhk.is_empty() {
            pairs.push(("bhk", self.bhk.join(",")));
        }
        if let Some(value) = self.min_price {
            pairs.push(("minPrice", value.to_string()));
        }
        if let Some(value) = self.max_price {
            pairs.push(("maxPrice", value.to_string()));
        }
        if let Some(value) = &self.occupancy_type {
            pairs.push(("occupancyType", value.clone()));
        }
        if let Some(value) = self.start_date {
            pairs.push(("startDate", value.format("%Y-%m-%d").to_string()));
        }
        if let Some(value) = self.end_date {
            pairs.push(("endDate", value.format("%Y-%m-%d").to_string()));
        }

        pairs
    }
}

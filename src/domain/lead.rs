use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::types::{LeadId, TypeConstraintError, lenient_timestamp, record_id};

/// Budget bounds attached to a lead.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Default)]
pub struct PriceRange {
    #[serde(default)]
    pub min: Option<f64>,
    #[serde(default)]
    pub max: Option<f64>,
}

/// A property requirement listed on the marketplace.
///
/// `name` and `number` are only populated by the backend once the viewing
/// customer has purchased the lead.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", try_from = "LeadRecord")]
pub struct Lead {
    pub id: LeadId,
    #[serde(rename = "type")]
    pub lead_type: Option<String>,
    pub sub_type: Option<String>,
    pub bhk: Option<String>,
    pub areas: Option<String>,
    pub occupancy_type: Option<String>,
    pub price_range: Option<PriceRange>,
    pub shifting_date: Option<DateTime<Utc>>,
    pub created_on: Option<DateTime<Utc>>,
    /// Purchase price in credits.
    pub credit: u64,
    pub name: Option<String>,
    pub number: Option<String>,
}

/// Lead as it appears on the wire, keyed by `_id`, `id` or both.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct LeadRecord {
    #[serde(rename = "_id")]
    record_id: Option<LeadId>,
    id: Option<LeadId>,
    #[serde(rename = "type", default)]
    lead_type: Option<String>,
    #[serde(default)]
    sub_type: Option<String>,
    #[serde(default)]
    bhk: Option<String>,
    #[serde(default)]
    areas: Option<String>,
    #[serde(default)]
    occupancy_type: Option<String>,
    #[serde(default)]
    price_range: Option<PriceRange>,
    #[serde(default, deserialize_with = "lenient_timestamp")]
    shifting_date: Option<DateTime<Utc>>,
    #[serde(default, alias = "createdAt", deserialize_with = "lenient_timestamp")]
    created_on: Option<DateTime<Utc>>,
    #[serde(default)]
    credit: u64,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    number: Option<String>,
}

impl TryFrom<LeadRecord> for Lead {
    type Error = TypeConstraintError;

    fn try_from(record: LeadRecord) -> Result<Self, Self::Error> {
        Ok(Self {
            id: record_id(record.record_id, record.id)?,
            lead_type: record.lead_type,
            sub_type: record.sub_type,
            bhk: record.bhk,
            areas: record.areas,
            occupancy_type: record.occupancy_type,
            price_range: record.price_range,
            shifting_date: record.shifting_date,
            created_on: record.created_on,
            credit: record.credit,
            name: record.name,
            number: record.number,
        })
    }
}

/// Unlocked contact details of a purchased lead.
#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct LeadContact {
    pub name: String,
    pub number: String,
}

impl Lead {
    /// Creates a lead carrying only its identifier.
    pub fn new(id: LeadId) -> Self {
        Self {
            id,
            lead_type: None,
            sub_type: None,
            bhk: None,
            areas: None,
            occupancy_type: None,
            price_range: None,
            shifting_date: None,
            created_on: None,
            credit: 0,
            name: None,
            number: None,
        }
    }

    /// Contact details as delivered by the backend, if any.
    pub fn contact(&self) -> Option<LeadContact> {
        match (&self.name, &self.number) {
            (None, None) => None,
            (name, number) => Some(LeadContact {
                name: name.clone().unwrap_or_default(),
                number: number.clone().unwrap_or_default(),
            }),
        }
    }

    /// Case-insensitive substring match over the searchable display fields.
    ///
    /// An empty (or all-whitespace) needle matches every lead.
    pub fn matches_search(&self, needle: &str) -> bool {
        let needle = needle.trim().to_lowercase();
        if needle.is_empty() {
            return true;
        }

        [
            &self.name,
            &self.number,
            &self.lead_type,
            &self.areas,
            &self.sub_type,
            &self.bhk,
        ]
        .into_iter()
        .flatten()
        .any(|field| field.to_lowercase().contains(&needle))
    }

    /// Whether the lead was created at or after the given instant.
    pub fn created_since(&self, cutoff: DateTime<Utc>) -> bool {
        self.created_on.is_some_and(|created| created >= cutoff)
    }
}

/// Reference to a lead as stored on a customer record.
///
/// The backend sends either the bare identifier or the expanded lead; both
/// resolve to the same key via [`LeadRef::id`].
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum LeadRef {
    Id(LeadId),
    Expanded(Box<Lead>),
}

impl LeadRef {
    pub fn id(&self) -> &LeadId {
        match self {
            LeadRef::Id(id) => id,
            LeadRef::Expanded(lead) => &lead.id,
        }
    }

    pub fn as_lead(&self) -> Option<&Lead> {
        match self {
            LeadRef::Id(_) => None,
            LeadRef::Expanded(lead) => Some(lead),
        }
    }

    /// Drops the expanded record, keeping only the identifier.
    pub fn compact(&self) -> LeadRef {
        LeadRef::Id(self.id().clone())
    }
}

/// Returns true when `id` is referenced by any entry of `refs`.
pub fn references(refs: &[LeadRef], id: &LeadId) -> bool {
    refs.iter().any(|lead_ref| lead_ref.id() == id)
}

/// Unpaginated lead listing.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LeadList {
    pub leads: Vec<Lead>,
    pub total: usize,
}

/// One page of a filtered lead listing with backend-provided totals.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LeadPage {
    pub leads: Vec<Lead>,
    pub total: usize,
    pub pages: usize,
    pub current_page: usize,
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::lead::{LeadRef, references};
use crate::domain::types::{
    CustomerId, LeadId, NonEmptyString, TypeConstraintError, lenient_timestamp, record_id,
};

/// Marketplace customer as returned by the backend.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", try_from = "CustomerRecord")]
pub struct Customer {
    pub id: CustomerId,
    pub name: String,
    pub number: String,
    /// Wallet balance in credits.
    pub credit: u64,
    pub purchased_leads: Vec<LeadRef>,
    pub saved_leads: Vec<LeadRef>,
    pub created_on: Option<DateTime<Utc>>,
}

/// Customer as it appears on the wire, keyed by `_id`, `id` or both.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CustomerRecord {
    #[serde(rename = "_id")]
    record_id: Option<CustomerId>,
    id: Option<CustomerId>,
    #[serde(default)]
    name: String,
    #[serde(default)]
    number: String,
    #[serde(default)]
    credit: u64,
    #[serde(default)]
    purchased_leads: Vec<LeadRef>,
    #[serde(default)]
    saved_leads: Vec<LeadRef>,
    #[serde(default, alias = "createdAt", deserialize_with = "lenient_timestamp")]
    created_on: Option<DateTime<Utc>>,
}

impl TryFrom<CustomerRecord> for Customer {
    type Error = TypeConstraintError;

    fn try_from(record: CustomerRecord) -> Result<Self, Self::Error> {
        Ok(Self {
            id: record_id(record.record_id, record.id)?,
            name: record.name,
            number: record.number,
            credit: record.credit,
            purchased_leads: record.purchased_leads,
            saved_leads: record.saved_leads,
            created_on: record.created_on,
        })
    }
}

impl Customer {
    pub fn has_purchased(&self, lead_id: &LeadId) -> bool {
        references(&self.purchased_leads, lead_id)
    }

    pub fn has_saved(&self, lead_id: &LeadId) -> bool {
        references(&self.saved_leads, lead_id)
    }

    /// Copy of the customer with lead lists reduced to bare identifiers.
    #[must_use]
    pub fn compact(&self) -> Self {
        Self {
            purchased_leads: self.purchased_leads.iter().map(LeadRef::compact).collect(),
            saved_leads: self.saved_leads.iter().map(LeadRef::compact).collect(),
            ..self.clone()
        }
    }

    /// Up to two upper-case initials of the display name, `??` when unnamed.
    pub fn initials(&self) -> String {
        let initials: String = self
            .name
            .split_whitespace()
            .filter_map(|part| part.chars().next())
            .flat_map(char::to_uppercase)
            .take(2)
            .collect();

        if initials.is_empty() {
            "??".to_string()
        } else {
            initials
        }
    }
}

/// Phone number and password submitted on login.
#[derive(Clone, Debug, Serialize)]
pub struct Credentials {
    pub number: NonEmptyString,
    pub password: NonEmptyString,
}

/// Successful login: bearer token plus the customer snapshot.
#[derive(Clone, Debug, PartialEq)]
pub struct LoginSession {
    pub token: String,
    pub customer: Customer,
}

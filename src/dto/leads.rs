//! Lead card view shared by every listing page.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::customer::Customer;
use crate::domain::lead::{Lead, LeadContact};
use crate::domain::types::LeadId;

/// Render-ready lead card.
///
/// `contact` is only ever populated when the viewing customer has purchased
/// the lead; the other fields never carry contact details.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct LeadCard {
    pub id: LeadId,
    pub lead_type: Option<String>,
    pub sub_type: Option<String>,
    pub bhk: Option<String>,
    pub areas: Option<String>,
    pub occupancy_type: Option<String>,
    pub price_min: Option<String>,
    pub price_max: Option<String>,
    pub shifting_date: String,
    pub credit: u64,
    pub is_purchased: bool,
    pub is_saved: bool,
    /// Purchase confirmation is open for this card.
    pub is_pending: bool,
    pub contact: Option<LeadContact>,
}

impl LeadCard {
    pub fn new(lead: &Lead, viewer: Option<&Customer>) -> Self {
        let is_purchased = viewer.is_some_and(|c| c.has_purchased(&lead.id));
        let is_saved = viewer.is_some_and(|c| c.has_saved(&lead.id));
        let price = lead.price_range.as_ref();

        Self {
            id: lead.id.clone(),
            lead_type: lead.lead_type.clone(),
            sub_type: lead.sub_type.clone(),
            bhk: lead.bhk.clone(),
            areas: lead.areas.clone(),
            occupancy_type: lead.occupancy_type.clone(),
            price_min: price.and_then(|p| p.min).map(format_amount),
            price_max: price.and_then(|p| p.max).map(format_amount),
            shifting_date: format_date(lead.shifting_date),
            credit: lead.credit,
            is_purchased,
            is_saved,
            is_pending: false,
            contact: if is_purchased { lead.contact() } else { None },
        }
    }
}

pub fn cards_for(leads: &[Lead], viewer: Option<&Customer>) -> Vec<LeadCard> {
    leads.iter().map(|lead| LeadCard::new(lead, viewer)).collect()
}

/// Whole-unit amount with `,` thousands separators.
pub fn format_amount(amount: f64) -> String {
    let rounded = amount.round();
    let digits = format!("{}", rounded.abs() as u64);
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    if rounded < 0.0 {
        format!("-{grouped}")
    } else {
        grouped
    }
}

pub fn format_date(date: Option<DateTime<Utc>>) -> String {
    date.map(|d| d.format("%-d %b %Y").to_string())
        .unwrap_or_else(|| "N/A".to_string())
}

/// Header/sidebar data about the logged-in customer.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CustomerSummary {
    pub name: String,
    pub initials: String,
    pub credit: u64,
    pub purchased_count: usize,
}

impl From<&Customer> for CustomerSummary {
    fn from(customer: &Customer) -> Self {
        Self {
            name: customer.name.clone(),
            initials: customer.initials(),
            credit: customer.credit,
            purchased_count: customer.purchased_leads.len(),
        }
    }
}

//! Saved and contacted (purchased) lead listings with local search.

use std::collections::HashSet;

use crate::domain::customer::Customer;
use crate::domain::lead::{Lead, LeadRef};
use crate::domain::types::LeadId;
use crate::dto::collections::CollectionPageData;
use crate::dto::leads::{CustomerSummary, cards_for};
use crate::forms::leads::saved_path;
use crate::repository::{CustomerReader, LeadReader};
use crate::services::leads::purchase_confirmation;
use crate::services::{ServiceError, ServiceResult};
use crate::session::SessionStore;

/// Leads from `all` that the customer has saved, in catalog order.
pub fn saved_leads(all: &[Lead], customer: &Customer) -> Vec<Lead> {
    all.iter()
        .filter(|lead| customer.has_saved(&lead.id))
        .cloned()
        .collect()
}

/// The customer's purchased leads in purchase order.
///
/// Expanded records are used as delivered; bare ids are resolved against
/// `all` and dropped when unknown.
pub fn purchased_leads(customer: &Customer, all: &[Lead]) -> Vec<Lead> {
    let mut seen = HashSet::new();
    customer
        .purchased_leads
        .iter()
        .filter_map(|entry| match entry {
            LeadRef::Expanded(lead) => Some(lead.as_ref().clone()),
            LeadRef::Id(id) => all.iter().find(|lead| &lead.id == id).cloned(),
        })
        .filter(|lead| seen.insert(lead.id.clone()))
        .collect()
}

pub fn search(leads: Vec<Lead>, query: Option<&str>) -> Vec<Lead> {
    match query {
        Some(needle) => leads
            .into_iter()
            .filter(|lead| lead.matches_search(needle))
            .collect(),
        None => leads,
    }
}

fn normalized_query(query: Option<String>) -> Option<String> {
    query.map(|q| q.trim().to_string()).filter(|q| !q.is_empty())
}

fn page_data(
    customer: &Customer,
    leads: Vec<Lead>,
    search_query: Option<String>,
    load_error: Option<String>,
    return_to: String,
) -> CollectionPageData {
    let leads = search(leads, search_query.as_deref());
    CollectionPageData {
        customer: CustomerSummary::from(customer),
        total: leads.len(),
        leads: cards_for(&leads, Some(customer)),
        search_query,
        load_error,
        return_to,
        confirm_dialog: None,
    }
}

/// Loads the saved view: full lead set and profile, fetched together.
///
/// `confirm` opens the purchase confirmation for a saved lead the customer
/// does not own yet.
pub async fn load_saved_page<R, S>(
    repo: &R,
    store: &S,
    query: Option<String>,
    confirm: Option<LeadId>,
) -> ServiceResult<CollectionPageData>
where
    R: LeadReader + CustomerReader + ?Sized,
    S: SessionStore + ?Sized,
{
    let record = store.get().ok_or(ServiceError::Unauthorized)?;
    let (all, profile) = tokio::join!(
        repo.list_all_leads(),
        repo.get_customer(&record.customer.id)
    );

    let customer = match profile {
        Ok(customer) => {
            if let Err(err) = store.set_customer(&customer) {
                log::error!("Failed to store profile snapshot: {err}");
            }
            customer
        }
        Err(err) if err.is_auth() => return Err(ServiceError::Unauthorized),
        Err(err) => {
            log::warn!("Failed to refresh profile, using snapshot: {err}");
            record.customer
        }
    };

    let (leads, load_error) = match all {
        Ok(list) => (saved_leads(&list.leads, &customer), None),
        Err(err) if err.is_auth() => return Err(ServiceError::Unauthorized),
        Err(err) => {
            log::error!("Failed to load leads: {err}");
            (Vec::new(), Some(err.user_message("Failed to load saved leads")))
        }
    };

    let query = normalized_query(query);
    let return_to = saved_path(query.as_deref());
    let confirm_dialog = confirm
        .filter(|lead_id| leads.iter().any(|lead| &lead.id == lead_id))
        .and_then(|lead_id| purchase_confirmation(&customer, &lead_id, &return_to));

    let mut data = page_data(&customer, leads, query, load_error, return_to);
    data.confirm_dialog = confirm_dialog;
    Ok(data)
}

/// Loads the contacted view from a fresh profile.
///
/// The full lead set is only fetched when some purchases arrive as bare ids.
pub async fn load_contacted_page<R, S>(
    repo: &R,
    store: &S,
    query: Option<String>,
) -> ServiceResult<CollectionPageData>
where
    R: LeadReader + CustomerReader + ?Sized,
    S: SessionStore + ?Sized,
{
    let record = store.get().ok_or(ServiceError::Unauthorized)?;
    let mut load_error = None;

    let customer = match repo.get_customer(&record.customer.id).await {
        Ok(customer) => {
            if let Err(err) = store.set_customer(&customer) {
                log::error!("Failed to store profile snapshot: {err}");
            }
            customer
        }
        Err(err) if err.is_auth() => return Err(ServiceError::Unauthorized),
        Err(err) => {
            log::error!("Failed to load purchased leads: {err}");
            load_error = Some(err.user_message("Failed to load purchased leads"));
            record.customer
        }
    };

    let needs_lookup = customer
        .purchased_leads
        .iter()
        .any(|entry| entry.as_lead().is_none());

    let all = if needs_lookup {
        match repo.list_all_leads().await {
            Ok(list) => list.leads,
            Err(err) if err.is_auth() => return Err(ServiceError::Unauthorized),
            Err(err) => {
                log::warn!("Failed to resolve purchased lead ids: {err}");
                Vec::new()
            }
        }
    } else {
        Vec::new()
    };

    let leads = purchased_leads(&customer, &all);
    Ok(page_data(
        &customer,
        leads,
        normalized_query(query),
        load_error,
        "/contacted".to_string(),
    ))
}

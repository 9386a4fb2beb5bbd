use crate::dto::leads::{CustomerSummary, cards_for, format_date};
use crate::dto::profile::ProfilePageData;
use crate::repository::{CustomerReader, LeadReader};
use crate::services::collections::purchased_leads;
use crate::services::{ServiceError, ServiceResult};
use crate::session::SessionStore;

/// Loads the profile page: account details plus purchase history.
///
/// Falls back to the stored snapshot when the profile fetch fails.
pub async fn load_profile<R, S>(repo: &R, store: &S) -> ServiceResult<ProfilePageData>
where
    R: CustomerReader + LeadReader + ?Sized,
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
            log::error!("Failed to load profile: {err}");
            load_error = Some(err.user_message("Failed to load profile"));
            record.customer
        }
    };

    let all = if customer.purchased_leads.iter().any(|e| e.as_lead().is_none()) {
        repo.list_all_leads()
            .await
            .map(|list| list.leads)
            .unwrap_or_else(|err| {
                log::warn!("Failed to resolve purchase history: {err}");
                Vec::new()
            })
    } else {
        Vec::new()
    };
    let purchased = purchased_leads(&customer, &all);

    Ok(ProfilePageData {
        customer: CustomerSummary::from(&customer),
        number: customer.number.clone(),
        joined_on: format_date(customer.created_on),
        purchased: cards_for(&purchased, Some(&customer)),
        load_error,
    })
}

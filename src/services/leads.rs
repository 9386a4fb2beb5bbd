//! Purchase and save actions on individual leads.

use crate::domain::customer::Customer;
use crate::domain::dialog::{ConfirmAction, Dialog};
use crate::domain::types::LeadId;
use crate::repository::{CustomerReader, LeadWriter};
use crate::services::{ServiceError, ServiceResult};
use crate::session::SessionStore;

pub const PURCHASE_ACTION: &str = "/leads/purchase";

/// Confirmation dialog for buying `lead_id`, or `None` when the customer
/// already owns it.
///
/// Cancelling returns to `return_to`; confirming posts to
/// [`PURCHASE_ACTION`], which redirects back there.
pub fn purchase_confirmation(
    customer: &Customer,
    lead_id: &LeadId,
    return_to: &str,
) -> Option<Dialog> {
    if customer.has_purchased(lead_id) {
        return None;
    }

    Some(Dialog::confirm(
        "Confirm Purchase",
        "Are you sure you want to purchase this lead? Credits will be deducted from your wallet.",
        ConfirmAction {
            action: PURCHASE_ACTION.to_string(),
            lead_id: lead_id.clone(),
            confirm_label: "Purchase Now".to_string(),
            return_to: return_to.to_string(),
        },
    ))
}

/// Re-reads the customer and overwrites the stored snapshot.
///
/// Failures are logged; the caller's action already succeeded.
async fn refresh_snapshot<R, S>(repo: &R, store: &S, customer: &Customer) -> Option<Customer>
where
    R: CustomerReader + ?Sized,
    S: SessionStore + ?Sized,
{
    match repo.get_customer(&customer.id).await {
        Ok(fresh) => {
            if let Err(err) = store.set_customer(&fresh) {
                log::error!("Failed to store profile snapshot: {err}");
            }
            Some(fresh)
        }
        Err(err) => {
            log::warn!("Failed to refresh profile for {}: {err}", customer.id);
            None
        }
    }
}

/// Purchases `lead_id` for the logged-in customer.
///
/// Returns the dialog to show: success after a refreshed snapshot, or an
/// error dialog carrying the backend's message. Credit and ownership rules
/// are enforced by the backend.
pub async fn purchase_lead<R, S>(repo: &R, store: &S, lead_id: &LeadId) -> ServiceResult<Dialog>
where
    R: LeadWriter + CustomerReader + ?Sized,
    S: SessionStore + ?Sized,
{
    let record = store.get().ok_or(ServiceError::Unauthorized)?;
    let customer = record.customer;

    match repo.purchase_lead(&customer.id, lead_id).await {
        Ok(()) => {
            log::info!("Customer {} purchased lead {}", customer.id, lead_id);
            refresh_snapshot(repo, store, &customer).await;
            Ok(Dialog::success(
                "Success!",
                "Lead purchased successfully! You can now view the contact details.",
            ))
        }
        Err(err) if err.is_auth() => Err(ServiceError::Unauthorized),
        Err(err) => {
            log::warn!("Purchase of lead {lead_id} by {} failed: {err}", customer.id);
            Ok(Dialog::error(
                "Purchase Failed",
                err.user_message("Failed to purchase lead"),
            ))
        }
    }
}

/// Flips the saved state of `lead_id` and refreshes the snapshot.
///
/// Returns whether the lead is saved afterwards, when known.
pub async fn toggle_save<R, S>(repo: &R, store: &S, lead_id: &LeadId) -> ServiceResult<Option<bool>>
where
    R: LeadWriter + CustomerReader + ?Sized,
    S: SessionStore + ?Sized,
{
    let record = store.get().ok_or(ServiceError::Unauthorized)?;
    let customer = record.customer;

    repo.toggle_save_lead(&customer.id, lead_id)
        .await
        .map_err(|e| {
            log::error!("Failed to toggle saved lead {lead_id}: {e}");
            ServiceError::from_repository(e)
        })?;

    let fresh = refresh_snapshot(repo, store, &customer).await;
    Ok(fresh.map(|c| c.has_saved(lead_id)))
}

use chrono::{DateTime, Local, LocalResult, NaiveTime, TimeZone, Utc};

use crate::domain::lead::Lead;
use crate::dto::leads::CustomerSummary;
use crate::dto::main::OverviewPageData;
use crate::repository::{CustomerReader, LeadReader};
use crate::services::{ServiceError, ServiceResult};
use crate::session::SessionStore;

/// Midnight at the start of the current local day, as UTC.
pub fn start_of_local_day(now: DateTime<Local>) -> DateTime<Utc> {
    let midnight = now.date_naive().and_time(NaiveTime::MIN);
    match Local.from_local_datetime(&midnight) {
        LocalResult::Single(start) | LocalResult::Ambiguous(start, _) => start.with_timezone(&Utc),
        // Midnight skipped by a DST transition.
        LocalResult::None => now.with_timezone(&Utc),
    }
}

pub fn count_added_since(leads: &[Lead], cutoff: DateTime<Utc>) -> usize {
    leads.iter().filter(|lead| lead.created_since(cutoff)).count()
}

/// Loads the dashboard landing page.
///
/// Profile and lead list are fetched together and degrade independently.
pub async fn load_overview<R, S>(repo: &R, store: &S) -> ServiceResult<OverviewPageData>
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

    let cutoff = start_of_local_day(Local::now());
    let (leads_added_today, total_available, load_error) = match all {
        Ok(list) => {
            let total = if list.total > 0 {
                list.total
            } else {
                list.leads.len()
            };
            (count_added_since(&list.leads, cutoff), total, None)
        }
        Err(err) if err.is_auth() => return Err(ServiceError::Unauthorized),
        Err(err) => {
            log::error!("Failed to load leads: {err}");
            (0, 0, Some(err.user_message("Failed to load leads")))
        }
    };

    Ok(OverviewPageData {
        customer: CustomerSummary::from(&customer),
        leads_added_today,
        total_available,
        load_error,
    })
}

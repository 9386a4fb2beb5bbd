//! Leads inbox: filtered, paginated catalog plus the viewer's profile.
//!
//! [`CatalogView`] holds the inbox state between a fetch being issued and
//! its results arriving. Every fetch is tagged with a [`FetchTicket`]; a
//! result whose ticket is no longer current is dropped on arrival.

use crate::domain::customer::Customer;
use crate::domain::dialog::{Dialog, DialogSlot};
use crate::domain::filter::{BHK_OPTIONS, LeadFilter};
use crate::domain::lead::{Lead, LeadPage};
use crate::domain::types::LeadId;
use crate::dto::catalog::{BhkChip, CatalogPageData};
use crate::dto::leads::{CustomerSummary, cards_for};
use crate::forms::leads::{filter_query_string, inbox_path};
use crate::pagination::Paginated;
use crate::repository::errors::RepositoryResult;
use crate::repository::{CustomerReader, LeadListQuery, LeadReader};
use crate::services::leads::purchase_confirmation;
use crate::services::{ServiceError, ServiceResult};
use crate::session::SessionStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadState {
    Loading,
    Ready,
}

/// Identifies one issued fetch and the criteria it was issued for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    seq: u64,
    query: LeadListQuery,
}

impl FetchTicket {
    pub fn query(&self) -> &LeadListQuery {
        &self.query
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    Applied,
    /// A newer fetch was issued (or the criteria changed) after this one.
    Stale,
}

#[derive(Debug)]
pub struct CatalogView {
    query: LeadListQuery,
    state: LoadState,
    issued: u64,
    leads: Vec<Lead>,
    total_pages: Option<usize>,
    total_leads: usize,
    customer: Option<Customer>,
    load_error: Option<String>,
    pending_purchase: Option<LeadId>,
}

impl CatalogView {
    /// Starts in `Loading` on page 1 with no filters, seeded with the
    /// stored customer snapshot if there is one.
    pub fn new(page_size: usize, customer: Option<Customer>) -> Self {
        Self {
            query: LeadListQuery::default().paginate(1, page_size),
            state: LoadState::Loading,
            issued: 0,
            leads: Vec::new(),
            total_pages: None,
            total_leads: 0,
            customer,
            load_error: None,
            pending_purchase: None,
        }
    }

    pub fn query(&self) -> &LeadListQuery {
        &self.query
    }

    pub fn state(&self) -> LoadState {
        self.state
    }

    pub fn page(&self) -> usize {
        self.query.pagination.page
    }

    pub fn leads(&self) -> &[Lead] {
        &self.leads
    }

    pub fn customer(&self) -> Option<&Customer> {
        self.customer.as_ref()
    }

    pub fn total_pages(&self) -> usize {
        self.total_pages.unwrap_or(1)
    }

    pub fn total_leads(&self) -> usize {
        self.total_leads
    }

    pub fn load_error(&self) -> Option<&str> {
        self.load_error.as_deref()
    }

    /// Replaces the filter criteria. Any change moves the cursor back to
    /// page 1.
    pub fn set_filter(&mut self, filter: LeadFilter) {
        if self.query.filter != filter {
            self.query.filter = filter;
            self.query.pagination.page = 1;
        }
    }

    pub fn toggle_bhk(&mut self, tag: &str) {
        let mut filter = self.query.filter.clone();
        filter.toggle_bhk(tag);
        self.set_filter(filter);
    }

    pub fn reset_filters(&mut self) {
        self.set_filter(LeadFilter::default());
    }

    /// Moves to `page` when it lies within `1..=total_pages`. Before the
    /// first result arrives the upper bound is unknown and any positive
    /// page is accepted.
    pub fn set_page(&mut self, page: usize) -> bool {
        let upper = self.total_pages.unwrap_or(usize::MAX);
        if (1..=upper).contains(&page) {
            self.query.pagination.page = page;
            true
        } else {
            false
        }
    }

    /// Enters `Loading` and tags the fetch with the current criteria.
    pub fn begin_fetch(&mut self) -> FetchTicket {
        self.issued += 1;
        self.state = LoadState::Loading;
        FetchTicket {
            seq: self.issued,
            query: self.query.clone(),
        }
    }

    /// Applies the results of the fetch identified by `ticket`.
    ///
    /// Stale results are discarded without touching state. A failed lead
    /// fetch blanks the grid; a failed profile fetch keeps the previous
    /// customer so the grid still renders.
    pub fn complete(
        &mut self,
        ticket: FetchTicket,
        leads: RepositoryResult<LeadPage>,
        profile: RepositoryResult<Customer>,
    ) -> FetchOutcome {
        if ticket.seq != self.issued || ticket.query != self.query {
            log::debug!(
                "Dropping stale catalog result for page {}",
                ticket.query.pagination.page
            );
            return FetchOutcome::Stale;
        }

        match leads {
            Ok(page) => {
                self.leads = page.leads;
                self.total_leads = page.total;
                self.total_pages = Some(page.pages.max(1));
                self.query.pagination.page = page.current_page.max(1);
                self.load_error = None;
            }
            Err(err) => {
                log::error!("Failed to load leads: {err}");
                self.leads.clear();
                self.total_leads = 0;
                self.total_pages = Some(1);
                self.load_error = Some(err.user_message("Failed to load leads"));
            }
        }

        match profile {
            Ok(customer) => self.customer = Some(customer),
            Err(err) => log::warn!("Failed to refresh profile, keeping snapshot: {err}"),
        }

        self.state = LoadState::Ready;
        FetchOutcome::Applied
    }

    /// Opens the purchase confirmation for `lead_id`.
    ///
    /// Nothing opens without a known customer or for a lead the customer
    /// already owns.
    pub fn request_purchase(&mut self, lead_id: &LeadId, return_to: &str) -> Option<Dialog> {
        let dialog = purchase_confirmation(self.customer.as_ref()?, lead_id, return_to)?;
        self.pending_purchase = Some(lead_id.clone());
        Some(dialog)
    }

    fn bhk_chips(&self) -> Vec<BhkChip> {
        BHK_OPTIONS
            .iter()
            .map(|&label| BhkChip {
                label,
                active: self.query.filter.has_bhk(label),
            })
            .collect()
    }

    pub fn into_page_data(self, dialog: DialogSlot) -> CatalogPageData {
        let mut cards = cards_for(&self.leads, self.customer.as_ref());
        if let Some(pending) = &self.pending_purchase {
            for card in cards.iter_mut().filter(|card| &card.id == pending) {
                card.is_pending = true;
            }
        }
        let total_pages = self.total_pages();
        let page = self.page();
        let bhk_chips = self.bhk_chips();

        CatalogPageData {
            customer: self.customer.as_ref().map(CustomerSummary::from),
            leads: Paginated::new(cards, page, total_pages, self.total_leads),
            filter_query: filter_query_string(&self.query.filter),
            bhk_chips,
            filter: self.query.filter,
            load_error: self.load_error,
            confirm_dialog: dialog.into_current(),
        }
    }
}

/// Inbox request as decoded from the page query.
#[derive(Debug, Clone, Default)]
pub struct CatalogRequest {
    pub filter: LeadFilter,
    pub page: Option<usize>,
    /// Lead whose purchase confirmation should be shown.
    pub confirm: Option<LeadId>,
    /// Inbox URL without the confirmation marker.
    pub return_to: String,
    /// Bedroom tag to flip before loading.
    pub toggle_bhk: Option<String>,
    /// Clear every filter before loading.
    pub reset: bool,
}

impl CatalogRequest {
    /// Whether the request changes the criteria instead of rendering them.
    pub fn is_transition(&self) -> bool {
        self.reset || self.toggle_bhk.is_some()
    }
}

/// Applies a filter transition and returns the inbox path to load next.
///
/// The page cursor survives only when the criteria end up unchanged.
pub fn transition_path(request: &CatalogRequest, page_size: usize) -> String {
    let mut view = CatalogView::new(page_size, None);
    view.set_filter(request.filter.clone());
    if let Some(page) = request.page {
        view.set_page(page);
    }
    if request.reset {
        view.reset_filters();
    }
    if let Some(tag) = &request.toggle_bhk {
        view.toggle_bhk(tag);
    }

    inbox_path(&view.query().filter, view.page())
}

/// Loads the inbox: the filtered lead page and the profile, fetched together.
pub async fn load_catalog_page<R, S>(
    repo: &R,
    store: &S,
    request: CatalogRequest,
    page_size: usize,
) -> ServiceResult<CatalogPageData>
where
    R: LeadReader + CustomerReader + ?Sized,
    S: SessionStore + ?Sized,
{
    let record = store.get().ok_or(ServiceError::Unauthorized)?;
    let customer_id = record.customer.id.clone();

    let mut view = CatalogView::new(page_size, Some(record.customer));
    view.set_filter(request.filter);
    if let Some(page) = request.page {
        view.set_page(page);
    }

    let ticket = view.begin_fetch();
    let (leads, profile) = tokio::join!(
        repo.list_filtered_leads(ticket.query()),
        repo.get_customer(&customer_id)
    );

    if matches!(&leads, Err(e) if e.is_auth()) || matches!(&profile, Err(e) if e.is_auth()) {
        return Err(ServiceError::Unauthorized);
    }

    if let Ok(customer) = &profile
        && let Err(err) = store.set_customer(customer)
    {
        log::error!("Failed to store profile snapshot: {err}");
    }

    view.complete(ticket, leads, profile);

    let mut dialog = DialogSlot::default();
    if let Some(lead_id) = &request.confirm
        && let Some(confirm) = view.request_purchase(lead_id, &request.return_to)
    {
        dialog.show(confirm);
    }

    Ok(view.into_page_data(dialog))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::repository::errors::RepositoryError;
    use crate::services::leads::PURCHASE_ACTION;
    use crate::repository::mock::MockRepository;
    use crate::session::MemorySessionStore;

    fn lead(id: &str) -> Lead {
        Lead::new(LeadId::new(id).unwrap())
    }

    fn customer(credit: u64, purchased: &[&str]) -> Customer {
        serde_json::from_value(json!({
            "_id": "c1",
            "name": "Asha Patel",
            "credit": credit,
            "purchasedLeads": purchased,
        }))
        .unwrap()
    }

    fn page_of(ids: &[&str], pages: usize, current_page: usize) -> LeadPage {
        LeadPage {
            leads: ids.iter().map(|id| lead(id)).collect(),
            total: ids.len() * pages,
            pages,
            current_page,
        }
    }

    fn shela_filter() -> LeadFilter {
        LeadFilter {
            areas: Some("Shela".into()),
            ..LeadFilter::default()
        }
    }

    #[test]
    fn filter_change_resets_page_before_next_fetch() {
        let mut view = CatalogView::new(25, None);
        assert!(view.set_page(4));

        view.set_filter(shela_filter());
        let ticket = view.begin_fetch();

        assert_eq!(ticket.query().pagination.page, 1);
        assert_eq!(view.state(), LoadState::Loading);
    }

    #[test]
    fn unchanged_filter_keeps_page() {
        let mut view = CatalogView::new(25, None);
        view.set_filter(shela_filter());
        view.set_page(3);

        view.set_filter(shela_filter());

        assert_eq!(view.page(), 3);
    }

    #[test]
    fn bhk_toggle_and_reset_move_back_to_first_page() {
        let mut view = CatalogView::new(25, None);
        view.set_page(3);

        view.toggle_bhk("2BHK");
        assert_eq!(view.query().filter.bhk, vec!["2BHK"]);
        assert_eq!(view.page(), 1);

        view.set_page(2);
        view.reset_filters();
        assert!(view.query().filter.is_empty());
        assert_eq!(view.page(), 1);
    }

    #[test]
    fn chips_link_to_toggled_filter() {
        let mut view = CatalogView::new(25, None);
        view.toggle_bhk("2BHK");

        let data = view.into_page_data(DialogSlot::default());
        let two = data.bhk_chips.iter().find(|c| c.label == "2BHK").unwrap();
        let three = data.bhk_chips.iter().find(|c| c.label == "3BHK").unwrap();

        assert!(two.active);
        assert!(!three.active);
        assert_eq!(data.filter_query, "bhk=2BHK");
    }

    #[test]
    fn chip_transition_returns_to_first_page() {
        let request = CatalogRequest {
            filter: shela_filter(),
            page: Some(3),
            toggle_bhk: Some("2BHK".into()),
            ..CatalogRequest::default()
        };

        assert!(request.is_transition());
        assert_eq!(
            transition_path(&request, 25),
            "/leads-inbox?areas=Shela&bhk=2BHK&page=1"
        );
    }

    #[test]
    fn reset_transition_clears_criteria() {
        let request = CatalogRequest {
            filter: shela_filter(),
            page: Some(2),
            reset: true,
            ..CatalogRequest::default()
        };

        assert_eq!(transition_path(&request, 25), "/leads-inbox?page=1");
        assert!(!CatalogRequest::default().is_transition());
    }

    #[test]
    fn set_page_is_bounded_once_totals_are_known() {
        let mut view = CatalogView::new(25, None);
        let ticket = view.begin_fetch();
        view.complete(ticket, Ok(page_of(&["a"], 3, 1)), Ok(customer(0, &[])));

        assert!(!view.set_page(0));
        assert!(!view.set_page(4));
        assert!(view.set_page(3));
        assert_eq!(view.page(), 3);
    }

    #[test]
    fn superseded_result_never_overwrites_newer_one() {
        let mut view = CatalogView::new(25, None);
        let ticket_a = view.begin_fetch();

        view.set_filter(shela_filter());
        let ticket_b = view.begin_fetch();

        let outcome_b = view.complete(ticket_b, Ok(page_of(&["b1", "b2"], 1, 1)), Ok(customer(0, &[])));
        let outcome_a = view.complete(ticket_a, Ok(page_of(&["a1"], 9, 1)), Ok(customer(0, &[])));

        assert_eq!(outcome_b, FetchOutcome::Applied);
        assert_eq!(outcome_a, FetchOutcome::Stale);
        let ids: Vec<_> = view.leads().iter().map(|l| l.id.as_str()).collect();
        assert_eq!(ids, vec!["b1", "b2"]);
        assert_eq!(view.total_pages(), 1);
        assert_eq!(view.state(), LoadState::Ready);
    }

    #[test]
    fn result_for_changed_criteria_is_stale_even_without_new_fetch() {
        let mut view = CatalogView::new(25, None);
        let ticket = view.begin_fetch();
        view.set_filter(shela_filter());

        let outcome = view.complete(ticket, Ok(page_of(&["x"], 1, 1)), Ok(customer(0, &[])));

        assert_eq!(outcome, FetchOutcome::Stale);
        assert!(view.leads().is_empty());
    }

    #[test]
    fn pagination_metadata_is_replaced_wholesale() {
        let mut view = CatalogView::new(25, None);
        let first = view.begin_fetch();
        view.complete(first, Ok(page_of(&["a", "b"], 5, 1)), Ok(customer(0, &[])));
        view.set_page(5);

        let second = view.begin_fetch();
        view.complete(second, Ok(page_of(&["z"], 2, 2)), Ok(customer(0, &[])));

        assert_eq!(view.total_pages(), 2);
        assert_eq!(view.page(), 2);
        assert_eq!(view.leads().len(), 1);
        assert_eq!(view.total_leads(), 2);
    }

    #[test]
    fn failed_lead_fetch_blanks_grid_but_keeps_profile() {
        let mut view = CatalogView::new(25, None);
        let first = view.begin_fetch();
        view.complete(first, Ok(page_of(&["a"], 1, 1)), Ok(customer(500, &[])));

        let second = view.begin_fetch();
        view.complete(
            second,
            Err(RepositoryError::Network("timeout".into())),
            Ok(customer(400, &[])),
        );

        assert!(view.leads().is_empty());
        assert_eq!(view.load_error(), Some("Failed to load leads"));
        assert_eq!(view.customer().unwrap().credit, 400);
    }

    #[test]
    fn failed_profile_fetch_still_renders_grid() {
        let mut view = CatalogView::new(25, Some(customer(500, &[])));
        let ticket = view.begin_fetch();
        view.complete(
            ticket,
            Ok(page_of(&["a", "b"], 1, 1)),
            Err(RepositoryError::Network("reset".into())),
        );

        assert_eq!(view.leads().len(), 2);
        assert_eq!(view.customer().unwrap().credit, 500);
        assert!(view.load_error().is_none());
    }

    #[test]
    fn purchase_confirmation_requires_unowned_lead() {
        let mut view = CatalogView::new(25, Some(customer(500, &["owned"])));

        assert!(view.request_purchase(&LeadId::new("owned").unwrap(), "/leads-inbox").is_none());

        let dialog = view
            .request_purchase(&LeadId::new("fresh").unwrap(), "/leads-inbox?page=2")
            .unwrap();
        assert!(dialog.is_confirmation());
        assert_eq!(dialog.confirm.unwrap().return_to, "/leads-inbox?page=2");
    }

    #[test]
    fn pending_purchase_marks_its_card() {
        let mut view = CatalogView::new(25, Some(customer(500, &[])));
        let ticket = view.begin_fetch();
        view.complete(ticket, Ok(page_of(&["l1", "l2"], 1, 1)), Ok(customer(500, &[])));

        let dialog = view.request_purchase(&LeadId::new("l2").unwrap(), "/leads-inbox");
        let data = view.into_page_data(DialogSlot::default());

        assert!(dialog.is_some());
        let pending: Vec<_> = data
            .leads
            .items
            .iter()
            .map(|card| (card.id.as_str(), card.is_pending))
            .collect();
        assert_eq!(pending, vec![("l1", false), ("l2", true)]);
    }

    #[test]
    fn no_confirmation_without_customer() {
        let mut view = CatalogView::new(25, None);

        assert!(view.request_purchase(&LeadId::new("l1").unwrap(), "/").is_none());
    }

    #[actix_web::test]
    async fn load_fetches_page_and_profile_and_refreshes_snapshot() {
        let store = MemorySessionStore::default();
        store.set(&customer(500, &[]), "t0k").unwrap();

        let mut repo = MockRepository::new();
        repo.expect_list_filtered_leads()
            .withf(|query| query.pagination.page == 1 && query.filter.areas.as_deref() == Some("Shela"))
            .returning(|_| Ok(page_of(&["l1", "l2"], 3, 1)));
        repo.expect_get_customer()
            .returning(|_| Ok(customer(450, &["l1"])));

        let request = CatalogRequest {
            filter: shela_filter(),
            page: None,
            confirm: None,
            return_to: "/leads-inbox?areas=Shela".into(),
            ..CatalogRequest::default()
        };
        let data = load_catalog_page(&repo, &store, request, 25).await.unwrap();

        assert_eq!(data.leads.items.len(), 2);
        assert!(data.leads.items[0].is_purchased);
        assert!(!data.leads.items[1].is_purchased);
        assert_eq!(data.leads.total_pages, 3);
        assert_eq!(data.filter_query, "areas=Shela");
        assert_eq!(data.customer.unwrap().credit, 450);
        assert_eq!(store.get().unwrap().customer.credit, 450);
    }

    #[actix_web::test]
    async fn load_without_session_is_unauthorized() {
        let store = MemorySessionStore::default();
        let repo = MockRepository::new();

        let result = load_catalog_page(&repo, &store, CatalogRequest::default(), 25).await;

        assert!(matches!(result, Err(ServiceError::Unauthorized)));
    }

    #[actix_web::test]
    async fn backend_auth_failure_is_unauthorized() {
        let store = MemorySessionStore::default();
        store.set(&customer(500, &[]), "expired").unwrap();

        let mut repo = MockRepository::new();
        repo.expect_list_filtered_leads()
            .returning(|_| Err(RepositoryError::Auth("jwt expired".into())));
        repo.expect_get_customer()
            .returning(|_| Err(RepositoryError::Auth("jwt expired".into())));

        let result = load_catalog_page(&repo, &store, CatalogRequest::default(), 25).await;

        assert!(matches!(result, Err(ServiceError::Unauthorized)));
    }

    #[actix_web::test]
    async fn confirm_marker_opens_purchase_dialog() {
        let store = MemorySessionStore::default();
        store.set(&customer(500, &[]), "t0k").unwrap();

        let mut repo = MockRepository::new();
        repo.expect_list_filtered_leads()
            .returning(|_| Ok(page_of(&["l1"], 1, 1)));
        repo.expect_get_customer()
            .returning(|_| Ok(customer(500, &[])));

        let request = CatalogRequest {
            confirm: Some(LeadId::new("l1").unwrap()),
            return_to: "/leads-inbox".into(),
            ..CatalogRequest::default()
        };
        let data = load_catalog_page(&repo, &store, request, 25).await.unwrap();

        let dialog = data.confirm_dialog.unwrap();
        assert_eq!(dialog.title, "Confirm Purchase");
        assert_eq!(dialog.confirm.unwrap().action, PURCHASE_ACTION);
    }
}

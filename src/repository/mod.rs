//! Access to the remote lead backend.
//!
//! Services depend on the narrow reader/writer traits below; [`HttpRepository`]
//! implements all of them over REST.

use async_trait::async_trait;

use crate::domain::customer::{Credentials, Customer, LoginSession};
use crate::domain::filter::{DEFAULT_PAGE_SIZE, LeadFilter};
use crate::domain::lead::{LeadList, LeadPage};
use crate::domain::types::{CustomerId, LeadId};
use crate::repository::errors::RepositoryResult;

pub mod errors;
pub mod http;
#[cfg(any(test, feature = "test-mocks"))]
pub mod mock;

pub use http::HttpRepository;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pagination {
    pub page: usize,
    pub per_page: usize,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page: 1,
            per_page: DEFAULT_PAGE_SIZE,
        }
    }
}

/// Filtered, paginated lead request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LeadListQuery {
    pub filter: LeadFilter,
    pub pagination: Pagination,
}

impl LeadListQuery {
    pub fn new(filter: LeadFilter) -> Self {
        Self {
            filter,
            pagination: Pagination::default(),
        }
    }

    pub fn paginate(mut self, page: usize, per_page: usize) -> Self {
        self.pagination = Pagination {
            page: page.max(1),
            per_page: per_page.max(1),
        };
        self
    }

    /// Full backend query string: set filter predicates, then `page` and `limit`.
    pub fn to_query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = self.filter.to_query_pairs();
        pairs.push(("page", self.pagination.page.to_string()));
        pairs.push(("limit", self.pagination.per_page.to_string()));
        pairs
    }
}

#[async_trait]
pub trait AuthGateway {
    async fn login(&self, credentials: &Credentials) -> RepositoryResult<LoginSession>;
}

#[async_trait]
pub trait CustomerReader {
    async fn get_customer(&self, id: &CustomerId) -> RepositoryResult<Customer>;
}

#[async_trait]
pub trait LeadReader {
    async fn list_all_leads(&self) -> RepositoryResult<LeadList>;
    async fn list_filtered_leads(&self, query: &LeadListQuery) -> RepositoryResult<LeadPage>;
}

#[async_trait]
pub trait LeadWriter {
    async fn purchase_lead(&self, customer_id: &CustomerId, lead_id: &LeadId)
    -> RepositoryResult<()>;
    /// Flips the saved state of the lead for the customer.
    async fn toggle_save_lead(
        &self,
        customer_id: &CustomerId,
        lead_id: &LeadId,
    ) -> RepositoryResult<()>;
}

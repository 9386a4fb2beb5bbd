//! Mock repository implementations for isolating services in tests.

use async_trait::async_trait;
use mockall::mock;

use crate::domain::customer::{Credentials, Customer, LoginSession};
use crate::domain::lead::{LeadList, LeadPage};
use crate::domain::types::{CustomerId, LeadId};
use crate::repository::errors::RepositoryResult;
use crate::repository::{AuthGateway, CustomerReader, LeadListQuery, LeadReader, LeadWriter};

mock! {
    pub Repository {}

    #[async_trait]
    impl AuthGateway for Repository {
        async fn login(&self, credentials: &Credentials) -> RepositoryResult<LoginSession>;
    }

    #[async_trait]
    impl CustomerReader for Repository {
        async fn get_customer(&self, id: &CustomerId) -> RepositoryResult<Customer>;
    }

    #[async_trait]
    impl LeadReader for Repository {
        async fn list_all_leads(&self) -> RepositoryResult<LeadList>;
        async fn list_filtered_leads(&self, query: &LeadListQuery) -> RepositoryResult<LeadPage>;
    }

    #[async_trait]
    impl LeadWriter for Repository {
        async fn purchase_lead(
            &self,
            customer_id: &CustomerId,
            lead_id: &LeadId,
        ) -> RepositoryResult<()>;
        async fn toggle_save_lead(
            &self,
            customer_id: &CustomerId,
            lead_id: &LeadId,
        ) -> RepositoryResult<()>;
    }
}

//! REST implementation of the repository traits.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, Url};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::domain::customer::{Credentials, Customer, LoginSession};
use crate::domain::lead::{Lead, LeadList, LeadPage};
use crate::domain::types::{CustomerId, LeadId};
use crate::repository::errors::{RepositoryError, RepositoryResult};
use crate::repository::{AuthGateway, CustomerReader, LeadListQuery, LeadReader, LeadWriter};

/// Response envelope shared by every backend endpoint.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Envelope<T> {
    #[serde(default)]
    success: bool,
    data: Option<T>,
    #[serde(default)]
    token: Option<String>,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    total: Option<usize>,
    #[serde(default)]
    pages: Option<usize>,
    #[serde(default)]
    current_page: Option<usize>,
}

/// Loosely typed body used to pull the error text out of a failed response.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

impl ErrorBody {
    fn into_message(self) -> Option<String> {
        self.error.or(self.message)
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct LeadActionBody<'a> {
    customer_id: &'a CustomerId,
    lead_id: &'a LeadId,
}

/// HTTP client for the lead backend.
///
/// Cloning is cheap: the underlying connection pool is shared. Use
/// [`HttpRepository::authorized`] to obtain a copy that attaches a session's
/// bearer token to every request.
#[derive(Clone, Debug)]
pub struct HttpRepository {
    client: Client,
    base_url: Url,
    token: Option<String>,
}

impl HttpRepository {
    pub fn new(base_url: &str, timeout: Duration) -> RepositoryResult<Self> {
        let base_url = Url::parse(base_url)
            .map_err(|e| RepositoryError::Unexpected(format!("Invalid API url {base_url}: {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(RepositoryError::Unexpected(format!(
                "API url {base_url} cannot be used as a base"
            )));
        }
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            base_url,
            token: None,
        })
    }

    /// Copy of the client that sends `token` as a bearer credential.
    ///
    /// A missing token is not an error here; the backend rejects the call.
    #[must_use]
    pub fn authorized(&self, token: Option<&str>) -> Self {
        Self {
            token: token.map(str::to_string),
            ..self.clone()
        }
    }

    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    fn request(&self, method: Method, segments: &[&str]) -> RequestBuilder {
        let builder = self.client.request(method, self.endpoint(segments));
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn send<T: DeserializeOwned>(
        &self,
        builder: RequestBuilder,
    ) -> RepositoryResult<Envelope<T>> {
        let response = builder.send().await?;
        let status = response.status();
        let url = response.url().path().to_string();
        let body = response.text().await?;

        if !status.is_success() {
            let message = serde_json::from_str::<ErrorBody>(&body)
                .ok()
                .and_then(ErrorBody::into_message);
            let err = RepositoryError::from_status(status, message);
            log::warn!("Backend call {url} failed with {status}: {err}");
            return Err(err);
        }

        let envelope: Envelope<T> = serde_json::from_str(&body)?;
        if !envelope.success {
            let message = envelope
                .error
                .or(envelope.message)
                .unwrap_or_else(|| "The request was not successful".to_string());
            log::warn!("Backend call {url} reported failure: {message}");
            return Err(RepositoryError::BusinessRule(message));
        }

        Ok(envelope)
    }
}

#[async_trait]
impl AuthGateway for HttpRepository {
    async fn login(&self, credentials: &Credentials) -> RepositoryResult<LoginSession> {
        let builder = self
            .request(Method::POST, &["api", "leads", "customer", "login"])
            .json(credentials);

        let envelope = self
            .send::<Customer>(builder)
            .await
            .map_err(|err| match err {
                RepositoryError::Validation(msg)
                | RepositoryError::BusinessRule(msg)
                | RepositoryError::NotFound(msg) => RepositoryError::Auth(msg),
                other => other,
            })?;

        let token = envelope
            .token
            .ok_or_else(|| RepositoryError::Parse("login response carried no token".into()))?;
        let customer = envelope
            .data
            .ok_or_else(|| RepositoryError::Parse("login response carried no customer".into()))?;

        Ok(LoginSession { token, customer })
    }
}

#[async_trait]
impl CustomerReader for HttpRepository {
    async fn get_customer(&self, id: &CustomerId) -> RepositoryResult<Customer> {
        let builder = self.request(Method::GET, &["api", "leads", "customer", id.as_str()]);

        self.send::<Customer>(builder)
            .await?
            .data
            .ok_or_else(|| RepositoryError::Parse("profile response carried no customer".into()))
    }
}

#[async_trait]
impl LeadReader for HttpRepository {
    async fn list_all_leads(&self) -> RepositoryResult<LeadList> {
        let builder = self.request(Method::GET, &["api", "leads", "admin", "all"]);
        let envelope = self.send::<Vec<Lead>>(builder).await?;

        let leads = envelope.data.unwrap_or_default();
        let total = envelope.total.unwrap_or(leads.len());
        Ok(LeadList { leads, total })
    }

    async fn list_filtered_leads(&self, query: &LeadListQuery) -> RepositoryResult<LeadPage> {
        let builder = self
            .request(Method::GET, &["api", "leads", "filter"])
            .query(&query.to_query_pairs());
        let envelope = self.send::<Vec<Lead>>(builder).await?;

        let leads = envelope.data.unwrap_or_default();
        Ok(LeadPage {
            total: envelope.total.unwrap_or(leads.len()),
            pages: envelope.pages.unwrap_or(1).max(1),
            current_page: envelope
                .current_page
                .unwrap_or(query.pagination.page)
                .max(1),
            leads,
        })
    }
}

#[async_trait]
impl LeadWriter for HttpRepository {
    async fn purchase_lead(
        &self,
        customer_id: &CustomerId,
        lead_id: &LeadId,
    ) -> RepositoryResult<()> {
        let builder = self
            .request(Method::POST, &["api", "leads", "purchase"])
            .json(&LeadActionBody {
                customer_id,
                lead_id,
            });

        self.send::<serde_json::Value>(builder).await.map(|_| ())
    }

    async fn toggle_save_lead(
        &self,
        customer_id: &CustomerId,
        lead_id: &LeadId,
    ) -> RepositoryResult<()> {
        let builder = self
            .request(Method::POST, &["api", "leads", "save-lead"])
            .json(&LeadActionBody {
                customer_id,
                lead_id,
            });

        self.send::<serde_json::Value>(builder).await.map(|_| ())
    }
}

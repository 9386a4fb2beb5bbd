use reqwest::StatusCode;
use thiserror::Error;

/// Failures reported by the lead backend or the transport reaching it.
///
/// Every variant displays its message verbatim so backend error text can be
/// shown to the customer unchanged.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RepositoryError {
    /// Credentials rejected, or the bearer token is missing/invalid/expired.
    #[error("{0}")]
    Auth(String),

    /// The backend rejected the request parameters.
    #[error("{0}")]
    Validation(String),

    /// A marketplace rule refused the operation (insufficient credit,
    /// lead already purchased, ...).
    #[error("{0}")]
    BusinessRule(String),

    #[error("{0}")]
    NotFound(String),

    /// The request could not be completed.
    #[error("Network error: {0}")]
    Network(String),

    /// The response body could not be decoded.
    #[error("Malformed response: {0}")]
    Parse(String),

    #[error("{0}")]
    Unexpected(String),
}

pub type RepositoryResult<T> = Result<T, RepositoryError>;

impl RepositoryError {
    /// Classifies a non-2xx response, keeping the backend message when present.
    pub fn from_status(status: StatusCode, message: Option<String>) -> Self {
        let message = message
            .map(|m| m.trim().to_string())
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| format!("Request failed with status {status}"));

        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => RepositoryError::Auth(message),
            StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => {
                RepositoryError::Validation(message)
            }
            StatusCode::NOT_FOUND => RepositoryError::NotFound(message),
            s if s.is_client_error() => RepositoryError::BusinessRule(message),
            _ => RepositoryError::Unexpected(message),
        }
    }

    pub fn is_auth(&self) -> bool {
        matches!(self, RepositoryError::Auth(_))
    }

    /// Text to show the customer: the backend's own message when there is
    /// one, otherwise `fallback`.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            RepositoryError::Network(_) | RepositoryError::Parse(_) => fallback.to_string(),
            other => other.to_string(),
        }
    }
}

impl From<reqwest::Error> for RepositoryError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            RepositoryError::Parse(err.to_string())
        } else {
            RepositoryError::Network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for RepositoryError {
    fn from(err: serde_json::Error) -> Self {
        RepositoryError::Parse(err.to_string())
    }
}

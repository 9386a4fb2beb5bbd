//! Page-level logic sitting between routes and the backend repository.

use thiserror::Error;

use crate::repository::errors::RepositoryError;
use crate::session::SessionError;

pub mod auth;
pub mod catalog;
pub mod collections;
pub mod leads;
pub mod overview;
pub mod profile;

#[derive(Debug, Error)]
pub enum ServiceError {
    /// No usable session, or the backend refused the session's token.
    #[error("Unauthorized")]
    Unauthorized,

    #[error("{0}")]
    Form(String),

    #[error(transparent)]
    Repository(#[from] RepositoryError),

    #[error(transparent)]
    Session(#[from] SessionError),
}

pub type ServiceResult<T> = Result<T, ServiceError>;

impl ServiceError {
    /// Escalates backend auth failures to [`ServiceError::Unauthorized`].
    pub fn from_repository(err: RepositoryError) -> Self {
        if err.is_auth() {
            ServiceError::Unauthorized
        } else {
            ServiceError::Repository(err)
        }
    }
}

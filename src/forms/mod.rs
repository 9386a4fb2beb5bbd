//! Form and query-string definitions backing the dashboard routes.

use thiserror::Error;
use validator::ValidationErrors;

pub mod auth;
pub mod leads;

#[derive(Debug, Error)]
/// Errors that can occur when processing form data.
pub enum FormError {
    #[error("validation errors: {0}")]
    Validation(#[from] ValidationErrors),

    #[error("{0} must not be blank")]
    Blank(&'static str),

    #[error("invalid lead id")]
    InvalidLeadId,

    #[error("invalid query string: {0}")]
    InvalidQuery(String),
}

use crate::domain::customer::Customer;
use crate::forms::auth::LoginForm;
use crate::repository::AuthGateway;
use crate::services::{ServiceError, ServiceResult};
use crate::session::SessionStore;

pub const LOGIN_FAILED: &str = "Login failed. Please check your credentials.";

/// Authenticates against the backend and stores token and snapshot.
pub async fn login<R, S>(repo: &R, store: &S, form: LoginForm) -> ServiceResult<Customer>
where
    R: AuthGateway + ?Sized,
    S: SessionStore + ?Sized,
{
    let credentials = form.into_credentials().map_err(|e| {
        log::warn!("Rejected login form: {e}");
        ServiceError::Form("Please enter your phone number and password.".to_string())
    })?;

    let session = repo.login(&credentials).await.map_err(|e| {
        log::warn!("Login failed: {e}");
        ServiceError::Repository(e)
    })?;

    store.set(&session.customer, &session.token)?;
    log::info!("Customer {} logged in", session.customer.id);

    Ok(session.customer)
}

pub fn logout<S: SessionStore + ?Sized>(store: &S) {
    store.clear();
}

/// Message shown on the login page after a failed attempt.
pub fn login_error_message(err: &ServiceError) -> String {
    match err {
        ServiceError::Form(message) => message.clone(),
        ServiceError::Repository(e) => e.user_message(LOGIN_FAILED),
        ServiceError::Unauthorized | ServiceError::Session(_) => LOGIN_FAILED.to_string(),
    }
}

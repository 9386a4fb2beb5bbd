//! Session store holding the bearer token and the last customer snapshot.
//!
//! Pages seed their first render from the stored snapshot and overwrite it
//! wholesale whenever a fresh profile arrives. A stored value that no longer
//! parses is treated as absent.

use std::cell::RefCell;
use std::collections::HashMap;

use actix_session::Session;
use thiserror::Error;

use crate::domain::customer::Customer;

/// Session key of the bearer token.
pub const TOKEN_KEY: &str = "token";
/// Session key of the customer snapshot.
pub const USER_KEY: &str = "user";

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("failed to store session value: {0}")]
    Insert(String),
}

pub type SessionResult<T> = Result<T, SessionError>;

/// What a logged-in browser carries between requests.
#[derive(Clone, Debug, PartialEq)]
pub struct SessionRecord {
    pub token: Option<String>,
    pub customer: Customer,
}

pub trait SessionStore {
    /// Last-known snapshot, or `None` when logged out or unreadable.
    fn get(&self) -> Option<SessionRecord>;
    /// Replaces both the customer snapshot and the token.
    fn set(&self, customer: &Customer, token: &str) -> SessionResult<()>;
    /// Replaces the customer snapshot, keeping the token.
    fn set_customer(&self, customer: &Customer) -> SessionResult<()>;
    fn clear(&self);

    fn token(&self) -> Option<String> {
        self.get().and_then(|record| record.token)
    }

    /// A readable snapshot and a token are both present.
    fn is_logged_in(&self) -> bool {
        self.get().is_some_and(|record| record.token.is_some())
    }
}

/// Cookie-backed store over the Actix session.
///
/// Lead lists are compacted to bare ids before storing to keep the cookie
/// small.
pub struct ActixSessionStore {
    session: Session,
}

impl ActixSessionStore {
    pub fn new(session: Session) -> Self {
        Self { session }
    }
}

impl SessionStore for ActixSessionStore {
    fn get(&self) -> Option<SessionRecord> {
        let customer = match self.session.get::<Customer>(USER_KEY) {
            Ok(Some(customer)) => customer,
            Ok(None) => return None,
            Err(err) => {
                log::warn!("Discarding unreadable session snapshot: {err}");
                return None;
            }
        };
        let token = self.session.get::<String>(TOKEN_KEY).unwrap_or_else(|err| {
            log::warn!("Discarding unreadable session token: {err}");
            None
        });

        Some(SessionRecord { token, customer })
    }

    fn set(&self, customer: &Customer, token: &str) -> SessionResult<()> {
        self.session
            .insert(TOKEN_KEY, token)
            .map_err(|e| SessionError::Insert(e.to_string()))?;
        self.set_customer(customer)
    }

    fn set_customer(&self, customer: &Customer) -> SessionResult<()> {
        self.session
            .insert(USER_KEY, customer.compact())
            .map_err(|e| SessionError::Insert(e.to_string()))
    }

    fn clear(&self) {
        self.session.remove(TOKEN_KEY);
        self.session.remove(USER_KEY);
    }
}

/// In-process store keeping raw JSON text, used in tests.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    values: RefCell<HashMap<&'static str, String>>,
}

impl MemorySessionStore {
    /// Stores an arbitrary raw value under `key`, bypassing serialization.
    pub fn insert_raw(&self, key: &'static str, raw: impl Into<String>) {
        self.values.borrow_mut().insert(key, raw.into());
    }

    pub fn raw(&self, key: &str) -> Option<String> {
        self.values.borrow().get(key).cloned()
    }
}

impl SessionStore for MemorySessionStore {
    fn get(&self) -> Option<SessionRecord> {
        let values = self.values.borrow();
        let raw = values.get(USER_KEY)?;
        let customer = match serde_json::from_str::<Customer>(raw) {
            Ok(customer) => customer,
            Err(err) => {
                log::warn!("Discarding unreadable session snapshot: {err}");
                return None;
            }
        };
        let token = values.get(TOKEN_KEY).cloned();

        Some(SessionRecord { token, customer })
    }

    fn set(&self, customer: &Customer, token: &str) -> SessionResult<()> {
        self.set_customer(customer)?;
        self.insert_raw(TOKEN_KEY, token);
        Ok(())
    }

    fn set_customer(&self, customer: &Customer) -> SessionResult<()> {
        let raw = serde_json::to_string(&customer.compact())
            .map_err(|e| SessionError::Insert(e.to_string()))?;
        self.insert_raw(USER_KEY, raw);
        Ok(())
    }

    fn clear(&self) {
        let mut values = self.values.borrow_mut();
        values.remove(TOKEN_KEY);
        values.remove(USER_KEY);
    }
}

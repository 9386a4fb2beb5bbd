//! Domain entities shared by the dashboard services and templates.

pub mod customer;
pub mod dialog;
pub mod filter;
pub mod lead;
pub mod types;

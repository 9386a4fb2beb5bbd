//! DTO modules that bridge services with templates.

pub mod catalog;
pub mod collections;
pub mod leads;
pub mod main;
pub mod profile;

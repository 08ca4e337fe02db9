//! Tenants
//!
//! Tenants are administrative: they are created and resolved outside any
//! tenant transaction, on the pool directly.

pub mod data;
pub mod errors;
pub mod records;
mod repository;
pub mod service;

pub use errors::TenantsServiceError;
pub use service::*;

//! Orders
//!
//! Orders are written once, by checkout, and never mutated afterwards.

pub mod data;
pub mod errors;
pub mod records;
pub(crate) mod repository;
pub mod service;

pub use errors::OrdersServiceError;
pub use service::*;

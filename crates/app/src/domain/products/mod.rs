//! Products
//!
//! The catalog is owned by the storefront's product management; carts and
//! checkout only read availability and price and apply conditional stock
//! decrements through the crate-private repository.

pub mod data;
pub mod errors;
pub mod records;
pub(crate) mod repository;
pub mod service;

pub use errors::ProductsServiceError;
pub use service::*;

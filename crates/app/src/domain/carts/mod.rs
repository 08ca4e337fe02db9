//! Carts
//!
//! Stock checks made here are advisory: they give immediate feedback while the
//! customer edits the cart. The binding check is the conditional decrement
//! performed by checkout.

pub mod data;
pub mod errors;
pub mod records;
pub(crate) mod repositories;
pub mod service;

pub use errors::CartsServiceError;
pub use service::*;

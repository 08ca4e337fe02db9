//! Checkout
//!
//! Converts a customer's cart into an order in one tenant-scoped transaction:
//! conditional stock decrements, order insert and cart clearing either all
//! commit or all roll back.

pub mod coupons;
pub mod data;
pub mod errors;
pub mod notifications;
pub(crate) mod numbering;
pub mod service;
pub(crate) mod totals;

pub use errors::CheckoutServiceError;
pub use service::*;

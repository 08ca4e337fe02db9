//! Customers
//!
//! Customer accounts belong to the authentication module. Only the id crosses
//! into carts and orders, already authenticated by the caller.

use crate::uuids::TypedUuid;

/// Marker for ids issued by the authentication module.
#[derive(Debug)]
pub struct Customer;

/// Customer UUID
pub type CustomerUuid = TypedUuid<Customer>;

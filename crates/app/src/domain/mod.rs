//! Vitrine Domain Concerns

pub mod carts;
pub mod checkout;
pub(crate) mod columns;
pub mod customers;
pub mod orders;
pub mod products;
pub mod tenants;

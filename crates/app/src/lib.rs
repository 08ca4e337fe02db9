//! Multi-tenant storefront carts, checkout and order ledger.

pub mod config;
pub mod context;
pub mod database;
pub mod domain;
pub mod observability;
pub mod uuids;

#[cfg(test)]
mod test;

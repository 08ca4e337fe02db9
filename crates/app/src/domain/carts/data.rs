//! Cart Data

use crate::domain::{carts::records::CartItemUuid, products::records::ProductUuid};

/// New Cart Item Data
///
/// If the product is already in the cart the quantities are summed into the
/// existing item and `uuid` is unused.
#[derive(Debug, Clone, PartialEq)]
pub struct NewCartItem {
    pub uuid: CartItemUuid,
    pub product_uuid: ProductUuid,
    pub quantity: u32,
    pub notes: Option<String>,
}

/// Cart Item Update Data
#[derive(Debug, Clone, PartialEq)]
pub struct CartItemUpdate {
    pub quantity: u32,
    /// Replaces the item's notes when present.
    pub notes: Option<String>,
}

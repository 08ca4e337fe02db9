//! Cart Records

use jiff::Timestamp;

use crate::{
    domain::{checkout::totals, customers::CustomerUuid, products::records::ProductUuid},
    uuids::TypedUuid,
};

/// Cart UUID
pub type CartUuid = TypedUuid<CartRecord>;

/// Cart Record
///
/// One per (tenant, customer); created lazily and only ever emptied.
#[derive(Debug, Clone)]
pub struct CartRecord {
    pub uuid: CartUuid,
    pub customer_uuid: CustomerUuid,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Cart Item UUID
pub type CartItemUuid = TypedUuid<CartItemRecord>;

/// CartItem Record
///
/// `unit_price` is the catalog price captured when the product was (re-)added.
#[derive(Debug, Clone)]
pub struct CartItemRecord {
    pub uuid: CartItemUuid,
    pub cart_uuid: CartUuid,
    pub product_uuid: ProductUuid,
    pub quantity: u32,
    pub unit_price: u64,
    pub notes: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl CartItemRecord {
    /// `unit_price × quantity`, or `None` on overflow.
    pub fn line_subtotal(&self) -> Option<u64> {
        totals::line_subtotal(self.unit_price, self.quantity)
    }
}

/// A cart item joined with the product's current catalog data.
#[derive(Debug, Clone)]
pub struct CartLineRecord {
    pub item: CartItemRecord,
    pub product_name: String,
    pub product_category: Option<String>,
    pub current_price: u64,
    pub available_stock: u32,
    /// False once the product was deactivated or deleted after being added.
    pub available: bool,
}

/// Read model returned to the storefront.
#[derive(Debug, Clone)]
pub struct CartView {
    pub cart: CartRecord,
    pub lines: Vec<CartLineRecord>,
    /// Sum of snapshot line subtotals.
    pub subtotal: u64,
    /// Sum of quantities.
    pub total_item_count: u64,
}

//! Order Records

use jiff::Timestamp;

use crate::{
    domain::{customers::CustomerUuid, products::records::ProductUuid},
    uuids::TypedUuid,
};

/// Order UUID
pub type OrderUuid = TypedUuid<OrderRecord>;

/// Order Record
///
/// `subtotal` is the sum of the item line subtotals and
/// `total == subtotal - discount`; both are fixed at checkout.
#[derive(Debug, Clone)]
pub struct OrderRecord {
    pub uuid: OrderUuid,
    pub customer_uuid: CustomerUuid,
    pub number: String,
    pub subtotal: u64,
    pub discount: u64,
    pub total: u64,
    pub shipping_address: Option<String>,
    pub payment_method: Option<String>,
    pub coupon_code: Option<String>,
    pub notes: Option<String>,
    pub idempotency_key: Option<String>,
    pub items: Vec<OrderItemRecord>,
    pub created_at: Timestamp,
}

/// Order Item UUID
pub type OrderItemUuid = TypedUuid<OrderItemRecord>;

/// Order Item Record
#[derive(Debug, Clone)]
pub struct OrderItemRecord {
    pub uuid: OrderItemUuid,
    pub order_uuid: OrderUuid,
    pub product_uuid: ProductUuid,
    /// Index of the item within its order, in cart order.
    pub position: u32,
    pub quantity: u32,
    pub unit_price: u64,
    pub line_subtotal: u64,
    pub notes: Option<String>,
}

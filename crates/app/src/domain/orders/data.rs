//! Order Data

use crate::domain::{
    customers::CustomerUuid,
    orders::records::{OrderItemUuid, OrderUuid},
    products::records::ProductUuid,
};

/// New Order Data
///
/// Built by checkout from a locked cart; items keep the cart's order.
#[derive(Debug, Clone, PartialEq)]
pub struct NewOrder {
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
    pub items: Vec<NewOrderItem>,
}

/// New Order Item Data
#[derive(Debug, Clone, PartialEq)]
pub struct NewOrderItem {
    pub uuid: OrderItemUuid,
    pub product_uuid: ProductUuid,
    pub quantity: u32,
    pub unit_price: u64,
    pub line_subtotal: u64,
    pub notes: Option<String>,
}

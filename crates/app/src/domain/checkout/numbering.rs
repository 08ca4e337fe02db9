//! Order numbers.
//!
//! `PED-<unix millis>-<hex>`: readable and roughly ordered. The hex suffix is
//! the tail of the order's v7 uuid, which separates orders placed in the same
//! millisecond. Uniqueness itself is enforced by the `orders_tenant_number_key`
//! constraint.

use jiff::Timestamp;

use crate::domain::orders::records::OrderUuid;

pub(crate) fn order_number(placed_at: Timestamp, order: OrderUuid) -> String {
    let [.., high, low] = *order.into_uuid().as_bytes();

    format!("PED-{}-{high:02X}{low:02X}", placed_at.as_millisecond())
}

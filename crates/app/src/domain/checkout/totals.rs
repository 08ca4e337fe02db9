//! Order totals.

/// Amounts fixed on an order at checkout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct OrderTotals {
    pub(crate) subtotal: u64,
    pub(crate) discount: u64,
    pub(crate) total: u64,
}

impl OrderTotals {
    /// Applies `discount` to `subtotal`, clamping it so the total never
    /// drops below zero.
    pub(crate) fn new(subtotal: u64, discount: u64) -> Self {
        let discount = discount.min(subtotal);

        Self {
            subtotal,
            discount,
            total: subtotal - discount,
        }
    }
}

/// `unit_price × quantity`, or `None` on overflow.
pub(crate) fn line_subtotal(unit_price: u64, quantity: u32) -> Option<u64> {
    unit_price.checked_mul(u64::from(quantity))
}

/// Sum of line subtotals over `(unit_price, quantity)` pairs, or `None` on
/// overflow.
pub(crate) fn subtotal(lines: impl IntoIterator<Item = (u64, u32)>) -> Option<u64> {
    lines.into_iter().try_fold(0_u64, |acc, (unit_price, quantity)| {
        acc.checked_add(line_subtotal(unit_price, quantity)?)
    })
}

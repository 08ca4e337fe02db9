//! Checkout Data

/// Checkout Input
///
/// Everything is optional. When `idempotency_key` is set, repeating a
/// checkout with the same key returns the order placed by the first attempt.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CheckoutInput {
    pub shipping_address: Option<String>,
    pub payment_method: Option<String>,
    pub coupon_code: Option<String>,
    pub notes: Option<String>,
    pub idempotency_key: Option<String>,
}

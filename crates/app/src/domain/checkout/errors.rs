//! Checkout service errors.

use sqlx::{
    Error,
    error::{DatabaseError, ErrorKind},
};
use thiserror::Error;

use crate::{
    database,
    domain::{checkout::coupons::CouponRejection, products::records::ProductUuid},
};

#[derive(Debug, Error)]
pub enum CheckoutServiceError {
    #[error("cart is empty")]
    EmptyCart,

    #[error("insufficient stock for product {product}")]
    InsufficientStock { product: ProductUuid },

    #[error("product {product} is no longer available")]
    ProductNotFound { product: ProductUuid },

    #[error("coupon rejected: {0}")]
    CouponRejected(#[source] CouponRejection),

    #[error("referenced resource belongs to another tenant")]
    TenantMismatch,

    #[error("related resource not found")]
    InvalidReference,

    #[error("missing required data")]
    MissingRequiredData,

    #[error("invalid data")]
    InvalidData,

    #[error("order amount overflow")]
    AmountOverflow,

    #[error("transaction conflict; retry the checkout")]
    TransactionConflict,

    #[error("checkout timed out and was rolled back")]
    TimedOut,

    #[error("storage error")]
    Sql(#[source] Error),
}

impl From<Error> for CheckoutServiceError {
    fn from(error: Error) -> Self {
        if database::is_transaction_conflict(&error) {
            return Self::TransactionConflict;
        }

        match error.as_database_error().map(DatabaseError::kind) {
            // Order number or idempotency key; a retry resolves either.
            Some(ErrorKind::UniqueViolation) => Self::TransactionConflict,
            Some(ErrorKind::ForeignKeyViolation) if database::violates_tenant_key(&error) => {
                Self::TenantMismatch
            }
            Some(ErrorKind::ForeignKeyViolation) => Self::InvalidReference,
            Some(ErrorKind::NotNullViolation) => Self::MissingRequiredData,
            Some(ErrorKind::CheckViolation) => Self::InvalidData,
            Some(ErrorKind::Other | _) | None => match error {
                Error::ColumnDecode { .. } | Error::Encode(_) => Self::InvalidData,
                error => Self::Sql(error),
            },
        }
    }
}

//! Carts service errors.

use sqlx::{
    Error,
    error::{DatabaseError, ErrorKind},
};
use thiserror::Error;

use crate::{database, domain::products::records::ProductUuid};

#[derive(Debug, Error)]
pub enum CartsServiceError {
    #[error("product not found or inactive")]
    ProductNotFound,

    #[error("cart item not found")]
    ItemNotFound,

    #[error("cart not found")]
    CartNotFound,

    #[error("insufficient stock for product {product}")]
    InsufficientStock { product: ProductUuid },

    #[error("quantity must be greater than zero")]
    InvalidQuantity,

    #[error("referenced resource belongs to another tenant")]
    TenantMismatch,

    #[error("cart item already exists")]
    AlreadyExists,

    #[error("invalid data")]
    InvalidData,

    #[error("cart amount overflow")]
    AmountOverflow,

    #[error("transaction conflict; retry the operation")]
    TransactionConflict,

    #[error("storage error")]
    Sql(#[source] Error),
}

impl From<Error> for CartsServiceError {
    fn from(error: Error) -> Self {
        if matches!(error, Error::RowNotFound) {
            return Self::CartNotFound;
        }

        if database::is_transaction_conflict(&error) {
            return Self::TransactionConflict;
        }

        match error.as_database_error().map(DatabaseError::kind) {
            Some(ErrorKind::UniqueViolation) => Self::AlreadyExists,
            Some(ErrorKind::ForeignKeyViolation) if database::violates_tenant_key(&error) => {
                Self::TenantMismatch
            }
            Some(ErrorKind::ForeignKeyViolation) => Self::ProductNotFound,
            Some(ErrorKind::CheckViolation | ErrorKind::NotNullViolation) => Self::InvalidData,
            Some(ErrorKind::Other | _) | None => match error {
                Error::ColumnDecode { .. } | Error::Encode(_) => Self::InvalidData,
                error => Self::Sql(error),
            },
        }
    }
}

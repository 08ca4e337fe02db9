//! Column conversions shared by the repositories.
//!
//! Money is stored as `BIGINT` minor units and quantities as `INTEGER`; the
//! domain uses unsigned types, so every crossing is a checked conversion.

use sqlx::{Row, postgres::PgRow};

pub(crate) fn try_get_amount(row: &PgRow, col: &str) -> Result<u64, sqlx::Error> {
    let amount_i64: i64 = row.try_get(col)?;

    u64::try_from(amount_i64).map_err(|e| sqlx::Error::ColumnDecode {
        index: col.to_string(),
        source: Box::new(e),
    })
}

pub(crate) fn try_get_count(row: &PgRow, col: &str) -> Result<u32, sqlx::Error> {
    let count_i32: i32 = row.try_get(col)?;

    u32::try_from(count_i32).map_err(|e| sqlx::Error::ColumnDecode {
        index: col.to_string(),
        source: Box::new(e),
    })
}

/// Largest amount a `BIGINT` column can hold.
pub(crate) const MAX_AMOUNT: u64 = i64::MAX.unsigned_abs();

pub(crate) fn amount_param(amount: u64, col: &str) -> Result<i64, sqlx::Error> {
    i64::try_from(amount)
        .map_err(|_| sqlx::Error::Encode(format!("{col} {amount} exceeds BIGINT").into()))
}

pub(crate) fn count_param(count: u32, col: &str) -> Result<i32, sqlx::Error> {
    i32::try_from(count)
        .map_err(|_| sqlx::Error::Encode(format!("{col} {count} exceeds INTEGER").into()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn amount_param_rejects_values_beyond_bigint() {
        assert!(matches!(
            amount_param(MAX_AMOUNT + 1, "price"),
            Err(sqlx::Error::Encode(_))
        ));
        assert_eq!(amount_param(MAX_AMOUNT, "price").ok(), Some(i64::MAX));
        assert_eq!(amount_param(10_00, "price").ok(), Some(1000));
    }

    #[test]
    fn count_param_rejects_values_beyond_integer() {
        assert!(matches!(
            count_param(u32::MAX, "quantity"),
            Err(sqlx::Error::Encode(_))
        ));
        assert_eq!(count_param(3, "quantity").ok(), Some(3));
    }
}

//! Coupons
//!
//! Coupon rules live with the storefront's promotions. Checkout only asks for
//! the discount a code grants against a subtotal and applies the answer.

use async_trait::async_trait;
use mockall::automock;
use thiserror::Error;

use crate::domain::tenants::records::TenantUuid;

/// Why a coupon code was not accepted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CouponRejection {
    #[error("coupon not found or inactive")]
    NotFound,

    #[error("coupon outside its validity period")]
    Expired,

    #[error("coupon usage limit reached")]
    UsageLimitReached,

    #[error("minimum purchase of {minimum} not reached")]
    MinimumNotMet { minimum: u64 },
}

#[automock]
#[async_trait]
pub trait CouponsService: Send + Sync {
    /// Returns the discount, in minor units, that `code` grants on `subtotal`.
    async fn resolve_discount(
        &self,
        tenant: TenantUuid,
        code: &str,
        subtotal: u64,
    ) -> Result<u64, CouponRejection>;
}

/// Coupon source for deployments without promotions: every code is unknown.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoCoupons;

#[async_trait]
impl CouponsService for NoCoupons {
    async fn resolve_discount(
        &self,
        _tenant: TenantUuid,
        _code: &str,
        _subtotal: u64,
    ) -> Result<u64, CouponRejection> {
        Err(CouponRejection::NotFound)
    }
}

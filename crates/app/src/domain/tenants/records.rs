//! Tenant Records

use jiff::Timestamp;

use crate::uuids::TypedUuid;

/// Tenant UUID
pub type TenantUuid = TypedUuid<TenantRecord>;

/// Tenant Record
///
/// One storefront. `slug` is the public handle the storefront is reached by
/// (`/loja/<slug>`); every other table is partitioned by `uuid`.
#[derive(Debug, Clone)]
pub struct TenantRecord {
    pub uuid: TenantUuid,
    pub name: String,
    pub slug: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub deleted_at: Option<Timestamp>,
}

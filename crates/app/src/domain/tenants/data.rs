//! Tenant Data

use crate::domain::tenants::records::TenantUuid;

/// New Tenant Data
#[derive(Debug, Clone, PartialEq)]
pub struct NewTenant {
    pub uuid: TenantUuid,
    pub name: String,
    /// Lowercase letters and digits in dash-separated groups, e.g. `padaria-central`.
    pub slug: String,
}

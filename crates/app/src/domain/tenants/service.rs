//! Tenants service.

use async_trait::async_trait;
use mockall::automock;
use sqlx::PgPool;
use tracing::info;

use crate::domain::tenants::{
    data::NewTenant, errors::TenantsServiceError, records::TenantRecord,
    repository::PgTenantsRepository,
};

#[derive(Debug, Clone)]
pub struct PgTenantsService {
    repository: PgTenantsRepository,
}

impl PgTenantsService {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: PgTenantsRepository::new(pool),
        }
    }
}

#[async_trait]
impl TenantsService for PgTenantsService {
    #[tracing::instrument(
        name = "tenants.service.create_tenant",
        skip(self, tenant),
        fields(tenant_uuid = %tenant.uuid, tenant_slug = %tenant.slug),
        err
    )]
    async fn create_tenant(&self, tenant: NewTenant) -> Result<TenantRecord, TenantsServiceError> {
        let record = self.repository.create_tenant(tenant).await?;

        info!(tenant_uuid = %record.uuid, "created tenant");

        Ok(record)
    }

    async fn find_tenant_by_slug(&self, slug: &str) -> Result<TenantRecord, TenantsServiceError> {
        Ok(self.repository.find_tenant_by_slug(slug).await?)
    }
}

#[automock]
#[async_trait]
pub trait TenantsService: Send + Sync {
    /// Creates a new tenant.
    async fn create_tenant(&self, tenant: NewTenant) -> Result<TenantRecord, TenantsServiceError>;

    /// Resolves a storefront slug to its live tenant.
    async fn find_tenant_by_slug(&self, slug: &str) -> Result<TenantRecord, TenantsServiceError>;
}

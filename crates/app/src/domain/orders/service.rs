//! Orders service.

use async_trait::async_trait;
use mockall::automock;

use crate::{
    database::Db,
    domain::{
        customers::CustomerUuid,
        orders::{
            errors::OrdersServiceError,
            records::{OrderRecord, OrderUuid},
            repository::PgOrdersRepository,
        },
        tenants::records::TenantUuid,
    },
};

#[derive(Debug, Clone)]
pub struct PgOrdersService {
    db: Db,
    repository: PgOrdersRepository,
}

impl PgOrdersService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: PgOrdersRepository::new(),
        }
    }
}

#[async_trait]
impl OrdersService for PgOrdersService {
    async fn get_order(
        &self,
        tenant: TenantUuid,
        customer: CustomerUuid,
        order: OrderUuid,
    ) -> Result<OrderRecord, OrdersServiceError> {
        let mut tx = self.db.begin_tenant_transaction(tenant).await?;

        let order = self
            .repository
            .get_order(&mut tx, tenant, customer, order)
            .await?;

        tx.commit().await?;

        Ok(order)
    }

    async fn list_orders(
        &self,
        tenant: TenantUuid,
        customer: CustomerUuid,
    ) -> Result<Vec<OrderRecord>, OrdersServiceError> {
        let mut tx = self.db.begin_tenant_transaction(tenant).await?;

        let orders = self
            .repository
            .list_orders(&mut tx, tenant, customer)
            .await?;

        tx.commit().await?;

        Ok(orders)
    }
}

/// Read access to a customer's placed orders.
#[automock]
#[async_trait]
pub trait OrdersService: Send + Sync {
    /// Retrieve a single order with its items.
    async fn get_order(
        &self,
        tenant: TenantUuid,
        customer: CustomerUuid,
        order: OrderUuid,
    ) -> Result<OrderRecord, OrdersServiceError>;

    /// Retrieve the customer's orders with their items, newest first.
    async fn list_orders(
        &self,
        tenant: TenantUuid,
        customer: CustomerUuid,
    ) -> Result<Vec<OrderRecord>, OrdersServiceError>;
}

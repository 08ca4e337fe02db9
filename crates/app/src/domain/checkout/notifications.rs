//! Order notifications
//!
//! Delivery (email, WhatsApp) belongs to other services. Checkout hands each
//! committed order to an [`OrderNotifier`] in a background task; a failure
//! there is logged and never reaches the customer's checkout.

use async_trait::async_trait;
use mockall::automock;
use thiserror::Error;
use tracing::info;

use crate::domain::{orders::records::OrderRecord, tenants::records::TenantUuid};

#[derive(Debug, Error)]
#[error("order notification failed: {0}")]
pub struct NotificationError(pub String);

#[automock]
#[async_trait]
pub trait OrderNotifier: Send + Sync {
    /// Called once per committed order.
    async fn order_placed(
        &self,
        tenant: TenantUuid,
        order: &OrderRecord,
    ) -> Result<(), NotificationError>;
}

/// Records placed orders in the application log.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

#[async_trait]
impl OrderNotifier for LogNotifier {
    async fn order_placed(
        &self,
        tenant: TenantUuid,
        order: &OrderRecord,
    ) -> Result<(), NotificationError> {
        info!(
            tenant_uuid = %tenant,
            order_uuid = %order.uuid,
            order_number = %order.number,
            customer_uuid = %order.customer_uuid,
            total = order.total,
            items = order.items.len(),
            "order placed"
        );

        Ok(())
    }
}

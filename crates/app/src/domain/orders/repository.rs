//! Orders Repository

use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query_as};
use uuid::Uuid;

use crate::domain::{
    columns::{amount_param, count_param, try_get_amount, try_get_count},
    customers::CustomerUuid,
    orders::{
        data::NewOrder,
        records::{OrderItemRecord, OrderItemUuid, OrderRecord, OrderUuid},
    },
    products::records::ProductUuid,
    tenants::records::TenantUuid,
};

const CREATE_ORDER_SQL: &str = include_str!("sql/create_order.sql");
const CREATE_ORDER_ITEM_SQL: &str = include_str!("sql/create_order_item.sql");
const GET_ORDER_SQL: &str = include_str!("sql/get_order.sql");
const FIND_ORDER_BY_IDEMPOTENCY_KEY_SQL: &str =
    include_str!("sql/find_order_by_idempotency_key.sql");
const LIST_ORDERS_SQL: &str = include_str!("sql/list_orders.sql");
const LIST_ORDER_ITEMS_SQL: &str = include_str!("sql/list_order_items.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgOrdersRepository;

impl PgOrdersRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    /// Inserts the order header and then its items, numbered by position.
    pub(crate) async fn create_order(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        tenant: TenantUuid,
        order: NewOrder,
    ) -> Result<OrderRecord, sqlx::Error> {
        let mut created = query_as::<Postgres, OrderRecord>(CREATE_ORDER_SQL)
            .bind(order.uuid.into_uuid())
            .bind(tenant.into_uuid())
            .bind(order.customer_uuid.into_uuid())
            .bind(order.number)
            .bind(amount_param(order.subtotal, "subtotal")?)
            .bind(amount_param(order.discount, "discount")?)
            .bind(amount_param(order.total, "total")?)
            .bind(order.shipping_address)
            .bind(order.payment_method)
            .bind(order.coupon_code)
            .bind(order.notes)
            .bind(order.idempotency_key)
            .fetch_one(&mut **tx)
            .await?;

        for (position, item) in (0_u32..).zip(order.items) {
            let item = query_as::<Postgres, OrderItemRecord>(CREATE_ORDER_ITEM_SQL)
                .bind(item.uuid.into_uuid())
                .bind(tenant.into_uuid())
                .bind(created.uuid.into_uuid())
                .bind(item.product_uuid.into_uuid())
                .bind(count_param(position, "position")?)
                .bind(count_param(item.quantity, "quantity")?)
                .bind(amount_param(item.unit_price, "unit_price")?)
                .bind(amount_param(item.line_subtotal, "line_subtotal")?)
                .bind(item.notes)
                .fetch_one(&mut **tx)
                .await?;

            created.items.push(item);
        }

        Ok(created)
    }

    pub(crate) async fn get_order(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        tenant: TenantUuid,
        customer: CustomerUuid,
        order: OrderUuid,
    ) -> Result<OrderRecord, sqlx::Error> {
        let order = query_as::<Postgres, OrderRecord>(GET_ORDER_SQL)
            .bind(order.into_uuid())
            .bind(tenant.into_uuid())
            .bind(customer.into_uuid())
            .fetch_one(&mut **tx)
            .await?;

        let mut orders = self.attach_items(tx, tenant, vec![order]).await?;

        orders.pop().ok_or(sqlx::Error::RowNotFound)
    }

    pub(crate) async fn find_order_by_idempotency_key(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        tenant: TenantUuid,
        customer: CustomerUuid,
        key: &str,
    ) -> Result<Option<OrderRecord>, sqlx::Error> {
        let order = query_as::<Postgres, OrderRecord>(FIND_ORDER_BY_IDEMPOTENCY_KEY_SQL)
            .bind(tenant.into_uuid())
            .bind(customer.into_uuid())
            .bind(key)
            .fetch_optional(&mut **tx)
            .await?;

        match order {
            Some(order) => Ok(self.attach_items(tx, tenant, vec![order]).await?.pop()),
            None => Ok(None),
        }
    }

    pub(crate) async fn list_orders(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        tenant: TenantUuid,
        customer: CustomerUuid,
    ) -> Result<Vec<OrderRecord>, sqlx::Error> {
        let orders = query_as::<Postgres, OrderRecord>(LIST_ORDERS_SQL)
            .bind(tenant.into_uuid())
            .bind(customer.into_uuid())
            .fetch_all(&mut **tx)
            .await?;

        self.attach_items(tx, tenant, orders).await
    }

    async fn attach_items(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        tenant: TenantUuid,
        mut orders: Vec<OrderRecord>,
    ) -> Result<Vec<OrderRecord>, sqlx::Error> {
        if orders.is_empty() {
            return Ok(orders);
        }

        let order_uuids: Vec<Uuid> = orders.iter().map(|order| order.uuid.into_uuid()).collect();

        let items = query_as::<Postgres, OrderItemRecord>(LIST_ORDER_ITEMS_SQL)
            .bind(tenant.into_uuid())
            .bind(order_uuids)
            .fetch_all(&mut **tx)
            .await?;

        for item in items {
            if let Some(order) = orders.iter_mut().find(|order| order.uuid == item.order_uuid) {
                order.items.push(item);
            }
        }

        Ok(orders)
    }
}

impl<'r> FromRow<'r, PgRow> for OrderRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: OrderUuid::from_uuid(row.try_get("uuid")?),
            customer_uuid: CustomerUuid::from_uuid(row.try_get("customer_uuid")?),
            number: row.try_get("number")?,
            subtotal: try_get_amount(row, "subtotal")?,
            discount: try_get_amount(row, "discount")?,
            total: try_get_amount(row, "total")?,
            shipping_address: row.try_get("shipping_address")?,
            payment_method: row.try_get("payment_method")?,
            coupon_code: row.try_get("coupon_code")?,
            notes: row.try_get("notes")?,
            idempotency_key: row.try_get("idempotency_key")?,
            items: Vec::new(),
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
        })
    }
}

impl<'r> FromRow<'r, PgRow> for OrderItemRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: OrderItemUuid::from_uuid(row.try_get("uuid")?),
            order_uuid: OrderUuid::from_uuid(row.try_get("order_uuid")?),
            product_uuid: ProductUuid::from_uuid(row.try_get("product_uuid")?),
            position: try_get_count(row, "position")?,
            quantity: try_get_count(row, "quantity")?,
            unit_price: try_get_amount(row, "unit_price")?,
            line_subtotal: try_get_amount(row, "line_subtotal")?,
            notes: row.try_get("notes")?,
        })
    }
}

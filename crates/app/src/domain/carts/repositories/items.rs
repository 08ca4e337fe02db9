//! Cart Items Repository

use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query, query_as};

use crate::domain::{
    carts::{
        data::NewCartItem,
        records::{CartItemRecord, CartItemUuid, CartLineRecord, CartUuid},
    },
    columns::{amount_param, count_param, try_get_amount, try_get_count},
    customers::CustomerUuid,
    products::records::ProductUuid,
    tenants::records::TenantUuid,
};

const LIST_CART_ITEMS_SQL: &str = include_str!("../sql/list_cart_items.sql");
const LIST_CART_LINES_SQL: &str = include_str!("../sql/list_cart_lines.sql");
const FIND_CUSTOMER_CART_ITEM_SQL: &str = include_str!("../sql/find_customer_cart_item.sql");
const ADD_CART_ITEM_SQL: &str = include_str!("../sql/add_cart_item.sql");
const UPDATE_CART_ITEM_SQL: &str = include_str!("../sql/update_cart_item.sql");
const DELETE_CART_ITEM_SQL: &str = include_str!("../sql/delete_cart_item.sql");
const CLEAR_CART_ITEMS_SQL: &str = include_str!("../sql/clear_cart_items.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgCartItemsRepository;

impl PgCartItemsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn list_cart_items(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        tenant: TenantUuid,
        cart: CartUuid,
    ) -> Result<Vec<CartItemRecord>, sqlx::Error> {
        query_as::<Postgres, CartItemRecord>(LIST_CART_ITEMS_SQL)
            .bind(tenant.into_uuid())
            .bind(cart.into_uuid())
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn list_cart_lines(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        tenant: TenantUuid,
        cart: CartUuid,
    ) -> Result<Vec<CartLineRecord>, sqlx::Error> {
        query_as::<Postgres, CartLineRecord>(LIST_CART_LINES_SQL)
            .bind(tenant.into_uuid())
            .bind(cart.into_uuid())
            .fetch_all(&mut **tx)
            .await
    }

    /// Finds an item only if it sits in `customer`'s cart within `tenant`.
    pub(crate) async fn find_customer_item(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        tenant: TenantUuid,
        customer: CustomerUuid,
        item: CartItemUuid,
    ) -> Result<Option<CartItemRecord>, sqlx::Error> {
        query_as::<Postgres, CartItemRecord>(FIND_CUSTOMER_CART_ITEM_SQL)
            .bind(item.into_uuid())
            .bind(tenant.into_uuid())
            .bind(customer.into_uuid())
            .fetch_optional(&mut **tx)
            .await
    }

    /// Inserts the item, or adds its quantity to the line already holding the
    /// product, re-capturing `unit_price` and replacing notes when given.
    ///
    /// Returns `None` when the merged quantity would exceed `stock`; the
    /// existing line is then left as it was. Concurrent adds of one product
    /// serialize on `cart_items_cart_product_key` and both land in the sum.
    pub(crate) async fn add_cart_item(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        tenant: TenantUuid,
        cart: CartUuid,
        item: NewCartItem,
        unit_price: u64,
        stock: u32,
    ) -> Result<Option<CartItemRecord>, sqlx::Error> {
        query_as::<Postgres, CartItemRecord>(ADD_CART_ITEM_SQL)
            .bind(item.uuid.into_uuid())
            .bind(tenant.into_uuid())
            .bind(cart.into_uuid())
            .bind(item.product_uuid.into_uuid())
            .bind(count_param(item.quantity, "quantity")?)
            .bind(amount_param(unit_price, "unit_price")?)
            .bind(item.notes)
            .bind(i64::from(stock))
            .fetch_optional(&mut **tx)
            .await
    }

    pub(crate) async fn update_cart_item(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        tenant: TenantUuid,
        item: CartItemUuid,
        quantity: u32,
        notes: Option<String>,
    ) -> Result<CartItemRecord, sqlx::Error> {
        query_as::<Postgres, CartItemRecord>(UPDATE_CART_ITEM_SQL)
            .bind(item.into_uuid())
            .bind(tenant.into_uuid())
            .bind(count_param(quantity, "quantity")?)
            .bind(notes)
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn delete_cart_item(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        tenant: TenantUuid,
        customer: CustomerUuid,
        item: CartItemUuid,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(DELETE_CART_ITEM_SQL)
            .bind(item.into_uuid())
            .bind(tenant.into_uuid())
            .bind(customer.into_uuid())
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }

    pub(crate) async fn clear_cart_items(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        tenant: TenantUuid,
        cart: CartUuid,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(CLEAR_CART_ITEMS_SQL)
            .bind(tenant.into_uuid())
            .bind(cart.into_uuid())
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }
}

impl<'r> FromRow<'r, PgRow> for CartItemRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: CartItemUuid::from_uuid(row.try_get("uuid")?),
            cart_uuid: CartUuid::from_uuid(row.try_get("cart_uuid")?),
            product_uuid: ProductUuid::from_uuid(row.try_get("product_uuid")?),
            quantity: try_get_count(row, "quantity")?,
            unit_price: try_get_amount(row, "unit_price")?,
            notes: row.try_get("notes")?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
        })
    }
}

impl<'r> FromRow<'r, PgRow> for CartLineRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            item: CartItemRecord::from_row(row)?,
            product_name: row.try_get("product_name")?,
            product_category: row.try_get("product_category")?,
            current_price: try_get_amount(row, "current_price")?,
            available_stock: try_get_count(row, "available_stock")?,
            available: row.try_get("available")?,
        })
    }
}

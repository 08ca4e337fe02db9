//! Products Repository

use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query, query_as};
use tracing::debug;

use crate::domain::{
    carts::records::CartUuid,
    columns::{amount_param, count_param, try_get_amount, try_get_count},
    products::{
        data::{NewProduct, ProductUpdate},
        records::{ProductRecord, ProductUuid},
    },
    tenants::records::TenantUuid,
};

const LIST_PRODUCTS_SQL: &str = include_str!("sql/list_products.sql");
const GET_PRODUCT_SQL: &str = include_str!("sql/get_product.sql");
const GET_AVAILABLE_PRODUCT_SQL: &str = include_str!("sql/get_available_product.sql");
const CREATE_PRODUCT_SQL: &str = include_str!("sql/create_product.sql");
const UPDATE_PRODUCT_SQL: &str = include_str!("sql/update_product.sql");
const DELETE_PRODUCT_SQL: &str = include_str!("sql/delete_product.sql");
const DECREMENT_STOCK_SQL: &str = include_str!("sql/decrement_stock.sql");
const LIST_NEWEST_PRODUCTS_SQL: &str = include_str!("sql/list_newest_products.sql");
const LIST_RELATED_PRODUCTS_SQL: &str = include_str!("sql/list_related_products.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgProductsRepository;

impl PgProductsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn list_products(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        tenant: TenantUuid,
    ) -> Result<Vec<ProductRecord>, sqlx::Error> {
        query_as::<Postgres, ProductRecord>(LIST_PRODUCTS_SQL)
            .bind(tenant.into_uuid())
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn get_product(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        tenant: TenantUuid,
        product: ProductUuid,
    ) -> Result<ProductRecord, sqlx::Error> {
        query_as::<Postgres, ProductRecord>(GET_PRODUCT_SQL)
            .bind(product.into_uuid())
            .bind(tenant.into_uuid())
            .fetch_one(&mut **tx)
            .await
    }

    /// Looks up a product that can currently be sold: active and not deleted.
    pub(crate) async fn find_available_product(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        tenant: TenantUuid,
        product: ProductUuid,
    ) -> Result<Option<ProductRecord>, sqlx::Error> {
        query_as::<Postgres, ProductRecord>(GET_AVAILABLE_PRODUCT_SQL)
            .bind(product.into_uuid())
            .bind(tenant.into_uuid())
            .fetch_optional(&mut **tx)
            .await
    }

    pub(crate) async fn create_product(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        tenant: TenantUuid,
        product: NewProduct,
    ) -> Result<ProductRecord, sqlx::Error> {
        query_as::<Postgres, ProductRecord>(CREATE_PRODUCT_SQL)
            .bind(product.uuid.into_uuid())
            .bind(tenant.into_uuid())
            .bind(product.name)
            .bind(product.category)
            .bind(amount_param(product.price, "price")?)
            .bind(count_param(product.stock, "stock")?)
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn update_product(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        tenant: TenantUuid,
        product: ProductUuid,
        update: ProductUpdate,
    ) -> Result<ProductRecord, sqlx::Error> {
        query_as::<Postgres, ProductRecord>(UPDATE_PRODUCT_SQL)
            .bind(product.into_uuid())
            .bind(tenant.into_uuid())
            .bind(update.name)
            .bind(update.category)
            .bind(amount_param(update.price, "price")?)
            .bind(count_param(update.stock, "stock")?)
            .bind(update.active)
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn delete_product(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        tenant: TenantUuid,
        product: ProductUuid,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(DELETE_PRODUCT_SQL)
            .bind(product.into_uuid())
            .bind(tenant.into_uuid())
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }

    /// Removes `quantity` units from stock only if at least that many remain
    /// at the moment of the write.
    ///
    /// Returns `false` when the row was not updated: the product has too
    /// little stock, is inactive or deleted, or does not exist for this
    /// tenant. The row stays locked until the enclosing transaction ends.
    #[tracing::instrument(
        name = "products.repository.decrement_stock",
        skip(self, tx),
        fields(tenant_uuid = %tenant, product_uuid = %product, quantity),
        err
    )]
    pub(crate) async fn decrement_stock(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        tenant: TenantUuid,
        product: ProductUuid,
        quantity: u32,
    ) -> Result<bool, sqlx::Error> {
        let rows_affected = query(DECREMENT_STOCK_SQL)
            .bind(product.into_uuid())
            .bind(tenant.into_uuid())
            .bind(count_param(quantity, "quantity")?)
            .execute(&mut **tx)
            .await?
            .rows_affected();

        debug!(rows_affected, "conditional stock decrement");

        Ok(rows_affected == 1)
    }

    pub(crate) async fn list_newest_products(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        tenant: TenantUuid,
        limit: u32,
    ) -> Result<Vec<ProductRecord>, sqlx::Error> {
        query_as::<Postgres, ProductRecord>(LIST_NEWEST_PRODUCTS_SQL)
            .bind(tenant.into_uuid())
            .bind(i64::from(limit))
            .fetch_all(&mut **tx)
            .await
    }

    /// Active products sharing a category with the cart's products, excluding
    /// those already in the cart. Without any categorised product in the cart
    /// every other active product qualifies.
    pub(crate) async fn list_related_products(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        tenant: TenantUuid,
        cart: CartUuid,
        limit: u32,
    ) -> Result<Vec<ProductRecord>, sqlx::Error> {
        query_as::<Postgres, ProductRecord>(LIST_RELATED_PRODUCTS_SQL)
            .bind(tenant.into_uuid())
            .bind(cart.into_uuid())
            .bind(i64::from(limit))
            .fetch_all(&mut **tx)
            .await
    }
}

impl<'r> FromRow<'r, PgRow> for ProductRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: ProductUuid::from_uuid(row.try_get("uuid")?),
            name: row.try_get("name")?,
            category: row.try_get("category")?,
            price: try_get_amount(row, "price")?,
            stock: try_get_count(row, "stock")?,
            active: row.try_get("active")?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
            deleted_at: row
                .try_get::<Option<SqlxTimestamp>, _>("deleted_at")?
                .map(SqlxTimestamp::to_jiff),
        })
    }
}

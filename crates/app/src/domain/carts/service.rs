//! Carts service.

use async_trait::async_trait;
use mockall::automock;
use tracing::{Span, debug, info};

use crate::{
    database::Db,
    domain::{
        carts::{
            data::{CartItemUpdate, NewCartItem},
            errors::CartsServiceError,
            records::{CartItemRecord, CartItemUuid, CartRecord, CartView},
            repositories::{PgCartItemsRepository, PgCartsRepository},
        },
        customers::CustomerUuid,
        products::{records::ProductRecord, repository::PgProductsRepository},
        tenants::records::TenantUuid,
    },
};

#[derive(Debug, Clone)]
pub struct PgCartsService {
    db: Db,
    carts_repository: PgCartsRepository,
    items_repository: PgCartItemsRepository,
    products_repository: PgProductsRepository,
}

impl PgCartsService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            carts_repository: PgCartsRepository::new(),
            items_repository: PgCartItemsRepository::new(),
            products_repository: PgProductsRepository::new(),
        }
    }
}

#[async_trait]
impl CartsService for PgCartsService {
    async fn get_or_create_cart(
        &self,
        tenant: TenantUuid,
        customer: CustomerUuid,
    ) -> Result<CartRecord, CartsServiceError> {
        let mut tx = self.db.begin_tenant_transaction(tenant).await?;

        let cart = self
            .carts_repository
            .get_or_create_cart(&mut tx, tenant, customer)
            .await?;

        tx.commit().await?;

        Ok(cart)
    }

    async fn get_cart(
        &self,
        tenant: TenantUuid,
        customer: CustomerUuid,
    ) -> Result<CartView, CartsServiceError> {
        let mut tx = self.db.begin_tenant_transaction(tenant).await?;

        let cart = self
            .carts_repository
            .get_or_create_cart(&mut tx, tenant, customer)
            .await?;

        let lines = self
            .items_repository
            .list_cart_lines(&mut tx, tenant, cart.uuid)
            .await?;

        tx.commit().await?;

        let mut subtotal = 0_u64;
        let mut total_item_count = 0_u64;

        for line in &lines {
            subtotal = line
                .item
                .line_subtotal()
                .and_then(|line_subtotal| subtotal.checked_add(line_subtotal))
                .ok_or(CartsServiceError::AmountOverflow)?;

            total_item_count += u64::from(line.item.quantity);
        }

        Ok(CartView {
            cart,
            lines,
            subtotal,
            total_item_count,
        })
    }

    #[tracing::instrument(
        name = "carts.service.add_item",
        skip(self, item),
        fields(
            tenant_uuid = %tenant,
            customer_uuid = %customer,
            product_uuid = %item.product_uuid,
            quantity = item.quantity,
            cart_item_uuid = tracing::field::Empty
        ),
        err
    )]
    async fn add_item(
        &self,
        tenant: TenantUuid,
        customer: CustomerUuid,
        item: NewCartItem,
    ) -> Result<CartItemRecord, CartsServiceError> {
        if item.quantity == 0 {
            return Err(CartsServiceError::InvalidQuantity);
        }

        let mut tx = self.db.begin_tenant_transaction(tenant).await?;

        let product = self
            .products_repository
            .find_available_product(&mut tx, tenant, item.product_uuid)
            .await?
            .ok_or(CartsServiceError::ProductNotFound)?;

        let cart = self
            .carts_repository
            .get_or_create_cart(&mut tx, tenant, customer)
            .await?;

        let insufficient_stock = CartsServiceError::InsufficientStock {
            product: product.uuid,
        };

        if item.quantity > product.stock {
            return Err(insufficient_stock);
        }

        let saved = self
            .items_repository
            .add_cart_item(&mut tx, tenant, cart.uuid, item, product.price, product.stock)
            .await?
            .ok_or(insufficient_stock)?;

        tx.commit().await?;

        Span::current().record("cart_item_uuid", tracing::field::display(saved.uuid));

        info!(
            cart_uuid = %cart.uuid,
            quantity = saved.quantity,
            unit_price = saved.unit_price,
            "added item to cart"
        );

        Ok(saved)
    }

    #[tracing::instrument(
        name = "carts.service.update_item",
        skip(self, update),
        fields(
            tenant_uuid = %tenant,
            customer_uuid = %customer,
            cart_item_uuid = %item,
            quantity = update.quantity
        ),
        err
    )]
    async fn update_item(
        &self,
        tenant: TenantUuid,
        customer: CustomerUuid,
        item: CartItemUuid,
        update: CartItemUpdate,
    ) -> Result<CartItemRecord, CartsServiceError> {
        if update.quantity == 0 {
            return Err(CartsServiceError::InvalidQuantity);
        }

        let mut tx = self.db.begin_tenant_transaction(tenant).await?;

        let existing = self
            .items_repository
            .find_customer_item(&mut tx, tenant, customer, item)
            .await?
            .ok_or(CartsServiceError::ItemNotFound)?;

        let product = self
            .products_repository
            .find_available_product(&mut tx, tenant, existing.product_uuid)
            .await?
            .ok_or(CartsServiceError::ProductNotFound)?;

        if update.quantity > product.stock {
            return Err(CartsServiceError::InsufficientStock {
                product: product.uuid,
            });
        }

        let updated = self
            .items_repository
            .update_cart_item(&mut tx, tenant, existing.uuid, update.quantity, update.notes)
            .await?;

        tx.commit().await?;

        Ok(updated)
    }

    #[tracing::instrument(
        name = "carts.service.remove_item",
        skip(self),
        fields(tenant_uuid = %tenant, customer_uuid = %customer, cart_item_uuid = %item),
        err
    )]
    async fn remove_item(
        &self,
        tenant: TenantUuid,
        customer: CustomerUuid,
        item: CartItemUuid,
    ) -> Result<(), CartsServiceError> {
        let mut tx = self.db.begin_tenant_transaction(tenant).await?;

        let rows_affected = self
            .items_repository
            .delete_cart_item(&mut tx, tenant, customer, item)
            .await?;

        tx.commit().await?;

        debug!(rows_affected, "removed cart item");

        Ok(())
    }

    #[tracing::instrument(
        name = "carts.service.clear_cart",
        skip(self),
        fields(tenant_uuid = %tenant, customer_uuid = %customer),
        err
    )]
    async fn clear_cart(
        &self,
        tenant: TenantUuid,
        customer: CustomerUuid,
    ) -> Result<(), CartsServiceError> {
        let mut tx = self.db.begin_tenant_transaction(tenant).await?;

        if let Some(cart) = self
            .carts_repository
            .find_cart(&mut tx, tenant, customer)
            .await?
        {
            let rows_affected = self
                .items_repository
                .clear_cart_items(&mut tx, tenant, cart.uuid)
                .await?;

            debug!(rows_affected, "cleared cart");
        }

        tx.commit().await?;

        Ok(())
    }

    async fn recommendations(
        &self,
        tenant: TenantUuid,
        customer: CustomerUuid,
        limit: u32,
    ) -> Result<Vec<ProductRecord>, CartsServiceError> {
        let mut tx = self.db.begin_tenant_transaction(tenant).await?;

        let cart = self
            .carts_repository
            .find_cart(&mut tx, tenant, customer)
            .await?;

        let in_cart = match &cart {
            Some(cart) => {
                self.items_repository
                    .list_cart_items(&mut tx, tenant, cart.uuid)
                    .await?
            }
            None => Vec::new(),
        };

        let products = match cart {
            Some(cart) if !in_cart.is_empty() => {
                self.products_repository
                    .list_related_products(&mut tx, tenant, cart.uuid, limit)
                    .await?
            }
            _ => {
                self.products_repository
                    .list_newest_products(&mut tx, tenant, limit)
                    .await?
            }
        };

        tx.commit().await?;

        Ok(products)
    }
}

/// A customer's in-progress cart within one tenant.
#[automock]
#[async_trait]
pub trait CartsService: Send + Sync {
    /// Returns the customer's cart, creating an empty one on first access.
    async fn get_or_create_cart(
        &self,
        tenant: TenantUuid,
        customer: CustomerUuid,
    ) -> Result<CartRecord, CartsServiceError>;

    /// Returns the cart's lines joined with current product data, plus the
    /// snapshot subtotal and item count.
    async fn get_cart(
        &self,
        tenant: TenantUuid,
        customer: CustomerUuid,
    ) -> Result<CartView, CartsServiceError>;

    /// Adds a product to the cart. Re-adding a product sums the quantities
    /// into the existing item and re-captures the catalog price.
    async fn add_item(
        &self,
        tenant: TenantUuid,
        customer: CustomerUuid,
        item: NewCartItem,
    ) -> Result<CartItemRecord, CartsServiceError>;

    /// Sets an item's quantity and, when given, its notes.
    async fn update_item(
        &self,
        tenant: TenantUuid,
        customer: CustomerUuid,
        item: CartItemUuid,
        update: CartItemUpdate,
    ) -> Result<CartItemRecord, CartsServiceError>;

    /// Removes an item. Removing a missing item succeeds.
    async fn remove_item(
        &self,
        tenant: TenantUuid,
        customer: CustomerUuid,
        item: CartItemUuid,
    ) -> Result<(), CartsServiceError>;

    /// Removes every item. Clearing an empty or missing cart succeeds.
    async fn clear_cart(
        &self,
        tenant: TenantUuid,
        customer: CustomerUuid,
    ) -> Result<(), CartsServiceError>;

    /// Suggests up to `limit` products: the newest ones for an empty cart,
    /// otherwise products sharing a category with the cart's contents.
    async fn recommendations(
        &self,
        tenant: TenantUuid,
        customer: CustomerUuid,
        limit: u32,
    ) -> Result<Vec<ProductRecord>, CartsServiceError>;
}

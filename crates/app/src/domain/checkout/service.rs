//! Checkout service.

use std::{fmt, sync::Arc, time::Duration};

use async_trait::async_trait;
use jiff::Timestamp;
use mockall::automock;
use tracing::{Instrument, Span, info, warn};

use crate::{
    database::Db,
    domain::{
        carts::{
            records::CartItemRecord,
            repositories::{PgCartItemsRepository, PgCartsRepository},
        },
        checkout::{
            coupons::CouponsService,
            data::CheckoutInput,
            errors::CheckoutServiceError,
            notifications::OrderNotifier,
            numbering,
            totals::{self, OrderTotals},
        },
        columns,
        customers::CustomerUuid,
        orders::{
            data::{NewOrder, NewOrderItem},
            records::{OrderItemUuid, OrderRecord, OrderUuid},
            repository::PgOrdersRepository,
        },
        products::repository::PgProductsRepository,
        tenants::records::TenantUuid,
    },
};

/// Discount priced against the cart before the checkout transaction opens.
#[derive(Debug, Clone, Copy)]
struct CouponQuote {
    subtotal: u64,
    discount: u64,
}

/// Outcome of one attempt at placing an order.
enum Placement {
    Placed(OrderRecord),
    /// An order with the same idempotency key already existed.
    Replayed(OrderRecord),
}

#[derive(Clone)]
pub struct PgCheckoutService {
    db: Db,
    carts_repository: PgCartsRepository,
    items_repository: PgCartItemsRepository,
    products_repository: PgProductsRepository,
    orders_repository: PgOrdersRepository,
    coupons: Arc<dyn CouponsService>,
    notifier: Arc<dyn OrderNotifier>,
    timeout: Option<Duration>,
}

impl PgCheckoutService {
    #[must_use]
    pub fn new(
        db: Db,
        coupons: Arc<dyn CouponsService>,
        notifier: Arc<dyn OrderNotifier>,
    ) -> Self {
        Self {
            db,
            carts_repository: PgCartsRepository::new(),
            items_repository: PgCartItemsRepository::new(),
            products_repository: PgProductsRepository::new(),
            orders_repository: PgOrdersRepository::new(),
            coupons,
            notifier,
            timeout: None,
        }
    }

    /// Abandons (and rolls back) any checkout still running after `timeout`.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Resolves the coupon from an unlocked read of the cart, so the
    /// collaborator is never awaited while the cart row is locked.
    ///
    /// Returns `None` when there is nothing to price: the cart is empty or the
    /// idempotency key already names a placed order.
    async fn quote_coupon(
        &self,
        tenant: TenantUuid,
        customer: CustomerUuid,
        code: &str,
        idempotency_key: Option<&str>,
    ) -> Result<Option<CouponQuote>, CheckoutServiceError> {
        let mut tx = self.db.begin_tenant_transaction(tenant).await?;

        if let Some(key) = idempotency_key
            && self
                .orders_repository
                .find_order_by_idempotency_key(&mut tx, tenant, customer, key)
                .await?
                .is_some()
        {
            tx.commit().await?;

            return Ok(None);
        }

        let items = match self.carts_repository.find_cart(&mut tx, tenant, customer).await? {
            Some(cart) => {
                self.items_repository
                    .list_cart_items(&mut tx, tenant, cart.uuid)
                    .await?
            }
            None => Vec::new(),
        };

        tx.commit().await?;

        if items.is_empty() {
            return Ok(None);
        }

        let subtotal = order_subtotal(&items)?;

        let discount = self
            .coupons
            .resolve_discount(tenant, code, subtotal)
            .await
            .map_err(|rejection| {
                warn!(coupon_code = code, %rejection, "coupon rejected at checkout");
                CheckoutServiceError::CouponRejected(rejection)
            })?;

        Ok(Some(CouponQuote { subtotal, discount }))
    }

    async fn attempt_checkout(
        &self,
        tenant: TenantUuid,
        customer: CustomerUuid,
        input: CheckoutInput,
    ) -> Result<Placement, CheckoutServiceError> {
        let quote = match input.coupon_code.as_deref() {
            Some(code) => {
                self.quote_coupon(tenant, customer, code, input.idempotency_key.as_deref())
                    .await?
            }
            None => None,
        };

        self.place_order(tenant, customer, input, quote).await
    }

    async fn place_order(
        &self,
        tenant: TenantUuid,
        customer: CustomerUuid,
        input: CheckoutInput,
        quote: Option<CouponQuote>,
    ) -> Result<Placement, CheckoutServiceError> {
        let mut tx = self.db.begin_tenant_transaction(tenant).await?;

        // Concurrent checkouts of one cart, retries with the same idempotency
        // key included, queue here; the later one then sees the committed
        // order or an empty cart.
        let cart = self
            .carts_repository
            .lock_cart(&mut tx, tenant, customer)
            .await?;

        if let Some(key) = input.idempotency_key.as_deref()
            && let Some(order) = self
                .orders_repository
                .find_order_by_idempotency_key(&mut tx, tenant, customer, key)
                .await?
        {
            tx.commit().await?;

            return Ok(Placement::Replayed(order));
        }

        let Some(cart) = cart else {
            return Err(CheckoutServiceError::EmptyCart);
        };

        let items = self
            .items_repository
            .list_cart_items(&mut tx, tenant, cart.uuid)
            .await?;

        if items.is_empty() {
            return Err(CheckoutServiceError::EmptyCart);
        }

        let subtotal = order_subtotal(&items)?;

        let discount = match (input.coupon_code.as_deref(), quote) {
            (None, _) => 0,
            (Some(_), Some(quote)) if quote.subtotal == subtotal => quote.discount,
            (Some(code), _) => {
                warn!(coupon_code = code, subtotal, "cart changed while the coupon was priced");

                return Err(CheckoutServiceError::TransactionConflict);
            }
        };

        let totals = OrderTotals::new(subtotal, discount);

        let mut decrements: Vec<_> = items
            .iter()
            .map(|item| (item.product_uuid, item.quantity))
            .collect();

        decrements.sort_unstable_by_key(|(product, _)| *product);

        for (product, quantity) in decrements {
            let decremented = self
                .products_repository
                .decrement_stock(&mut tx, tenant, product, quantity)
                .await?;

            if !decremented {
                let available = self
                    .products_repository
                    .find_available_product(&mut tx, tenant, product)
                    .await?;

                if available.is_none() {
                    warn!(product_uuid = %product, "product withdrawn before checkout");

                    return Err(CheckoutServiceError::ProductNotFound { product });
                }

                warn!(product_uuid = %product, quantity, "insufficient stock at checkout");

                return Err(CheckoutServiceError::InsufficientStock { product });
            }
        }

        let order_items = items
            .iter()
            .map(|item| {
                Ok(NewOrderItem {
                    uuid: OrderItemUuid::new(),
                    product_uuid: item.product_uuid,
                    quantity: item.quantity,
                    unit_price: item.unit_price,
                    line_subtotal: item
                        .line_subtotal()
                        .ok_or(CheckoutServiceError::AmountOverflow)?,
                    notes: item.notes.clone(),
                })
            })
            .collect::<Result<Vec<_>, CheckoutServiceError>>()?;

        let order_uuid = OrderUuid::new();

        let new_order = NewOrder {
            uuid: order_uuid,
            customer_uuid: customer,
            number: numbering::order_number(Timestamp::now(), order_uuid),
            subtotal: totals.subtotal,
            discount: totals.discount,
            total: totals.total,
            shipping_address: input.shipping_address,
            payment_method: input.payment_method,
            coupon_code: input.coupon_code,
            notes: input.notes,
            idempotency_key: input.idempotency_key,
            items: order_items,
        };

        let order = self
            .orders_repository
            .create_order(&mut tx, tenant, new_order)
            .await?;

        self.items_repository
            .clear_cart_items(&mut tx, tenant, cart.uuid)
            .await?;

        tx.commit().await?;

        Ok(Placement::Placed(order))
    }

    fn notify(&self, tenant: TenantUuid, order: &OrderRecord) {
        let notifier = Arc::clone(&self.notifier);
        let order = order.clone();

        tokio::spawn(
            async move {
                if let Err(error) = notifier.order_placed(tenant, &order).await {
                    warn!(order_uuid = %order.uuid, %error, "order notification failed");
                }
            }
            .in_current_span(),
        );
    }
}

impl fmt::Debug for PgCheckoutService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PgCheckoutService")
            .field("db", &self.db)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl CheckoutService for PgCheckoutService {
    #[tracing::instrument(
        name = "checkout.service.checkout",
        skip(self, input),
        fields(
            tenant_uuid = %tenant,
            customer_uuid = %customer,
            order_uuid = tracing::field::Empty,
            order_number = tracing::field::Empty
        ),
        err
    )]
    async fn checkout(
        &self,
        tenant: TenantUuid,
        customer: CustomerUuid,
        input: CheckoutInput,
    ) -> Result<OrderRecord, CheckoutServiceError> {
        let attempt = self.attempt_checkout(tenant, customer, input);

        let placement = match self.timeout {
            Some(limit) => tokio::time::timeout(limit, attempt)
                .await
                .map_err(|_| CheckoutServiceError::TimedOut)??,
            None => attempt.await?,
        };

        let order = match placement {
            Placement::Placed(order) => {
                info!(
                    total = order.total,
                    discount = order.discount,
                    items = order.items.len(),
                    "placed order"
                );

                self.notify(tenant, &order);

                order
            }
            Placement::Replayed(order) => {
                info!("returned existing order for idempotency key");

                order
            }
        };

        Span::current()
            .record("order_uuid", tracing::field::display(order.uuid))
            .record("order_number", order.number.as_str());

        Ok(order)
    }
}

/// Sum of the cart's snapshot line subtotals, bounded by what an order
/// amount column can store.
fn order_subtotal(items: &[CartItemRecord]) -> Result<u64, CheckoutServiceError> {
    totals::subtotal(items.iter().map(|item| (item.unit_price, item.quantity)))
        .filter(|subtotal| *subtotal <= columns::MAX_AMOUNT)
        .ok_or(CheckoutServiceError::AmountOverflow)
}

/// Converts a customer's cart into an order.
#[automock]
#[async_trait]
pub trait CheckoutService: Send + Sync {
    /// Places an order from the customer's cart.
    ///
    /// Stock for every item is decremented only if enough remains at the
    /// moment of the write; the order is inserted and the cart cleared in the
    /// same transaction. On any error nothing is persisted.
    async fn checkout(
        &self,
        tenant: TenantUuid,
        customer: CustomerUuid,
        input: CheckoutInput,
    ) -> Result<OrderRecord, CheckoutServiceError>;
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;
    use tokio::sync::mpsc;

    use crate::{
        domain::{
            checkout::{
                coupons::{CouponRejection, MockCouponsService, NoCoupons},
                notifications::{LogNotifier, NotificationError},
            },
            carts::{CartsService, PgCartsService, data::NewCartItem, records::CartItemUuid},
            orders::OrdersService,
            products::{
                ProductsService, ProductsServiceError,
                data::ProductUpdate,
                records::{ProductRecord, ProductUuid},
            },
        },
        test::{
            TestContext,
            helpers::{add_to_cart, checkout, new_product},
        },
    };

    use super::*;

    async fn stock_of(
        ctx: &TestContext,
        product: &ProductRecord,
    ) -> Result<u32, ProductsServiceError> {
        Ok(ctx
            .products
            .get_product(ctx.tenant_uuid, product.uuid)
            .await?
            .stock)
    }

    /// Reports every order it sees, then fails.
    struct FailingNotifier(mpsc::UnboundedSender<OrderUuid>);

    #[async_trait]
    impl OrderNotifier for FailingNotifier {
        async fn order_placed(
            &self,
            _tenant: TenantUuid,
            order: &OrderRecord,
        ) -> Result<(), NotificationError> {
            let _ = self.0.send(order.uuid);

            Err(NotificationError("smtp unavailable".to_string()))
        }
    }

    /// Never answers within the checkout timeout.
    struct SlowCoupons;

    #[async_trait]
    impl CouponsService for SlowCoupons {
        async fn resolve_discount(
            &self,
            _tenant: TenantUuid,
            _code: &str,
            _subtotal: u64,
        ) -> Result<u64, CouponRejection> {
            tokio::time::sleep(Duration::from_secs(5)).await;

            Ok(0)
        }
    }

    /// Puts one more unit of `product` in the cart while pricing the coupon.
    struct CartChangingCoupons {
        carts: PgCartsService,
        customer: CustomerUuid,
        product: ProductUuid,
    }

    #[async_trait]
    impl CouponsService for CartChangingCoupons {
        async fn resolve_discount(
            &self,
            tenant: TenantUuid,
            _code: &str,
            _subtotal: u64,
        ) -> Result<u64, CouponRejection> {
            self.carts
                .add_item(
                    tenant,
                    self.customer,
                    NewCartItem {
                        uuid: CartItemUuid::new(),
                        product_uuid: self.product,
                        quantity: 1,
                        notes: None,
                    },
                )
                .await
                .map_err(|_| CouponRejection::NotFound)?;

            Ok(1_00)
        }
    }

    async fn withdraw(
        ctx: &TestContext,
        product: &ProductRecord,
    ) -> Result<(), ProductsServiceError> {
        ctx.products
            .update_product(
                ctx.tenant_uuid,
                product.uuid,
                ProductUpdate {
                    name: product.name.clone(),
                    category: product.category.clone(),
                    price: product.price,
                    stock: product.stock,
                    active: false,
                },
            )
            .await?;

        Ok(())
    }

    #[tokio::test]
    async fn checkout_decrements_stock_and_clears_cart() -> TestResult {
        let ctx = TestContext::new().await;
        let customer = CustomerUuid::new();
        let product = new_product(&ctx, ctx.tenant_uuid, 10_00, 5).await?;

        add_to_cart(&ctx, ctx.tenant_uuid, customer, product.uuid, 2).await?;

        let order = ctx
            .checkout
            .checkout(
                ctx.tenant_uuid,
                customer,
                CheckoutInput {
                    shipping_address: Some("Rua das Flores, 123".to_string()),
                    payment_method: Some("pix".to_string()),
                    notes: Some("Entregar após as 18h".to_string()),
                    ..CheckoutInput::default()
                },
            )
            .await?;

        assert_eq!(order.subtotal, 20_00);
        assert_eq!(order.discount, 0);
        assert_eq!(order.total, 20_00);
        assert_eq!(order.customer_uuid, customer);
        assert!(order.number.starts_with("PED-"));
        assert_eq!(order.shipping_address.as_deref(), Some("Rua das Flores, 123"));
        assert_eq!(order.items.len(), 1);
        assert_eq!(order.items[0].unit_price, 10_00);
        assert_eq!(order.items[0].quantity, 2);
        assert_eq!(
            order.items.iter().map(|item| item.line_subtotal).sum::<u64>(),
            order.subtotal
        );

        assert_eq!(stock_of(&ctx, &product).await?, 3);

        let cart = ctx.carts.get_cart(ctx.tenant_uuid, customer).await?;

        assert!(cart.lines.is_empty(), "checkout should clear the cart");

        Ok(())
    }

    #[tokio::test]
    async fn concurrent_checkouts_for_last_unit_sell_it_once() -> TestResult {
        let ctx = TestContext::new().await;
        let product = new_product(&ctx, ctx.tenant_uuid, 10_00, 1).await?;

        let alice = CustomerUuid::new();
        let bruno = CustomerUuid::new();

        add_to_cart(&ctx, ctx.tenant_uuid, alice, product.uuid, 1).await?;
        add_to_cart(&ctx, ctx.tenant_uuid, bruno, product.uuid, 1).await?;

        let (first, second) = tokio::join!(
            checkout(&ctx, ctx.tenant_uuid, alice),
            checkout(&ctx, ctx.tenant_uuid, bruno),
        );

        let placed = [&first, &second].iter().filter(|r| r.is_ok()).count();

        assert_eq!(placed, 1, "exactly one checkout should succeed: {first:?} / {second:?}");

        let loser = if first.is_ok() { &second } else { &first };

        assert!(
            matches!(loser, Err(CheckoutServiceError::InsufficientStock { product: p }) if *p == product.uuid),
            "expected InsufficientStock, got {loser:?}"
        );

        assert_eq!(stock_of(&ctx, &product).await?, 0);

        Ok(())
    }

    #[tokio::test]
    async fn concurrent_checkouts_sharing_products_both_succeed() -> TestResult {
        let ctx = TestContext::new().await;
        let farinha = new_product(&ctx, ctx.tenant_uuid, 6_00, 10).await?;
        let fermento = new_product(&ctx, ctx.tenant_uuid, 3_50, 10).await?;

        let alice = CustomerUuid::new();
        let bruno = CustomerUuid::new();

        add_to_cart(&ctx, ctx.tenant_uuid, alice, farinha.uuid, 1).await?;
        add_to_cart(&ctx, ctx.tenant_uuid, alice, fermento.uuid, 1).await?;
        add_to_cart(&ctx, ctx.tenant_uuid, bruno, fermento.uuid, 1).await?;
        add_to_cart(&ctx, ctx.tenant_uuid, bruno, farinha.uuid, 1).await?;

        let (first, second) = tokio::join!(
            checkout(&ctx, ctx.tenant_uuid, alice),
            checkout(&ctx, ctx.tenant_uuid, bruno),
        );

        assert!(first.is_ok(), "expected alice's checkout to succeed, got {first:?}");
        assert!(second.is_ok(), "expected bruno's checkout to succeed, got {second:?}");

        assert_eq!(stock_of(&ctx, &farinha).await?, 8);
        assert_eq!(stock_of(&ctx, &fermento).await?, 8);

        Ok(())
    }

    #[tokio::test]
    async fn concurrent_checkouts_of_one_cart_place_one_order() -> TestResult {
        let ctx = TestContext::new().await;
        let customer = CustomerUuid::new();
        let product = new_product(&ctx, ctx.tenant_uuid, 10_00, 5).await?;

        add_to_cart(&ctx, ctx.tenant_uuid, customer, product.uuid, 2).await?;

        let (first, second) = tokio::join!(
            checkout(&ctx, ctx.tenant_uuid, customer),
            checkout(&ctx, ctx.tenant_uuid, customer),
        );

        let placed = [&first, &second].iter().filter(|r| r.is_ok()).count();

        assert_eq!(placed, 1, "exactly one checkout should succeed: {first:?} / {second:?}");

        let loser = if first.is_ok() { &second } else { &first };

        assert!(
            matches!(loser, Err(CheckoutServiceError::EmptyCart)),
            "expected EmptyCart, got {loser:?}"
        );

        assert_eq!(stock_of(&ctx, &product).await?, 3);

        let orders = ctx.orders.list_orders(ctx.tenant_uuid, customer).await?;

        assert_eq!(orders.len(), 1);

        Ok(())
    }

    #[tokio::test]
    async fn concurrent_checkouts_with_one_idempotency_key_share_the_order() -> TestResult {
        let ctx = TestContext::new().await;
        let customer = CustomerUuid::new();
        let product = new_product(&ctx, ctx.tenant_uuid, 10_00, 5).await?;

        add_to_cart(&ctx, ctx.tenant_uuid, customer, product.uuid, 2).await?;

        let input = CheckoutInput {
            idempotency_key: Some("pedido-7d1e".to_string()),
            ..CheckoutInput::default()
        };

        let (first, second) = tokio::join!(
            ctx.checkout.checkout(ctx.tenant_uuid, customer, input.clone()),
            ctx.checkout.checkout(ctx.tenant_uuid, customer, input),
        );

        let (first, second) = (first?, second?);

        assert_eq!(first.uuid, second.uuid);
        assert_eq!(stock_of(&ctx, &product).await?, 3);

        let orders = ctx.orders.list_orders(ctx.tenant_uuid, customer).await?;

        assert_eq!(orders.len(), 1);

        Ok(())
    }

    #[tokio::test]
    async fn checkout_of_deactivated_product_returns_product_not_found() -> TestResult {
        let ctx = TestContext::new().await;
        let customer = CustomerUuid::new();
        let product = new_product(&ctx, ctx.tenant_uuid, 10_00, 5).await?;

        add_to_cart(&ctx, ctx.tenant_uuid, customer, product.uuid, 2).await?;
        withdraw(&ctx, &product).await?;

        let result = checkout(&ctx, ctx.tenant_uuid, customer).await;

        assert!(
            matches!(result, Err(CheckoutServiceError::ProductNotFound { product: p }) if p == product.uuid),
            "expected ProductNotFound, got {result:?}"
        );

        assert_eq!(stock_of(&ctx, &product).await?, 5);

        let orders = ctx.orders.list_orders(ctx.tenant_uuid, customer).await?;

        assert!(orders.is_empty(), "no order should be created");

        let cart = ctx.carts.get_cart(ctx.tenant_uuid, customer).await?;

        assert_eq!(cart.total_item_count, 2, "cart should be untouched");
        assert!(!cart.lines[0].available);

        Ok(())
    }

    #[tokio::test]
    async fn checkout_of_deleted_product_returns_product_not_found() -> TestResult {
        let ctx = TestContext::new().await;
        let customer = CustomerUuid::new();
        let kept = new_product(&ctx, ctx.tenant_uuid, 2_00, 5).await?;
        let deleted = new_product(&ctx, ctx.tenant_uuid, 8_00, 5).await?;

        add_to_cart(&ctx, ctx.tenant_uuid, customer, kept.uuid, 1).await?;
        add_to_cart(&ctx, ctx.tenant_uuid, customer, deleted.uuid, 1).await?;

        ctx.products
            .delete_product(ctx.tenant_uuid, deleted.uuid)
            .await?;

        let result = checkout(&ctx, ctx.tenant_uuid, customer).await;

        assert!(
            matches!(result, Err(CheckoutServiceError::ProductNotFound { product: p }) if p == deleted.uuid),
            "expected ProductNotFound for the deleted product, got {result:?}"
        );

        assert_eq!(stock_of(&ctx, &kept).await?, 5);

        Ok(())
    }

    #[tokio::test]
    async fn checkout_empty_cart_returns_empty_cart() -> TestResult {
        let ctx = TestContext::new().await;
        let customer = CustomerUuid::new();

        let result = checkout(&ctx, ctx.tenant_uuid, customer).await;

        assert!(
            matches!(result, Err(CheckoutServiceError::EmptyCart)),
            "expected EmptyCart for a customer without a cart, got {result:?}"
        );

        ctx.carts.get_or_create_cart(ctx.tenant_uuid, customer).await?;

        let result = checkout(&ctx, ctx.tenant_uuid, customer).await;

        assert!(
            matches!(result, Err(CheckoutServiceError::EmptyCart)),
            "expected EmptyCart, got {result:?}"
        );

        let orders = ctx.orders.list_orders(ctx.tenant_uuid, customer).await?;

        assert!(orders.is_empty(), "no order should be created");

        Ok(())
    }

    #[tokio::test]
    async fn checkout_applies_coupon_discount() -> TestResult {
        let ctx = TestContext::new().await;
        let customer = CustomerUuid::new();
        let product = new_product(&ctx, ctx.tenant_uuid, 10_00, 5).await?;

        add_to_cart(&ctx, ctx.tenant_uuid, customer, product.uuid, 2).await?;

        let mut coupons = MockCouponsService::new();

        coupons
            .expect_resolve_discount()
            .withf(|_, code, subtotal| code == "PRIMEIRACOMPRA" && *subtotal == 20_00)
            .times(1)
            .returning(|_, _, _| Ok(5_00));

        let service = PgCheckoutService::new(
            ctx.app_db.clone(),
            Arc::new(coupons),
            Arc::new(LogNotifier),
        );

        let order = service
            .checkout(
                ctx.tenant_uuid,
                customer,
                CheckoutInput {
                    coupon_code: Some("PRIMEIRACOMPRA".to_string()),
                    ..CheckoutInput::default()
                },
            )
            .await?;

        assert_eq!(order.subtotal, 20_00);
        assert_eq!(order.discount, 5_00);
        assert_eq!(order.total, 15_00);
        assert_eq!(order.coupon_code.as_deref(), Some("PRIMEIRACOMPRA"));

        Ok(())
    }

    #[tokio::test]
    async fn oversized_coupon_discount_is_clamped_to_subtotal() -> TestResult {
        let ctx = TestContext::new().await;
        let customer = CustomerUuid::new();
        let product = new_product(&ctx, ctx.tenant_uuid, 3_00, 5).await?;

        add_to_cart(&ctx, ctx.tenant_uuid, customer, product.uuid, 1).await?;

        let mut coupons = MockCouponsService::new();

        coupons
            .expect_resolve_discount()
            .returning(|_, _, _| Ok(50_00));

        let service = PgCheckoutService::new(
            ctx.app_db.clone(),
            Arc::new(coupons),
            Arc::new(LogNotifier),
        );

        let order = service
            .checkout(
                ctx.tenant_uuid,
                customer,
                CheckoutInput {
                    coupon_code: Some("TUDOGRATIS".to_string()),
                    ..CheckoutInput::default()
                },
            )
            .await?;

        assert_eq!(order.discount, 3_00);
        assert_eq!(order.total, 0);

        Ok(())
    }

    #[tokio::test]
    async fn cart_changed_while_pricing_coupon_returns_transaction_conflict() -> TestResult {
        let ctx = TestContext::new().await;
        let customer = CustomerUuid::new();
        let product = new_product(&ctx, ctx.tenant_uuid, 10_00, 10).await?;

        add_to_cart(&ctx, ctx.tenant_uuid, customer, product.uuid, 2).await?;

        let service = PgCheckoutService::new(
            ctx.app_db.clone(),
            Arc::new(CartChangingCoupons {
                carts: ctx.carts.clone(),
                customer,
                product: product.uuid,
            }),
            Arc::new(LogNotifier),
        )
        .with_timeout(Duration::from_secs(10));

        let result = service
            .checkout(
                ctx.tenant_uuid,
                customer,
                CheckoutInput {
                    coupon_code: Some("LEVEMAIS".to_string()),
                    ..CheckoutInput::default()
                },
            )
            .await;

        assert!(
            matches!(result, Err(CheckoutServiceError::TransactionConflict)),
            "expected TransactionConflict, got {result:?}"
        );

        assert_eq!(stock_of(&ctx, &product).await?, 10);

        let cart = ctx.carts.get_cart(ctx.tenant_uuid, customer).await?;

        assert_eq!(cart.total_item_count, 3);

        let orders = ctx.orders.list_orders(ctx.tenant_uuid, customer).await?;

        assert!(orders.is_empty(), "no order should be created");

        Ok(())
    }

    #[tokio::test]
    async fn order_amount_beyond_bigint_returns_amount_overflow() -> TestResult {
        let ctx = TestContext::new().await;
        let customer = CustomerUuid::new();
        let product = new_product(&ctx, ctx.tenant_uuid, 5_000_000_000_000_000_000, 2).await?;

        add_to_cart(&ctx, ctx.tenant_uuid, customer, product.uuid, 2).await?;

        let result = checkout(&ctx, ctx.tenant_uuid, customer).await;

        assert!(
            matches!(result, Err(CheckoutServiceError::AmountOverflow)),
            "expected AmountOverflow, got {result:?}"
        );

        assert_eq!(stock_of(&ctx, &product).await?, 2);

        Ok(())
    }

    #[tokio::test]
    async fn rejected_coupon_leaves_stock_and_cart_untouched() -> TestResult {
        let ctx = TestContext::new().await;
        let customer = CustomerUuid::new();
        let product = new_product(&ctx, ctx.tenant_uuid, 10_00, 5).await?;

        add_to_cart(&ctx, ctx.tenant_uuid, customer, product.uuid, 2).await?;

        let result = ctx
            .checkout
            .checkout(
                ctx.tenant_uuid,
                customer,
                CheckoutInput {
                    coupon_code: Some("NAOEXISTE".to_string()),
                    ..CheckoutInput::default()
                },
            )
            .await;

        assert!(
            matches!(
                result,
                Err(CheckoutServiceError::CouponRejected(CouponRejection::NotFound))
            ),
            "expected CouponRejected, got {result:?}"
        );

        assert_eq!(stock_of(&ctx, &product).await?, 5);

        let cart = ctx.carts.get_cart(ctx.tenant_uuid, customer).await?;

        assert_eq!(cart.total_item_count, 2);

        Ok(())
    }

    #[tokio::test]
    async fn failed_checkout_rolls_back_every_decrement() -> TestResult {
        let ctx = TestContext::new().await;
        let customer = CustomerUuid::new();
        let plenty = new_product(&ctx, ctx.tenant_uuid, 2_00, 10).await?;
        let scarce = new_product(&ctx, ctx.tenant_uuid, 4_00, 3).await?;

        add_to_cart(&ctx, ctx.tenant_uuid, customer, plenty.uuid, 2).await?;
        add_to_cart(&ctx, ctx.tenant_uuid, customer, scarce.uuid, 3).await?;

        ctx.products
            .update_product(
                ctx.tenant_uuid,
                scarce.uuid,
                ProductUpdate {
                    name: scarce.name.clone(),
                    category: scarce.category.clone(),
                    price: scarce.price,
                    stock: 1,
                    active: true,
                },
            )
            .await?;

        let result = checkout(&ctx, ctx.tenant_uuid, customer).await;

        assert!(
            matches!(result, Err(CheckoutServiceError::InsufficientStock { product }) if product == scarce.uuid),
            "expected InsufficientStock for the scarce product, got {result:?}"
        );

        assert_eq!(stock_of(&ctx, &plenty).await?, 10);
        assert_eq!(stock_of(&ctx, &scarce).await?, 1);

        let orders = ctx.orders.list_orders(ctx.tenant_uuid, customer).await?;

        assert!(orders.is_empty(), "no order should survive a failed checkout");

        let cart = ctx.carts.get_cart(ctx.tenant_uuid, customer).await?;

        assert_eq!(cart.lines.len(), 2, "cart should be untouched");

        Ok(())
    }

    #[tokio::test]
    async fn repeated_idempotency_key_returns_first_order() -> TestResult {
        let ctx = TestContext::new().await;
        let customer = CustomerUuid::new();
        let product = new_product(&ctx, ctx.tenant_uuid, 5_00, 10).await?;

        let input = CheckoutInput {
            idempotency_key: Some("f3b0c4f2-retry".to_string()),
            ..CheckoutInput::default()
        };

        add_to_cart(&ctx, ctx.tenant_uuid, customer, product.uuid, 2).await?;

        let first = ctx
            .checkout
            .checkout(ctx.tenant_uuid, customer, input.clone())
            .await?;

        add_to_cart(&ctx, ctx.tenant_uuid, customer, product.uuid, 1).await?;

        let retried = ctx
            .checkout
            .checkout(ctx.tenant_uuid, customer, input)
            .await?;

        assert_eq!(retried.uuid, first.uuid);
        assert_eq!(retried.number, first.number);
        assert_eq!(retried.items.len(), 1);

        assert_eq!(stock_of(&ctx, &product).await?, 8, "stock is decremented once");

        let cart = ctx.carts.get_cart(ctx.tenant_uuid, customer).await?;

        assert_eq!(cart.total_item_count, 1, "the retry must not consume the new cart");

        Ok(())
    }

    #[tokio::test]
    async fn notifier_failure_does_not_fail_checkout() -> TestResult {
        let ctx = TestContext::new().await;
        let customer = CustomerUuid::new();
        let product = new_product(&ctx, ctx.tenant_uuid, 5_00, 10).await?;

        add_to_cart(&ctx, ctx.tenant_uuid, customer, product.uuid, 1).await?;

        let (sender, mut receiver) = mpsc::unbounded_channel();

        let service = PgCheckoutService::new(
            ctx.app_db.clone(),
            Arc::new(NoCoupons),
            Arc::new(FailingNotifier(sender)),
        );

        let order = service
            .checkout(ctx.tenant_uuid, customer, CheckoutInput::default())
            .await?;

        let notified = tokio::time::timeout(Duration::from_secs(5), receiver.recv()).await?;

        assert_eq!(notified, Some(order.uuid));

        let stored = ctx
            .orders
            .get_order(ctx.tenant_uuid, customer, order.uuid)
            .await?;

        assert_eq!(stored.total, 5_00);

        Ok(())
    }

    #[tokio::test]
    async fn timed_out_checkout_is_rolled_back() -> TestResult {
        let ctx = TestContext::new().await;
        let customer = CustomerUuid::new();
        let product = new_product(&ctx, ctx.tenant_uuid, 5_00, 10).await?;

        add_to_cart(&ctx, ctx.tenant_uuid, customer, product.uuid, 4).await?;

        let service = PgCheckoutService::new(
            ctx.app_db.clone(),
            Arc::new(SlowCoupons),
            Arc::new(LogNotifier),
        )
        .with_timeout(Duration::from_millis(50));

        let result = service
            .checkout(
                ctx.tenant_uuid,
                customer,
                CheckoutInput {
                    coupon_code: Some("DEVAGAR".to_string()),
                    ..CheckoutInput::default()
                },
            )
            .await;

        assert!(
            matches!(result, Err(CheckoutServiceError::TimedOut)),
            "expected TimedOut, got {result:?}"
        );

        assert_eq!(stock_of(&ctx, &product).await?, 10);

        let cart = ctx.carts.get_cart(ctx.tenant_uuid, customer).await?;

        assert_eq!(cart.total_item_count, 4);

        Ok(())
    }

    #[tokio::test]
    async fn checkout_cannot_reach_another_tenants_cart() -> TestResult {
        let ctx = TestContext::new().await;
        let customer = CustomerUuid::new();
        let product = new_product(&ctx, ctx.tenant_uuid, 5_00, 10).await?;

        add_to_cart(&ctx, ctx.tenant_uuid, customer, product.uuid, 2).await?;

        let tenant_b = ctx.create_tenant("Tenant B").await;

        let result = checkout(&ctx, tenant_b, customer).await;

        assert!(
            matches!(result, Err(CheckoutServiceError::EmptyCart)),
            "expected EmptyCart in tenant B, got {result:?}"
        );

        assert_eq!(stock_of(&ctx, &product).await?, 10);

        Ok(())
    }
}

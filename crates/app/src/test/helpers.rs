//! Test Helpers

use crate::{
    domain::{
        carts::{
            CartsService, CartsServiceError,
            data::NewCartItem,
            records::{CartItemRecord, CartItemUuid},
        },
        checkout::{CheckoutService, CheckoutServiceError, data::CheckoutInput},
        customers::CustomerUuid,
        orders::records::OrderRecord,
        products::{
            ProductsService, ProductsServiceError,
            data::NewProduct,
            records::{ProductRecord, ProductUuid},
        },
        tenants::records::TenantUuid,
    },
    test::TestContext,
};

pub(crate) async fn new_product(
    ctx: &TestContext,
    tenant: TenantUuid,
    price: u64,
    stock: u32,
) -> Result<ProductRecord, ProductsServiceError> {
    let uuid = ProductUuid::new();

    ctx.products
        .create_product(
            tenant,
            NewProduct {
                uuid,
                name: format!("Produto {uuid}"),
                category: None,
                price,
                stock,
            },
        )
        .await
}

/// Creates a product in the default tenant with plenty of stock.
pub(crate) async fn new_categorised_product(
    ctx: &TestContext,
    category: &str,
    price: u64,
) -> Result<ProductRecord, ProductsServiceError> {
    let uuid = ProductUuid::new();

    ctx.products
        .create_product(
            ctx.tenant_uuid,
            NewProduct {
                uuid,
                name: format!("{category} {uuid}"),
                category: Some(category.to_string()),
                price,
                stock: 100,
            },
        )
        .await
}

pub(crate) async fn add_to_cart(
    ctx: &TestContext,
    tenant: TenantUuid,
    customer: CustomerUuid,
    product: ProductUuid,
    quantity: u32,
) -> Result<CartItemRecord, CartsServiceError> {
    ctx.carts
        .add_item(
            tenant,
            customer,
            NewCartItem {
                uuid: CartItemUuid::new(),
                product_uuid: product,
                quantity,
                notes: None,
            },
        )
        .await
}

/// Checks out with no address, payment method, coupon or idempotency key.
pub(crate) async fn checkout(
    ctx: &TestContext,
    tenant: TenantUuid,
    customer: CustomerUuid,
) -> Result<OrderRecord, CheckoutServiceError> {
    ctx.checkout
        .checkout(tenant, customer, CheckoutInput::default())
        .await
}

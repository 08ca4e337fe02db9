use clap::Args;
use vitrine_app::{
    config::AppConfig,
    context::AppContext,
    domain::{
        products::{ProductsService, data::NewProduct, records::ProductUuid},
        tenants::records::TenantUuid,
    },
};

#[derive(Debug, Args)]
pub(crate) struct CreateProductArgs {
    #[command(flatten)]
    app: AppConfig,

    /// Tenant that owns the product
    #[arg(long)]
    tenant_uuid: TenantUuid,

    /// Product display name
    #[arg(long)]
    name: String,

    /// Optional category, used for recommendations
    #[arg(long)]
    category: Option<String>,

    /// Unit price in minor units (1000 = R$10.00)
    #[arg(long)]
    price: u64,

    /// Units in stock
    #[arg(long, default_value_t = 0)]
    stock: u32,
}

pub(crate) async fn run(args: CreateProductArgs) -> Result<(), String> {
    let ctx = AppContext::from_config(&args.app)
        .await
        .map_err(|error| format!("failed to initialise application: {error}"))?;

    let product = ctx
        .products
        .create_product(
            args.tenant_uuid,
            NewProduct {
                uuid: ProductUuid::new(),
                name: args.name,
                category: args.category,
                price: args.price,
                stock: args.stock,
            },
        )
        .await
        .map_err(|error| format!("failed to create product: {error}"))?;

    println!("product_uuid: {}", product.uuid);
    println!("name: {}", product.name);
    println!("price: {}", product.price);
    println!("stock: {}", product.stock);

    Ok(())
}

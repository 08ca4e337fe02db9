use clap::Args;
use vitrine_app::{
    config::AppConfig,
    context::AppContext,
    domain::{customers::CustomerUuid, orders::OrdersService, tenants::records::TenantUuid},
};

#[derive(Debug, Args)]
pub(crate) struct ListOrdersArgs {
    #[command(flatten)]
    app: AppConfig,

    /// Tenant UUID whose orders should be listed
    #[arg(long)]
    tenant_uuid: TenantUuid,

    /// Customer UUID whose orders should be listed
    #[arg(long)]
    customer_uuid: CustomerUuid,
}

pub(crate) async fn run(args: ListOrdersArgs) -> Result<(), String> {
    let ctx = AppContext::from_config(&args.app)
        .await
        .map_err(|error| format!("failed to initialise application: {error}"))?;

    let orders = ctx
        .orders
        .list_orders(args.tenant_uuid, args.customer_uuid)
        .await
        .map_err(|error| format!("failed to list orders: {error}"))?;

    if orders.is_empty() {
        println!("no orders found for customer {}", args.customer_uuid);
        return Ok(());
    }

    for order in orders {
        println!("order_uuid: {}", order.uuid);
        println!("number: {}", order.number);
        println!("created_at: {}", order.created_at);
        println!("subtotal: {}", order.subtotal);
        println!("discount: {}", order.discount);
        println!("total: {}", order.total);

        for item in &order.items {
            println!(
                "  - product {} x{} @ {} = {}",
                item.product_uuid, item.quantity, item.unit_price, item.line_subtotal
            );
        }

        println!();
    }

    Ok(())
}

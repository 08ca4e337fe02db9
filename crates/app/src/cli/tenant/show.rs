use clap::Args;
use vitrine_app::{
    config::DatabaseConfig,
    database,
    domain::tenants::{PgTenantsService, TenantsService},
};

#[derive(Debug, Args)]
pub(crate) struct ShowTenantArgs {
    /// Storefront handle to resolve
    #[arg(long)]
    slug: String,

    #[command(flatten)]
    database: DatabaseConfig,
}

pub(crate) async fn run(args: ShowTenantArgs) -> Result<(), String> {
    let pool = database::connect(&args.database.database_url)
        .await
        .map_err(|error| format!("failed to connect to database: {error}"))?;

    let tenant = PgTenantsService::new(pool)
        .find_tenant_by_slug(&args.slug)
        .await
        .map_err(|error| format!("failed to resolve tenant `{}`: {error}", args.slug))?;

    println!("tenant_uuid: {}", tenant.uuid);
    println!("tenant_name: {}", tenant.name);
    println!("created_at: {}", tenant.created_at);

    Ok(())
}

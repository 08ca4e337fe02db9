use clap::Args;
use vitrine_app::{
    config::DatabaseConfig,
    database,
    domain::tenants::{PgTenantsService, TenantsService, data::NewTenant, records::TenantUuid},
};

#[derive(Debug, Args)]
pub(crate) struct CreateTenantArgs {
    /// Tenant display name
    #[arg(long)]
    name: String,

    /// Public storefront handle, e.g. `padaria-central`
    #[arg(long)]
    slug: String,

    #[command(flatten)]
    database: DatabaseConfig,

    /// Optional tenant UUID; generated when omitted
    #[arg(long)]
    tenant_uuid: Option<TenantUuid>,
}

pub(crate) async fn run(args: CreateTenantArgs) -> Result<(), String> {
    let pool = database::connect(&args.database.database_url)
        .await
        .map_err(|error| format!("failed to connect to database: {error}"))?;

    let service = PgTenantsService::new(pool);

    let tenant = service
        .create_tenant(NewTenant {
            uuid: args.tenant_uuid.unwrap_or_default(),
            name: args.name,
            slug: args.slug,
        })
        .await
        .map_err(|error| format!("failed to create tenant: {error}"))?;

    println!("tenant_uuid: {}", tenant.uuid);
    println!("tenant_name: {}", tenant.name);
    println!("tenant_slug: {}", tenant.slug);

    Ok(())
}

use clap::{Parser, Subcommand};
use vitrine_app::{config::LoggingConfig, observability};

mod db;
mod orders;
mod product;
mod tenant;

#[derive(Debug, Parser)]
#[command(name = "vitrine-app", about = "Vitrine CLI", long_about = None)]
pub(crate) struct Cli {
    #[command(flatten)]
    logging: LoggingConfig,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    Tenant(tenant::TenantCommand),
    Product(product::ProductCommand),
    Orders(orders::OrdersCommand),
    Db(db::DbCommand),
}

impl Cli {
    pub(crate) async fn run(self) -> Result<(), String> {
        observability::init_logging(&self.logging)
            .map_err(|error| format!("failed to initialise logging: {error}"))?;

        match self.command {
            Commands::Tenant(command) => tenant::run(command).await,
            Commands::Product(command) => product::run(command).await,
            Commands::Orders(command) => orders::run(command).await,
            Commands::Db(command) => db::run(command).await,
        }
    }
}

//! App Context

use std::sync::Arc;

use thiserror::Error;

use crate::{
    config::AppConfig,
    database::{self, Db},
    domain::{
        carts::{CartsService, PgCartsService},
        checkout::{
            CheckoutService, PgCheckoutService, coupons::NoCoupons, notifications::LogNotifier,
        },
        orders::{OrdersService, PgOrdersService},
        products::{PgProductsService, ProductsService},
        tenants::{PgTenantsService, TenantsService},
    },
};

#[derive(Debug, Error)]
pub enum AppInitError {
    #[error("failed to connect to database")]
    Database(#[source] sqlx::Error),
}

/// Every service, wired to one shared storage handle.
#[derive(Clone)]
pub struct AppContext {
    pub tenants: Arc<dyn TenantsService>,
    pub products: Arc<dyn ProductsService>,
    pub carts: Arc<dyn CartsService>,
    pub checkout: Arc<dyn CheckoutService>,
    pub orders: Arc<dyn OrdersService>,
}

impl AppContext {
    /// Build application context from configuration.
    ///
    /// Coupons and notifications use the built-in [`NoCoupons`] and
    /// [`LogNotifier`].
    ///
    /// # Errors
    ///
    /// Returns an error when establishing a database connection fails.
    pub async fn from_config(config: &AppConfig) -> Result<Self, AppInitError> {
        let pool = database::connect(&config.database.database_url)
            .await
            .map_err(AppInitError::Database)?;

        let db = Db::new(pool.clone());

        let checkout = PgCheckoutService::new(db.clone(), Arc::new(NoCoupons), Arc::new(LogNotifier))
            .with_timeout(config.checkout.timeout());

        Ok(Self {
            tenants: Arc::new(PgTenantsService::new(pool)),
            products: Arc::new(PgProductsService::new(db.clone())),
            carts: Arc::new(PgCartsService::new(db.clone())),
            checkout: Arc::new(checkout),
            orders: Arc::new(PgOrdersService::new(db)),
        })
    }
}

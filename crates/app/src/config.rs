//! Configuration
//!
//! Every setting is a `clap` argument with an environment fallback; binaries
//! load `.env` before parsing.

use std::time::Duration;

use clap::Args;

/// Database settings.
#[derive(Debug, Clone, Args)]
pub struct DatabaseConfig {
    /// `PostgreSQL` connection string
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    pub database_url: String,
}

/// Log output format.
#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum LogFormat {
    /// Compact, human-readable logs.
    Compact,

    /// Structured JSON logs.
    Json,
}

/// Logging settings.
#[derive(Debug, Clone, Args)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "RUST_LOG", default_value = "info")]
    pub log_level: String,

    /// Log format (compact, json)
    #[arg(long, env = "LOG_FORMAT", value_enum, default_value_t = LogFormat::Compact)]
    pub log_format: LogFormat,
}

/// Checkout settings.
#[derive(Debug, Clone, Args)]
pub struct CheckoutConfig {
    /// Milliseconds after which a running checkout is abandoned and rolled back
    #[arg(long, env = "CHECKOUT_TIMEOUT_MS", default_value_t = 5_000)]
    pub checkout_timeout_ms: u64,
}

impl CheckoutConfig {
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.checkout_timeout_ms)
    }
}

/// Settings needed to build an [`AppContext`](crate::context::AppContext).
#[derive(Debug, Clone, Args)]
pub struct AppConfig {
    #[command(flatten)]
    pub database: DatabaseConfig,

    #[command(flatten)]
    pub checkout: CheckoutConfig,
}

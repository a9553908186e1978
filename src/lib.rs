pub mod api;
pub mod config;
pub mod db;
pub mod errors;
pub mod ledger;
pub mod market;
pub mod metrics;
pub mod models;
pub mod services;

use crate::config::AppConfig;
use crate::market::PriceClient;

#[derive(Clone)]
pub struct AppState {
    pub db: sqlx::PgPool,
    pub config: AppConfig,
    pub metrics_handle: metrics_exporter_prometheus::PrometheusHandle,
    pub price_client: PriceClient,
}

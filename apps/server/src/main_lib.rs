use std::sync::Arc;

use crate::config::{Config, LogFormat};
use findash_market_data::{
    CbrRateAdapter, CurrencyRate, MoexQuoteAdapter, SourceAdapter, StockQuote,
};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

pub type RateSource = Arc<dyn SourceAdapter<Record = CurrencyRate>>;
pub type StockSource = Arc<dyn SourceAdapter<Record = StockQuote>>;

pub struct AppState {
    pub project_name: String,
    pub version: String,
    pub debug: bool,
    pub rate_source: RateSource,
    pub stock_source: StockSource,
}

impl AppState {
    pub fn new(config: &Config, rate_source: RateSource, stock_source: StockSource) -> Self {
        Self {
            project_name: config.project_name.clone(),
            version: config.version.clone(),
            debug: config.debug,
            rate_source,
            stock_source,
        }
    }
}

pub fn init_tracing(config: &Config) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_level));
    let registry = tracing_subscriber::registry().with(filter);

    match config.log_format {
        LogFormat::Json => registry
            .with(fmt::layer().json().with_current_span(false))
            .init(),
        LogFormat::Text => registry
            .with(fmt::layer().with_target(true).with_line_number(true))
            .init(),
    }
}

/// Creates both upstream adapters once; they live for the whole process.
pub fn build_state(config: &Config) -> Arc<AppState> {
    let rate_source: RateSource = Arc::new(CbrRateAdapter::new(config.cbr.clone()));
    let stock_source: StockSource = Arc::new(MoexQuoteAdapter::new(config.moex.clone()));
    tracing::info!(
        cbr_url = %config.cbr.url,
        moex_url = %config.moex.base_url,
        "Upstream adapters initialized"
    );
    Arc::new(AppState::new(config, rate_source, stock_source))
}

/// Resolves on Ctrl-C.
pub async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        return;
    }
    tracing::info!("Shutting down application");
}

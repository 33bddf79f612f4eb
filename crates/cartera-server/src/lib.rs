pub mod api;
pub mod error;

use std::sync::Arc;

use anyhow::Result;
use cartera::clock::SystemClock;
use cartera::config::Config;
use cartera::market_data::providers::yahoo_price_source;
use cartera::portfolio::PortfolioService;
use cartera::storage::{InvestmentStore, MemoryInvestmentStore, SupabaseStore};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

pub use api::app_router;

pub struct AppState {
    pub service: PortfolioService,
}

impl AppState {
    pub fn new(service: PortfolioService) -> Arc<Self> {
        Arc::new(Self { service })
    }
}

/// Wire the store, price source and bank list once for the process lifetime.
pub fn build_state(config: &Config, in_memory: bool) -> Result<Arc<AppState>> {
    let store: Arc<dyn InvestmentStore> = if in_memory {
        tracing::warn!("using in-memory store; data is lost on exit");
        Arc::new(MemoryInvestmentStore::new())
    } else {
        Arc::new(SupabaseStore::from_config(config)?)
    };
    let prices = yahoo_price_source(&config.market_data)?;

    let service = PortfolioService::new(store, prices, Arc::new(SystemClock))
        .with_banks(config.banks.clone());
    Ok(AppState::new(service))
}

/// Logs go to stderr; `CARTERA_LOG_FORMAT=json` switches to JSON lines.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let json = std::env::var("CARTERA_LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("json"));

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry
            .with(
                fmt::layer()
                    .json()
                    .with_current_span(false)
                    .with_writer(std::io::stderr),
            )
            .init();
    } else {
        registry.with(fmt::layer().with_writer(std::io::stderr)).init();
    }
}

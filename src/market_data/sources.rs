use std::sync::Arc;

use anyhow::Result;
use tracing::{debug, warn};

/// Current price for a ticker. Never fails: no price is reported as `0.0`.
#[async_trait::async_trait]
pub trait PriceSource: Send + Sync {
    async fn current_price(&self, symbol: &str) -> f64;
}

/// One way of looking up a price. `Ok(None)` means "no data, try the next one".
#[async_trait::async_trait]
pub trait PriceLookup: Send + Sync {
    async fn lookup(&self, symbol: &str) -> Result<Option<f64>>;

    fn name(&self) -> &str;
}

/// Tries each lookup in order and returns the first finite price.
pub struct FallbackPriceSource {
    lookups: Vec<Arc<dyn PriceLookup>>,
}

impl FallbackPriceSource {
    pub fn new(lookups: Vec<Arc<dyn PriceLookup>>) -> Self {
        Self { lookups }
    }
}

#[async_trait::async_trait]
impl PriceSource for FallbackPriceSource {
    async fn current_price(&self, symbol: &str) -> f64 {
        for lookup in &self.lookups {
            match lookup.lookup(symbol).await {
                Ok(Some(price)) if price.is_finite() => {
                    debug!(symbol, source = lookup.name(), price, "price found");
                    return price;
                }
                Ok(Some(price)) => {
                    debug!(symbol, source = lookup.name(), price, "ignoring non-finite price");
                }
                Ok(None) => {
                    debug!(symbol, source = lookup.name(), "no price");
                }
                Err(e) => {
                    debug!(symbol, source = lookup.name(), error = %e, "lookup failed");
                }
            }
        }
        warn!(symbol, "no price from any source, using 0");
        0.0
    }
}

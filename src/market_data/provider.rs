use super::PriceSource;

/// Reports `0.0` for every symbol. Used when market data is disabled.
pub struct ZeroPriceSource;

#[async_trait::async_trait]
impl PriceSource for ZeroPriceSource {
    async fn current_price(&self, _symbol: &str) -> f64 {
        0.0
    }
}

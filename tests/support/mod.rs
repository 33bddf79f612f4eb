#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use cartera::clock::FixedClock;
use cartera::market_data::PriceSource;
use cartera::portfolio::PortfolioService;
use cartera::storage::InvestmentStore;
use chrono::{TimeZone, Utc};

pub const NOW: &str = "2025-06-01T12:00:00.000000Z";

pub fn fixed_clock() -> Arc<FixedClock> {
    Arc::new(FixedClock::new(
        Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap(),
    ))
}

/// Scripted prices; unknown symbols report `0.0`. Records every symbol asked for.
#[derive(Default)]
pub struct MockPriceSource {
    prices: HashMap<String, f64>,
    calls: Mutex<Vec<String>>,
}

impl MockPriceSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_price(mut self, symbol: &str, price: f64) -> Self {
        self.prices.insert(symbol.to_string(), price);
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl PriceSource for MockPriceSource {
    async fn current_price(&self, symbol: &str) -> f64 {
        self.calls.lock().unwrap().push(symbol.to_string());
        self.prices.get(symbol).copied().unwrap_or(0.0)
    }
}

pub fn service(
    store: Arc<dyn InvestmentStore>,
    prices: Arc<MockPriceSource>,
) -> PortfolioService {
    PortfolioService::new(store, prices, fixed_clock())
}

pub fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

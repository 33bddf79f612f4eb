//! Yahoo Finance lookups: intraday chart, daily snapshot, then quote info.
//!
//! No API key. Yahoo rejects requests without a browser-ish user agent, so the
//! client is built with the configured one.

use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use reqwest::Client;
use serde::Deserialize;

use crate::config::MarketDataConfig;
use crate::market_data::{FallbackPriceSource, PriceLookup, PriceSource, ZeroPriceSource};

#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: Chart,
}

#[derive(Debug, Deserialize)]
struct Chart {
    #[serde(default)]
    result: Option<Vec<ChartResult>>,
    #[serde(default)]
    error: Option<YahooError>,
}

#[derive(Debug, Deserialize)]
struct YahooError {
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    #[serde(default)]
    meta: Option<ChartMeta>,
    #[serde(default)]
    indicators: Option<Indicators>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ChartMeta {
    #[serde(default)]
    regular_market_price: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct Indicators {
    #[serde(default)]
    quote: Vec<QuoteSeries>,
}

#[derive(Debug, Deserialize)]
struct QuoteSeries {
    #[serde(default)]
    close: Vec<Option<f64>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct QuoteResponse {
    quote_response: QuoteResult,
}

#[derive(Debug, Deserialize)]
struct QuoteResult {
    #[serde(default)]
    result: Vec<QuoteInfo>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct QuoteInfo {
    #[serde(default)]
    regular_market_price: Option<f64>,
}

/// Shared HTTP plumbing for the three lookups.
#[derive(Debug, Clone)]
pub struct YahooClient {
    client: Client,
    base_url: String,
}

impl YahooClient {
    pub fn new(config: &MarketDataConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&config.user_agent).context("Invalid user agent")?,
        );
        let client = Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .build()
            .context("Failed to create HTTP client")?;
        Ok(Self::with_client(client, config.yahoo_base_url.clone()))
    }

    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    async fn chart(&self, symbol: &str, interval: &str) -> Result<Option<ChartResult>> {
        let url = format!(
            "{}/v8/finance/chart/{}",
            self.base_url,
            urlencoding::encode(symbol)
        );
        let response = self
            .client
            .get(&url)
            .query(&[("range", "1d"), ("interval", interval)])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(anyhow!("HTTP error for {symbol}: {status} - {body}"));
        }

        let data: ChartResponse = response.json().await?;
        if let Some(error) = data.chart.error {
            return Err(anyhow!(
                "Yahoo error for {symbol}: {} - {}",
                error.code.as_deref().unwrap_or("unknown"),
                error.description.as_deref().unwrap_or("no description")
            ));
        }
        Ok(data.chart.result.and_then(|r| r.into_iter().next()))
    }
}

/// Last non-null close of today's one-minute bars.
pub struct YahooIntraday {
    client: YahooClient,
}

impl YahooIntraday {
    pub fn new(client: YahooClient) -> Self {
        Self { client }
    }
}

#[async_trait::async_trait]
impl PriceLookup for YahooIntraday {
    async fn lookup(&self, symbol: &str) -> Result<Option<f64>> {
        let Some(result) = self.client.chart(symbol, "1m").await? else {
            return Ok(None);
        };
        let last_close = result
            .indicators
            .and_then(|i| i.quote.into_iter().next())
            .and_then(|q| q.close.into_iter().rev().flatten().next());
        Ok(last_close)
    }

    fn name(&self) -> &str {
        "yahoo-intraday"
    }
}

/// `regularMarketPrice` from the daily chart metadata.
pub struct YahooSnapshot {
    client: YahooClient,
}

impl YahooSnapshot {
    pub fn new(client: YahooClient) -> Self {
        Self { client }
    }
}

#[async_trait::async_trait]
impl PriceLookup for YahooSnapshot {
    async fn lookup(&self, symbol: &str) -> Result<Option<f64>> {
        let result = self.client.chart(symbol, "1d").await?;
        Ok(result
            .and_then(|r| r.meta)
            .and_then(|m| m.regular_market_price))
    }

    fn name(&self) -> &str {
        "yahoo-snapshot"
    }
}

/// `regularMarketPrice` from the quote endpoint.
pub struct YahooQuoteInfo {
    client: YahooClient,
}

impl YahooQuoteInfo {
    pub fn new(client: YahooClient) -> Self {
        Self { client }
    }
}

#[async_trait::async_trait]
impl PriceLookup for YahooQuoteInfo {
    async fn lookup(&self, symbol: &str) -> Result<Option<f64>> {
        let url = format!("{}/v7/finance/quote", self.client.base_url);
        let response = self
            .client
            .client
            .get(&url)
            .query(&[("symbols", symbol)])
            .send()
            .await?
            .error_for_status()?
            .json::<QuoteResponse>()
            .await?;

        Ok(response
            .quote_response
            .result
            .into_iter()
            .next()
            .and_then(|q| q.regular_market_price))
    }

    fn name(&self) -> &str {
        "yahoo-quote"
    }
}

/// The price source used in production: intraday, snapshot, quote, then `0.0`.
pub fn yahoo_price_source(config: &MarketDataConfig) -> Result<Arc<dyn PriceSource>> {
    if !config.enabled {
        return Ok(Arc::new(ZeroPriceSource));
    }
    let client = YahooClient::new(config)?;
    Ok(Arc::new(FallbackPriceSource::new(vec![
        Arc::new(YahooIntraday::new(client.clone())),
        Arc::new(YahooSnapshot::new(client.clone())),
        Arc::new(YahooQuoteInfo::new(client)),
    ])))
}

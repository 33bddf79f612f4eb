#![cfg(feature = "remote")]

use anyhow::Result;
use cartera::config::MarketDataConfig;
use cartera::market_data::providers::yahoo::{yahoo_price_source, YahooClient, YahooSnapshot};
use cartera::market_data::{PriceLookup, PriceSource};
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn config(server: &MockServer) -> MarketDataConfig {
    MarketDataConfig {
        yahoo_base_url: server.uri(),
        ..Default::default()
    }
}

fn chart_body(closes: serde_json::Value, market_price: Option<f64>) -> serde_json::Value {
    json!({
        "chart": {
            "result": [{
                "meta": {"symbol": "AAPL", "regularMarketPrice": market_price},
                "indicators": {"quote": [{"close": closes}]}
            }],
            "error": null
        }
    })
}

#[tokio::test]
async fn intraday_close_is_preferred() -> Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v8/finance/chart/AAPL"))
        .and(query_param("interval", "1m"))
        .and(query_param("range", "1d"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(chart_body(json!([190.1, 190.4, null]), Some(1.0))),
        )
        .mount(&server)
        .await;

    let source = yahoo_price_source(&config(&server))?;
    assert_eq!(source.current_price("AAPL").await, 190.4);
    Ok(())
}

#[tokio::test]
async fn snapshot_used_when_intraday_is_empty() -> Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v8/finance/chart/SAN.MC"))
        .and(query_param("interval", "1m"))
        .respond_with(ResponseTemplate::new(200).set_body_json(chart_body(json!([null]), None)))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v8/finance/chart/SAN.MC"))
        .and(query_param("interval", "1d"))
        .respond_with(ResponseTemplate::new(200).set_body_json(chart_body(json!([]), Some(4.25))))
        .mount(&server)
        .await;

    let source = yahoo_price_source(&config(&server))?;
    assert_eq!(source.current_price("SAN.MC").await, 4.25);
    Ok(())
}

#[tokio::test]
async fn quote_endpoint_is_last_resort() -> Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v8/finance/chart/IWDA.AS"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v7/finance/quote"))
        .and(query_param("symbols", "IWDA.AS"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "quoteResponse": {"result": [{"symbol": "IWDA.AS", "regularMarketPrice": 98.7}]}
        })))
        .mount(&server)
        .await;

    let source = yahoo_price_source(&config(&server))?;
    assert_eq!(source.current_price("IWDA.AS").await, 98.7);
    Ok(())
}

#[tokio::test]
async fn everything_failing_reports_zero() -> Result<()> {
    let server = MockServer::start().await;
    let source = yahoo_price_source(&config(&server))?;
    assert_eq!(source.current_price("Crowfounding").await, 0.0);
    Ok(())
}

#[tokio::test]
async fn chart_error_payload_is_an_error() -> Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v8/finance/chart/NOPE"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "chart": {"result": null, "error": {"code": "Not Found", "description": "No data found"}}
        })))
        .mount(&server)
        .await;

    let lookup = YahooSnapshot::new(YahooClient::new(&config(&server))?);
    let err = lookup.lookup("NOPE").await.unwrap_err();
    assert!(err.to_string().contains("Not Found"), "{err}");
    Ok(())
}

#[tokio::test]
async fn disabled_market_data_never_calls_out() -> Result<()> {
    let server = MockServer::start().await;
    let source = yahoo_price_source(&MarketDataConfig {
        enabled: false,
        ..config(&server)
    })?;

    assert_eq!(source.current_price("AAPL").await, 0.0);
    let requests = server.received_requests().await.unwrap_or_default();
    assert!(requests.is_empty());
    Ok(())
}

#![cfg(feature = "remote")]

use anyhow::Result;
use cartera::models::{InvestmentId, InvestmentPatch, NewInvestment};
use cartera::storage::{InvestmentStore, SupabaseStore};
use secrecy::SecretString;
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn store(server: &MockServer) -> SupabaseStore {
    SupabaseStore::with_client(
        reqwest::Client::new(),
        server.uri(),
        "investments",
        SecretString::from("test-key".to_string()),
    )
}

fn new_investment() -> NewInvestment {
    NewInvestment {
        isin: "AAPL".to_string(),
        asset_name: "Apple".to_string(),
        purchase_value: 100.0,
        amount: 200.0,
        current_value: 110.0,
        total_money: 220.0,
        profit_loss_percentage: 10.0,
        investment_type: "Acciones".to_string(),
        created_at: "2025-06-01T12:00:00Z".to_string(),
        updated_at: "2025-06-01T12:00:00Z".to_string(),
    }
}

#[tokio::test]
async fn list_all_sends_key_and_orders_by_id() -> Result<()> {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/investments"))
        .and(query_param("select", "*"))
        .and(query_param("order", "id.asc"))
        .and(header("apikey", "test-key"))
        .and(header("Authorization", "Bearer test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": 1, "isin": "AAPL", "asset_name": "Apple", "purchase_value": "100",
             "amount": 200, "current_value": 110, "total_money": 220,
             "profit_loss_percentage": 10, "investment_type": "Acciones"},
            {"id": 2, "isin": "Crowfounding", "asset_name": "Urbanitae",
             "purchase_value": 1000, "amount": 1000, "current_value": null,
             "total_money": 1000, "profit_loss_percentage": 0, "investment_type": null}
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let rows = store(&server).list_all().await?;

    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].id, InvestmentId::new(1));
    assert_eq!(rows[0].purchase_value, 100.0);
    assert_eq!(rows[1].current_value, 0.0);
    assert_eq!(rows[1].investment_type, None);
    Ok(())
}

#[tokio::test]
async fn list_all_surfaces_http_errors() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/rest/v1/investments"))
        .respond_with(ResponseTemplate::new(401).set_body_string("invalid api key"))
        .mount(&server)
        .await;

    let err = store(&server).list_all().await.unwrap_err();
    assert!(err.to_string().contains("401"), "{err}");
}

#[tokio::test]
async fn insert_asks_for_representation() -> Result<()> {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/rest/v1/investments"))
        .and(header("Prefer", "return=representation"))
        .and(body_partial_json(json!({"isin": "AAPL", "total_money": 220.0})))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!([
            {"id": 9, "isin": "AAPL", "asset_name": "Apple", "purchase_value": 100.0,
             "amount": 200.0, "current_value": 110.0, "total_money": 220.0,
             "profit_loss_percentage": 10.0, "investment_type": "Acciones",
             "created_at": "2025-06-01T12:00:00+00:00"}
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let row = store(&server).insert(&new_investment()).await?;

    let row = row.expect("row returned");
    assert_eq!(row.id, InvestmentId::new(9));
    assert_eq!(row.total_money, 220.0);
    Ok(())
}

#[tokio::test]
async fn insert_failure_becomes_no_row() -> Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/rest/v1/investments"))
        .respond_with(ResponseTemplate::new(409).set_body_string("duplicate"))
        .mount(&server)
        .await;

    assert!(store(&server).insert(&new_investment()).await?.is_none());
    Ok(())
}

#[tokio::test]
async fn update_patches_by_id() -> Result<()> {
    let server = MockServer::start().await;

    Mock::given(method("PATCH"))
        .and(path("/rest/v1/investments"))
        .and(query_param("id", "eq.7"))
        .and(header("Prefer", "return=representation"))
        .and(body_partial_json(json!({"current_value": 12.0})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": 7, "isin": "SAN.MC", "asset_name": "Santander", "current_value": 12.0}
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let patch = InvestmentPatch {
        current_value: Some(12.0),
        ..Default::default()
    };
    let row = store(&server).update(InvestmentId::new(7), &patch).await?;
    assert_eq!(row.map(|r| r.current_value), Some(12.0));
    Ok(())
}

#[tokio::test]
async fn update_matching_nothing_is_no_row() -> Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("PATCH"))
        .and(path("/rest/v1/investments"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let row = store(&server)
        .update(InvestmentId::new(3), &InvestmentPatch::default())
        .await?;
    assert!(row.is_none());
    Ok(())
}

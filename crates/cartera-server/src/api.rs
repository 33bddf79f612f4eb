use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::{header, HeaderValue, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use cartera::config::ServerConfig;
use cartera::portfolio::{AddInvestmentRequest, EditInvestmentRequest};
use serde::Serialize;
use serde_json::json;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::error::{ApiResult, ResultExt};
use crate::AppState;

#[derive(Serialize)]
struct Success<T> {
    success: bool,
    #[serde(flatten)]
    data: T,
}

fn success<T: Serialize>(data: T) -> Response {
    Json(Success {
        success: true,
        data,
    })
    .into_response()
}

async fn portfolio(State(state): State<Arc<AppState>>) -> ApiResult<Response> {
    let overview = state
        .service
        .overview()
        .await
        .or_api("Error fetching portfolio")?;
    Ok(success(overview))
}

async fn tables(State(state): State<Arc<AppState>>) -> ApiResult<Response> {
    let tables = state
        .service
        .tables()
        .await
        .or_api("Error fetching categorized data")?;
    Ok(match tables {
        Some(tables) => success(tables),
        None => success(json!({"categories": {}, "counts": {"total": 0}})),
    })
}

async fn pie_chart(State(state): State<Arc<AppState>>) -> ApiResult<Response> {
    let composition = state
        .service
        .composition()
        .await
        .or_api("Error computing composition")?;
    Ok(match composition {
        Some(composition) => success(composition),
        None => success(json!({"message": "No investments", "categories": {}, "total": 0})),
    })
}

async fn categories(State(state): State<Arc<AppState>>) -> ApiResult<Response> {
    let ranked = state
        .service
        .ranked()
        .await
        .or_api("Error ranking assets")?;
    Ok(match ranked {
        Some(ranked) => success(ranked),
        None => success(json!({
            "message": "No investments",
            "graph_data": null,
            "table_data": []
        })),
    })
}

async fn types(State(state): State<Arc<AppState>>) -> ApiResult<Response> {
    let summary = state
        .service
        .type_summary()
        .await
        .or_api("Error summarizing investment types")?;
    Ok(success(json!({ "categories": summary })))
}

async fn add_asset(
    State(state): State<Arc<AppState>>,
    body: Result<Json<AddInvestmentRequest>, JsonRejection>,
) -> ApiResult<Response> {
    let Json(request) = body?;
    let stored = state.service.add(request).await.or_api("Error adding asset")?;
    let message = format!("Asset '{}' added successfully", stored.asset_name);
    let mut response = success(json!({ "message": message, "data": stored }));
    *response.status_mut() = StatusCode::CREATED;
    Ok(response)
}

async fn edit_asset(
    State(state): State<Arc<AppState>>,
    body: Result<Json<EditInvestmentRequest>, JsonRejection>,
) -> ApiResult<Response> {
    let Json(request) = body?;
    let updated = state
        .service
        .edit(request)
        .await
        .or_api("Error editing asset")?;
    let message = format!("Asset {} updated successfully", updated.isin);
    Ok(success(json!({ "message": message, "data": updated })))
}

async fn update_assets(State(state): State<Arc<AppState>>) -> ApiResult<Response> {
    let outcome = state
        .service
        .refresh_all()
        .await
        .or_api("Error updating assets")?;
    if outcome.total == 0 {
        return Ok(success(json!({
            "message": "No investments to update",
            "updated_count": 0
        })));
    }
    let errors = (!outcome.errors.is_empty()).then_some(&outcome.errors);
    Ok(success(json!({
        "message": format!("Update complete. {} assets updated.", outcome.updated_count),
        "updated_count": outcome.updated_count,
        "skipped_count": outcome.skipped_count,
        "errors": errors,
    })))
}

async fn bank(State(state): State<Arc<AppState>>) -> Response {
    success(state.service.banks())
}

fn cors_layer(config: &ServerConfig) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE]);

    if config.cors_allow_origins.iter().any(|o| o == "*") {
        return cors.allow_origin(Any);
    }
    let origins: Vec<HeaderValue> = config
        .cors_allow_origins
        .iter()
        .filter_map(|o| match o.parse() {
            Ok(origin) => Some(origin),
            Err(_) => {
                tracing::warn!(origin = %o, "ignoring invalid CORS origin");
                None
            }
        })
        .collect();
    cors.allow_origin(origins)
}

pub fn app_router(state: Arc<AppState>, config: &ServerConfig) -> Router {
    let api = Router::new()
        .route("/portfolio", get(portfolio))
        .route("/tables", get(tables))
        .route("/pie-chart", get(pie_chart))
        .route("/categories", get(categories))
        .route("/types", get(types))
        .route("/add-asset", post(add_asset))
        .route("/edit-asset", post(edit_asset).put(edit_asset))
        .route("/update-assets", post(update_assets))
        .route("/bank", get(bank));

    Router::new()
        .nest("/api", api)
        .with_state(state)
        .layer(cors_layer(config))
        .layer(TraceLayer::new_for_http())
}

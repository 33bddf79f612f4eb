use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use cartera::PortfolioError;
use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    NotFound(String),
    /// `message` names the operation that failed; `error` carries the detail.
    #[error("{error}")]
    Internal {
        error: String,
        message: Option<&'static str>,
    },
}

impl ApiError {
    /// Map a service error, attaching `message` to unanticipated failures.
    pub fn from_portfolio(err: PortfolioError, message: &'static str) -> Self {
        match err {
            PortfolioError::Validation(reason) => ApiError::BadRequest(reason),
            PortfolioError::NotFound(reason) => ApiError::NotFound(reason),
            PortfolioError::StoreRejected(reason) => ApiError::Internal {
                error: reason,
                message: None,
            },
            PortfolioError::Other(e) => ApiError::Internal {
                error: format!("{e:#}"),
                message: Some(message),
            },
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        tracing::debug!(error = %rejection.body_text(), "rejected request body");
        ApiError::BadRequest("invalid JSON".to_string())
    }
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    success: bool,
    error: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<&'a str>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error, message) = match &self {
            ApiError::BadRequest(reason) => (StatusCode::BAD_REQUEST, reason.as_str(), None),
            ApiError::NotFound(reason) => (StatusCode::NOT_FOUND, reason.as_str(), None),
            ApiError::Internal { error, message } => {
                tracing::error!(error = %error, "request failed");
                (StatusCode::INTERNAL_SERVER_ERROR, error.as_str(), *message)
            }
        };
        let body = Json(ErrorBody {
            success: false,
            error,
            message,
        });
        (status, body).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

/// `.or_api("Error doing X")` on service results.
pub trait ResultExt<T> {
    fn or_api(self, message: &'static str) -> ApiResult<T>;
}

impl<T> ResultExt<T> for Result<T, PortfolioError> {
    fn or_api(self, message: &'static str) -> ApiResult<T> {
        self.map_err(|e| ApiError::from_portfolio(e, message))
    }
}

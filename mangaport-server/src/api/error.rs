use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use mangaport_types::GatewayError;
use serde_json::json;
use thiserror::Error;

/// Reader API failure.
///
/// Gateway failures are rendered in the uniform failure shape with the
/// status the gateway assigned.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    NotFound(String),

    #[error(transparent)]
    Gateway(#[from] GatewayError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            Self::BadRequest(message) => {
                (StatusCode::BAD_REQUEST, Json(json!({ "error": message }))).into_response()
            },
            Self::NotFound(message) => {
                (StatusCode::NOT_FOUND, Json(json!({ "error": message }))).into_response()
            },
            Self::Gateway(err) => {
                let status =
                    StatusCode::from_u16(err.http_status()).unwrap_or(StatusCode::BAD_GATEWAY);
                (status, Json(err.to_failure())).into_response()
            },
        }
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

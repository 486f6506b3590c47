//! Proxy route handlers: `/api/proxy/:provider/*path`.

use axum::{
    body::Bytes,
    extract::{Path, RawQuery, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use mangaport_types::GatewayError;
use serde_json::{json, Value};
use std::sync::Arc;

use super::{Gateway, GatewayMethod, GatewayResponse, QueryParams};

pub async fn handle_proxy_get(
    State(gateway): State<Arc<Gateway>>,
    Path((provider, path)): Path<(String, String)>,
    RawQuery(raw_query): RawQuery,
) -> Response {
    let query = raw_query.as_deref().map(QueryParams::from_query_str).unwrap_or_default();
    let result = gateway.call_named(&provider, GatewayMethod::Get, &path, query, None).await;
    proxy_response(result, "Failed to fetch data via proxy")
}

pub async fn handle_proxy_post(
    State(gateway): State<Arc<Gateway>>,
    Path((provider, path)): Path<(String, String)>,
    body: Bytes,
) -> Response {
    let body: Value = match serde_json::from_slice(&body) {
        Ok(value) => value,
        Err(e) => {
            tracing::debug!("Rejected proxy POST body: {}", e);
            return (StatusCode::BAD_REQUEST, Json(json!({ "error": "Invalid JSON body" })))
                .into_response();
        },
    };

    let result = gateway
        .call_named(&provider, GatewayMethod::Post, &path, QueryParams::new(), Some(body))
        .await;
    proxy_response(result, "Failed to post data via proxy")
}

/// Map a gateway result onto the proxy's wire contract.
pub fn proxy_response(
    result: Result<GatewayResponse, GatewayError>,
    transport_message: &str,
) -> Response {
    match result {
        Ok(GatewayResponse { status, data }) => {
            (status_code(status), Json(data)).into_response()
        },
        Err(err) => {
            let status = status_code(err.http_status());
            let body = match &err {
                GatewayError::Configuration { .. }
                | GatewayError::InvalidRequest { .. }
                | GatewayError::RateLimitTimeout { .. } => json!({ "error": err.to_string() }),
                GatewayError::UpstreamRejection { body, .. } => {
                    json!({ "error": err.to_string(), "details": body })
                },
                GatewayError::Network { message, .. }
                | GatewayError::Timeout { message, .. }
                | GatewayError::InvalidPayload { message, .. } => {
                    json!({ "error": transport_message, "details": message })
                },
            };
            (status, Json(body)).into_response()
        },
    }
}

fn status_code(status: u16) -> StatusCode {
    StatusCode::from_u16(status).unwrap_or(StatusCode::BAD_GATEWAY)
}

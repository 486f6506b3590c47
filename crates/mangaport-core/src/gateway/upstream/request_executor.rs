use mangaport_types::{GatewayError, Provider, ProviderConfig};
use reqwest::{header, Client, Response};
use serde_json::Value;

use super::super::{GatewayMethod, GatewayResponse};

const MAX_LOGGED_BODY_CHARS: usize = 500;

pub fn build_url(base_url: &str, path: &str, query_string: &str) -> String {
    if query_string.is_empty() {
        format!("{}/{}", base_url, path)
    } else {
        format!("{}/{}?{}", base_url, path, query_string)
    }
}

/// Normalize a relative API path, rejecting anything that could escape the base URL.
pub fn validate_path(path: &str) -> Result<&str, GatewayError> {
    let trimmed = path.trim().trim_start_matches('/');

    let reason = if trimmed.is_empty() {
        Some("Missing API path")
    } else if trimmed.contains("://") {
        Some("Absolute URLs are not allowed")
    } else if trimmed.contains(['?', '#']) {
        Some("Query or fragment in API path")
    } else if trimmed.split('/').any(|segment| segment == ".." || segment == ".") {
        Some("Relative segments in API path")
    } else {
        None
    };

    match reason {
        Some(message) => Err(GatewayError::InvalidRequest { message: message.to_string() }),
        None => Ok(trimmed),
    }
}

/// Fixed JSON content type followed by the provider's static headers.
pub fn build_headers(config: &ProviderConfig) -> header::HeaderMap {
    let mut headers = header::HeaderMap::new();
    headers.insert(header::CONTENT_TYPE, header::HeaderValue::from_static("application/json"));

    for (k, v) in &config.static_headers {
        match (header::HeaderName::from_bytes(k.as_bytes()), header::HeaderValue::from_str(v)) {
            (Ok(name), Ok(value)) => {
                headers.insert(name, value);
            },
            _ => tracing::warn!("Skipping invalid static header {:?} for {}", k, config.name),
        }
    }

    headers
}

/// Fold a reqwest failure into `Network` or `Timeout`.
///
/// The message never carries the request URL: base URLs stay inside the gateway.
pub fn classify_transport_error(provider: Provider, e: reqwest::Error) -> GatewayError {
    let timed_out = e.is_timeout();
    let message = transport_message(&e.without_url());
    if timed_out {
        GatewayError::Timeout { provider: provider.to_string(), message }
    } else {
        GatewayError::Network { provider: provider.to_string(), message }
    }
}

/// Error kind plus its innermost cause, e.g. `error sending request: Connection refused`.
fn transport_message(e: &reqwest::Error) -> String {
    let mut root: Option<&(dyn std::error::Error + 'static)> = None;
    let mut source = std::error::Error::source(e);
    while let Some(inner) = source {
        root = Some(inner);
        source = inner.source();
    }
    match root {
        Some(cause) => format!("{}: {}", e, cause),
        None => e.to_string(),
    }
}

/// Cut long upstream bodies down for logging.
pub fn truncate_for_log(text: &str, max_len: usize) -> String {
    if text.chars().count() <= max_len {
        return text.to_string();
    }
    let mut s: String = text.chars().take(max_len).collect();
    s.push('…');
    s
}

pub async fn execute(
    client: &Client,
    config: &ProviderConfig,
    method: GatewayMethod,
    path: &str,
    query_string: &str,
    body: Option<&Value>,
) -> Result<GatewayResponse, GatewayError> {
    let provider = config.name;
    let url = build_url(&config.base_url, path, query_string);

    let request = match method {
        GatewayMethod::Get => client.get(&url),
        GatewayMethod::Post => client.post(&url).json(body.unwrap_or(&Value::Null)),
    }
    .headers(build_headers(config));

    let response = request.send().await.map_err(|e| {
        let err = classify_transport_error(provider, e);
        tracing::error!("Upstream {} {} /{} failed: {}", provider, method, path, err);
        err
    })?;

    normalize_response(provider, response).await
}

/// Success: decode JSON with the original status. Failure: keep the raw text.
pub async fn normalize_response(
    provider: Provider,
    response: Response,
) -> Result<GatewayResponse, GatewayError> {
    let status = response.status();
    let bytes = response.bytes().await.map_err(|e| classify_transport_error(provider, e))?;

    if !status.is_success() {
        let body = String::from_utf8_lossy(&bytes).into_owned();
        tracing::warn!(
            "Upstream {} rejected request ({}): {}",
            provider,
            status.as_u16(),
            truncate_for_log(&body, MAX_LOGGED_BODY_CHARS)
        );
        return Err(GatewayError::UpstreamRejection {
            provider: provider.to_string(),
            status: status.as_u16(),
            status_text: status.canonical_reason().unwrap_or("Unknown").to_string(),
            body,
        });
    }

    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(GatewayResponse { status: status.as_u16(), data: Value::Null });
    }

    let data = serde_json::from_slice(&bytes).map_err(|e| GatewayError::InvalidPayload {
        provider: provider.to_string(),
        status: status.as_u16(),
        message: e.to_string(),
    })?;

    Ok(GatewayResponse { status: status.as_u16(), data })
}

//! Upstream module - the single egress point towards the providers.

mod request_executor;


pub use request_executor::{build_url, validate_path};

use mangaport_types::{GatewayError, ProviderConfig};
use reqwest::Client;
use serde_json::Value;

use super::{GatewayMethod, GatewayResponse};

pub struct UpstreamClient {
    http_client: Client,
}

impl UpstreamClient {
    /// Accepts a pre-built `reqwest::Client` so callers control TLS and timeouts.
    pub fn new(http_client: Client) -> Self {
        Self { http_client }
    }

    /// Issue one request. No retries; the caller owns the retry policy.
    pub async fn send(
        &self,
        config: &ProviderConfig,
        method: GatewayMethod,
        path: &str,
        query_string: &str,
        body: Option<&Value>,
    ) -> Result<GatewayResponse, GatewayError> {
        tracing::debug!(
            "Upstream dispatch | Provider: {} | {} /{} | query: {} bytes",
            config.name,
            method,
            path,
            query_string.len()
        );
        request_executor::execute(&self.http_client, config, method, path, query_string, body)
            .await
    }
}

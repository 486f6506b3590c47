//! Gateway module - rate-limited outbound proxy to the manga providers
//!
//! This module provides:
//! - Query encoding with provider-specific array rules
//! - A fixed-window limiter for the page-server endpoint
//! - Provider resolution, request forwarding and error normalization
//! - The axum proxy route (`/api/proxy/:provider/*path`)
//!
//! Data flow: caller → [`QueryEncoder`] → [`Gateway`] (base URL, optional
//! [`FixedWindowLimiter`] wait) → provider → error normalization → caller.

pub mod client_builder;
pub mod handlers;
pub mod query;
pub mod rate_limit;
pub mod server;
pub mod upstream;

pub use query::{ParamValue, QueryEncoder, QueryParams};
pub use rate_limit::{Admission, Clock, FixedWindowLimiter, ManualClock, TokioClock};
pub use server::build_proxy_router;

use mangaport_types::{GatewayConfig, GatewayError, Provider, ProviderConfig};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::error::AppResult;
use upstream::UpstreamClient;

/// Verbs supported at the boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GatewayMethod {
    Get,
    Post,
}

impl fmt::Display for GatewayMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Get => f.write_str("GET"),
            Self::Post => f.write_str("POST"),
        }
    }
}

/// One outbound call. Built per call, dropped after use.
#[derive(Debug, Clone)]
pub struct GatewayRequest {
    pub provider: Provider,
    pub method: GatewayMethod,
    pub path: String,
    pub query: QueryParams,
    pub body: Option<Value>,
}

impl GatewayRequest {
    pub fn get(provider: Provider, path: impl Into<String>) -> Self {
        Self {
            provider,
            method: GatewayMethod::Get,
            path: path.into(),
            query: QueryParams::new(),
            body: None,
        }
    }

    pub fn post(provider: Provider, path: impl Into<String>, body: Value) -> Self {
        Self {
            provider,
            method: GatewayMethod::Post,
            path: path.into(),
            query: QueryParams::new(),
            body: Some(body),
        }
    }

    pub fn query(mut self, query: QueryParams) -> Self {
        self.query = query;
        self
    }
}

/// Decoded upstream payload with its original status.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GatewayResponse {
    pub status: u16,
    pub data: Value,
}

/// Sole egress point for provider calls.
///
/// Base URLs and static headers never leave this type. `C` is the page
/// limiter's clock.
pub struct Gateway<C: Clock = TokioClock> {
    upstream: UpstreamClient,
    providers: HashMap<Provider, ProviderConfig>,
    page_limiter: Arc<FixedWindowLimiter<C>>,
}

impl Gateway<TokioClock> {
    /// Build from configuration with a fresh HTTP client.
    pub fn new(config: &GatewayConfig) -> AppResult<Self> {
        let http_client = client_builder::build_http_client(config.request_timeout_secs)?;
        Ok(Self::with_client(http_client, config))
    }

    pub fn with_client(http_client: reqwest::Client, config: &GatewayConfig) -> Self {
        let providers = config.providers.iter().map(|p| (p.name, p.clone())).collect();
        Self {
            upstream: UpstreamClient::new(http_client),
            providers,
            page_limiter: Arc::new(FixedWindowLimiter::from_config(&config.page_limit)),
        }
    }
}

impl<C: Clock> Gateway<C> {
    /// Swap the page-server limiter, possibly for one on another clock.
    pub fn with_page_limiter<D: Clock>(self, limiter: Arc<FixedWindowLimiter<D>>) -> Gateway<D> {
        Gateway { upstream: self.upstream, providers: self.providers, page_limiter: limiter }
    }

    pub fn page_limiter(&self) -> &Arc<FixedWindowLimiter<C>> {
        &self.page_limiter
    }

    pub fn is_configured(&self, provider: Provider) -> bool {
        self.providers.contains_key(&provider)
    }

    /// Providers with a bound base URL, in declaration order.
    pub fn configured_providers(&self) -> Vec<Provider> {
        Provider::ALL.into_iter().filter(|p| self.is_configured(*p)).collect()
    }

    pub async fn call(&self, request: GatewayRequest) -> Result<GatewayResponse, GatewayError> {
        let provider = request.provider;
        let config = self.providers.get(&provider).ok_or_else(|| {
            tracing::warn!("Call to unconfigured provider {}", provider);
            GatewayError::Configuration { provider: provider.to_string() }
        })?;
        let path = upstream::validate_path(&request.path)?;
        let query_string = QueryEncoder::for_provider(provider).encode(&request.query);

        if provider.is_rate_limited_path(path) {
            self.page_limiter.acquire().await?;
        }

        self.upstream.send(config, request.method, path, &query_string, request.body.as_ref()).await
    }

    /// Same as [`Gateway::call`] but with an unparsed provider name.
    pub async fn call_named(
        &self,
        provider: &str,
        method: GatewayMethod,
        path: &str,
        query: QueryParams,
        body: Option<Value>,
    ) -> Result<GatewayResponse, GatewayError> {
        let provider: Provider = provider.parse()?;
        let request = GatewayRequest { provider, method, path: path.to_string(), query, body };
        self.call(request).await
    }

    /// GET and decode into `T`. A shape mismatch is an `InvalidPayload`.
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        provider: Provider,
        path: &str,
        query: QueryParams,
    ) -> Result<T, GatewayError> {
        let response = self.call(GatewayRequest::get(provider, path).query(query)).await?;
        serde_json::from_value(response.data).map_err(|e| GatewayError::InvalidPayload {
            provider: provider.to_string(),
            status: response.status,
            message: e.to_string(),
        })
    }
}

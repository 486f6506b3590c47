//! Test helpers for mangaport-server unit tests.

use std::sync::Arc;

use mangaport_core::gateway::client_builder::build_http_client;
use mangaport_core::Gateway;
use mangaport_types::{GatewayConfig, Provider, ProviderConfig};

use crate::state::AppState;

/// `AppState` whose providers point at the given (mock) base URLs.
pub fn test_app_state(bindings: &[(Provider, &str)]) -> AppState {
    let config = GatewayConfig {
        providers: bindings.iter().map(|(p, url)| ProviderConfig::new(*p, *url)).collect(),
        ..GatewayConfig::default()
    };
    let http_client =
        build_http_client(config.request_timeout_secs).expect("failed to build test HTTP client");
    let gateway = Arc::new(Gateway::with_client(http_client, &config));
    AppState::with_gateway(config, gateway)
}

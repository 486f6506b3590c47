//! Application State
//!
//! Holds the shared gateway, the typed provider clients built on it and the
//! configuration the process started with.

use anyhow::Result;
use axum::Router;
use std::sync::Arc;
use std::time::Instant;

use mangaport_core::gateway::build_proxy_router;
use mangaport_core::{Gateway, KitsuClient, MangaDexClient, Reconciler};
use mangaport_types::GatewayConfig;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub(crate) inner: Arc<AppStateInner>,
}

pub struct AppStateInner {
    pub config: GatewayConfig,
    pub gateway: Arc<Gateway>,
    pub mangadex: MangaDexClient,
    pub kitsu: KitsuClient,
    pub reconciler: Reconciler,
    pub started_at: Instant,
}

impl AppState {
    /// Build the gateway from `config` with a fresh HTTP client.
    pub fn new(config: GatewayConfig) -> Result<Self> {
        let gateway = Arc::new(Gateway::new(&config)?);
        Ok(Self::with_gateway(config, gateway))
    }

    pub fn with_gateway(config: GatewayConfig, gateway: Arc<Gateway>) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                mangadex: MangaDexClient::new(gateway.clone()),
                kitsu: KitsuClient::new(gateway.clone()),
                reconciler: Reconciler::new(gateway.clone()),
                gateway,
                config,
                started_at: Instant::now(),
            }),
        }
    }

    pub fn build_proxy_router(&self) -> Router {
        build_proxy_router(self.inner.gateway.clone())
    }

    pub fn config(&self) -> &GatewayConfig {
        &self.inner.config
    }

    pub fn gateway(&self) -> &Arc<Gateway> {
        &self.inner.gateway
    }

    pub fn mangadex(&self) -> &MangaDexClient {
        &self.inner.mangadex
    }

    pub fn kitsu(&self) -> &KitsuClient {
        &self.inner.kitsu
    }

    pub fn reconciler(&self) -> &Reconciler {
        &self.inner.reconciler
    }

    pub fn uptime_secs(&self) -> u64 {
        self.inner.started_at.elapsed().as_secs()
    }
}

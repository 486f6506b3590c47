//! API Routes
//!
//! Reader-facing REST endpoints built on the typed provider clients.

mod discover;
mod error;
mod manga;


use axum::{extract::State, response::Json, routing::get, Router};
use serde::{Deserialize, Serialize};

use mangaport_types::Provider;

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        // Status
        .route("/status", get(get_status))
        // MangaDex
        .route("/manga/search", get(manga::search_manga))
        .route("/manga/popular", get(manga::popular_manga))
        .route("/manga/:id/chapters", get(manga::manga_chapters))
        .route("/chapters/latest", get(manga::latest_chapters))
        .route("/chapters/:id/pages", get(manga::chapter_pages))
        // Kitsu
        .route("/trending", get(discover::trending))
        // Reconciliation
        .route("/reconcile/mangadex/:id", get(discover::reconcile_mangadex))
        .route("/reconcile/kitsu/:slug", get(discover::reconcile_kitsu))
}

// ============ Status ============

#[derive(Debug, Serialize, Deserialize)]
pub struct ProviderStatus {
    pub name: String,
    pub role: String,
    pub configured: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PageLimitStatus {
    pub limit: usize,
    pub window_ms: u64,
    pub in_window: usize,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct StatusResponse {
    pub version: String,
    pub uptime_secs: u64,
    pub providers: Vec<ProviderStatus>,
    pub page_limit: PageLimitStatus,
}

async fn get_status(State(state): State<AppState>) -> Json<StatusResponse> {
    let gateway = state.gateway();
    let limiter = gateway.page_limiter();

    Json(StatusResponse {
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_secs: state.uptime_secs(),
        providers: Provider::ALL
            .into_iter()
            .map(|p| ProviderStatus {
                name: p.as_str().to_string(),
                role: p.role().to_string(),
                configured: gateway.is_configured(p),
            })
            .collect(),
        page_limit: PageLimitStatus {
            limit: limiter.limit(),
            window_ms: limiter.window().as_millis() as u64,
            in_window: limiter.in_flight_window(),
        },
    })
}

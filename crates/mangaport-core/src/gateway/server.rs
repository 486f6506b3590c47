use axum::{routing::get, Router};
use std::sync::Arc;

use super::{handlers, Gateway};

/// Proxy routes bound to a shared gateway.
///
/// Dropping the request (client disconnect) drops the handler future, which
/// abandons both a pending limiter wait and the in-flight upstream call.
pub fn build_proxy_router(gateway: Arc<Gateway>) -> Router<()> {
    Router::new()
        .route(
            "/api/proxy/:provider/*path",
            get(handlers::handle_proxy_get).post(handlers::handle_proxy_post),
        )
        .with_state(gateway)
}

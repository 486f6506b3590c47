use axum::{
    extract::DefaultBodyLimit, http::StatusCode, response::IntoResponse, routing::get, Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::api;
use crate::state::AppState;

const MAX_BODY_BYTES: usize = 2 * 1024 * 1024;

pub fn build_router(state: AppState) -> Router {
    let proxy_router = state.build_proxy_router();

    let api_routes = Router::<AppState>::new()
        .nest("/api", api::router())
        .route("/health", get(health_check))
        .route("/healthz", get(health_check))
        .route("/version", get(version_info));

    // Resolve AppState first so we get Router<()>, then merge the proxy
    // router (also Router<()>).
    api_routes
        .with_state(state)
        .merge(proxy_router)
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any))
}

async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, axum::Json(serde_json::json!({"status": "ok"})))
}

async fn version_info() -> impl IntoResponse {
    (
        StatusCode::OK,
        axum::Json(serde_json::json!({
            "version": option_env!("GIT_VERSION").unwrap_or("dev"),
            "cargo_version": env!("CARGO_PKG_VERSION"),
        })),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::test_app_state;
    use axum_test::TestServer;
    use mangaport_types::Provider;
    use serde_json::{json, Value};
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_health_endpoints() {
        let server = TestServer::new(build_router(test_app_state(&[]))).unwrap();
        for route in ["/health", "/healthz"] {
            let response = server.get(route).await;
            response.assert_status_ok();
            response.assert_json(&json!({"status": "ok"}));
        }

        let version: Value = server.get("/version").await.json();
        assert_eq!(version["cargo_version"], env!("CARGO_PKG_VERSION"));
    }

    #[tokio::test]
    async fn test_proxy_is_mounted() {
        let upstream = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/trending/manga"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": []})))
            .expect(1)
            .mount(&upstream)
            .await;

        let state = test_app_state(&[(Provider::Kitsu, &upstream.uri())]);
        let server = TestServer::new(build_router(state)).unwrap();

        let response = server.get("/api/proxy/metadata-art/trending/manga").await;
        response.assert_status_ok();
        response.assert_json(&json!({"data": []}));
    }

    #[tokio::test]
    async fn test_unknown_route_is_404() {
        let server = TestServer::new(build_router(test_app_state(&[]))).unwrap();
        server.get("/api/nope").await.assert_status(StatusCode::NOT_FOUND);
    }
}

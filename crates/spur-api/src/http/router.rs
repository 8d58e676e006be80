//! Axum router configuration with middleware.
//!
//! Chat routes live under `/api/chat`; with `server.dev_routes` they are also
//! mounted at `/chat` for a local frontend dev proxy.
//! Middleware: CORS (single allowed origin, credentials), tracing, body limit.

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::http::{HeaderValue, Method, header};
use axum::routing::{get, post};
use tower_http::cors::CorsLayer;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

use crate::http::handlers;
use crate::state::AppState;

/// Maximum accepted request body size.
pub const BODY_LIMIT_BYTES: usize = 10 * 1024 * 1024;

/// Build the complete router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let cors = cors_layer(&state.config.server.frontend_url);

    let mut router = Router::new()
        .route("/health", get(health_check))
        .nest("/api/chat", chat_routes());

    if state.config.server.dev_routes {
        router = router.nest("/chat", chat_routes());
        tracing::info!("Dev routes enabled at /chat");
    }

    router
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(BODY_LIMIT_BYTES))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn chat_routes() -> Router<AppState> {
    Router::new()
        .route("/message", post(handlers::chat::send_message))
        .route("/history/{session_id}", get(handlers::chat::get_history))
}

/// CORS for the configured frontend origin, with credentials.
///
/// An origin that is not a valid header value disables cross-origin access.
fn cors_layer(frontend_url: &str) -> CorsLayer {
    let base = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .allow_credentials(true);

    match HeaderValue::from_str(frontend_url.trim_end_matches('/')) {
        Ok(origin) => base.allow_origin(origin),
        Err(err) => {
            tracing::warn!(%frontend_url, error = %err, "Invalid frontend URL, cross-origin requests disabled");
            base
        }
    }
}

/// GET /health - Liveness check.
async fn health_check() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({
        "status": "ok",
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

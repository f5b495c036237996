//! Router assembly: HTTP endpoints, WebSocket upgrade, static files, CORS, and HTTP tracing.

use std::sync::Arc;

use axum::{
    routing::{get, post, put},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    services::{ServeDir, ServeFile},
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use crate::state::AppState;

pub mod http;
pub mod ws;

/// Build the application router with:
/// - WebSocket at `/ws` (one session per connection)
/// - Lesson and session API under `/api/v1/...`
/// - Stateless chatbot endpoints at `/api/chat` and `/api/health`
/// - Static page from `./static` with index fallback
/// - CORS (allow any origin/method/headers)
/// - HTTP trace layer (per-request spans w/ method, path, status, latency)
pub fn build_router(state: Arc<AppState>) -> Router {
    let static_service = ServeDir::new("./static")
        .append_index_html_on_directories(true)
        .not_found_service(ServeFile::new("./static/index.html"));

    Router::new()
        // WebSocket
        .route("/ws", get(ws::ws_upgrade))
        // Lesson content + stateless helpers
        .route("/api/v1/health", get(http::http_health))
        .route("/api/v1/lesson", get(http::http_get_lesson))
        .route("/api/v1/classify", post(http::http_post_classify))
        .route("/api/v1/video/normalize", post(http::http_post_normalize))
        // Sessions
        .route("/api/v1/sessions", post(http::http_create_session))
        .route(
            "/api/v1/sessions/:id",
            get(http::http_get_session).delete(http::http_delete_session),
        )
        .route("/api/v1/sessions/:id/next", post(http::http_session_next))
        .route("/api/v1/sessions/:id/prev", post(http::http_session_prev))
        .route("/api/v1/sessions/:id/select", post(http::http_session_select))
        .route("/api/v1/sessions/:id/toggle", post(http::http_session_toggle))
        .route("/api/v1/sessions/:id/checklist", post(http::http_session_check))
        .route("/api/v1/sessions/:id/answer", post(http::http_session_answer))
        .route("/api/v1/sessions/:id/resources", put(http::http_set_resource_url))
        .route("/api/v1/sessions/:id/resources/save", post(http::http_save_resources))
        .route("/api/v1/sessions/:id/resources/reset", post(http::http_reset_resources))
        .route("/api/v1/sessions/:id/chat", post(http::http_session_chat))
        // Stateless chatbot (client owns the history)
        .route("/api/chat", post(http::http_stateless_chat))
        .route("/api/health", get(http::http_stateless_health))
        // State + CORS + HTTP tracing
        .with_state(state)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        // Frontend fallback
        .fallback_service(static_service)
}

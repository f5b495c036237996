//! Seasons lesson backend
//!
//! - Axum HTTP + WebSocket API for the "지구, 태양 주위를 떠도는 여정!" lesson
//! - Optional Gemini chatbot (via environment variables)
//! - Static page fallback (./static/index.html)
//!
//! Important env variables:
//!   PORT                 : u16 (default 3000)
//!   SETTINGS_PATH        : resource URL overrides file (default "resource_settings.json")
//!   LESSON_CONFIG_PATH   : path to TOML lesson content (cards, summary, feedback, persona)
//!   GOOGLE_API_KEY       : enables the chatbot if present
//!   GEMINI_BASE_URL      : default "https://generativelanguage.googleapis.com/v1beta"
//!   GEMINI_MODEL         : default "gemini-pro"
//!   GEMINI_TIMEOUT_SECS  : default 30
//!   LOG_LEVEL            : tracing filter, e.g. "debug" or full directives
//!   LOG_FORMAT           : "pretty" (default) or "json"

use std::{net::SocketAddr, sync::Arc};
use tokio::net::TcpListener;
use tracing::info;

use seasons_backend::config::AppConfig;
use seasons_backend::routes::build_router;
use seasons_backend::state::AppState;
use seasons_backend::telemetry;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
  telemetry::init_tracing();

  let cfg = AppConfig::from_env();
  let addr = SocketAddr::from(([0, 0, 0, 0], cfg.port));

  // Shared application state (lesson content, sessions, settings store, chat client).
  let state = Arc::new(AppState::new(cfg));

  // HTTP router with routes, CORS and tracing layers.
  let app = build_router(state.clone());

  let listener = TcpListener::bind(addr).await?;
  info!(target: "seasons_backend", %addr, "HTTP server listening");
  axum::serve(listener, app)
    .with_graceful_shutdown(shutdown_signal())
    .await?;
  Ok(())
}

async fn shutdown_signal() {
  if let Err(e) = tokio::signal::ctrl_c().await {
    tracing::error!(target: "seasons_backend", error = %e, "Failed to listen for shutdown signal");
    std::future::pending::<()>().await;
  }
  info!(target: "seasons_backend", "Shutdown signal received");
}

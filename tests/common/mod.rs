#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::body::Body;
use axum::extract::State;
use axum::http::{Request, StatusCode};
use axum::routing::post;
use axum::{Json, Router};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use seasons_backend::config::{AppConfig, ChatConfig, LessonConfig};
use seasons_backend::routes::build_router;
use seasons_backend::state::AppState;

pub fn chat_config(api_key: Option<&str>, base_url: &str) -> ChatConfig {
    ChatConfig {
        api_key: api_key.map(str::to_string),
        base_url: base_url.to_string(),
        model: "gemini-pro".into(),
        timeout: Duration::from_secs(5),
    }
}

pub fn create_test_app_with(settings_path: PathBuf, chat: ChatConfig) -> Router {
    let state = AppState::new(AppConfig {
        port: 0,
        settings_path,
        lesson: LessonConfig::default(),
        chat,
    });
    build_router(Arc::new(state))
}

pub fn create_test_app(dir: &tempfile::TempDir) -> Router {
    create_test_app_with(
        dir.path().join("resource_settings.json"),
        chat_config(None, "http://127.0.0.1:9"),
    )
}

pub async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(v) => builder
            .header("content-type", "application/json")
            .body(Body::from(v.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

pub async fn create_session(app: &Router) -> String {
    let (status, body) = send(app, "POST", "/api/v1/sessions", None).await;
    assert_eq!(status, StatusCode::OK);
    body["session_id"].as_str().unwrap().to_string()
}

/// Request bodies received by the mock Gemini server.
pub type Received = Arc<Mutex<Vec<Value>>>;

/// Local stand-in for the generateContent endpoint. Replies "답: <last user text>",
/// or HTTP 500 when the last user text is "fail".
pub async fn spawn_mock_gemini() -> (String, Received) {
    async fn generate(State(received): State<Received>, Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
        received.lock().unwrap().push(body.clone());
        let last = body["contents"]
            .as_array()
            .and_then(|c| c.last())
            .and_then(|c| c["parts"][0]["text"].as_str())
            .unwrap_or_default()
            .to_string();
        if last == "fail" {
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({"error": {"code": 500, "message": "backend exploded"}})),
            );
        }
        (
            StatusCode::OK,
            Json(json!({
                "candidates": [{"content": {"role": "model", "parts": [{"text": format!("답: {last}")}]}}]
            })),
        )
    }

    let received: Received = Arc::new(Mutex::new(Vec::new()));
    let app = Router::new()
        .route("/models/:action", post(generate))
        .with_state(received.clone());
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (format!("http://{addr}"), received)
}

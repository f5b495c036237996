//! WebSocket upgrade + message loop. Each connection owns one lesson session.
//! Every client message is parsed as JSON, applied to that session, and answered
//! with a single JSON message.

use std::sync::Arc;
use axum::{
  extract::{
    ws::{Message, WebSocket},
    State, WebSocketUpgrade,
  },
  response::IntoResponse,
};
use tracing::{info, error, instrument, debug};

use crate::error::ApiError;
use crate::logic::*;
use crate::protocol::{ClientWsMessage, ServerWsMessage};
use crate::session::SessionState;
use crate::state::AppState;
use crate::video::normalize_video_url;

#[instrument(level = "info", skip(state))]
pub async fn ws_upgrade(ws: WebSocketUpgrade, State(state): State<Arc<AppState>>) -> impl IntoResponse {
  info!(target: "seasons_backend", "WebSocket upgrade requested");
  ws.on_upgrade(move |socket| handle_ws(socket, state))
}

#[instrument(level = "info", skip(socket, state))]
async fn handle_ws(mut socket: WebSocket, state: Arc<AppState>) {
  let mut session = state.new_session_state().await;
  info!(target: "seasons_backend", overrides = session.overrides.len(), "WebSocket connected");
  while let Some(Ok(msg)) = socket.recv().await {
    match msg {
      Message::Text(txt) => {
        let out = handle_text(&txt, &state, &mut session).await;

        if let Err(e) = socket.send(Message::Text(out)).await {
          error!(target: "seasons_backend", error = %e, "WS send error");
          break;
        }
      }
      Message::Ping(payload) => { let _ = socket.send(Message::Pong(payload)).await; }
      Message::Close(_) => break,
      _ => {}
    }
  }
  info!(target: "seasons_backend", "WebSocket disconnected");
}

/// Parse one text frame, apply it to the session, and serialize the reply.
async fn handle_text(txt: &str, state: &AppState, session: &mut SessionState) -> String {
  let reply_msg = match serde_json::from_str::<ClientWsMessage>(txt) {
    Ok(incoming) => {
      debug!(target: "seasons_backend", bytes = txt.len(), "WS message received");
      handle_client_ws(incoming, state, session).await
    }
    Err(e) => ServerWsMessage::Error { message: format!("Invalid JSON: {}", e) },
  };

  serde_json::to_string(&reply_msg).unwrap_or_else(|e| {
    serde_json::json!({ "type": "error", "message": format!("Serialization error: {}", e) }).to_string()
  })
}

fn view(state: &AppState, session: &SessionState) -> ServerWsMessage {
  ServerWsMessage::Session { session: session_view(state, session) }
}

fn view_or_error(state: &AppState, session: &SessionState, result: Result<(), ApiError>) -> ServerWsMessage {
  match result {
    Ok(()) => view(state, session),
    Err(e) => ServerWsMessage::Error { message: e.to_string() },
  }
}

#[instrument(level = "info", skip_all)]
async fn handle_client_ws(msg: ClientWsMessage, state: &AppState, session: &mut SessionState) -> ServerWsMessage {
  match msg {
    ClientWsMessage::Ping => ServerWsMessage::Pong,

    ClientWsMessage::View => view(state, session),

    ClientWsMessage::Next => {
      session.next();
      view(state, session)
    }

    ClientWsMessage::Prev => {
      session.prev();
      view(state, session)
    }

    ClientWsMessage::Select { index } => {
      let result = if session.select(index) {
        Ok(())
      } else {
        Err(ApiError::bad_request(format!("Card index out of range: {}", index)))
      };
      view_or_error(state, session, result)
    }

    ClientWsMessage::Toggle { panel } => {
      session.toggle(panel);
      view(state, session)
    }

    ClientWsMessage::Check { key } => {
      let result = toggle_check(state, session, &key).map(|_| ());
      view_or_error(state, session, result)
    }

    ClientWsMessage::SubmitAnswer { answer } => {
      let submitted = submit_answer(state, session, &answer);
      info!(target: "lesson", label = %submitted.label, "WS submit_answer evaluated");
      view(state, session)
    }

    ClientWsMessage::Classify { answer } => {
      let (label, feedback) = classify_answer(state, &answer);
      ServerWsMessage::Classification { label, feedback }
    }

    ClientWsMessage::SetResourceUrl { card_id, resource_id, url } => {
      let result = set_resource_url(state, session, &card_id, &resource_id, &url);
      view_or_error(state, session, result)
    }

    ClientWsMessage::SaveResources => match save_resources(state, &session.overrides).await {
      Ok(overrides) => ServerWsMessage::Saved { overrides },
      Err(e) => {
        error!(target: "settings", error = %e, "WS save_resources failed");
        ServerWsMessage::Error { message: e.to_string() }
      }
    },

    ClientWsMessage::ResetResources => {
      reset_resources(session);
      view(state, session)
    }

    ClientWsMessage::Chat { message } => match require_message(&message) {
      Ok(message) => {
        let reply = chat_reply(state, &session.chat_history(), message).await;
        record_chat(session, message, reply.clone());
        ServerWsMessage::ChatReply { reply }
      }
      Err(e) => ServerWsMessage::Error { message: e.to_string() },
    },

    ClientWsMessage::NormalizeVideo { url } => ServerWsMessage::Normalized { url: normalize_video_url(&url) },
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::config::{AppConfig, ChatConfig, LessonConfig};
  use serde_json::{json, Value};
  use std::path::PathBuf;
  use std::time::Duration;

  fn state_at(settings_path: PathBuf) -> AppState {
    AppState::new(AppConfig {
      port: 0,
      settings_path,
      lesson: LessonConfig::default(),
      chat: ChatConfig {
        api_key: None,
        base_url: "http://127.0.0.1:9".into(),
        model: "gemini-pro".into(),
        timeout: Duration::from_secs(1),
      },
    })
  }

  async fn send(state: &AppState, session: &mut SessionState, msg: Value) -> Value {
    let out = handle_text(&msg.to_string(), state, session).await;
    serde_json::from_str(&out).unwrap()
  }

  #[tokio::test]
  async fn navigation_wraps_and_select_rejects_out_of_range() {
    let dir = tempfile::tempdir().unwrap();
    let state = state_at(dir.path().join("resource_settings.json"));
    let mut session = state.new_session_state().await;

    let reply = send(&state, &mut session, json!({"type": "prev"})).await;
    assert_eq!(reply["type"], "session");
    assert_eq!(reply["session"]["index"], 3);
    assert_eq!(reply["session"]["card"]["id"], "summary");

    let reply = send(&state, &mut session, json!({"type": "next"})).await;
    assert_eq!(reply["session"]["index"], 0);

    let reply = send(&state, &mut session, json!({"type": "select", "index": 9})).await;
    assert_eq!(reply["type"], "error");
    assert!(reply["message"].as_str().unwrap().contains("out of range"));
    assert_eq!(session.selected(), 0);

    let reply = send(&state, &mut session, json!({"type": "select", "index": 2})).await;
    assert_eq!(reply["session"]["card"]["id"], "verify");
  }

  #[tokio::test]
  async fn set_then_save_writes_the_settings_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("resource_settings.json");
    let state = state_at(path.clone());
    let mut session = state.new_session_state().await;

    let reply = send(
      &state,
      &mut session,
      json!({"type": "set_resource_url", "cardId": "observe", "resourceId": "orbit_video", "url": "https://youtu.be/abc123XYZ"}),
    )
    .await;
    assert_eq!(reply["session"]["card"]["resources"][0]["overridden"], true);
    assert!(!path.exists());

    let reply = send(&state, &mut session, json!({"type": "save_resources"})).await;
    assert_eq!(reply, json!({"type": "saved", "overrides": 1}));
    let saved: Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(
      saved,
      json!({"resource_urls": {"observe": {"orbit_video": "https://youtu.be/abc123XYZ"}}})
    );

    let reply = send(&state, &mut session, json!({"type": "reset_resources"})).await;
    assert_eq!(reply["session"]["card"]["resources"][0]["overridden"], false);
    assert_eq!(state.settings.load().await.len(), 1);
  }

  #[tokio::test]
  async fn save_failure_becomes_an_error_message() {
    let dir = tempfile::tempdir().unwrap();
    let state = state_at(dir.path().join("missing-dir").join("settings.json"));
    let mut session = state.new_session_state().await;

    let reply = handle_client_ws(ClientWsMessage::SaveResources, &state, &mut session).await;
    assert!(matches!(reply, ServerWsMessage::Error { .. }));
  }

  #[tokio::test]
  async fn chat_without_key_replies_with_an_error_turn() {
    let dir = tempfile::tempdir().unwrap();
    let state = state_at(dir.path().join("resource_settings.json"));
    let mut session = state.new_session_state().await;

    let reply = send(&state, &mut session, json!({"type": "chat", "message": "안녕"})).await;
    assert_eq!(reply["type"], "chat_reply");
    assert_eq!(reply["reply"]["role"], "error");
    assert_eq!(session.transcript.len(), 2);

    let reply = send(&state, &mut session, json!({"type": "chat", "message": "   "})).await;
    assert_eq!(reply["type"], "error");
    assert_eq!(session.transcript.len(), 2);
  }

  #[tokio::test]
  async fn answers_checklist_and_stateless_messages() {
    let dir = tempfile::tempdir().unwrap();
    let state = state_at(dir.path().join("resource_settings.json"));
    let mut session = state.new_session_state().await;

    assert_eq!(send(&state, &mut session, json!({"type": "ping"})).await, json!({"type": "pong"}));

    let reply = send(&state, &mut session, json!({"type": "submit_answer", "answer": "자전축이 기울어서"})).await;
    assert_eq!(reply["session"]["show_feedback"], true);
    assert_eq!(reply["session"]["answer"]["label"], "tilt");

    let reply = send(&state, &mut session, json!({"type": "toggle", "panel": "resources"})).await;
    assert_eq!(reply["session"]["show_resources"], true);

    let reply = send(&state, &mut session, json!({"type": "check", "key": "chk_angle"})).await;
    assert_eq!(reply["type"], "session");
    let reply = send(&state, &mut session, json!({"type": "check", "key": "nope"})).await;
    assert_eq!(reply["type"], "error");

    let reply = send(&state, &mut session, json!({"type": "classify", "answer": ""})).await;
    assert_eq!(reply["label"], "empty");

    let reply = send(&state, &mut session, json!({"type": "normalize_video", "url": "https://youtu.be/abc123XYZ"})).await;
    assert_eq!(reply, json!({"type": "normalized", "url": "https://www.youtube.com/embed/abc123XYZ"}));
  }

  #[tokio::test]
  async fn malformed_frames_get_an_invalid_json_error() {
    let dir = tempfile::tempdir().unwrap();
    let state = state_at(dir.path().join("resource_settings.json"));
    let mut session = state.new_session_state().await;

    for frame in ["{not json", r#"{"type": "fly"}"#] {
      let reply: Value = serde_json::from_str(&handle_text(frame, &state, &mut session).await).unwrap();
      assert_eq!(reply["type"], "error");
      assert!(reply["message"].as_str().unwrap().starts_with("Invalid JSON"));
    }
  }
}

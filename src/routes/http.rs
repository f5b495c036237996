//! HTTP endpoint handlers. These are thin wrappers that forward to core logic.
//! Each handler is instrumented and logs parameters and basic result info.

use std::sync::Arc;
use axum::{
  extract::{Path, State},
  http::StatusCode,
  response::{IntoResponse, Response},
  Json,
};
use tracing::{info, instrument};

use crate::error::ApiError;
use crate::logic::*;
use crate::protocol::*;
use crate::session::{ChatRole, ChatTurn, SessionState};
use crate::state::AppState;
use crate::video::normalize_video_url;

fn unknown_session(id: &str) -> ApiError {
  ApiError::not_found(format!("Unknown session: {id}"))
}

/// Apply `f` to the session and answer with its updated view.
async fn update_view(
  state: &AppState,
  id: &str,
  f: impl FnOnce(&mut SessionState) -> Result<(), ApiError>,
) -> Result<Json<SessionView>, ApiError> {
  state
    .with_session(id, |s| -> Result<SessionView, ApiError> {
      f(s)?;
      Ok(session_view(state, s))
    })
    .await
    .unwrap_or_else(|| Err(unknown_session(id)))
    .map(Json)
}

#[instrument(level = "info", skip(state))]
pub async fn http_health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
  Json(HealthOut { ok: true, chat_configured: state.chat_configured() })
}

#[instrument(level = "info", skip(state))]
pub async fn http_get_lesson(State(state): State<Arc<AppState>>) -> impl IntoResponse {
  Json(lesson_out(&state))
}

#[instrument(level = "info", skip(state, body), fields(answer_len = body.answer.len()))]
pub async fn http_post_classify(
  State(state): State<Arc<AppState>>,
  Json(body): Json<ClassifyIn>,
) -> impl IntoResponse {
  let (label, feedback) = classify_answer(&state, &body.answer);
  info!(target: "lesson", %label, "HTTP classify evaluated");
  Json(ClassifyOut { label, feedback })
}

#[instrument(level = "info", skip(body))]
pub async fn http_post_normalize(Json(body): Json<NormalizeIn>) -> impl IntoResponse {
  Json(NormalizeOut { url: normalize_video_url(&body.url) })
}

#[instrument(level = "info", skip(state))]
pub async fn http_create_session(State(state): State<Arc<AppState>>) -> Result<Json<SessionCreatedOut>, ApiError> {
  let session_id = state.create_session().await;
  let session = state
    .with_session(&session_id, |s| session_view(&state, s))
    .await
    .ok_or_else(|| unknown_session(&session_id))?;
  Ok(Json(SessionCreatedOut { session_id, session }))
}

#[instrument(level = "info", skip(state))]
pub async fn http_get_session(
  State(state): State<Arc<AppState>>,
  Path(id): Path<String>,
) -> Result<Json<SessionView>, ApiError> {
  update_view(&state, &id, |_| Ok(())).await
}

#[instrument(level = "info", skip(state))]
pub async fn http_delete_session(
  State(state): State<Arc<AppState>>,
  Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
  if state.end_session(&id).await {
    info!(target: "lesson", session_id = %id, "Session ended");
    Ok(StatusCode::NO_CONTENT)
  } else {
    Err(unknown_session(&id))
  }
}

#[instrument(level = "info", skip(state))]
pub async fn http_session_next(
  State(state): State<Arc<AppState>>,
  Path(id): Path<String>,
) -> Result<Json<SessionView>, ApiError> {
  update_view(&state, &id, |s| {
    s.next();
    Ok(())
  })
  .await
}

#[instrument(level = "info", skip(state))]
pub async fn http_session_prev(
  State(state): State<Arc<AppState>>,
  Path(id): Path<String>,
) -> Result<Json<SessionView>, ApiError> {
  update_view(&state, &id, |s| {
    s.prev();
    Ok(())
  })
  .await
}

#[instrument(level = "info", skip(state, body), fields(index = body.index))]
pub async fn http_session_select(
  State(state): State<Arc<AppState>>,
  Path(id): Path<String>,
  Json(body): Json<SelectIn>,
) -> Result<Json<SessionView>, ApiError> {
  update_view(&state, &id, |s| {
    if s.select(body.index) {
      Ok(())
    } else {
      Err(ApiError::bad_request(format!("Card index out of range: {}", body.index)))
    }
  })
  .await
}

#[instrument(level = "info", skip(state, body), fields(panel = ?body.panel))]
pub async fn http_session_toggle(
  State(state): State<Arc<AppState>>,
  Path(id): Path<String>,
  Json(body): Json<ToggleIn>,
) -> Result<Json<SessionView>, ApiError> {
  update_view(&state, &id, |s| {
    s.toggle(body.panel);
    Ok(())
  })
  .await
}

#[instrument(level = "info", skip(state, body), fields(key = %body.key))]
pub async fn http_session_check(
  State(state): State<Arc<AppState>>,
  Path(id): Path<String>,
  Json(body): Json<CheckIn>,
) -> Result<Json<SessionView>, ApiError> {
  update_view(&state, &id, |s| toggle_check(&state, s, &body.key).map(|_| ())).await
}

#[instrument(level = "info", skip(state, body), fields(answer_len = body.answer.len()))]
pub async fn http_session_answer(
  State(state): State<Arc<AppState>>,
  Path(id): Path<String>,
  Json(body): Json<AnswerIn>,
) -> Result<Json<SessionView>, ApiError> {
  update_view(&state, &id, |s| {
    submit_answer(&state, s, &body.answer);
    Ok(())
  })
  .await
}

#[instrument(level = "info", skip(state, body), fields(card_id = %body.card_id, resource_id = %body.resource_id))]
pub async fn http_set_resource_url(
  State(state): State<Arc<AppState>>,
  Path(id): Path<String>,
  Json(body): Json<SetResourceIn>,
) -> Result<Json<SessionView>, ApiError> {
  update_view(&state, &id, |s| {
    set_resource_url(&state, s, &body.card_id, &body.resource_id, &body.url)
  })
  .await
}

#[instrument(level = "info", skip(state))]
pub async fn http_save_resources(
  State(state): State<Arc<AppState>>,
  Path(id): Path<String>,
) -> Result<Json<SavedOut>, ApiError> {
  let overrides = state
    .with_session(&id, |s| s.overrides.clone())
    .await
    .ok_or_else(|| unknown_session(&id))?;
  let overrides = save_resources(&state, &overrides).await?;
  info!(target: "settings", session_id = %id, overrides, "HTTP resource overrides saved");
  Ok(Json(SavedOut { saved: true, overrides }))
}

#[instrument(level = "info", skip(state))]
pub async fn http_reset_resources(
  State(state): State<Arc<AppState>>,
  Path(id): Path<String>,
) -> Result<Json<SessionView>, ApiError> {
  update_view(&state, &id, |s| {
    reset_resources(s);
    Ok(())
  })
  .await
}

/// The session lock is released while the chat call is in flight.
#[instrument(level = "info", skip(state, body), fields(message_len = body.message.len()))]
pub async fn http_session_chat(
  State(state): State<Arc<AppState>>,
  Path(id): Path<String>,
  Json(body): Json<ChatIn>,
) -> Result<Json<ChatOut>, ApiError> {
  let message = require_message(&body.message)?;
  let history = state
    .with_session(&id, |s| s.chat_history())
    .await
    .ok_or_else(|| unknown_session(&id))?;

  let reply = chat_reply(&state, &history, message).await;
  info!(target: "chat", session_id = %id, role = ?reply.role, "HTTP chat turn finished");

  let transcript = state
    .with_session(&id, |s| {
      record_chat(s, message, reply.clone());
      s.transcript.clone()
    })
    .await
    .ok_or_else(|| unknown_session(&id))?;
  Ok(Json(ChatOut { reply, transcript }))
}

/// Stateless chat: the client sends its own history with every turn.
#[instrument(level = "info", skip(state, body), fields(history_len = body.history.len()))]
pub async fn http_stateless_chat(
  State(state): State<Arc<AppState>>,
  Json(body): Json<StatelessChatIn>,
) -> Response {
  let Some(message) = body.message.as_deref().map(str::trim).filter(|m| !m.is_empty()) else {
    return (
      StatusCode::BAD_REQUEST,
      Json(StatelessChatError { error: "Message is required".into(), details: None }),
    )
      .into_response();
  };

  if !state.chat_configured() {
    return (
      StatusCode::INTERNAL_SERVER_ERROR,
      Json(StatelessChatError {
        error: "Google API key is not configured. Please set GOOGLE_API_KEY in .env file.".into(),
        details: None,
      }),
    )
      .into_response();
  }

  let history: Vec<ChatTurn> = body
    .history
    .iter()
    .map(|m| {
      let role = if m.role == "user" { ChatRole::User } else { ChatRole::Model };
      ChatTurn::new(role, m.content.clone())
    })
    .collect();

  match chat_completion(&state, &history, message).await {
    Ok(response) => Json(StatelessChatOut { response, success: true }).into_response(),
    Err(e) => (
      StatusCode::INTERNAL_SERVER_ERROR,
      Json(StatelessChatError {
        error: "Failed to get response from Gemini API".into(),
        details: Some(e.to_string()),
      }),
    )
      .into_response(),
  }
}

#[instrument(level = "info", skip(state))]
pub async fn http_stateless_health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
  Json(StatelessHealthOut { status: "ok", api_key_configured: state.chat_configured() })
}

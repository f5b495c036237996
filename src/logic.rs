//! Core behaviors shared by both HTTP and WebSocket handlers.
//!
//! This includes:
//!   - Building lesson and session views (with resolved resource URLs)
//!   - Classifying answers and composing feedback
//!   - Editing, saving and resetting resource URL overrides
//!   - One chatbot turn (history + message -> reply or transcript error entry)

use tracing::{debug, error, info, instrument};

use crate::domain::{AnswerLabel, QuestionCard, ResourceKind};
use crate::error::ApiError;
use crate::gemini::ChatError;
use crate::protocol::{CardOut, ChecklistOut, LessonOut, ResourceOut, SessionView};
use crate::session::{ChatRole, ChatTurn, SessionState, SubmittedAnswer};
use crate::settings::{ResourceUrlOverrides, SettingsError};
use crate::state::AppState;
use crate::util::trunc_for_log;
use crate::video::normalize_video_url;

/// Shown in the transcript for any failed chat call; details go to the log only.
pub const CHAT_FAILED_MESSAGE: &str = "챗봇 응답을 받지 못했어요. 잠시 후 다시 시도해 주세요.";
pub const CHAT_NOT_CONFIGURED_MESSAGE: &str = "챗봇 API 키가 설정되지 않았어요. GOOGLE_API_KEY를 설정해 주세요.";

pub fn card_out(card: &QuestionCard, overrides: &ResourceUrlOverrides) -> CardOut {
  let resources = card
    .resources
    .iter()
    .map(|r| {
      let url = overrides.resolve(&card.id, &r.id, &r.url).to_string();
      let embed_url = (r.kind == ResourceKind::Video).then(|| normalize_video_url(&url));
      ResourceOut {
        id: r.id.clone(),
        title: r.title.clone(),
        kind: r.kind,
        overridden: url != r.url,
        url,
        default_url: r.url.clone(),
        embed_url,
        description: r.description.clone(),
        caption: r.caption.clone(),
      }
    })
    .collect();

  CardOut {
    id: card.id.clone(),
    stage: card.stage.clone(),
    label: card.label.clone(),
    question: card.question.clone(),
    description: card.description.clone(),
    example_answers: card.example_answers.clone(),
    teacher_notes: card.teacher_notes.clone(),
    resources,
  }
}

/// Full lesson with default resource URLs.
pub fn lesson_out(state: &AppState) -> LessonOut {
  let none = ResourceUrlOverrides::default();
  LessonOut {
    title: state.lesson.title.clone(),
    cards: state.lesson.cards.iter().map(|c| card_out(c, &none)).collect(),
    summary: state.lesson.summary.clone(),
  }
}

pub fn session_view(state: &AppState, session: &SessionState) -> SessionView {
  let card = state.current_card(session);
  let checklist = state
    .lesson
    .summary
    .checklist
    .iter()
    .map(|item| ChecklistOut {
      key: item.key.clone(),
      label: item.label.clone(),
      checked: session.checked.contains(&item.key),
    })
    .collect();

  SessionView {
    index: session.selected(),
    card_count: session.card_count(),
    card: card_out(card, &session.overrides),
    show_feedback: session.show_feedback,
    show_resources: session.show_resources,
    answer: session.answers.get(&card.id).cloned(),
    checklist,
    transcript: session.transcript.clone(),
  }
}

#[instrument(level = "info", skip(state, answer), fields(answer_len = answer.len()))]
pub fn classify_answer(state: &AppState, answer: &str) -> (AnswerLabel, String) {
  let label = state.classifier.classify(answer);
  let feedback = state.lesson.feedback.compose(answer, label);
  debug!(target: "lesson", %label, answer = %trunc_for_log(answer, 40), "Answer classified");
  (label, feedback)
}

/// Classify the answer for the selected card, remember it and open the feedback panel.
#[instrument(level = "info", skip(state, session, answer), fields(index = session.selected(), answer_len = answer.len()))]
pub fn submit_answer(state: &AppState, session: &mut SessionState, answer: &str) -> SubmittedAnswer {
  let card_id = state.current_card(session).id.clone();
  let (label, feedback) = classify_answer(state, answer);
  let submitted = SubmittedAnswer { answer: answer.to_string(), label, feedback };
  session.answers.insert(card_id.clone(), submitted.clone());
  session.show_feedback = true;
  info!(target: "lesson", card = %card_id, %label, "Answer submitted");
  submitted
}

pub fn toggle_check(state: &AppState, session: &mut SessionState, key: &str) -> Result<bool, ApiError> {
  if !state.lesson.summary.has_checklist_item(key) {
    return Err(ApiError::bad_request(format!("Unknown checklist item: {key}")));
  }
  Ok(session.toggle_check(key))
}

/// In-memory only; nothing is written until `save_resources`.
#[instrument(level = "info", skip(state, session, url), fields(url_len = url.len()))]
pub fn set_resource_url(
  state: &AppState,
  session: &mut SessionState,
  card_id: &str,
  resource_id: &str,
  url: &str,
) -> Result<(), ApiError> {
  let card = state
    .card(card_id)
    .ok_or_else(|| ApiError::not_found(format!("Unknown card: {card_id}")))?;
  if card.resource(resource_id).is_none() {
    return Err(ApiError::not_found(format!("Unknown resource {resource_id} on card {card_id}")));
  }
  session.overrides.set(card_id, resource_id, url);
  debug!(target: "lesson", overrides = session.overrides.len(), "Resource URL override updated");
  Ok(())
}

/// Writes a session's overrides to the settings file; returns how many were written.
pub async fn save_resources(state: &AppState, overrides: &ResourceUrlOverrides) -> Result<usize, SettingsError> {
  state.settings.save(overrides).await?;
  Ok(overrides.len())
}

/// Clears overrides in memory. The settings file keeps its content until the next save.
pub fn reset_resources(session: &mut SessionState) {
  session.overrides.clear();
  info!(target: "lesson", "Resource URL overrides reset");
}

/// One call to the chat API. Errors are logged with detail and returned as-is.
#[instrument(level = "info", skip(state, history, message), fields(history_len = history.len(), message_len = message.len()))]
pub async fn chat_completion(state: &AppState, history: &[ChatTurn], message: &str) -> Result<String, ChatError> {
  let Some(gemini) = &state.gemini else {
    return Err(ChatError::NotConfigured);
  };
  gemini.generate(history, message).await.map_err(|e| {
    error!(target: "chat", error = %e, "Chat call failed");
    e
  })
}

/// One chat turn as a transcript entry: the model reply, or a generic error entry.
pub async fn chat_reply(state: &AppState, history: &[ChatTurn], message: &str) -> ChatTurn {
  match chat_completion(state, history, message).await {
    Ok(text) => ChatTurn::new(ChatRole::Model, text),
    Err(ChatError::NotConfigured) => ChatTurn::new(ChatRole::Error, CHAT_NOT_CONFIGURED_MESSAGE),
    Err(_) => ChatTurn::new(ChatRole::Error, CHAT_FAILED_MESSAGE),
  }
}

pub fn record_chat(session: &mut SessionState, message: &str, reply: ChatTurn) {
  session.transcript.push(ChatTurn::new(ChatRole::User, message));
  session.transcript.push(reply);
}

pub fn require_message(message: &str) -> Result<&str, ApiError> {
  let trimmed = message.trim();
  if trimmed.is_empty() {
    return Err(ApiError::bad_request("Message is required"));
  }
  Ok(trimmed)
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::config::{AppConfig, ChatConfig, LessonConfig};
  use std::time::Duration;

  fn state_in(dir: &tempfile::TempDir) -> AppState {
    AppState::new(AppConfig {
      port: 0,
      settings_path: dir.path().join("resource_settings.json"),
      lesson: LessonConfig::default(),
      chat: ChatConfig {
        api_key: None,
        base_url: "http://127.0.0.1:9".into(),
        model: "gemini-pro".into(),
        timeout: Duration::from_secs(1),
      },
    })
  }

  #[tokio::test]
  async fn no_settings_file_means_every_resource_uses_its_default() {
    let dir = tempfile::tempdir().unwrap();
    let state = state_in(&dir);
    let session = state.new_session_state().await;
    assert!(session.overrides.is_empty());
    for card in &state.lesson.cards {
      let out = card_out(card, &session.overrides);
      for (r, def) in out.resources.iter().zip(&card.resources) {
        assert_eq!(r.url, def.url);
        assert!(!r.overridden);
      }
    }
  }

  #[tokio::test]
  async fn override_is_visible_in_the_view_and_persisted_only_on_save() {
    let dir = tempfile::tempdir().unwrap();
    let state = state_in(&dir);
    let mut session = state.new_session_state().await;
    session.select(1);

    set_resource_url(&state, &mut session, "reason", "sunlight_angle", "https://example.com/새그림.png").unwrap();
    let view = session_view(&state, &session);
    assert_eq!(view.card.resources[0].url, "https://example.com/새그림.png");
    assert!(view.card.resources[0].overridden);
    assert!(state.settings.load().await.is_empty());

    assert_eq!(save_resources(&state, &session.overrides).await.unwrap(), 1);
    assert_eq!(state.settings.load().await, session.overrides);

    reset_resources(&mut session);
    assert!(session.overrides.is_empty());
    assert_eq!(state.settings.load().await.len(), 1);
  }

  #[tokio::test]
  async fn unknown_card_or_resource_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let state = state_in(&dir);
    let mut session = state.new_session_state().await;
    assert!(matches!(
      set_resource_url(&state, &mut session, "nope", "x", "https://a"),
      Err(ApiError::NotFound(_))
    ));
    assert!(matches!(
      set_resource_url(&state, &mut session, "reason", "x", "https://a"),
      Err(ApiError::NotFound(_))
    ));
    assert!(session.overrides.is_empty());
  }

  #[tokio::test]
  async fn video_resources_carry_an_embed_url() {
    let dir = tempfile::tempdir().unwrap();
    let state = state_in(&dir);
    let mut session = state.new_session_state().await;
    set_resource_url(&state, &mut session, "observe", "orbit_video", "https://www.youtube.com/shorts/abc123XYZ").unwrap();
    let view = session_view(&state, &session);
    let video = &view.card.resources[0];
    assert_eq!(video.embed_url.as_deref(), Some("https://www.youtube.com/embed/abc123XYZ"));
    assert_eq!(video.url, "https://www.youtube.com/shorts/abc123XYZ");
  }

  #[tokio::test]
  async fn submit_answer_stores_feedback_for_the_current_card() {
    let dir = tempfile::tempdir().unwrap();
    let state = state_in(&dir);
    let mut session = state.new_session_state().await;
    let submitted = submit_answer(&state, &mut session, "태양과의 거리 때문에");
    assert_eq!(submitted.label, AnswerLabel::Distance);
    assert!(session.show_feedback);
    let view = session_view(&state, &session);
    assert_eq!(view.answer.unwrap().label, AnswerLabel::Distance);

    session.next();
    assert!(session_view(&state, &session).answer.is_none());
  }

  #[tokio::test]
  async fn checklist_only_accepts_known_keys() {
    let dir = tempfile::tempdir().unwrap();
    let state = state_in(&dir);
    let mut session = state.new_session_state().await;
    assert!(toggle_check(&state, &mut session, "chk_angle").unwrap());
    assert!(toggle_check(&state, &mut session, "nope").is_err());
    let view = session_view(&state, &session);
    assert!(view.checklist.iter().any(|c| c.key == "chk_angle" && c.checked));
  }

  #[tokio::test]
  async fn chat_without_key_records_an_error_entry() {
    let dir = tempfile::tempdir().unwrap();
    let state = state_in(&dir);
    let mut session = state.new_session_state().await;
    let reply = chat_reply(&state, &session.chat_history(), "안녕").await;
    assert_eq!(reply.role, ChatRole::Error);
    record_chat(&mut session, "안녕", reply);
    assert_eq!(session.transcript.len(), 2);
    assert!(session.chat_history().is_empty());
  }

  #[test]
  fn blank_messages_are_rejected() {
    assert!(require_message("  ").is_err());
    assert_eq!(require_message(" 안녕 ").unwrap(), "안녕");
  }
}

//! Minimal Google Generative Language (Gemini) client for the lesson chatbot.
//!
//! One `generateContent` POST per user turn: the full prior history plus the new turn,
//! and an optional persona as the system instruction. No retry, no streaming.
//! Calls log model names, latencies and response sizes (not contents).
//!
//! NOTE: The API key travels as a query parameter; never log request URLs.

use std::time::Instant;

use reqwest::header::{CONTENT_TYPE, USER_AGENT};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{error, info, instrument};

use crate::config::ChatConfig;
use crate::session::{ChatRole, ChatTurn};

#[derive(Debug, Error)]
pub enum ChatError {
  #[error("chat API key is not configured")]
  NotConfigured,
  #[error("request failed: {0}")]
  Transport(#[from] reqwest::Error),
  #[error("Gemini HTTP {status}: {message}")]
  Http { status: u16, message: String },
  #[error("response contained no completion text")]
  MissingText,
}

#[derive(Clone)]
pub struct Gemini {
  client: reqwest::Client,
  api_key: String,
  pub base_url: String,
  pub model: String,
  persona: Option<String>,
}

impl Gemini {
  /// Construct the client if an API key is configured; otherwise return None.
  pub fn from_config(cfg: &ChatConfig, persona: Option<String>) -> Option<Self> {
    let api_key = cfg.api_key.clone()?;
    let client = reqwest::Client::builder().timeout(cfg.timeout).build().ok()?;
    Some(Self {
      client,
      api_key,
      base_url: cfg.base_url.trim_end_matches('/').to_string(),
      model: cfg.model.clone(),
      persona: persona.filter(|p| !p.trim().is_empty()),
    })
  }

  /// Send `history` + `message`; return the model's reply text.
  #[instrument(level = "info", skip(self, history, message), fields(model = %self.model, history_len = history.len(), message_len = message.len()))]
  pub async fn generate(&self, history: &[ChatTurn], message: &str) -> Result<String, ChatError> {
    let url = format!("{}/models/{}:generateContent", self.base_url, self.model);
    let req = build_request(self.persona.as_deref(), history, message);

    let start = Instant::now();
    let res = self
      .client
      .post(&url)
      .query(&[("key", self.api_key.as_str())])
      .header(USER_AGENT, "seasons-backend/0.1")
      .header(CONTENT_TYPE, "application/json")
      .json(&req)
      .send()
      .await
      .map_err(|e| ChatError::Transport(e.without_url()))?;

    if !res.status().is_success() {
      let status = res.status().as_u16();
      let body = res.text().await.unwrap_or_default();
      let message = extract_api_error(&body).unwrap_or(body);
      error!(target: "chat", status, elapsed = ?start.elapsed(), "Gemini returned an error status");
      return Err(ChatError::Http { status, message });
    }

    let body: GenerateResponse = res.json().await.map_err(|e| ChatError::Transport(e.without_url()))?;
    if let Some(usage) = &body.usage_metadata {
      info!(target: "chat", prompt_tokens = ?usage.prompt_token_count, completion_tokens = ?usage.candidates_token_count, total_tokens = ?usage.total_token_count, "Gemini usage");
    }
    let text = completion_text(&body).ok_or(ChatError::MissingText)?;
    info!(target: "chat", elapsed = ?start.elapsed(), reply_len = text.len(), "Gemini reply received");
    Ok(text)
  }
}

fn build_request(persona: Option<&str>, history: &[ChatTurn], message: &str) -> GenerateRequest {
  let mut contents: Vec<Content> = history
    .iter()
    .filter_map(|turn| {
      let role = match turn.role {
        ChatRole::User => "user",
        ChatRole::Model => "model",
        ChatRole::Error => return None,
      };
      Some(Content { role: Some(role.into()), parts: vec![Part { text: turn.text.clone() }] })
    })
    .collect();
  contents.push(Content { role: Some("user".into()), parts: vec![Part { text: message.into() }] });

  GenerateRequest {
    contents,
    system_instruction: persona.map(|p| Content { role: None, parts: vec![Part { text: p.into() }] }),
  }
}

/// Concatenated text parts of the first candidate; None if there is no non-empty text.
fn completion_text(body: &GenerateResponse) -> Option<String> {
  let content = body.candidates.first()?.content.as_ref()?;
  let text: String = content.parts.iter().filter_map(|p| p.text.as_deref()).collect();
  let text = text.trim();
  if text.is_empty() { None } else { Some(text.to_string()) }
}

// --- Wire DTOs ---

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest {
  contents: Vec<Content>,
  #[serde(skip_serializing_if = "Option::is_none")]
  system_instruction: Option<Content>,
}
#[derive(Serialize)]
struct Content {
  #[serde(skip_serializing_if = "Option::is_none")]
  role: Option<String>,
  parts: Vec<Part>,
}
#[derive(Serialize)]
struct Part { text: String }

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateResponse {
  #[serde(default)] candidates: Vec<Candidate>,
  #[serde(default)] usage_metadata: Option<UsageMetadata>,
}
#[derive(Deserialize)]
struct Candidate { #[serde(default)] content: Option<CandidateContent> }
#[derive(Deserialize)]
struct CandidateContent { #[serde(default)] parts: Vec<PartResp> }
#[derive(Deserialize)]
struct PartResp { #[serde(default)] text: Option<String> }
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct UsageMetadata {
  #[serde(default)] prompt_token_count: Option<u32>,
  #[serde(default)] candidates_token_count: Option<u32>,
  #[serde(default)] total_token_count: Option<u32>,
}

/// Try to extract a clean error message from a Google API error body.
fn extract_api_error(body: &str) -> Option<String> {
  #[derive(Deserialize)]
  struct EWrap { error: EObj }
  #[derive(Deserialize)]
  struct EObj { message: String }
  serde_json::from_str::<EWrap>(body).ok().map(|w| w.error.message)
}

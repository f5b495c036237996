//! Runtime configuration from environment variables, plus optional lesson content from TOML.
//!
//! See `LessonConfig` for the TOML schema. Any section left out of the file falls
//! back to the built-in content in `seeds`.

use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;
use tracing::{error, info, warn};

use crate::domain::{LessonSummary, QuestionCard};
use crate::feedback::FeedbackTemplates;
use crate::seeds::{seed_cards, seed_summary, LESSON_TITLE};

pub const DEFAULT_SETTINGS_PATH: &str = "resource_settings.json";
pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-pro";
/// Value shipped in the sample .env; treated as "no key".
pub const PLACEHOLDER_API_KEY: &str = "your_google_api_key_here";

#[derive(Clone, Debug)]
pub struct ChatConfig {
  pub api_key: Option<String>,
  pub base_url: String,
  pub model: String,
  pub timeout: Duration,
}

impl ChatConfig {
  pub fn from_env() -> Self {
    let api_key = std::env::var("GOOGLE_API_KEY")
      .ok()
      .map(|k| k.trim().to_string())
      .filter(|k| !k.is_empty() && k != PLACEHOLDER_API_KEY);
    let base_url =
      std::env::var("GEMINI_BASE_URL").unwrap_or_else(|_| DEFAULT_GEMINI_BASE_URL.into());
    let model = std::env::var("GEMINI_MODEL").unwrap_or_else(|_| DEFAULT_GEMINI_MODEL.into());
    let timeout = std::env::var("GEMINI_TIMEOUT_SECS")
      .ok()
      .and_then(|s| s.parse::<u64>().ok())
      .map(Duration::from_secs)
      .unwrap_or(Duration::from_secs(30));
    Self { api_key, base_url, model, timeout }
  }
}

#[derive(Clone, Debug)]
pub struct AppConfig {
  pub port: u16,
  pub settings_path: PathBuf,
  pub lesson: LessonConfig,
  pub chat: ChatConfig,
}

impl AppConfig {
  pub fn from_env() -> Self {
    let port = std::env::var("PORT")
      .ok()
      .and_then(|p| p.parse::<u16>().ok())
      .unwrap_or(3000);
    let settings_path = std::env::var("SETTINGS_PATH")
      .map(PathBuf::from)
      .unwrap_or_else(|_| PathBuf::from(DEFAULT_SETTINGS_PATH));
    let lesson = load_lesson_config_from_env().unwrap_or_default();
    Self { port, settings_path, lesson, chat: ChatConfig::from_env() }
  }
}

/// Lesson content accepted in TOML.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct LessonConfig {
  pub title: String,
  pub cards: Vec<QuestionCard>,
  pub summary: LessonSummary,
  pub feedback: FeedbackTemplates,
  pub chat: ChatPrompts,
}

impl Default for LessonConfig {
  fn default() -> Self {
    Self {
      title: LESSON_TITLE.into(),
      cards: seed_cards(),
      summary: seed_summary(),
      feedback: FeedbackTemplates::default(),
      chat: ChatPrompts::default(),
    }
  }
}

/// Optional persona sent as the system instruction of every chat request.
#[derive(Clone, Debug, Deserialize, Default)]
pub struct ChatPrompts {
  #[serde(default)] pub persona: Option<String>,
}

impl LessonConfig {
  /// Parse TOML content. An empty card list is replaced by the built-in cards so the
  /// selected-card index always has something to point at.
  pub fn from_toml(s: &str) -> Result<Self, toml::de::Error> {
    let mut cfg: LessonConfig = toml::from_str(s)?;
    if cfg.cards.is_empty() {
      warn!(target: "seasons_backend", "Lesson config has no cards; using built-in cards");
      cfg.cards = seed_cards();
    }
    Ok(cfg)
  }
}

/// Attempt to load `LessonConfig` from LESSON_CONFIG_PATH. On any parsing/IO error, returns None.
pub fn load_lesson_config_from_env() -> Option<LessonConfig> {
  let path = std::env::var("LESSON_CONFIG_PATH").ok()?;
  match std::fs::read_to_string(&path) {
    Ok(s) => match LessonConfig::from_toml(&s) {
      Ok(cfg) => {
        info!(target: "seasons_backend", %path, cards = cfg.cards.len(), "Loaded lesson config (TOML)");
        Some(cfg)
      }
      Err(e) => {
        error!(target: "seasons_backend", %path, error = %e, "Failed to parse TOML lesson config");
        None
      }
    },
    Err(e) => {
      error!(target: "seasons_backend", %path, error = %e, "Failed to read TOML lesson config file");
      None
    }
  }
}

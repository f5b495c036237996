//! Domain models: lesson cards, their external resources, answer labels and the summary sheet.

use serde::{Deserialize, Serialize};

/// Classification label assigned to a free-text student answer.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum AnswerLabel {
  Empty,
  Distance,
  Tilt,
  Angle,
  Daylength,
  Other,
}

impl AnswerLabel {
  pub fn as_str(&self) -> &'static str {
    match self {
      AnswerLabel::Empty => "empty",
      AnswerLabel::Distance => "distance",
      AnswerLabel::Tilt => "tilt",
      AnswerLabel::Angle => "angle",
      AnswerLabel::Daylength => "daylength",
      AnswerLabel::Other => "other",
    }
  }
}

impl std::fmt::Display for AnswerLabel {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.write_str(self.as_str())
  }
}

/// How a resource is rendered. Unknown tags in TOML fall back to a plain link.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
  Image,
  Video,
  #[default]
  #[serde(other)]
  Link,
}

/// External media reference attached to a card.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Resource {
  pub id: String,
  pub title: String,
  #[serde(default)] pub kind: ResourceKind,
  /// Default URL; sessions may override it.
  pub url: String,
  #[serde(default)] pub description: Option<String>,
  #[serde(default)] pub caption: Option<String>,
}

/// One question-and-feedback unit of the lesson flow.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct QuestionCard {
  pub id: String,
  /// Pedagogical stage, e.g. "observe", "reason", "verify", "summary".
  pub stage: String,
  pub label: String,
  pub question: String,
  #[serde(default)] pub description: String,
  /// Display-only; never used for grading.
  #[serde(default)] pub example_answers: Vec<String>,
  #[serde(default)] pub resources: Vec<Resource>,
  #[serde(default)] pub teacher_notes: Vec<String>,
}

impl QuestionCard {
  pub fn resource(&self, resource_id: &str) -> Option<&Resource> {
    self.resources.iter().find(|r| r.id == resource_id)
  }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ChecklistItem {
  pub key: String,
  pub label: String,
}

/// One-page wrap-up shown at the end of the lesson.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LessonSummary {
  pub title: String,
  #[serde(default)] pub points: Vec<String>,
  #[serde(default)] pub checklist: Vec<ChecklistItem>,
  #[serde(default)] pub teacher_tips: Vec<String>,
}

impl LessonSummary {
  pub fn has_checklist_item(&self, key: &str) -> bool {
    self.checklist.iter().any(|c| c.key == key)
  }
}

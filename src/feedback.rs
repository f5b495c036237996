//! Feedback composer: turns a classification label into a teacher feedback suggestion.

use serde::{Deserialize, Serialize};

use crate::domain::AnswerLabel;
use crate::util::fill_template;

/// Fixed paragraphs and the closing follow-up question for one label.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FeedbackTemplate {
  pub paragraphs: Vec<String>,
  pub follow_up: String,
}

/// Feedback text for every label. Missing fields in TOML fall back to built-in text.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedbackTemplates {
  /// Opening sentence for non-empty answers; `{answer}` is replaced by the answer.
  pub acknowledge: String,
  /// Opening sentence when nothing was written.
  pub empty_prompt: String,
  pub empty: FeedbackTemplate,
  pub distance: FeedbackTemplate,
  pub tilt: FeedbackTemplate,
  pub angle: FeedbackTemplate,
  pub daylength: FeedbackTemplate,
  pub other: FeedbackTemplate,
}

impl Default for FeedbackTemplates {
  fn default() -> Self {
    crate::seeds::seed_feedback_templates()
  }
}

impl FeedbackTemplates {
  pub fn template(&self, label: AnswerLabel) -> &FeedbackTemplate {
    match label {
      AnswerLabel::Empty => &self.empty,
      AnswerLabel::Distance => &self.distance,
      AnswerLabel::Tilt => &self.tilt,
      AnswerLabel::Angle => &self.angle,
      AnswerLabel::Daylength => &self.daylength,
      AnswerLabel::Other => &self.other,
    }
  }

  /// Opening paragraph, then the label's paragraphs, then its follow-up question.
  /// Paragraphs are separated by a blank line. The answer is echoed as-is (trimmed).
  pub fn compose(&self, answer: &str, label: AnswerLabel) -> String {
    let opening = if label == AnswerLabel::Empty {
      self.empty_prompt.clone()
    } else {
      fill_template(&self.acknowledge, &[("answer", answer.trim())])
    };

    let tpl = self.template(label);
    let mut parts = Vec::with_capacity(tpl.paragraphs.len() + 2);
    parts.push(opening.as_str());
    parts.extend(tpl.paragraphs.iter().map(String::as_str));
    parts.push(tpl.follow_up.as_str());
    parts.join("\n\n")
  }
}

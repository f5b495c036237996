//! Keyword classifier for free-text student answers.
//!
//! Answers are normalized (whitespace removed, lower-cased) and tested for substring
//! containment against an ordered list of keyword rules. The first rule with a hit
//! decides the label; that order is the tie-break policy for mixed answers.

use crate::domain::AnswerLabel;
use crate::seeds::KEYWORD_RULES;
use crate::util::normalize;

#[derive(Clone, Debug)]
pub struct KeywordRule {
  pub label: AnswerLabel,
  keywords: Vec<String>,
}

impl KeywordRule {
  pub fn new<S: AsRef<str>>(label: AnswerLabel, keywords: &[S]) -> Self {
    let keywords = keywords
      .iter()
      .map(|k| normalize(k.as_ref()))
      .filter(|k| !k.is_empty())
      .collect();
    Self { label, keywords }
  }

  fn matches(&self, normalized: &str) -> bool {
    self.keywords.iter().any(|k| normalized.contains(k.as_str()))
  }
}

#[derive(Clone, Debug)]
pub struct Classifier {
  rules: Vec<KeywordRule>,
}

impl Default for Classifier {
  fn default() -> Self {
    Self::new(
      KEYWORD_RULES
        .iter()
        .map(|(label, words)| KeywordRule::new(*label, words))
        .collect(),
    )
  }
}

impl Classifier {
  pub fn new(rules: Vec<KeywordRule>) -> Self {
    Self { rules }
  }

  /// Exactly one label per answer. Blank input is `Empty`, never `Other`.
  pub fn classify(&self, answer: &str) -> AnswerLabel {
    let normalized = normalize(answer);
    if normalized.is_empty() {
      return AnswerLabel::Empty;
    }
    self
      .rules
      .iter()
      .find(|rule| rule.matches(&normalized))
      .map(|rule| rule.label)
      .unwrap_or(AnswerLabel::Other)
  }
}

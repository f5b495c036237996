//! Per-session display state: selected card, panel toggles, checklist, resource
//! overrides and the chat transcript. Each handler receives it by reference.

use std::collections::{BTreeSet, HashMap};
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

use crate::domain::AnswerLabel;
use crate::settings::ResourceUrlOverrides;

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Panel {
  Feedback,
  Resources,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ChatRole {
  User,
  Model,
  /// Shown in the transcript, never sent back to the model.
  Error,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ChatTurn {
  pub role: ChatRole,
  pub text: String,
}

impl ChatTurn {
  pub fn new(role: ChatRole, text: impl Into<String>) -> Self {
    Self { role, text: text.into() }
  }
}

/// Last answer submitted for a card and the label it received.
#[derive(Clone, Debug, Serialize)]
pub struct SubmittedAnswer {
  pub answer: String,
  pub label: AnswerLabel,
  pub feedback: String,
}

#[derive(Clone, Debug)]
pub struct SessionState {
  card_count: usize,
  selected: usize,
  pub show_feedback: bool,
  pub show_resources: bool,
  pub overrides: ResourceUrlOverrides,
  pub answers: HashMap<String, SubmittedAnswer>,
  pub checked: BTreeSet<String>,
  pub transcript: Vec<ChatTurn>,
  last_active: Instant,
}

impl SessionState {
  pub fn new(card_count: usize, overrides: ResourceUrlOverrides) -> Self {
    Self {
      card_count,
      selected: 0,
      show_feedback: false,
      show_resources: false,
      overrides,
      answers: HashMap::new(),
      checked: BTreeSet::new(),
      transcript: Vec::new(),
      last_active: Instant::now(),
    }
  }

  /// Mark the session as used now.
  pub fn touch(&mut self) {
    self.last_active = Instant::now();
  }

  pub fn idle_for(&self) -> Duration {
    self.last_active.elapsed()
  }

  pub fn selected(&self) -> usize {
    self.selected
  }

  pub fn card_count(&self) -> usize {
    self.card_count
  }

  pub fn next(&mut self) {
    if self.card_count > 0 {
      self.selected = (self.selected + 1) % self.card_count;
      self.hide_panels();
    }
  }

  pub fn prev(&mut self) {
    if self.card_count > 0 {
      self.selected = (self.selected + self.card_count - 1) % self.card_count;
      self.hide_panels();
    }
  }

  /// Returns false (and changes nothing) when `index` is out of range.
  pub fn select(&mut self, index: usize) -> bool {
    if index >= self.card_count {
      return false;
    }
    if index != self.selected {
      self.selected = index;
      self.hide_panels();
    }
    true
  }

  /// Flip a panel flag and return its new value.
  pub fn toggle(&mut self, panel: Panel) -> bool {
    let flag = match panel {
      Panel::Feedback => &mut self.show_feedback,
      Panel::Resources => &mut self.show_resources,
    };
    *flag = !*flag;
    *flag
  }

  /// Flip a checklist item and return whether it is now checked.
  pub fn toggle_check(&mut self, key: &str) -> bool {
    if self.checked.remove(key) {
      false
    } else {
      self.checked.insert(key.to_string());
      true
    }
  }

  /// History sent to the model: error entries and the user turns that failed are skipped.
  pub fn chat_history(&self) -> Vec<ChatTurn> {
    let mut out = Vec::with_capacity(self.transcript.len());
    let mut turns = self.transcript.iter().peekable();
    while let Some(turn) = turns.next() {
      match turn.role {
        ChatRole::Error => {}
        ChatRole::User if matches!(turns.peek(), Some(t) if t.role == ChatRole::Error) => {}
        _ => out.push(turn.clone()),
      }
    }
    out
  }

  fn hide_panels(&mut self) {
    self.show_feedback = false;
    self.show_resources = false;
  }
}

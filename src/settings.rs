//! Resource URL overrides and the JSON settings file they persist to.
//!
//! File shape: `{"resource_urls": {"<card id>": {"<resource id>": "<url>"}}}`.
//! Loading never fails (missing or malformed files yield an empty mapping); saving
//! writes pretty-printed UTF-8 JSON in place, with no temp file and no locking.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, instrument, warn};

#[derive(Debug, Error)]
pub enum SettingsError {
  #[error("failed to write settings file {path}: {source}")]
  Io {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },
  #[error("failed to serialize settings: {0}")]
  Serialize(#[from] serde_json::Error),
}

/// card id -> (resource id -> override URL)
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResourceUrlOverrides(BTreeMap<String, BTreeMap<String, String>>);

impl ResourceUrlOverrides {
  pub fn is_empty(&self) -> bool {
    self.0.values().all(BTreeMap::is_empty)
  }

  pub fn get(&self, card_id: &str, resource_id: &str) -> Option<&str> {
    self.0.get(card_id)?.get(resource_id).map(String::as_str)
  }

  /// Effective URL: the override for this exact (card, resource) pair, else `default`.
  pub fn resolve<'a>(&'a self, card_id: &str, resource_id: &str, default: &'a str) -> &'a str {
    self.get(card_id, resource_id).unwrap_or(default)
  }

  /// In-memory only. A blank URL removes the override.
  pub fn set(&mut self, card_id: &str, resource_id: &str, url: &str) {
    let url = url.trim();
    if url.is_empty() {
      self.remove(card_id, resource_id);
      return;
    }
    self
      .0
      .entry(card_id.to_string())
      .or_default()
      .insert(resource_id.to_string(), url.to_string());
  }

  pub fn remove(&mut self, card_id: &str, resource_id: &str) {
    if let Some(card) = self.0.get_mut(card_id) {
      card.remove(resource_id);
      if card.is_empty() {
        self.0.remove(card_id);
      }
    }
  }

  /// In-memory only.
  pub fn clear(&mut self) {
    self.0.clear();
  }

  pub fn len(&self) -> usize {
    self.0.values().map(BTreeMap::len).sum()
  }
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct SettingsFile {
  #[serde(default)]
  resource_urls: ResourceUrlOverrides,
}

/// Reads and writes the settings file at a fixed path.
#[derive(Clone, Debug)]
pub struct SettingsStore {
  path: PathBuf,
}

impl SettingsStore {
  pub fn new(path: impl Into<PathBuf>) -> Self {
    Self { path: path.into() }
  }

  pub fn path(&self) -> &Path {
    &self.path
  }

  /// Absent, unreadable or malformed files all yield an empty mapping.
  #[instrument(level = "debug", skip(self), fields(path = %self.path.display()))]
  pub async fn load(&self) -> ResourceUrlOverrides {
    let raw = match tokio::fs::read_to_string(&self.path).await {
      Ok(s) => s,
      Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
        debug!(target: "settings", "No settings file; starting with no overrides");
        return ResourceUrlOverrides::default();
      }
      Err(e) => {
        warn!(target: "settings", error = %e, "Failed to read settings file; ignoring it");
        return ResourceUrlOverrides::default();
      }
    };

    match serde_json::from_str::<SettingsFile>(&raw) {
      Ok(file) => {
        debug!(target: "settings", overrides = file.resource_urls.len(), "Loaded settings");
        file.resource_urls
      }
      Err(e) => {
        warn!(target: "settings", error = %e, "Malformed settings file; ignoring it");
        ResourceUrlOverrides::default()
      }
    }
  }

  /// Overwrites the file with the given mapping.
  #[instrument(level = "info", skip(self, overrides), fields(path = %self.path.display(), overrides = overrides.len()))]
  pub async fn save(&self, overrides: &ResourceUrlOverrides) -> Result<(), SettingsError> {
    let file = SettingsFile { resource_urls: overrides.clone() };
    let json = serde_json::to_string_pretty(&file)?;
    tokio::fs::write(&self.path, json).await.map_err(|source| SettingsError::Io {
      path: self.path.clone(),
      source,
    })?;
    info!(target: "settings", "Settings saved");
    Ok(())
  }
}

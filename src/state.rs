//! Application state: lesson content, classifier, settings store, live sessions and
//! the optional Gemini client.
//!
//! Sessions are private to one client. HTTP clients address theirs by id; a WebSocket
//! connection owns its session directly and never touches the shared map.

use std::{collections::HashMap, sync::Arc, time::Duration};
use tokio::sync::RwLock;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::classify::Classifier;
use crate::config::AppConfig;
use crate::domain::QuestionCard;
use crate::gemini::Gemini;
use crate::seeds::seed_cards;
use crate::session::SessionState;
use crate::settings::SettingsStore;

/// HTTP sessions unused for this long are dropped the next time a session is created.
pub const SESSION_IDLE_TIMEOUT: Duration = Duration::from_secs(2 * 60 * 60);

#[derive(Clone)]
pub struct AppState {
    pub lesson: Arc<crate::config::LessonConfig>,
    pub classifier: Classifier,
    pub settings: SettingsStore,
    pub sessions: Arc<RwLock<HashMap<String, SessionState>>>,
    pub gemini: Option<Gemini>,
    pub session_idle_timeout: Duration,
}

impl AppState {
    /// Build state from runtime config: lesson content, settings store and chat client.
    #[instrument(level = "info", skip_all)]
    pub fn new(cfg: AppConfig) -> Self {
        let mut lesson = cfg.lesson;
        if lesson.cards.is_empty() {
            warn!(target: "lesson", "No cards configured; using built-in cards");
            lesson.cards = seed_cards();
        }

        let resources: usize = lesson.cards.iter().map(|c| c.resources.len()).sum();
        info!(target: "lesson", title = %lesson.title, cards = lesson.cards.len(), resources, checklist = lesson.summary.checklist.len(), "Lesson content ready");

        let gemini = Gemini::from_config(&cfg.chat, lesson.chat.persona.clone());
        if let Some(g) = &gemini {
            info!(target: "seasons_backend", base_url = %g.base_url, model = %g.model, "Chatbot enabled.");
        } else {
            info!(target: "seasons_backend", "Chatbot disabled (no GOOGLE_API_KEY).");
        }

        let settings = SettingsStore::new(cfg.settings_path);
        info!(target: "settings", path = %settings.path().display(), "Settings file location");

        Self {
            lesson: Arc::new(lesson),
            classifier: Classifier::default(),
            settings,
            sessions: Arc::new(RwLock::new(HashMap::new())),
            gemini,
            session_idle_timeout: SESSION_IDLE_TIMEOUT,
        }
    }

    /// Fresh session state with overrides loaded from the settings file.
    pub async fn new_session_state(&self) -> SessionState {
        SessionState::new(self.lesson.cards.len(), self.settings.load().await)
    }

    /// Register a new session and return its id. Idle sessions are swept first.
    #[instrument(level = "info", skip(self))]
    pub async fn create_session(&self) -> String {
        let id = Uuid::new_v4().to_string();
        let session = self.new_session_state().await;
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, s| s.idle_for() < self.session_idle_timeout);
        if sessions.len() < before {
            info!(target: "lesson", dropped = before - sessions.len(), "Idle sessions removed");
        }
        sessions.insert(id.clone(), session);
        info!(target: "lesson", session_id = %id, live = sessions.len(), "Session created");
        id
    }

    #[instrument(level = "info", skip(self))]
    pub async fn end_session(&self, id: &str) -> bool {
        self.sessions.write().await.remove(id).is_some()
    }

    /// Run `f` against one session under the write lock. None if the id is unknown.
    pub async fn with_session<R>(&self, id: &str, f: impl FnOnce(&mut SessionState) -> R) -> Option<R> {
        let mut sessions = self.sessions.write().await;
        sessions.get_mut(id).map(|s| {
            s.touch();
            f(s)
        })
    }

    pub fn card(&self, card_id: &str) -> Option<&QuestionCard> {
        self.lesson.cards.iter().find(|c| c.id == card_id)
    }

    /// Card at the session's selected index. The index is always < card count,
    /// and the card list is never empty.
    pub fn current_card(&self, session: &SessionState) -> &QuestionCard {
        &self.lesson.cards[session.selected()]
    }

    pub fn chat_configured(&self) -> bool {
        self.gemini.is_some()
    }
}

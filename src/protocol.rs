//! Public protocol structs for WebSocket and HTTP endpoints (serde ready).

use serde::{Deserialize, Serialize};

use crate::domain::{AnswerLabel, LessonSummary, ResourceKind};
use crate::session::{ChatTurn, Panel, SubmittedAnswer};

/// Messages the client can send over WebSocket. One session per connection.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientWsMessage {
    Ping,
    View,
    Next,
    Prev,
    Select {
        index: usize,
    },
    Toggle {
        panel: Panel,
    },
    Check {
        key: String,
    },
    SubmitAnswer {
        answer: String,
    },
    Classify {
        answer: String,
    },
    SetResourceUrl {
        #[serde(rename = "cardId")]
        card_id: String,
        #[serde(rename = "resourceId")]
        resource_id: String,
        url: String,
    },
    SaveResources,
    ResetResources,
    Chat {
        message: String,
    },
    NormalizeVideo {
        url: String,
    },
}

/// Messages the server sends back over WebSocket.
#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerWsMessage {
    Pong,
    Session {
        session: SessionView,
    },
    Classification {
        label: AnswerLabel,
        feedback: String,
    },
    Saved {
        overrides: usize,
    },
    ChatReply {
        reply: ChatTurn,
    },
    Normalized {
        url: String,
    },
    Error {
        message: String,
    },
}

/// Resource with the session's effective URL.
#[derive(Debug, Serialize)]
pub struct ResourceOut {
    pub id: String,
    pub title: String,
    pub kind: ResourceKind,
    pub url: String,
    pub default_url: String,
    pub overridden: bool,
    /// Canonical embed URL for video resources.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub embed_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CardOut {
    pub id: String,
    pub stage: String,
    pub label: String,
    pub question: String,
    pub description: String,
    pub example_answers: Vec<String>,
    pub teacher_notes: Vec<String>,
    pub resources: Vec<ResourceOut>,
}

#[derive(Debug, Serialize)]
pub struct LessonOut {
    pub title: String,
    pub cards: Vec<CardOut>,
    pub summary: LessonSummary,
}

#[derive(Debug, Serialize)]
pub struct ChecklistOut {
    pub key: String,
    pub label: String,
    pub checked: bool,
}

/// Everything a page needs to render one session.
#[derive(Debug, Serialize)]
pub struct SessionView {
    pub index: usize,
    pub card_count: usize,
    pub card: CardOut,
    pub show_feedback: bool,
    pub show_resources: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub answer: Option<SubmittedAnswer>,
    pub checklist: Vec<ChecklistOut>,
    pub transcript: Vec<ChatTurn>,
}

//
// HTTP request/response DTOs
//

#[derive(Debug, Serialize)]
pub struct SessionCreatedOut {
    pub session_id: String,
    pub session: SessionView,
}

#[derive(Debug, Deserialize)]
pub struct ClassifyIn {
    #[serde(default)]
    pub answer: String,
}
#[derive(Debug, Serialize)]
pub struct ClassifyOut {
    pub label: AnswerLabel,
    pub feedback: String,
}

#[derive(Debug, Deserialize)]
pub struct NormalizeIn {
    pub url: String,
}
#[derive(Debug, Serialize)]
pub struct NormalizeOut {
    pub url: String,
}

#[derive(Debug, Deserialize)]
pub struct SelectIn {
    pub index: usize,
}

#[derive(Debug, Deserialize)]
pub struct ToggleIn {
    pub panel: Panel,
}

#[derive(Debug, Deserialize)]
pub struct CheckIn {
    pub key: String,
}

#[derive(Debug, Deserialize)]
pub struct AnswerIn {
    #[serde(default)]
    pub answer: String,
}

#[derive(Debug, Deserialize)]
pub struct SetResourceIn {
    #[serde(rename = "cardId")]
    pub card_id: String,
    #[serde(rename = "resourceId")]
    pub resource_id: String,
    pub url: String,
}

#[derive(Debug, Serialize)]
pub struct SavedOut {
    pub saved: bool,
    pub overrides: usize,
}

#[derive(Debug, Deserialize)]
pub struct ChatIn {
    pub message: String,
}
#[derive(Debug, Serialize)]
pub struct ChatOut {
    pub reply: ChatTurn,
    pub transcript: Vec<ChatTurn>,
}

#[derive(Debug, Serialize)]
pub struct HealthOut {
    pub ok: bool,
    pub chat_configured: bool,
}

//
// Stateless chat endpoint: the client owns the history.
//

#[derive(Debug, Deserialize)]
pub struct HistoryMsg {
    pub role: String,
    #[serde(default)]
    pub content: String,
}

#[derive(Debug, Deserialize)]
pub struct StatelessChatIn {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub history: Vec<HistoryMsg>,
}
#[derive(Debug, Serialize)]
pub struct StatelessChatOut {
    pub response: String,
    pub success: bool,
}
#[derive(Debug, Serialize)]
pub struct StatelessChatError {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatelessHealthOut {
    pub status: &'static str,
    pub api_key_configured: bool,
}

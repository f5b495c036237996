//! Seasons lesson backend: classroom support for a lesson on why seasons happen.
//!
//! Serves question cards with per-session resource URL overrides, keyword-based answer
//! feedback, and a pass-through chatbot backed by the Gemini API.

pub mod classify;
pub mod config;
pub mod domain;
pub mod error;
pub mod feedback;
pub mod gemini;
pub mod logic;
pub mod protocol;
pub mod routes;
pub mod seeds;
pub mod session;
pub mod settings;
pub mod state;
pub mod telemetry;
pub mod util;
pub mod video;

//! HTTP-facing error type. Handlers return `Result<Json<_>, ApiError>`.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

use crate::settings::SettingsError;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
  pub success: bool,
  pub error: String,
  pub code: &'static str,
}

#[derive(Debug, Error)]
pub enum ApiError {
  #[error("{0}")]
  NotFound(String),
  #[error("{0}")]
  BadRequest(String),
  #[error(transparent)]
  Settings(#[from] SettingsError),
}

impl ApiError {
  pub fn not_found(message: impl Into<String>) -> Self {
    ApiError::NotFound(message.into())
  }

  pub fn bad_request(message: impl Into<String>) -> Self {
    ApiError::BadRequest(message.into())
  }

  fn status(&self) -> StatusCode {
    match self {
      ApiError::NotFound(_) => StatusCode::NOT_FOUND,
      ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
      ApiError::Settings(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
  }

  fn code(&self) -> &'static str {
    match self {
      ApiError::NotFound(_) => "NOT_FOUND",
      ApiError::BadRequest(_) => "BAD_REQUEST",
      ApiError::Settings(_) => "SETTINGS_WRITE_FAILED",
    }
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    if let ApiError::Settings(e) = &self {
      tracing::error!(target: "settings", error = %e, "Settings write failed");
    }
    let body = ErrorResponse { success: false, error: self.to_string(), code: self.code() };
    (self.status(), Json(body)).into_response()
  }
}

//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  Json,
  extract::rejection::JsonRejection,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use rolodex_core::request::ValidationErrors;
use serde_json::json;
use thiserror::Error;

/// Fixed body for server-side failures; causes stay in the log.
pub const INTERNAL_MESSAGE: &str = "An internal error occurred while processing your request.";

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("not found: {0}")]
  NotFound(String),

  #[error("bad request: {0}")]
  BadRequest(String),

  #[error("validation failed: {0}")]
  Validation(ValidationErrors),

  #[error("internal error")]
  Internal,
}

impl From<rolodex_core::Error> for ApiError {
  fn from(err: rolodex_core::Error) -> Self {
    use rolodex_core::Error;
    match err {
      Error::Validation(errors) => ApiError::Validation(errors),
      Error::ContactNotFound(id) => ApiError::NotFound(format!("contact {id} not found")),
      Error::Internal { .. } => ApiError::Internal,
    }
  }
}

impl From<JsonRejection> for ApiError {
  fn from(rejection: JsonRejection) -> Self { ApiError::BadRequest(rejection.body_text()) }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    match self {
      ApiError::NotFound(m) => (StatusCode::NOT_FOUND, Json(json!({ "error": m }))).into_response(),
      ApiError::BadRequest(m) => {
        (StatusCode::BAD_REQUEST, Json(json!({ "error": m }))).into_response()
      }
      ApiError::Validation(errors) => (
        StatusCode::BAD_REQUEST,
        Json(json!({ "error": "validation failed", "fields": errors })),
      )
        .into_response(),
      ApiError::Internal => (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "error": INTERNAL_MESSAGE })),
      )
        .into_response(),
    }
  }
}

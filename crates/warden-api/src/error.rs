//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;
use warden_core::validation::{ValidationErrors, ValidationReport};

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("bad request: {0}")]
  BadRequest(String),

  /// The body did not decode into a record of the expected entity.
  #[error("malformed record: {0}")]
  Record(#[from] warden_core::Error),

  #[error("validation failed: {0}")]
  Invalid(#[from] ValidationErrors),
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    match self {
      ApiError::BadRequest(m) => {
        (StatusCode::BAD_REQUEST, Json(json!({ "error": m }))).into_response()
      }
      ApiError::Record(e) => {
        (StatusCode::BAD_REQUEST, Json(json!({ "error": e.to_string() })))
          .into_response()
      }
      ApiError::Invalid(errors) => (
        StatusCode::UNPROCESSABLE_ENTITY,
        Json(ValidationReport::<()>::from(Err(errors))),
      )
        .into_response(),
    }
  }
}

//! Dispatcher error type and its mapping onto [`CarResponse`].

use axum::{
  http::StatusCode,
  response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::request::CarResponse;

/// Message returned for any method outside the supported set.
pub const INVALID_METHOD: &str = "Invalid HTTP method";

/// An error raised while dispatching a request.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("not found: {0}")]
  NotFound(String),

  /// The body is not valid JSON for a car.
  #[error("bad request: {0}")]
  BadRequest(String),

  /// The body parsed but a required field is missing.
  #[error("validation error: {0}")]
  Validation(String),

  #[error("Invalid HTTP method")]
  InvalidMethod,

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl ApiError {
  pub fn status(&self) -> StatusCode {
    match self {
      ApiError::NotFound(_) => StatusCode::NOT_FOUND,
      ApiError::BadRequest(_) | ApiError::Validation(_) => StatusCode::BAD_REQUEST,
      ApiError::InvalidMethod => StatusCode::METHOD_NOT_ALLOWED,
      ApiError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
  }
}

impl From<fleet_core::Error> for ApiError {
  fn from(e: fleet_core::Error) -> Self {
    match e {
      fleet_core::Error::Validation(m) => ApiError::Validation(m),
      fleet_core::Error::Serialization(e) => ApiError::BadRequest(e.to_string()),
    }
  }
}

impl From<ApiError> for CarResponse {
  fn from(e: ApiError) -> Self {
    let message = match &e {
      ApiError::NotFound(m) | ApiError::BadRequest(m) | ApiError::Validation(m) => m.clone(),
      ApiError::InvalidMethod => INVALID_METHOD.to_owned(),
      ApiError::Store(e) => e.to_string(),
    };
    match &e {
      ApiError::Store(_) => tracing::error!(error = %e, "request failed"),
      _ => tracing::warn!(error = %e, "request rejected"),
    }
    CarResponse::new(e.status(), json!({ "error": message }))
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response { CarResponse::from(self).into_response() }
}

//! The gateway-shaped request and response the dispatcher speaks.

use std::collections::HashMap;

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// An inbound request: method, path and an optional JSON-encoded body.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CarRequest {
  pub http_method:     String,
  #[serde(default)]
  pub path:            String,
  /// Extracted path parameters; `car_id` takes precedence over `path`.
  #[serde(default)]
  pub path_parameters: Option<HashMap<String, String>>,
  #[serde(default)]
  pub body:            Option<String>,
}

impl CarRequest {
  pub fn new(http_method: impl Into<String>, path: impl Into<String>) -> Self {
    Self {
      http_method: http_method.into(),
      path: path.into(),
      ..Self::default()
    }
  }

  pub fn with_body(mut self, body: impl Into<String>) -> Self {
    self.body = Some(body.into());
    self
  }

  pub fn with_car_id(mut self, car_id: impl Into<String>) -> Self {
    self
      .path_parameters
      .get_or_insert_with(HashMap::new)
      .insert("car_id".to_owned(), car_id.into());
    self
  }
}

/// The outcome of dispatching a [`CarRequest`].
///
/// Every path, read or write, success or failure, answers with this shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CarResponse {
  pub status_code: u16,
  pub body:        Value,
}

impl CarResponse {
  pub fn new(status: StatusCode, body: Value) -> Self {
    Self { status_code: status.as_u16(), body }
  }

  pub fn ok(body: Value) -> Self { Self::new(StatusCode::OK, body) }

  pub fn is_success(&self) -> bool { (200..300).contains(&self.status_code) }
}

impl IntoResponse for CarResponse {
  fn into_response(self) -> Response {
    let status =
      StatusCode::from_u16(self.status_code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, Json(self.body)).into_response()
  }
}

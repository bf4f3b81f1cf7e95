//! Error types for `fleet-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// A create or update body is missing a required field.
  #[error("validation error: {0}")]
  Validation(String),

  #[error("serialization error: {0}")]
  Serialization(#[from] serde_json::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

//! Error type for `fleet-events`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("core error: {0}")]
  Core(#[from] fleet_core::Error),

  #[error("transport error: {0}")]
  Transport(#[from] reqwest::Error),

  /// The event bus answered with a non-success status.
  #[error("event bus rejected entry: {status}")]
  Rejected { status: reqwest::StatusCode },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

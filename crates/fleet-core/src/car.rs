//! The car record and its normalization rules.
//!
//! Three shapes flow through the system:
//!
//! - [`CarInput`] is whatever a client sent. Every field is optional so that
//!   normalization, not deserialization, decides what is missing.
//! - [`NewCar`] is a validated record with defaults applied, ready to be
//!   written. It carries no timestamps.
//! - [`CarRecord`] is what the store holds: a [`NewCar`] plus the
//!   server-assigned `created_at` / `updated_at`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Error, Result};

/// Status assigned to a car created without one.
pub const DEFAULT_STATUS: &str = "Available";

/// Coordinate assigned when a car is created without a position.
pub const DEFAULT_COORDINATE: &str = "0";

// ─── Input ───────────────────────────────────────────────────────────────────

/// A create or update body as decoded from JSON.
///
/// Timestamps are not part of this type: they are always stamped by the store.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CarInput {
  pub car_id:        Option<String>,
  pub model:         Option<String>,
  pub year:          Option<i32>,
  pub status:        Option<String>,
  pub latitude:      Option<String>,
  pub longitude:     Option<String>,
  pub nb_passengers: Option<u32>,
  pub bike_rack:     Option<bool>,
}

// ─── Normalized record ───────────────────────────────────────────────────────

/// A validated car, ready to be written to a [`CarStore`](crate::store::CarStore).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewCar {
  pub car_id:        String,
  pub model:         String,
  pub year:          Option<i32>,
  pub status:        String,
  pub latitude:      Option<String>,
  pub longitude:     Option<String>,
  pub nb_passengers: u32,
  pub bike_rack:     bool,
}

impl NewCar {
  /// Normalize a `POST /cars` body.
  ///
  /// `model` and `year` are required. A missing or empty `car_id` is replaced
  /// by a fresh UUID; `status` defaults to [`DEFAULT_STATUS`]; missing or null
  /// coordinates default to [`DEFAULT_COORDINATE`].
  pub fn for_create(input: CarInput) -> Result<Self> {
    let model = required_text(input.model, "model")?;
    let year = input
      .year
      .ok_or_else(|| Error::Validation("missing required field `year`".into()))?;

    let car_id = input
      .car_id
      .filter(|id| !id.trim().is_empty())
      .unwrap_or_else(|| Uuid::new_v4().to_string());

    Ok(Self {
      car_id,
      model,
      year: Some(year),
      status: input.status.unwrap_or_else(|| DEFAULT_STATUS.to_owned()),
      latitude: Some(input.latitude.unwrap_or_else(|| DEFAULT_COORDINATE.to_owned())),
      longitude: Some(input.longitude.unwrap_or_else(|| DEFAULT_COORDINATE.to_owned())),
      nb_passengers: input.nb_passengers.unwrap_or_default(),
      bike_rack: input.bike_rack.unwrap_or_default(),
    })
  }

  /// Normalize a `PUT /cars/{car_id}` body.
  ///
  /// The path id always wins over any `car_id` in the body. An update is a
  /// full replace, so nothing is defaulted from the stored record: absent
  /// optional fields are dropped and counters reset.
  pub fn for_update(car_id: &str, input: CarInput) -> Result<Self> {
    if car_id.trim().is_empty() {
      return Err(Error::Validation("missing car id".into()));
    }

    Ok(Self {
      car_id:        car_id.to_owned(),
      model:         required_text(input.model, "model")?,
      year:          input.year,
      status:        required_text(input.status, "status")?,
      latitude:      input.latitude,
      longitude:     input.longitude,
      nb_passengers: input.nb_passengers.unwrap_or_default(),
      bike_rack:     input.bike_rack.unwrap_or_default(),
    })
  }

  /// Attach store-assigned timestamps.
  pub fn into_record(
    self,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
  ) -> CarRecord {
    CarRecord {
      car_id: self.car_id,
      model: self.model,
      year: self.year,
      status: self.status,
      latitude: self.latitude,
      longitude: self.longitude,
      nb_passengers: self.nb_passengers,
      bike_rack: self.bike_rack,
      created_at,
      updated_at,
    }
  }
}

fn required_text(value: Option<String>, field: &str) -> Result<String> {
  match value {
    Some(v) if !v.trim().is_empty() => Ok(v),
    _ => Err(Error::Validation(format!("missing required field `{field}`"))),
  }
}

// ─── Stored record ───────────────────────────────────────────────────────────

/// A car as persisted by the store.
///
/// `car_id` never changes once assigned, and `created_at <= updated_at`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CarRecord {
  pub car_id:        String,
  pub model:         String,
  pub year:          Option<i32>,
  pub status:        String,
  pub latitude:      Option<String>,
  pub longitude:     Option<String>,
  pub nb_passengers: u32,
  pub bike_rack:     bool,
  pub created_at:    DateTime<Utc>,
  pub updated_at:    DateTime<Utc>,
}

#[cfg(test)]
mod tests {
  use super::*;

  fn input(model: &str, year: i32) -> CarInput {
    CarInput {
      model: Some(model.into()),
      year: Some(year),
      ..CarInput::default()
    }
  }

  #[test]
  fn create_fills_defaults() {
    let car = NewCar::for_create(input("Model_2", 2024)).unwrap();
    assert!(!car.car_id.is_empty());
    assert_eq!(car.status, "Available");
    assert_eq!(car.latitude.as_deref(), Some("0"));
    assert_eq!(car.longitude.as_deref(), Some("0"));
    assert_eq!(car.nb_passengers, 0);
    assert!(!car.bike_rack);
  }

  #[test]
  fn create_assigns_distinct_ids() {
    let a = NewCar::for_create(input("Model_1", 2024)).unwrap();
    let b = NewCar::for_create(input("Model_1", 2024)).unwrap();
    assert_ne!(a.car_id, b.car_id);
  }

  #[test]
  fn create_keeps_supplied_fields() {
    let car = NewCar::for_create(CarInput {
      car_id:        Some("5".into()),
      status:        Some("InCourse".into()),
      latitude:      Some("37.7".into()),
      longitude:     Some("-122.42".into()),
      nb_passengers: Some(4),
      bike_rack:     Some(true),
      ..input("Model_2", 2024)
    })
    .unwrap();
    assert_eq!(car.car_id, "5");
    assert_eq!(car.status, "InCourse");
    assert_eq!(car.latitude.as_deref(), Some("37.7"));
    assert_eq!(car.longitude.as_deref(), Some("-122.42"));
    assert_eq!(car.nb_passengers, 4);
    assert!(car.bike_rack);
  }

  #[test]
  fn create_treats_empty_id_as_missing() {
    let car = NewCar::for_create(CarInput {
      car_id: Some("  ".into()),
      ..input("Model_1", 2024)
    })
    .unwrap();
    assert!(!car.car_id.trim().is_empty());
  }

  #[test]
  fn create_null_coordinates_default_to_zero() {
    let raw = r#"{"model":"Model_1","year":2024,"latitude":null,"longitude":null}"#;
    let parsed: CarInput = serde_json::from_str(raw).unwrap();
    let car = NewCar::for_create(parsed).unwrap();
    assert_eq!(car.latitude.as_deref(), Some("0"));
    assert_eq!(car.longitude.as_deref(), Some("0"));
  }

  #[test]
  fn create_requires_model_and_year() {
    let no_model = CarInput { year: Some(2024), ..CarInput::default() };
    assert!(matches!(NewCar::for_create(no_model), Err(Error::Validation(_))));

    let no_year = CarInput { model: Some("Model_1".into()), ..CarInput::default() };
    assert!(matches!(NewCar::for_create(no_year), Err(Error::Validation(_))));
  }

  #[test]
  fn update_uses_path_id_and_replaces_everything() {
    let body = CarInput {
      car_id: Some("other".into()),
      model:  Some("Model_1".into()),
      status: Some("Rented".into()),
      ..CarInput::default()
    };
    let car = NewCar::for_update("1", body).unwrap();
    assert_eq!(car.car_id, "1");
    assert_eq!(car.status, "Rented");
    assert_eq!(car.year, None);
    assert_eq!(car.latitude, None);
    assert_eq!(car.longitude, None);
  }

  #[test]
  fn update_requires_status() {
    let body = CarInput { model: Some("Model_1".into()), ..CarInput::default() };
    assert!(matches!(NewCar::for_update("1", body), Err(Error::Validation(_))));
  }

  #[test]
  fn unknown_body_fields_are_ignored() {
    let raw = r#"{"model":"Model_2","year":2024,"type":"legacy","created_at":"x"}"#;
    let parsed: CarInput = serde_json::from_str(raw).unwrap();
    assert_eq!(parsed.model.as_deref(), Some("Model_2"));
  }
}

//! Notifications derived from car mutations.
//!
//! A [`CarEvent`] is a projection of the post-write [`CarRecord`]; it is never
//! stored. An [`EventEntry`] is the single message handed to the event
//! channel, carrying the event as canonical JSON.

use serde::{Deserialize, Serialize};

use crate::{Result, car::CarRecord};

/// Origin tag carried by every event this service emits.
pub const EVENT_SOURCE: &str = "acs.acm";

/// Schema version of [`CarEvent`].
pub const EVENT_VERSION: &str = "1.0";

/// Emitted after a successful `POST /cars`.
pub const CAR_CREATED: &str = "CarCreated";

/// Emitted after a successful `PUT /cars/{car_id}`.
pub const CAR_UPDATED: &str = "CarUpdated";

/// Snapshot of a car at the moment it was written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CarEvent {
  pub car_id:        String,
  pub model:         String,
  pub year:          Option<i32>,
  pub status:        String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub latitude:      Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub longitude:     Option<String>,
  pub nb_passengers: u32,
  pub bike_rack:     bool,
  pub event_type:    String,
  pub event_source:  String,
  pub event_version: String,
}

impl CarEvent {
  /// Project `record` into an event of type `event_type`. Pure.
  pub fn from_record(record: &CarRecord, event_type: &str) -> Self {
    Self {
      car_id:        record.car_id.clone(),
      model:         record.model.clone(),
      year:          record.year,
      status:        record.status.clone(),
      latitude:      record.latitude.clone(),
      longitude:     record.longitude.clone(),
      nb_passengers: record.nb_passengers,
      bike_rack:     record.bike_rack,
      event_type:    event_type.to_owned(),
      event_source:  EVENT_SOURCE.to_owned(),
      event_version: EVENT_VERSION.to_owned(),
    }
  }

  pub fn to_json(&self) -> Result<String> { Ok(serde_json::to_string(self)?) }
}

/// One message on the event channel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventEntry {
  pub source:         String,
  pub detail_type:    String,
  /// The [`CarEvent`] serialised as JSON.
  pub detail:         String,
  pub event_bus_name: String,
}

impl EventEntry {
  /// Build the message announcing `record` under `event_type` on `event_bus`.
  pub fn for_car(
    record: &CarRecord,
    event_type: &str,
    event_bus: &str,
  ) -> Result<Self> {
    let event = CarEvent::from_record(record, event_type);
    Ok(Self {
      source:         EVENT_SOURCE.to_owned(),
      detail_type:    event_type.to_owned(),
      detail:         event.to_json()?,
      event_bus_name: event_bus.to_owned(),
    })
  }
}

#[cfg(test)]
mod tests {
  use chrono::Utc;

  use super::*;
  use crate::car::{CarInput, NewCar};

  fn record() -> CarRecord {
    let now = Utc::now();
    NewCar::for_create(CarInput {
      car_id: Some("XXXXX".into()),
      model:  Some("Model_1".into()),
      year:   Some(2024),
      ..CarInput::default()
    })
    .unwrap()
    .into_record(now, now)
  }

  #[test]
  fn event_copies_record_fields() {
    let rec = record();
    let event = CarEvent::from_record(&rec, CAR_CREATED);
    assert_eq!(event.car_id, rec.car_id);
    assert_eq!(event.model, rec.model);
    assert_eq!(event.year, rec.year);
    assert_eq!(event.status, "Available");
    assert_eq!(event.latitude, rec.latitude);
    assert_eq!(event.longitude, rec.longitude);
    assert_eq!(event.nb_passengers, rec.nb_passengers);
    assert_eq!(event.bike_rack, rec.bike_rack);
    assert_eq!(event.event_type, "CarCreated");
    assert_eq!(event.event_source, "acs.acm");
    assert_eq!(event.event_version, "1.0");
  }

  #[test]
  fn absent_coordinates_are_omitted() {
    let mut rec = record();
    rec.latitude = None;
    rec.longitude = None;
    let json = CarEvent::from_record(&rec, "a.test.event.type")
      .to_json()
      .unwrap();
    assert!(!json.contains("latitude"));
    assert!(!json.contains("longitude"));
    assert!(json.contains("\"bike_rack\":false"));
  }

  #[test]
  fn entry_wraps_event_for_bus() {
    let rec = record();
    let entry = EventEntry::for_car(&rec, CAR_UPDATED, "cars").unwrap();
    assert_eq!(entry.source, "acs.acm");
    assert_eq!(entry.detail_type, "CarUpdated");
    assert_eq!(entry.event_bus_name, "cars");

    let detail: CarEvent = serde_json::from_str(&entry.detail).unwrap();
    assert_eq!(detail, CarEvent::from_record(&rec, CAR_UPDATED));
  }
}

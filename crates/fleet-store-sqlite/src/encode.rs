//! Encoding and decoding helpers between the car record and its SQLite row.
//!
//! Timestamps are stored as fixed-width RFC 3339 strings (microsecond
//! precision, `Z` suffix) so that they sort and compare as text.

use chrono::{DateTime, SecondsFormat, SubsecRound, Utc};
use fleet_core::car::{CarRecord, NewCar};

use crate::{Error, Result};

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

/// The current instant, truncated to the precision the store keeps.
pub fn now() -> DateTime<Utc> { Utc::now().trunc_subsecs(6) }

pub fn encode_dt(dt: DateTime<Utc>) -> String {
  dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── Row ─────────────────────────────────────────────────────────────────────

/// Column list shared by every SELECT, in [`RawCar::from_row`] order.
pub const CAR_COLUMNS: &str = "car_id, model, year, status, latitude, longitude, \
                               nb_passengers, bike_rack, created_at, updated_at";

/// A car row as read from SQLite, before timestamp decoding.
pub struct RawCar {
  pub car_id:        String,
  pub model:         String,
  pub year:          Option<i32>,
  pub status:        String,
  pub latitude:      Option<String>,
  pub longitude:     Option<String>,
  pub nb_passengers: u32,
  pub bike_rack:     bool,
  pub created_at:    String,
  pub updated_at:    String,
}

impl RawCar {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      car_id:        row.get(0)?,
      model:         row.get(1)?,
      year:          row.get(2)?,
      status:        row.get(3)?,
      latitude:      row.get(4)?,
      longitude:     row.get(5)?,
      nb_passengers: row.get(6)?,
      bike_rack:     row.get(7)?,
      created_at:    row.get(8)?,
      updated_at:    row.get(9)?,
    })
  }

  pub fn into_record(self) -> Result<CarRecord> {
    let created_at = decode_dt(&self.created_at)?;
    let updated_at = decode_dt(&self.updated_at)?;
    let car = NewCar {
      car_id:        self.car_id,
      model:         self.model,
      year:          self.year,
      status:        self.status,
      latitude:      self.latitude,
      longitude:     self.longitude,
      nb_passengers: self.nb_passengers,
      bike_rack:     self.bike_rack,
    };
    Ok(car.into_record(created_at, updated_at))
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn timestamps_are_fixed_width() {
    let a = decode_dt("2024-01-01T00:00:00Z").unwrap();
    let b = decode_dt("2024-01-01T00:00:00.5Z").unwrap();
    let (ea, eb) = (encode_dt(a), encode_dt(b));
    assert_eq!(ea.len(), eb.len());
    assert!(ea < eb);
  }

  #[test]
  fn now_survives_encoding() {
    let t = now();
    assert_eq!(decode_dt(&encode_dt(t)).unwrap(), t);
  }

  #[test]
  fn bad_timestamp_is_a_date_error() {
    assert!(matches!(decode_dt("yesterday"), Err(Error::DateParse(_))));
  }
}

//! [`SqliteCarStore`] — the SQLite implementation of [`CarStore`].

use std::{path::Path, sync::Arc};

use fleet_core::{
  car::{CarRecord, NewCar},
  store::CarStore,
};
use rusqlite::OptionalExtension as _;

use crate::{
  Result,
  encode::{CAR_COLUMNS, RawCar, decode_dt, encode_dt, now},
  schema::{schema, validate_table_name},
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A car store backed by one table in a SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteCarStore {
  conn:  tokio_rusqlite::Connection,
  table: Arc<str>,
}

impl SqliteCarStore {
  /// Open (or create) a store at `path` using `table`, and create the table
  /// if needed.
  pub async fn open(path: impl AsRef<Path>, table: &str) -> Result<Self> {
    validate_table_name(table)?;
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn, table: table.into() };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self {
      conn,
      table: crate::DEFAULT_TABLE_NAME.into(),
    };
    store.init_schema().await?;
    Ok(store)
  }

  /// Name of the table this store reads and writes.
  pub fn table_name(&self) -> &str { &self.table }

  async fn init_schema(&self) -> Result<()> {
    let ddl = schema(&self.table);
    self
      .conn
      .call(move |conn| {
        conn.execute_batch(&ddl)?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

// ─── CarStore impl ───────────────────────────────────────────────────────────

impl CarStore for SqliteCarStore {
  type Error = crate::Error;

  async fn list_cars(&self) -> Result<Vec<CarRecord>> {
    let sql = format!("SELECT {CAR_COLUMNS} FROM {} ORDER BY car_id", self.table);

    let raws: Vec<RawCar> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map([], RawCar::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawCar::into_record).collect()
  }

  async fn get_car(&self, car_id: &str) -> Result<Option<CarRecord>> {
    let sql = format!("SELECT {CAR_COLUMNS} FROM {} WHERE car_id = ?1", self.table);
    let id = car_id.to_owned();

    let raw: Option<RawCar> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(&sql, rusqlite::params![id], RawCar::from_row)
            .optional()?,
        )
      })
      .await?;

    raw.map(RawCar::into_record).transpose()
  }

  async fn create_car(&self, car: NewCar) -> Result<CarRecord> {
    let stamp = now();
    let record = car.into_record(stamp, stamp);
    tracing::debug!(car_id = %record.car_id, table = %self.table, "writing car");

    let sql = format!(
      "INSERT OR REPLACE INTO {} ({CAR_COLUMNS})
       VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
      self.table
    );
    let row = record.clone();
    let at_str = encode_dt(stamp);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          &sql,
          rusqlite::params![
            row.car_id,
            row.model,
            row.year,
            row.status,
            row.latitude,
            row.longitude,
            row.nb_passengers,
            row.bike_rack,
            at_str,
            at_str,
          ],
        )?;
        Ok(())
      })
      .await?;

    Ok(record)
  }

  async fn update_car(&self, car: NewCar) -> Result<Option<CarRecord>> {
    tracing::debug!(car_id = %car.car_id, table = %self.table, "replacing car");

    // `MAX` keeps `updated_at >= created_at` even if the wall clock steps back;
    // the fixed-width encoding makes text comparison chronological.
    let sql = format!(
      "UPDATE {} SET
         model = ?2, year = ?3, status = ?4, latitude = ?5, longitude = ?6,
         nb_passengers = ?7, bike_rack = ?8, updated_at = MAX(?9, created_at)
       WHERE car_id = ?1
       RETURNING created_at, updated_at",
      self.table
    );
    let row = car.clone();
    let at_str = encode_dt(now());

    let stamps: Option<(String, String)> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &sql,
              rusqlite::params![
                row.car_id,
                row.model,
                row.year,
                row.status,
                row.latitude,
                row.longitude,
                row.nb_passengers,
                row.bike_rack,
                at_str,
              ],
              |r| Ok((r.get(0)?, r.get(1)?)),
            )
            .optional()?,
        )
      })
      .await?;

    let Some((created_at, updated_at)) = stamps else {
      return Ok(None);
    };
    Ok(Some(car.into_record(decode_dt(&created_at)?, decode_dt(&updated_at)?)))
  }

  async fn delete_car(&self, car_id: &str) -> Result<()> {
    let sql = format!("DELETE FROM {} WHERE car_id = ?1", self.table);
    let id = car_id.to_owned();

    self
      .conn
      .call(move |conn| {
        conn.execute(&sql, rusqlite::params![id])?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

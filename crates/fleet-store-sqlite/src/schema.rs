//! SQL schema for the fleet SQLite store.
//!
//! The table name is configurable, so the DDL is rendered at open time rather
//! than kept as a constant.

use crate::{Error, Result};

/// Table used when no name is configured.
pub const DEFAULT_TABLE_NAME: &str = "acm_cars";

/// Reject anything that is not `[A-Za-z_][A-Za-z0-9_]*`; the name is spliced
/// into SQL text.
pub fn validate_table_name(name: &str) -> Result<()> {
  let mut chars = name.chars();
  let valid = match chars.next() {
    Some(c) if c.is_ascii_alphabetic() || c == '_' => {
      chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
    }
    _ => false,
  };
  if valid {
    Ok(())
  } else {
    Err(Error::InvalidTableName(name.to_owned()))
  }
}

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub fn schema(table: &str) -> String {
  format!(
    "
PRAGMA journal_mode = WAL;

-- One row per car, keyed by car_id. Every write replaces the whole row.
CREATE TABLE IF NOT EXISTS {table} (
    car_id        TEXT PRIMARY KEY,
    model         TEXT NOT NULL,
    year          INTEGER,
    status        TEXT NOT NULL,
    latitude      TEXT,
    longitude     TEXT,
    nb_passengers INTEGER NOT NULL DEFAULT 0,
    bike_rack     INTEGER NOT NULL DEFAULT 0,
    created_at    TEXT NOT NULL,   -- RFC 3339 UTC, fixed width; server-assigned
    updated_at    TEXT NOT NULL    -- RFC 3339 UTC, fixed width; server-assigned
);
"
  )
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn accepts_plain_identifiers() {
    assert!(validate_table_name("acm_cars").is_ok());
    assert!(validate_table_name("_cars2").is_ok());
  }

  #[test]
  fn rejects_sql_fragments() {
    for bad in ["", "2cars", "cars; DROP TABLE x", "acm-cars", "cars\""] {
      assert!(
        matches!(validate_table_name(bad), Err(Error::InvalidTableName(_))),
        "{bad:?} should be rejected"
      );
    }
  }
}

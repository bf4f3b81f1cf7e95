//! The `CarStore` trait.
//!
//! The trait is implemented by storage backends (e.g. `fleet-store-sqlite`).
//! The dispatcher depends on this abstraction, not on any concrete backend.

use std::future::Future;

use crate::car::{CarRecord, NewCar};

/// Key-value persistence of car records, keyed by `car_id`.
///
/// Writes are full replaces; the store owns `created_at` and `updated_at`.
/// No method takes client-side locks: concurrent writes to the same key race
/// and the last one wins.
pub trait CarStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Every stored car. Empty when the store is empty.
  fn list_cars(
    &self,
  ) -> impl Future<Output = Result<Vec<CarRecord>, Self::Error>> + Send + '_;

  /// Retrieve a car by id. Returns `None` if not found.
  fn get_car<'a>(
    &'a self,
    car_id: &'a str,
  ) -> impl Future<Output = Result<Option<CarRecord>, Self::Error>> + Send + 'a;

  /// Write `car`, stamping `created_at` and `updated_at` with the same instant.
  ///
  /// A car with the same id is silently replaced.
  fn create_car(
    &self,
    car: NewCar,
  ) -> impl Future<Output = Result<CarRecord, Self::Error>> + Send + '_;

  /// Replace every field of an existing car and stamp `updated_at`.
  /// `created_at` is kept. Returns `None` if no car has `car.car_id`.
  fn update_car(
    &self,
    car: NewCar,
  ) -> impl Future<Output = Result<Option<CarRecord>, Self::Error>> + Send + '_;

  /// Remove a car. Deleting an absent id succeeds.
  fn delete_car<'a>(
    &'a self,
    car_id: &'a str,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a;
}

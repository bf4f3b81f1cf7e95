//! [`Dispatcher`] — maps a [`CarRequest`] onto the store and the publisher.
//!
//! | Method | Path | Action |
//! |--------|------|--------|
//! | `GET`  | `/cars` | list every car |
//! | `GET`  | `/cars/{car_id}` | one car; 404 if absent |
//! | `POST` | `/cars` | normalize, write, emit `CarCreated` |
//! | `PUT`  | `/cars/{car_id}` | full replace, emit `CarUpdated`; 404 if absent |
//!
//! Anything else answers 405 with `{"error": "Invalid HTTP method"}`.

use std::sync::Arc;

use fleet_core::{
  car::{CarInput, CarRecord, NewCar},
  event::{CAR_CREATED, CAR_UPDATED},
  publish::CarEventPublisher,
  store::CarStore,
};
use serde_json::json;

use crate::{
  error::ApiError,
  request::{CarRequest, CarResponse},
};

/// Collection path served by the dispatcher.
pub const CARS_PATH: &str = "/cars";

/// The resource a request addresses.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Target {
  Collection,
  Car(String),
}

impl Target {
  fn from_request(req: &CarRequest) -> Result<Self, ApiError> {
    if let Some(id) = req
      .path_parameters
      .as_ref()
      .and_then(|p| p.get("car_id"))
      .filter(|id| !id.is_empty())
    {
      return Ok(Target::Car(id.clone()));
    }

    let path = req.path.trim_end_matches('/');
    if path.is_empty() || path == CARS_PATH {
      return Ok(Target::Collection);
    }
    match path.strip_prefix(CARS_PATH).and_then(|rest| rest.strip_prefix('/')) {
      Some(id) if !id.contains('/') => Ok(Target::Car(id.to_owned())),
      _ => Err(ApiError::NotFound(format!("no route for {}", req.path))),
    }
  }
}

/// Handles one request at a time against an injected store and publisher.
///
/// Stateless between requests. Cloning is cheap.
pub struct Dispatcher<S, P> {
  store:     Arc<S>,
  publisher: Arc<P>,
}

impl<S, P> Clone for Dispatcher<S, P> {
  fn clone(&self) -> Self {
    Self {
      store:     Arc::clone(&self.store),
      publisher: Arc::clone(&self.publisher),
    }
  }
}

impl<S, P> Dispatcher<S, P>
where
  S: CarStore,
  P: CarEventPublisher,
{
  pub fn new(store: Arc<S>, publisher: Arc<P>) -> Self { Self { store, publisher } }

  pub fn store(&self) -> &Arc<S> { &self.store }

  /// Dispatch `req`. Never fails: every error becomes a [`CarResponse`].
  pub async fn dispatch(&self, req: CarRequest) -> CarResponse {
    tracing::debug!(method = %req.http_method, path = %req.path, "dispatching");
    match self.route(req).await {
      Ok(resp) => resp,
      Err(e) => e.into(),
    }
  }

  async fn route(&self, req: CarRequest) -> Result<CarResponse, ApiError> {
    let method = req.http_method.to_ascii_uppercase();
    if !matches!(method.as_str(), "GET" | "POST" | "PUT") {
      return Err(ApiError::InvalidMethod);
    }

    match (method.as_str(), Target::from_request(&req)?) {
      ("GET", Target::Collection) => self.list().await,
      ("GET", Target::Car(id)) => self.get(&id).await,
      ("POST", Target::Collection) => self.create(parse_body(req.body)?).await,
      ("PUT", Target::Car(id)) => self.update(&id, parse_body(req.body)?).await,
      _ => Err(ApiError::InvalidMethod),
    }
  }

  // ── Reads ──────────────────────────────────────────────────────────────────

  async fn list(&self) -> Result<CarResponse, ApiError> {
    let cars = self.store.list_cars().await.map_err(store_error)?;
    Ok(CarResponse::ok(serde_json::to_value(cars).map_err(fleet_core::Error::from)?))
  }

  async fn get(&self, car_id: &str) -> Result<CarResponse, ApiError> {
    let car = self
      .store
      .get_car(car_id)
      .await
      .map_err(store_error)?
      .ok_or_else(|| ApiError::NotFound(format!("car {car_id} not found")))?;
    Ok(CarResponse::ok(serde_json::to_value(car).map_err(fleet_core::Error::from)?))
  }

  // ── Writes ─────────────────────────────────────────────────────────────────

  async fn create(&self, input: CarInput) -> Result<CarResponse, ApiError> {
    let car = NewCar::for_create(input)?;
    let record = self.store.create_car(car).await.map_err(store_error)?;
    self.announce(&record, CAR_CREATED).await;
    Ok(CarResponse::ok(json!({
      "message": "Car created successfully",
      "car_id": record.car_id,
    })))
  }

  async fn update(&self, car_id: &str, input: CarInput) -> Result<CarResponse, ApiError> {
    let car = NewCar::for_update(car_id, input)?;
    let record = self
      .store
      .update_car(car)
      .await
      .map_err(store_error)?
      .ok_or_else(|| ApiError::NotFound(format!("car {car_id} not found")))?;
    self.announce(&record, CAR_UPDATED).await;
    Ok(CarResponse::ok(json!({
      "message": "Car updated successfully",
      "car_id": record.car_id,
    })))
  }

  /// Publish the event for a completed write. A failure is logged and
  /// swallowed: the write stands and the event is lost.
  async fn announce(&self, record: &CarRecord, event_type: &str) {
    match self.publisher.publish(record, event_type).await {
      Ok(()) => tracing::info!(
        car_id = %record.car_id,
        event_type,
        event_bus = self.publisher.event_bus(),
        "event published"
      ),
      Err(e) => tracing::error!(
        car_id = %record.car_id,
        event_type,
        event_bus = self.publisher.event_bus(),
        error = %e,
        "event publish failed; record kept, event dropped"
      ),
    }
  }
}

fn parse_body(body: Option<String>) -> Result<CarInput, ApiError> {
  let body = body
    .filter(|b| !b.trim().is_empty())
    .ok_or_else(|| ApiError::Validation("missing request body".into()))?;
  serde_json::from_str(&body).map_err(|e| ApiError::BadRequest(format!("invalid car body: {e}")))
}

fn store_error<E>(e: E) -> ApiError
where
  E: std::error::Error + Send + Sync + 'static,
{
  ApiError::Store(Box::new(e))
}

#[cfg(test)]
mod tests {
  use super::*;

  fn target(req: &CarRequest) -> Result<Target, ApiError> { Target::from_request(req) }

  #[test]
  fn collection_paths() {
    for path in ["/cars", "/cars/", ""] {
      assert_eq!(target(&CarRequest::new("GET", path)).unwrap(), Target::Collection);
    }
  }

  #[test]
  fn item_path() {
    assert_eq!(
      target(&CarRequest::new("GET", "/cars/abc")).unwrap(),
      Target::Car("abc".into())
    );
  }

  #[test]
  fn path_parameter_wins() {
    let req = CarRequest::new("PUT", "/cars/ignored").with_car_id("1");
    assert_eq!(target(&req).unwrap(), Target::Car("1".into()));
  }

  #[test]
  fn unknown_paths_are_not_found() {
    for path in ["/trucks", "/cars/1/extra", "/carsx"] {
      assert!(matches!(
        target(&CarRequest::new("GET", path)),
        Err(ApiError::NotFound(_))
      ));
    }
  }

  #[test]
  fn empty_body_is_a_validation_error() {
    assert!(matches!(parse_body(None), Err(ApiError::Validation(_))));
    assert!(matches!(parse_body(Some("  ".into())), Err(ApiError::Validation(_))));
  }

  #[test]
  fn malformed_body_is_a_bad_request() {
    assert!(matches!(parse_body(Some("{not json".into())), Err(ApiError::BadRequest(_))));
  }
}

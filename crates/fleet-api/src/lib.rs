//! Request dispatching for the fleet inventory service.
//!
//! [`Dispatcher`] turns a gateway-shaped [`CarRequest`] into a
//! [`CarResponse`] using any [`CarStore`] and [`CarEventPublisher`].
//! [`api_router`] mounts it as an axum [`Router`]. Tracing, TLS and other
//! transport concerns are layered on by the caller.
//!
//! # Mounting
//!
//! ```rust,ignore
//! let dispatcher = Dispatcher::new(Arc::new(store), Arc::new(publisher));
//! let app = fleet_api::api_router(dispatcher).layer(TraceLayer::new_for_http());
//! ```

pub mod dispatch;
pub mod error;
pub mod request;

use axum::{
  Router,
  body::Body,
  extract::{Path, Request, State},
  response::{IntoResponse, Response},
  routing::any,
};
use fleet_core::{publish::CarEventPublisher, store::CarStore};

pub use dispatch::Dispatcher;
pub use error::ApiError;
pub use request::{CarRequest, CarResponse};

/// Largest request body accepted by [`api_router`].
const MAX_BODY_BYTES: usize = 1024 * 1024;

/// Build a router sending every method on `/cars` and `/cars/{car_id}` to
/// `dispatcher`. Method filtering is the dispatcher's job.
///
/// The car id is taken from the matched, percent-decoded path segment.
pub fn api_router<S, P>(dispatcher: Dispatcher<S, P>) -> Router<()>
where
  S: CarStore + 'static,
  P: CarEventPublisher + 'static,
{
  Router::new()
    .route("/cars", any(handle_collection::<S, P>))
    .route("/cars/", any(handle_collection::<S, P>))
    .route("/cars/{car_id}", any(handle_car::<S, P>))
    .with_state(dispatcher)
}

async fn handle_collection<S, P>(
  State(dispatcher): State<Dispatcher<S, P>>,
  req: Request<Body>,
) -> Response
where
  S: CarStore + 'static,
  P: CarEventPublisher + 'static,
{
  match to_car_request(req).await {
    Ok(car_req) => dispatcher.dispatch(car_req).await.into_response(),
    Err(e) => e.into_response(),
  }
}

async fn handle_car<S, P>(
  State(dispatcher): State<Dispatcher<S, P>>,
  Path(car_id): Path<String>,
  req: Request<Body>,
) -> Response
where
  S: CarStore + 'static,
  P: CarEventPublisher + 'static,
{
  match to_car_request(req).await {
    Ok(car_req) => dispatcher
      .dispatch(car_req.with_car_id(car_id))
      .await
      .into_response(),
    Err(e) => e.into_response(),
  }
}

async fn to_car_request(req: Request<Body>) -> Result<CarRequest, ApiError> {
  let method = req.method().as_str().to_owned();
  let path = req.uri().path().to_owned();

  let bytes = axum::body::to_bytes(req.into_body(), MAX_BODY_BYTES)
    .await
    .map_err(|_| ApiError::BadRequest("request body too large".into()))?;
  let body = String::from_utf8(bytes.to_vec())
    .map_err(|_| ApiError::BadRequest("body is not valid UTF-8".into()))?;

  let mut car_req = CarRequest::new(method, path);
  if !body.is_empty() {
    car_req = car_req.with_body(body);
  }
  Ok(car_req)
}

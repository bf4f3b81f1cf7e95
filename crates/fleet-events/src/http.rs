use std::time::Duration;

use fleet_core::{car::CarRecord, event::EventEntry, publish::CarEventPublisher};
use reqwest::Client;

use crate::{Error, Result};

/// Posts one JSON [`EventEntry`] per event to an ingestion endpoint.
///
/// Cheap to clone — the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Debug, Clone)]
pub struct HttpEventPublisher {
  client:    Client,
  endpoint:  String,
  event_bus: String,
}

impl HttpEventPublisher {
  pub fn new(endpoint: impl Into<String>, event_bus: impl Into<String>) -> Result<Self> {
    let client = Client::builder()
      .timeout(Duration::from_secs(10))
      .build()?;
    Ok(Self {
      client,
      endpoint: endpoint.into(),
      event_bus: event_bus.into(),
    })
  }
}

impl CarEventPublisher for HttpEventPublisher {
  type Error = Error;

  fn event_bus(&self) -> &str { &self.event_bus }

  async fn publish(&self, record: &CarRecord, event_type: &str) -> Result<()> {
    let entry = EventEntry::for_car(record, event_type, &self.event_bus)?;

    let resp = self.client.post(&self.endpoint).json(&entry).send().await?;
    if !resp.status().is_success() {
      return Err(Error::Rejected { status: resp.status() });
    }

    tracing::debug!(
      car_id = %record.car_id,
      detail_type = %entry.detail_type,
      event_bus = %entry.event_bus_name,
      "event delivered"
    );
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use std::sync::{Arc, Mutex};

  use axum::{Json, Router, extract::State, http::StatusCode, routing::post};
  use chrono::Utc;
  use fleet_core::{
    car::{CarInput, NewCar},
    event::CarEvent,
  };
  use tokio::net::TcpListener;

  use super::*;

  type Inbox = Arc<Mutex<Vec<EventEntry>>>;

  async fn accept(State(inbox): State<Inbox>, Json(entry): Json<EventEntry>) -> StatusCode {
    inbox.lock().unwrap().push(entry);
    StatusCode::OK
  }

  async fn refuse() -> StatusCode { StatusCode::SERVICE_UNAVAILABLE }

  /// Serve `app` on an ephemeral port and return its base URL.
  async fn serve(app: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move { axum::serve(listener, app).await.unwrap() });
    format!("http://{addr}")
  }

  fn record() -> CarRecord {
    let now = Utc::now();
    NewCar::for_create(CarInput {
      car_id: Some("XXXXX".into()),
      model: Some("Model_2".into()),
      year: Some(2024),
      ..CarInput::default()
    })
    .unwrap()
    .into_record(now, now)
  }

  #[tokio::test]
  async fn posts_one_entry_per_event() {
    let inbox: Inbox = Arc::default();
    let app = Router::new()
      .route("/events", post(accept))
      .with_state(inbox.clone());
    let base = serve(app).await;

    let publisher = HttpEventPublisher::new(format!("{base}/events"), "cars").unwrap();
    let rec = record();
    publisher.publish(&rec, "CarCreated").await.unwrap();

    let received = inbox.lock().unwrap().clone();
    assert_eq!(received.len(), 1);
    assert_eq!(received[0].source, "acs.acm");
    assert_eq!(received[0].detail_type, "CarCreated");
    assert_eq!(received[0].event_bus_name, "cars");

    let event: CarEvent = serde_json::from_str(&received[0].detail).unwrap();
    assert_eq!(event, CarEvent::from_record(&rec, "CarCreated"));
  }

  #[tokio::test]
  async fn non_success_status_is_an_error() {
    let base = serve(Router::new().route("/events", post(refuse))).await;

    let publisher = HttpEventPublisher::new(format!("{base}/events"), "cars").unwrap();
    let err = publisher.publish(&record(), "CarUpdated").await.unwrap_err();
    assert!(matches!(
      err,
      Error::Rejected { status } if status == reqwest::StatusCode::SERVICE_UNAVAILABLE
    ));
  }

  #[tokio::test]
  async fn unreachable_endpoint_is_a_transport_error() {
    // Bind then drop to get a port nobody listens on.
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let publisher = HttpEventPublisher::new(format!("http://{addr}/events"), "cars").unwrap();
    let err = publisher.publish(&record(), "CarCreated").await.unwrap_err();
    assert!(matches!(err, Error::Transport(_)));
  }
}

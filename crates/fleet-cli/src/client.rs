//! Async HTTP client wrapping the fleet `/cars` API.

use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use fleet_core::car::{CarInput, CarRecord};
use reqwest::{Client, Response, Url};
use serde::Deserialize;

/// Acknowledgement returned by `POST /cars` and `PUT /cars/{car_id}`.
#[derive(Debug, Clone, Deserialize)]
pub struct WriteAck {
  pub message: String,
  pub car_id:  String,
}

/// Async HTTP client for the fleet REST API.
///
/// Cheap to clone — the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Clone)]
pub struct ApiClient {
  client:   Client,
  base_url: String,
}

impl ApiClient {
  pub fn new(base_url: impl Into<String>) -> Result<Self> {
    let client = Client::builder()
      .timeout(Duration::from_secs(30))
      .build()
      .context("failed to build HTTP client")?;
    Ok(Self { client, base_url: base_url.into() })
  }

  fn url(&self, path: &str) -> String {
    format!("{}{}", self.base_url.trim_end_matches('/'), path)
  }

  /// `/cars/{car_id}` with the id percent-encoded as a single path segment.
  fn car_url(&self, car_id: &str) -> Result<Url> {
    let mut url = Url::parse(&self.url("/cars"))
      .with_context(|| format!("invalid base URL {:?}", self.base_url))?;
    url
      .path_segments_mut()
      .map_err(|()| anyhow!("base URL {:?} cannot carry a path", self.base_url))?
      .push(car_id);
    Ok(url)
  }

  /// `GET /cars`
  pub async fn list_cars(&self) -> Result<Vec<CarRecord>> {
    let resp = self
      .client
      .get(self.url("/cars"))
      .send()
      .await
      .context("GET /cars failed")?;
    let resp = check(resp, "GET /cars").await?;
    resp.json().await.context("deserialising cars")
  }

  /// `GET /cars/{car_id}`
  pub async fn get_car(&self, car_id: &str) -> Result<CarRecord> {
    let resp = self
      .client
      .get(self.car_url(car_id)?)
      .send()
      .await
      .with_context(|| format!("GET /cars/{car_id} failed"))?;
    let resp = check(resp, &format!("GET /cars/{car_id}")).await?;
    resp.json().await.context("deserialising car")
  }

  /// `POST /cars`
  pub async fn create_car(&self, car: &CarInput) -> Result<WriteAck> {
    let resp = self
      .client
      .post(self.url("/cars"))
      .json(car)
      .send()
      .await
      .context("POST /cars failed")?;
    let resp = check(resp, "POST /cars").await?;
    resp.json().await.context("deserialising create response")
  }

  /// `PUT /cars/{car_id}`
  pub async fn update_car(&self, car_id: &str, car: &CarInput) -> Result<WriteAck> {
    let resp = self
      .client
      .put(self.car_url(car_id)?)
      .json(car)
      .send()
      .await
      .with_context(|| format!("PUT /cars/{car_id} failed"))?;
    let resp = check(resp, &format!("PUT /cars/{car_id}")).await?;
    resp.json().await.context("deserialising update response")
  }
}

/// Turn a non-2xx response into an error carrying the server's message.
async fn check(resp: Response, what: &str) -> Result<Response> {
  if resp.status().is_success() {
    return Ok(resp);
  }
  let status = resp.status();
  let body: serde_json::Value = resp.json().await.unwrap_or_default();
  match body.get("error").and_then(|e| e.as_str()) {
    Some(msg) => Err(anyhow!("{what} → {status}: {msg}")),
    None => Err(anyhow!("{what} → {status}")),
  }
}

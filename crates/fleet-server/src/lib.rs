//! Wiring for the fleet inventory server: configuration, publisher selection
//! and middleware composition around [`fleet_api::api_router`].

use std::path::{Path, PathBuf};

use axum::{Router, body::Body, http::Request};
use fleet_api::Dispatcher;
use fleet_core::{car::CarRecord, publish::CarEventPublisher, store::CarStore};
use fleet_events::{HttpEventPublisher, LogEventPublisher};
use serde::Deserialize;
use tower_http::trace::TraceLayer;

// ─── Configuration ───────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml` and the
/// environment.
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct ServerConfig {
  pub host:           String,
  pub port:           u16,
  pub store_path:     PathBuf,
  /// Table holding car records.
  pub table_name:     String,
  /// Name of the channel events are addressed to.
  pub event_bus:      String,
  /// Ingestion URL of the event bus. Events are only logged when unset.
  pub event_endpoint: Option<String>,
  pub service_name:   String,
  /// Default `tracing` filter directive; `RUST_LOG` overrides it.
  pub log_level:      String,
}

impl Default for ServerConfig {
  fn default() -> Self {
    Self {
      host:           "0.0.0.0".to_string(),
      port:           8080,
      store_path:     PathBuf::from("fleet.db"),
      table_name:     fleet_store_sqlite::DEFAULT_TABLE_NAME.to_string(),
      event_bus:      "cars".to_string(),
      event_endpoint: None,
      service_name:   "CarManager".to_string(),
      log_level:      "info".to_string(),
    }
  }
}

impl ServerConfig {
  /// Layer, lowest precedence first: defaults, the TOML file at `path` (if
  /// present), `FLEET_*` variables, then the deployment's `CAR_TABLE_NAME`
  /// and `CAR_EVENT_BUS`.
  pub fn load(path: &Path) -> Result<Self, config::ConfigError> {
    config::Config::builder()
      .add_source(config::File::from(path).required(false))
      .add_source(config::Environment::with_prefix("FLEET"))
      .set_override_option("table_name", std::env::var("CAR_TABLE_NAME").ok())?
      .set_override_option("event_bus", std::env::var("CAR_EVENT_BUS").ok())?
      .build()?
      .try_deserialize()
  }

  pub fn address(&self) -> String { format!("{}:{}", self.host, self.port) }
}

// ─── Publisher ───────────────────────────────────────────────────────────────

/// The publisher selected by configuration.
#[derive(Debug, Clone)]
pub enum Publisher {
  Http(HttpEventPublisher),
  Log(LogEventPublisher),
}

impl Publisher {
  pub fn from_config(cfg: &ServerConfig) -> fleet_events::Result<Self> {
    Ok(match &cfg.event_endpoint {
      Some(url) => Publisher::Http(HttpEventPublisher::new(url.clone(), cfg.event_bus.clone())?),
      None => Publisher::Log(LogEventPublisher::new(cfg.event_bus.clone())),
    })
  }
}

impl CarEventPublisher for Publisher {
  type Error = fleet_events::Error;

  fn event_bus(&self) -> &str {
    match self {
      Publisher::Http(p) => p.event_bus(),
      Publisher::Log(p) => p.event_bus(),
    }
  }

  async fn publish(&self, record: &CarRecord, event_type: &str) -> fleet_events::Result<()> {
    match self {
      Publisher::Http(p) => p.publish(record, event_type).await,
      Publisher::Log(p) => p.publish(record, event_type).await,
    }
  }
}

// ─── Router ──────────────────────────────────────────────────────────────────

/// The API router wrapped in a per-request tracing span tagged with
/// `service_name`.
pub fn app<S, P>(dispatcher: Dispatcher<S, P>, service_name: &str) -> Router
where
  S: CarStore + 'static,
  P: CarEventPublisher + 'static,
{
  let service = service_name.to_owned();
  fleet_api::api_router(dispatcher).layer(TraceLayer::new_for_http().make_span_with(
    move |req: &Request<Body>| {
      tracing::info_span!(
        "request",
        service = %service,
        method = %req.method(),
        uri = %req.uri(),
      )
    },
  ))
}

#[cfg(test)]
mod tests {
  use std::sync::Arc;

  use axum::http::StatusCode;
  use fleet_store_sqlite::SqliteCarStore;
  use tower::ServiceExt as _;

  use super::*;

  #[test]
  fn missing_file_yields_defaults() {
    let cfg = ServerConfig::load(Path::new("/nonexistent/fleet.toml")).unwrap();
    // Env overrides may be set on CI; only check keys nothing overrides there.
    assert_eq!(cfg.service_name, ServerConfig::default().service_name);
    assert_eq!(cfg.store_path, ServerConfig::default().store_path);
  }

  #[test]
  fn address_joins_host_and_port() {
    let cfg = ServerConfig {
      host: "127.0.0.1".into(),
      port: 9000,
      ..ServerConfig::default()
    };
    assert_eq!(cfg.address(), "127.0.0.1:9000");
  }

  #[test]
  fn publisher_follows_endpoint() {
    let cfg = ServerConfig::default();
    assert!(matches!(Publisher::from_config(&cfg).unwrap(), Publisher::Log(_)));

    let cfg = ServerConfig {
      event_endpoint: Some("http://127.0.0.1:1/events".into()),
      ..ServerConfig::default()
    };
    let publisher = Publisher::from_config(&cfg).unwrap();
    assert!(matches!(publisher, Publisher::Http(_)));
    assert_eq!(publisher.event_bus(), "cars");
  }

  #[tokio::test]
  async fn traced_app_serves_cars() {
    let store = SqliteCarStore::open_in_memory().await.unwrap();
    let publisher = Publisher::Log(LogEventPublisher::new("cars"));
    let router = app(Dispatcher::new(Arc::new(store), Arc::new(publisher)), "CarManager");

    let req = Request::builder()
      .method("GET")
      .uri("/cars")
      .body(Body::empty())
      .unwrap();
    let resp = router.oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body, serde_json::json!([]));
  }
}

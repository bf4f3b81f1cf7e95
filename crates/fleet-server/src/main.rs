//! fleet server binary.
//!
//! Reads `config.toml` (or the path specified with `--config`), opens the
//! SQLite car store, selects an event publisher, and serves the `/cars` API
//! over HTTP.

use std::{path::PathBuf, sync::Arc};

use anyhow::Context as _;
use clap::Parser;
use fleet_api::Dispatcher;
use fleet_server::{Publisher, ServerConfig};
use fleet_store_sqlite::SqliteCarStore;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Autonomous car fleet inventory server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  let cli = Cli::parse();

  // Load configuration first; it carries the default log level.
  let cfg = ServerConfig::load(&cli.config)
    .with_context(|| format!("failed to read config from {}", cli.config.display()))?;

  // Initialise tracing.
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .parse_lossy(std::env::var("RUST_LOG").unwrap_or_else(|_| cfg.log_level.clone())),
    )
    .init();

  let store = SqliteCarStore::open(&cfg.store_path, &cfg.table_name)
    .await
    .with_context(|| {
      format!(
        "failed to open table {} in store at {:?}",
        cfg.table_name, cfg.store_path
      )
    })?;

  let publisher = Publisher::from_config(&cfg).context("failed to build event publisher")?;
  match &cfg.event_endpoint {
    Some(url) => tracing::info!(event_bus = %cfg.event_bus, %url, "publishing events over HTTP"),
    None => tracing::info!(event_bus = %cfg.event_bus, "no event endpoint; logging events"),
  }

  let dispatcher = Dispatcher::new(Arc::new(store), Arc::new(publisher));
  let app = fleet_server::app(dispatcher, &cfg.service_name);
  let address = cfg.address();

  tracing::info!(service = %cfg.service_name, "Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app).await.context("server error")?;

  Ok(())
}

//! `fleet` — command-line client for the fleet inventory API.
//!
//! # Usage
//!
//! ```
//! fleet list
//! fleet get 1
//! fleet create --model Model_2 --year 2024
//! fleet update 1 --model Model_1 --status Rented
//! fleet seed
//! fleet --url http://fleet.internal:8080 list
//! ```

mod client;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use client::ApiClient;
use fleet_core::car::CarInput;
use serde::{Deserialize, Serialize};

// ─── CLI args ─────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "fleet", about = "Client for the autonomous car fleet inventory")]
struct Cli {
  /// Path to a TOML config file (url).
  #[arg(short, long, value_name = "FILE")]
  config: Option<std::path::PathBuf>,

  /// Base URL of the fleet server (default: http://localhost:8080).
  #[arg(long, env = "FLEET_URL")]
  url: Option<String>,

  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
  /// List every car.
  List,
  /// Show one car.
  Get { car_id: String },
  /// Register a new car.
  Create(CarArgs),
  /// Replace every field of an existing car.
  Update {
    #[arg(id = "update_car_id", value_name = "CAR_ID")]
    car_id: String,
    #[command(flatten)]
    car:    CarArgs,
  },
  /// Create the three demo cars `1`, `2` and `3`.
  Seed,
}

#[derive(Args, Debug)]
struct CarArgs {
  /// Id to use instead of a server-assigned one (create only).
  #[arg(long)]
  car_id:        Option<String>,
  #[arg(long)]
  model:         Option<String>,
  #[arg(long)]
  year:          Option<i32>,
  #[arg(long)]
  status:        Option<String>,
  #[arg(long, allow_hyphen_values = true)]
  latitude:      Option<String>,
  #[arg(long, allow_hyphen_values = true)]
  longitude:     Option<String>,
  #[arg(long)]
  nb_passengers: Option<u32>,
  #[arg(long)]
  bike_rack:     Option<bool>,
}

impl From<CarArgs> for CarInput {
  fn from(a: CarArgs) -> Self {
    CarInput {
      car_id:        a.car_id,
      model:         a.model,
      year:          a.year,
      status:        a.status,
      latitude:      a.latitude,
      longitude:     a.longitude,
      nb_passengers: a.nb_passengers,
      bike_rack:     a.bike_rack,
    }
  }
}

// ─── Config file ──────────────────────────────────────────────────────────────

/// Shape of the optional TOML config file.
#[derive(Deserialize, Default)]
struct ConfigFile {
  #[serde(default)]
  url: String,
}

// ─── Entry point ──────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
  let cli = Cli::parse();

  let file_cfg: ConfigFile = if let Some(path) = &cli.config {
    let raw = std::fs::read_to_string(path)
      .with_context(|| format!("reading config file {}", path.display()))?;
    toml::from_str(&raw).context("parsing config file")?
  } else {
    ConfigFile::default()
  };

  // CLI flags override config file, which overrides defaults.
  let base_url = cli
    .url
    .or_else(|| (!file_cfg.url.is_empty()).then(|| file_cfg.url.clone()))
    .unwrap_or_else(|| "http://localhost:8080".to_string());

  let client = ApiClient::new(base_url)?;

  match cli.command {
    Command::List => print_json(&client.list_cars().await?)?,
    Command::Get { car_id } => print_json(&client.get_car(&car_id).await?)?,
    Command::Create(car) => {
      let ack = client.create_car(&car.into()).await?;
      println!("{} ({})", ack.message, ack.car_id);
    }
    Command::Update { car_id, car } => {
      let ack = client.update_car(&car_id, &car.into()).await?;
      println!("{} ({})", ack.message, ack.car_id);
    }
    Command::Seed => {
      for car in demo_fleet() {
        let ack = client.create_car(&car).await?;
        println!("{} ({})", ack.message, ack.car_id);
      }
    }
  }

  Ok(())
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
  println!("{}", serde_json::to_string_pretty(value)?);
  Ok(())
}

/// Three cars parked at the same spot, two of them on a ride.
fn demo_fleet() -> Vec<CarInput> {
  [("1", "Available", 0), ("2", "InCourse", 3), ("3", "InCourse", 1)]
    .into_iter()
    .map(|(id, status, passengers)| CarInput {
      car_id:        Some(id.to_string()),
      model:         Some("Model_1".to_string()),
      year:          Some(2024),
      status:        Some(status.to_string()),
      latitude:      Some("37.7".to_string()),
      longitude:     Some("-122.42".to_string()),
      nb_passengers: Some(passengers),
      bike_rack:     Some(false),
    })
    .collect()
}

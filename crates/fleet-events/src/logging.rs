use fleet_core::{car::CarRecord, event::EventEntry, publish::CarEventPublisher};

use crate::Result;

/// Publishes events to the process log instead of a remote bus.
#[derive(Debug, Clone)]
pub struct LogEventPublisher {
  event_bus: String,
}

impl LogEventPublisher {
  pub fn new(event_bus: impl Into<String>) -> Self {
    Self { event_bus: event_bus.into() }
  }
}

impl CarEventPublisher for LogEventPublisher {
  type Error = crate::Error;

  fn event_bus(&self) -> &str { &self.event_bus }

  async fn publish(&self, record: &CarRecord, event_type: &str) -> Result<()> {
    let entry = EventEntry::for_car(record, event_type, &self.event_bus)?;
    tracing::info!(
      source = %entry.source,
      detail_type = %entry.detail_type,
      event_bus = %entry.event_bus_name,
      detail = %entry.detail,
      "car event"
    );
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use chrono::Utc;
  use fleet_core::car::{CarInput, NewCar};

  use super::*;

  #[tokio::test]
  async fn log_publisher_always_succeeds() {
    let now = Utc::now();
    let record = NewCar::for_create(CarInput {
      model: Some("Model_2".into()),
      year: Some(2024),
      ..CarInput::default()
    })
    .unwrap()
    .into_record(now, now);

    let publisher = LogEventPublisher::new("cars");
    assert_eq!(publisher.event_bus(), "cars");
    publisher.publish(&record, "a.test.event").await.unwrap();
  }
}

//! The `CarEventPublisher` trait.

use std::future::Future;

use crate::car::CarRecord;

/// Announces car mutations on a named event channel.
///
/// Implementations derive an [`EventEntry`](crate::event::EventEntry) from
/// the record and send it once. Delivery is at most once: a failure is
/// reported to the caller and never retried.
pub trait CarEventPublisher: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Name of the channel events are addressed to.
  fn event_bus(&self) -> &str;

  fn publish<'a>(
    &'a self,
    record: &'a CarRecord,
    event_type: &'a str,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a;
}

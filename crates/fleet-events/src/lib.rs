//! Event-channel publishers for car mutations.
//!
//! Both publishers implement [`fleet_core::publish::CarEventPublisher`]:
//!
//! - [`HttpEventPublisher`] posts each [`EventEntry`](fleet_core::event::EventEntry)
//!   as JSON to an event-bus ingestion endpoint.
//! - [`LogEventPublisher`] writes each entry to the `tracing` log; used when
//!   no endpoint is configured.
//!
//! Neither retries. A failed send is returned to the caller and the event is
//! lost.

mod http;
mod logging;

pub mod error;

pub use error::{Error, Result};
pub use http::HttpEventPublisher;
pub use logging::LogEventPublisher;

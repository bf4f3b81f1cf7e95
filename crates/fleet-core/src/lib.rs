//! Core types and trait definitions for the fleet inventory service.
//!
//! This crate is deliberately free of HTTP and database dependencies.
//! Storage backends, event publishers and the request dispatcher all depend on
//! it; it depends on nothing proprietary.

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod car;
pub mod error;
pub mod event;
pub mod publish;
pub mod store;

pub use error::{Error, Result};

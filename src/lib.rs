//! Kafka fleet metadata syncer
//!
//! Pulls live consumer-group state from a fleet of independently operated
//! Kafka clusters on a fixed cadence and converges a local metadata store
//! to match reality.

pub mod config;
pub mod dispatcher;
pub mod error;
pub mod metrics;
pub mod model;
pub mod sources;
pub mod store;
pub mod tasks;

pub use error::{Error, Result};

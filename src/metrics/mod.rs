//! Prometheus metrics for the metadata syncer

mod prometheus;

pub use prometheus::*;

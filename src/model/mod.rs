//! Domain types for fleet metadata reconciliation

mod cluster;
mod group;

pub use cluster::*;
pub use group::*;

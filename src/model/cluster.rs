//! Physical cluster identity

use serde::{Deserialize, Serialize};

/// One independently operated Kafka cluster in the fleet.
///
/// Identity is immutable for the lifetime of a reconciliation run; the
/// dispatcher supplies it per invocation.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PhysicalCluster {
    /// Fleet-wide unique cluster id
    pub id: i64,

    /// Human-readable cluster name
    pub name: String,

    /// Base URL of the cluster's admin surface
    pub admin_url: String,
}

impl PhysicalCluster {
    pub fn new(id: i64, name: impl Into<String>, admin_url: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            admin_url: admin_url.into(),
        }
    }
}

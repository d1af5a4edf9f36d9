//! Scheduled per-cluster tasks
//!
//! Each task implements [`ClusterTask`] and is registered by name with the
//! dispatcher, which owns cadence, timeout and outcome policy. Tasks hold no
//! mutable state across invocations, so the same task instance may run for
//! different clusters concurrently.

pub mod group_sync;
pub mod topic_filter;
pub mod topic_sync;

pub use group_sync::GroupSyncTask;
pub use topic_sync::TopicSyncTask;

use async_trait::async_trait;

use crate::error::Result;
use crate::model::{PhysicalCluster, SyncOutcome};

/// A unit of scheduled reconciliation work scoped to one cluster.
///
/// Contract for callers: invocations for different clusters may overlap,
/// but invocations for the same cluster must be serialized — the task
/// assumes single-writer access to that cluster's stored records for the
/// duration of a run. The dispatcher guarantees this structurally.
#[async_trait]
pub trait ClusterTask: Send + Sync {
    /// Execute one run for `cluster`, triggered at `trigger_time_ms`
    /// (epoch milliseconds). An `Err` means the run produced nothing
    /// usable; `PartialFailure` means results were captured but are
    /// incomplete.
    async fn run(&self, cluster: &PhysicalCluster, trigger_time_ms: i64) -> Result<SyncOutcome>;
}

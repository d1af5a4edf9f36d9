//! Metadata store
//!
//! Long-lived home of reconciled group metadata. The reconciliation task is
//! the single writer for a given cluster during a run; the dispatcher
//! guarantees same-cluster runs never overlap.

mod memory;

pub use memory::MemoryMetadataStore;

use async_trait::async_trait;

use crate::error::Result;
use crate::model::{Group, StoredGroup};

/// Persistence seam for reconciled group metadata.
#[async_trait]
pub trait MetadataStore: Send + Sync {
    /// Upsert every given group for `cluster_id`, stamping each record with
    /// `as_of_ms` as its freshness marker. Fully supersedes (not merges) the
    /// stored copy of each group present in `groups`. Safe to call with an
    /// empty collection; idempotent under retry with the same `as_of_ms`.
    async fn replace_all(&self, cluster_id: i64, groups: Vec<Group>, as_of_ms: i64) -> Result<()>;

    /// Delete records for `cluster_id` whose freshness marker is strictly
    /// older than `cutoff_ms`. Returns the number of records removed.
    async fn delete_older_than(&self, cluster_id: i64, cutoff_ms: i64) -> Result<usize>;

    /// All stored records for `cluster_id`, in no particular order.
    async fn list_groups(&self, cluster_id: i64) -> Result<Vec<StoredGroup>>;
}

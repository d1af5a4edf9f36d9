//! Access to remote cluster metadata
//!
//! All remote-system access goes through the traits in this module so that
//! tasks stay testable against recording fakes.

mod http;
mod topic_cache;

pub use http::HttpMetadataClient;
pub use topic_cache::TopicCatalogCache;

use std::collections::HashSet;

use async_trait::async_trait;

use crate::error::Result;
use crate::model::{Group, PhysicalCluster};

/// Live consumer-group state on a remote cluster.
///
/// Both calls may fail with a transport error; implementations bound each
/// call with their own timeout so a slow cluster cannot consume the
/// dispatcher-level budget of a whole run.
#[async_trait]
pub trait GroupSource: Send + Sync {
    /// Enumerate all consumer group names currently known to the cluster.
    async fn list_group_names(&self, cluster: &PhysicalCluster) -> Result<Vec<String>>;

    /// Fetch full detail for one group.
    ///
    /// Returns `Ok(None)` when the group vanished between enumeration and
    /// description; the remote system is allowed to change state mid-scan.
    async fn describe_group(
        &self,
        cluster: &PhysicalCluster,
        name: &str,
    ) -> Result<Option<Group>>;
}

/// Live topic names on a remote cluster, consumed by the topic sync task.
#[async_trait]
pub trait TopicSource: Send + Sync {
    async fn list_topic_names(&self, cluster: &PhysicalCluster) -> Result<Vec<String>>;
}

/// Read-only snapshot view of the topics known to exist per cluster.
///
/// Backed by a local cache that a sibling sync task refreshes on its own
/// cadence; cheap and infallible by contract. Staleness is tolerated by the
/// consumers of this view.
pub trait TopicCatalog: Send + Sync {
    /// Topic names currently known for `cluster_id`. Unknown clusters
    /// yield an empty set.
    fn known_topics(&self, cluster_id: i64) -> HashSet<String>;
}

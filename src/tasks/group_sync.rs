//! Consumer group reconciliation task
//!
//! Pulls the live consumer-group set from one cluster, cross-validates topic
//! references against the topic catalog snapshot, and converges the metadata
//! store to match. Failure isolation is per-group: one bad describe never
//! aborts the scan, but any per-group failure suppresses garbage collection
//! for the whole run, because an incomplete scan cannot distinguish "group
//! truly gone" from "group I failed to fetch this time".

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use futures::stream::{self, StreamExt};
use tracing::{error, info, warn};

use crate::error::Result;
use crate::metrics;
use crate::model::{Group, PhysicalCluster, SyncOutcome};
use crate::sources::{GroupSource, TopicCatalog};
use crate::store::MetadataStore;
use crate::tasks::topic_filter::retain_known_topics;
use crate::tasks::ClusterTask;

/// Minimum age past the trigger time before a stored record may be pruned.
/// Absorbs timing skew between consecutive runs and between the group and
/// topic sync cycles.
pub const DEFAULT_GC_SAFETY_MARGIN: Duration = Duration::from_secs(5 * 60);

/// Default bound on concurrent per-group describe calls
pub const DEFAULT_FETCH_CONCURRENCY: usize = 8;

/// The fleet metadata reconciliation task
pub struct GroupSyncTask {
    source: Arc<dyn GroupSource>,
    catalog: Arc<dyn TopicCatalog>,
    store: Arc<dyn MetadataStore>,
    gc_safety_margin: Duration,
    fetch_concurrency: usize,
}

impl GroupSyncTask {
    pub fn new(
        source: Arc<dyn GroupSource>,
        catalog: Arc<dyn TopicCatalog>,
        store: Arc<dyn MetadataStore>,
    ) -> Self {
        Self {
            source,
            catalog,
            store,
            gc_safety_margin: DEFAULT_GC_SAFETY_MARGIN,
            fetch_concurrency: DEFAULT_FETCH_CONCURRENCY,
        }
    }

    /// Override the GC safety margin (deployment knob)
    pub fn with_gc_safety_margin(mut self, margin: Duration) -> Self {
        self.gc_safety_margin = margin;
        self
    }

    /// Override the describe-call concurrency bound
    pub fn with_fetch_concurrency(mut self, concurrency: usize) -> Self {
        self.fetch_concurrency = concurrency.max(1);
        self
    }

    /// Describe every enumerated group, bounded-concurrently.
    ///
    /// Returns the successfully fetched groups (sorted by name so the
    /// stored result does not depend on completion order) and the count of
    /// per-group fetch failures. Vanished groups are skipped silently.
    async fn fetch_groups(
        &self,
        cluster: &PhysicalCluster,
        names: Vec<String>,
    ) -> (Vec<Group>, usize) {
        let results: Vec<(String, Result<Option<Group>>)> = stream::iter(names)
            .map(|name| async move {
                let result = self.source.describe_group(cluster, &name).await;
                (name, result)
            })
            .buffer_unordered(self.fetch_concurrency)
            .collect()
            .await;

        let mut groups = Vec::new();
        let mut failures = 0usize;

        for (name, result) in results {
            match result {
                Ok(Some(group)) => groups.push(group),
                // Vanished between enumeration and description
                Ok(None) => {}
                Err(e) => {
                    error!(
                        cluster = cluster.id,
                        group = %name,
                        error = %e,
                        "Failed to describe consumer group"
                    );
                    metrics::GROUP_FETCH_FAILURES
                        .with_label_values(&[&cluster.name])
                        .inc();
                    failures += 1;
                }
            }
        }

        groups.sort_by(|a, b| a.name.cmp(&b.name));
        (groups, failures)
    }
}

#[async_trait]
impl ClusterTask for GroupSyncTask {
    async fn run(&self, cluster: &PhysicalCluster, trigger_time_ms: i64) -> Result<SyncOutcome> {
        // Nothing meaningful to reconcile without a name list; enumeration
        // failure propagates and no store mutation happens.
        let names = self.source.list_group_names(cluster).await?;
        let enumerated = names.len();

        let (groups, failures) = self.fetch_groups(cluster, names).await;

        // One snapshot per run keeps filtering consistent across groups.
        let known = self.catalog.known_topics(cluster.id);
        let groups: Vec<Group> = groups
            .into_iter()
            .map(|g| retain_known_topics(g, &known))
            .collect();

        let collected = groups.len();

        // A partial result is strictly better than a stale one: replace
        // unconditionally, stamped with this run's trigger time.
        self.store
            .replace_all(cluster.id, groups, trigger_time_ms)
            .await?;

        metrics::GROUPS_COLLECTED
            .with_label_values(&[&cluster.name])
            .set(collected as f64);

        if failures > 0 {
            // Incomplete scan: pruning now could destroy records for groups
            // we merely failed to fetch.
            warn!(
                cluster = cluster.id,
                enumerated,
                collected,
                failures,
                "Group sync completed with failures, skipping garbage collection"
            );
            return Ok(SyncOutcome::PartialFailure);
        }

        let margin_ms = i64::try_from(self.gc_safety_margin.as_millis()).unwrap_or(i64::MAX);
        let cutoff_ms = trigger_time_ms.saturating_sub(margin_ms);
        let deleted = self.store.delete_older_than(cluster.id, cutoff_ms).await?;
        if deleted > 0 {
            metrics::GROUPS_PRUNED
                .with_label_values(&[&cluster.name])
                .inc_by(deleted as u64);
        }

        info!(
            cluster = cluster.id,
            enumerated, collected, deleted, "Group sync completed"
        );

        Ok(SyncOutcome::AllSucceeded)
    }
}

//! Topic catalog sync task
//!
//! Keeps the local topic catalog cache fresh so the group sync task can
//! cross-validate topic references without touching the remote cluster a
//! second time. Runs on its own cadence, independent of group sync.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use crate::error::Result;
use crate::model::{PhysicalCluster, SyncOutcome};
use crate::sources::{TopicCatalogCache, TopicSource};
use crate::tasks::ClusterTask;

/// Refreshes one cluster's entry in the topic catalog cache per run
pub struct TopicSyncTask {
    source: Arc<dyn TopicSource>,
    cache: Arc<TopicCatalogCache>,
}

impl TopicSyncTask {
    pub fn new(source: Arc<dyn TopicSource>, cache: Arc<TopicCatalogCache>) -> Self {
        Self { source, cache }
    }
}

#[async_trait]
impl ClusterTask for TopicSyncTask {
    async fn run(&self, cluster: &PhysicalCluster, _trigger_time_ms: i64) -> Result<SyncOutcome> {
        let names = self.source.list_topic_names(cluster).await?;
        let count = names.len();

        self.cache.replace(cluster.id, names.into_iter().collect());

        info!(cluster = cluster.id, topics = count, "Topic sync completed");
        Ok(SyncOutcome::AllSucceeded)
    }
}

//! Integration tests for the topic catalog sync task
//!
//! Verifies that a successful run replaces the cluster's cache entry and
//! that a failed fetch propagates without clobbering the previous entry.

use std::sync::Arc;

use async_trait::async_trait;

use kafka_metadata_syncer::error::{Error, Result};
use kafka_metadata_syncer::model::{PhysicalCluster, SyncOutcome};
use kafka_metadata_syncer::sources::{TopicCatalog, TopicCatalogCache, TopicSource};
use kafka_metadata_syncer::tasks::{ClusterTask, TopicSyncTask};

// ============================================================================
// Test Fakes
// ============================================================================

/// Per-run listing behavior
enum Listing {
    Topics(Vec<String>),
    Fails,
}

struct FakeTopicSource(Listing);

#[async_trait]
impl TopicSource for FakeTopicSource {
    async fn list_topic_names(&self, _cluster: &PhysicalCluster) -> Result<Vec<String>> {
        match &self.0 {
            Listing::Topics(topics) => Ok(topics.clone()),
            Listing::Fails => Err(Error::transport("metadata request failed")),
        }
    }
}

fn cluster() -> PhysicalCluster {
    PhysicalCluster::new(1, "c1", "http://admin-1:8080")
}

fn topics(names: &[&str]) -> Vec<String> {
    names.iter().map(|n| n.to_string()).collect()
}

// ============================================================================
// Tests
// ============================================================================

#[tokio::test]
async fn successful_run_replaces_the_cache_entry() {
    let cache = Arc::new(TopicCatalogCache::new());
    cache.replace(1, topics(&["stale"]).into_iter().collect());

    let source = Arc::new(FakeTopicSource(Listing::Topics(topics(&["t1", "t2"]))));
    let task = TopicSyncTask::new(source, cache.clone());

    let outcome = task.run(&cluster(), 1_000_000).await.unwrap();

    assert_eq!(outcome, SyncOutcome::AllSucceeded);
    assert_eq!(
        cache.known_topics(1),
        topics(&["t1", "t2"]).into_iter().collect()
    );
}

#[tokio::test]
async fn failed_fetch_propagates_and_keeps_previous_entry() {
    let cache = Arc::new(TopicCatalogCache::new());
    cache.replace(1, topics(&["t1"]).into_iter().collect());

    let task = TopicSyncTask::new(Arc::new(FakeTopicSource(Listing::Fails)), cache.clone());

    let result = task.run(&cluster(), 1_000_000).await;

    assert!(matches!(result, Err(Error::Transport(_))));
    // The snapshot the group sync task reads stays at its last good state
    assert_eq!(cache.known_topics(1), topics(&["t1"]).into_iter().collect());
}

#[tokio::test]
async fn run_only_touches_its_own_cluster_entry() {
    let cache = Arc::new(TopicCatalogCache::new());
    cache.replace(2, topics(&["other"]).into_iter().collect());

    let source = Arc::new(FakeTopicSource(Listing::Topics(topics(&["t1"]))));
    let task = TopicSyncTask::new(source, cache.clone());

    task.run(&cluster(), 1_000_000).await.unwrap();

    assert_eq!(cache.known_topics(1), topics(&["t1"]).into_iter().collect());
    assert_eq!(cache.known_topics(2), topics(&["other"]).into_iter().collect());
}

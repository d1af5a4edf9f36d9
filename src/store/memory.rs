//! In-memory metadata store

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::error::Result;
use crate::model::{Group, StoredGroup};
use crate::store::MetadataStore;

/// Process-local metadata store keyed by (cluster, group name)
#[derive(Default)]
pub struct MemoryMetadataStore {
    records: RwLock<HashMap<i64, HashMap<String, StoredGroup>>>,
}

impl MemoryMetadataStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl MetadataStore for MemoryMetadataStore {
    async fn replace_all(&self, cluster_id: i64, groups: Vec<Group>, as_of_ms: i64) -> Result<()> {
        let mut records = self.records.write().await;
        let cluster_records = records.entry(cluster_id).or_default();

        for group in groups {
            cluster_records.insert(
                group.name.clone(),
                StoredGroup {
                    cluster_id,
                    group,
                    as_of_ms,
                },
            );
        }

        Ok(())
    }

    async fn delete_older_than(&self, cluster_id: i64, cutoff_ms: i64) -> Result<usize> {
        let mut records = self.records.write().await;
        let Some(cluster_records) = records.get_mut(&cluster_id) else {
            return Ok(0);
        };

        let before = cluster_records.len();
        cluster_records.retain(|_, stored| stored.as_of_ms >= cutoff_ms);
        Ok(before - cluster_records.len())
    }

    async fn list_groups(&self, cluster_id: i64) -> Result<Vec<StoredGroup>> {
        let records = self.records.read().await;
        Ok(records
            .get(&cluster_id)
            .map(|cluster_records| cluster_records.values().cloned().collect())
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn replace_all_supersedes_existing_record() {
        let store = MemoryMetadataStore::new();

        let mut g1 = Group::new("g1");
        g1.topic_members.push(crate::model::TopicMembership::new("t1"));
        store.replace_all(1, vec![g1], 1_000).await.unwrap();

        // Second run observes the same group with no topics
        store.replace_all(1, vec![Group::new("g1")], 2_000).await.unwrap();

        let stored = store.list_groups(1).await.unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].as_of_ms, 2_000);
        assert!(stored[0].group.topic_members.is_empty());
    }

    #[tokio::test]
    async fn replace_all_accepts_empty_collection() {
        let store = MemoryMetadataStore::new();
        store.replace_all(1, vec![], 1_000).await.unwrap();
        assert!(store.list_groups(1).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn delete_older_than_is_strict() {
        let store = MemoryMetadataStore::new();
        store.replace_all(1, vec![Group::new("old")], 999).await.unwrap();
        store.replace_all(1, vec![Group::new("at-cutoff")], 1_000).await.unwrap();
        store.replace_all(1, vec![Group::new("fresh")], 1_001).await.unwrap();

        let deleted = store.delete_older_than(1, 1_000).await.unwrap();
        assert_eq!(deleted, 1);

        let mut names: Vec<String> = store
            .list_groups(1)
            .await
            .unwrap()
            .into_iter()
            .map(|s| s.group.name)
            .collect();
        names.sort();
        assert_eq!(names, vec!["at-cutoff", "fresh"]);
    }

    #[tokio::test]
    async fn delete_scoped_to_cluster() {
        let store = MemoryMetadataStore::new();
        store.replace_all(1, vec![Group::new("g")], 100).await.unwrap();
        store.replace_all(2, vec![Group::new("g")], 100).await.unwrap();

        store.delete_older_than(1, 10_000).await.unwrap();

        assert!(store.list_groups(1).await.unwrap().is_empty());
        assert_eq!(store.list_groups(2).await.unwrap().len(), 1);
    }
}

//! Local topic catalog cache
//!
//! The group sync task reads this as a point-in-time snapshot; the topic
//! sync task replaces whole per-cluster entries as it observes the remote
//! clusters. The two cadences are independent, which is exactly why the
//! consistency filter exists.

use std::collections::{HashMap, HashSet};
use std::sync::RwLock;

use crate::sources::TopicCatalog;

/// Shared in-process cache of known topic names per cluster
#[derive(Default)]
pub struct TopicCatalogCache {
    topics: RwLock<HashMap<i64, HashSet<String>>>,
}

impl TopicCatalogCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the full topic set for one cluster.
    pub fn replace(&self, cluster_id: i64, topics: HashSet<String>) {
        self.topics
            .write()
            .expect("topic catalog lock poisoned")
            .insert(cluster_id, topics);
    }
}

impl TopicCatalog for TopicCatalogCache {
    fn known_topics(&self, cluster_id: i64) -> HashSet<String> {
        self.topics
            .read()
            .expect("topic catalog lock poisoned")
            .get(&cluster_id)
            .cloned()
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_cluster_yields_empty_set() {
        let cache = TopicCatalogCache::new();
        assert!(cache.known_topics(42).is_empty());
    }

    #[test]
    fn replace_supersedes_previous_entry() {
        let cache = TopicCatalogCache::new();
        cache.replace(1, ["t1".to_string(), "t2".to_string()].into());
        cache.replace(1, ["t3".to_string()].into());

        let known = cache.known_topics(1);
        assert_eq!(known, ["t3".to_string()].into());
    }
}

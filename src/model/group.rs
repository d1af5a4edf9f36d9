//! Consumer group metadata as observed on a cluster at a point in time

use serde::{Deserialize, Serialize};

/// Topic name used by groups that have joined but consumed nothing.
///
/// Always treated as valid by the consistency filter, regardless of the
/// topic catalog contents.
pub const EMPTY_TOPIC: &str = "";

/// A consumer group as observed on one cluster during one scan.
///
/// Created fresh every run; the metadata store's persisted copy is the only
/// long-lived representation.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Group {
    /// Group name, unique within its cluster
    pub name: String,

    /// Coordinator-reported group state
    #[serde(default)]
    pub state: GroupState,

    /// Current members of the group
    #[serde(default)]
    pub members: Vec<GroupMember>,

    /// Topics the group tracks consumption against
    #[serde(default)]
    pub topic_members: Vec<TopicMembership>,
}

impl Group {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            state: GroupState::Unknown,
            members: Vec::new(),
            topic_members: Vec::new(),
        }
    }
}

/// Coordinator-side state of a consumer group
#[derive(Clone, Copy, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "PascalCase")]
pub enum GroupState {
    Stable,
    Empty,
    PreparingRebalance,
    CompletingRebalance,
    Dead,
    #[default]
    Unknown,
}

/// One client member of a consumer group
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct GroupMember {
    /// Coordinator-assigned member id
    pub member_id: String,

    /// Client-supplied id
    #[serde(default)]
    pub client_id: String,

    /// Host the member connected from
    #[serde(default)]
    pub host: String,
}

/// Association between a group and one topic it consumes.
///
/// `topic_name` must either be [`EMPTY_TOPIC`] or appear in the topic
/// catalog snapshot taken during the same run; the consistency filter
/// enforces this before anything reaches the store.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TopicMembership {
    /// Consumed topic, or [`EMPTY_TOPIC`]
    pub topic_name: String,

    /// Per-partition consumption detail
    #[serde(default)]
    pub partitions: Vec<PartitionOffset>,
}

impl TopicMembership {
    pub fn new(topic_name: impl Into<String>) -> Self {
        Self {
            topic_name: topic_name.into(),
            partitions: Vec::new(),
        }
    }
}

/// Committed consumption position on one partition
#[derive(Clone, Copy, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PartitionOffset {
    pub partition: i32,
    pub committed_offset: i64,
}

/// Outcome of one reconciliation run for one cluster.
///
/// Returned to the dispatcher, never persisted. The dispatcher owns
/// retry and alerting policy.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SyncOutcome {
    /// Every enumerated group was fetched (or had vanished benignly)
    AllSucceeded,
    /// At least one per-group fetch failed; results are incomplete
    PartialFailure,
}

/// A group record as persisted by the metadata store
#[derive(Clone, Debug, PartialEq)]
pub struct StoredGroup {
    pub cluster_id: i64,
    pub group: Group,
    /// Freshness marker: trigger time of the run that last confirmed
    /// this record
    pub as_of_ms: i64,
}

//! Consistency filter for topic references
//!
//! The group sync and topic sync cycles observe the remote cluster at
//! slightly different instants, so a freshly fetched group may legitimately
//! reference a topic the catalog no longer (or does not yet) contain. A
//! stale reference is dropped, not treated as an error; without this,
//! dangling topic references would reach the store.

use std::collections::HashSet;

use crate::model::{Group, EMPTY_TOPIC};

/// Return `group` with only those topic memberships whose topic name is in
/// `known`, keeping the [`EMPTY_TOPIC`] sentinel unconditionally.
///
/// Pure and total: never fails, and the caller's catalog is untouched.
pub fn retain_known_topics(mut group: Group, known: &HashSet<String>) -> Group {
    group
        .topic_members
        .retain(|tm| tm.topic_name == EMPTY_TOPIC || known.contains(&tm.topic_name));
    group
}

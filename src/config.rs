//! Service configuration
//!
//! Loaded from a YAML file at startup. Cadence, timeout and GC knobs live
//! here so deployments with different scheduling intervals can retune the
//! safety margin without a rebuild.

use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use cron::Schedule;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::model::PhysicalCluster;

/// Top-level service settings
#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    /// Port for the metrics/health HTTP endpoint
    #[serde(default = "default_metrics_port")]
    pub metrics_port: u16,

    /// Per-request timeout for the remote admin surface, in seconds
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// The fleet to reconcile
    pub clusters: Vec<PhysicalCluster>,

    /// Group sync task settings
    #[serde(default)]
    pub group_sync: GroupSyncSettings,

    /// Topic sync task settings
    #[serde(default)]
    pub topic_sync: TopicSyncSettings,
}

fn default_metrics_port() -> u16 {
    8080
}

fn default_request_timeout_secs() -> u64 {
    10
}

/// Group sync task settings
#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupSyncSettings {
    /// Cron expression (7-field: sec min hour dom month dow year)
    #[serde(default = "default_minutely_cron")]
    pub cron: String,

    /// Hard budget per cluster invocation, in seconds
    #[serde(default = "default_group_sync_timeout_secs")]
    pub timeout_secs: u64,

    /// Minimum age past the trigger time before a stored record may be
    /// garbage-collected, in seconds
    #[serde(default = "default_gc_safety_margin_secs")]
    pub gc_safety_margin_secs: u64,

    /// Bound on concurrent per-group describe calls
    #[serde(default = "default_fetch_concurrency")]
    pub fetch_concurrency: usize,
}

impl Default for GroupSyncSettings {
    fn default() -> Self {
        Self {
            cron: default_minutely_cron(),
            timeout_secs: default_group_sync_timeout_secs(),
            gc_safety_margin_secs: default_gc_safety_margin_secs(),
            fetch_concurrency: default_fetch_concurrency(),
        }
    }
}

/// Topic sync task settings
#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TopicSyncSettings {
    /// Cron expression (7-field: sec min hour dom month dow year)
    #[serde(default = "default_minutely_cron")]
    pub cron: String,

    /// Hard budget per cluster invocation, in seconds
    #[serde(default = "default_topic_sync_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for TopicSyncSettings {
    fn default() -> Self {
        Self {
            cron: default_minutely_cron(),
            timeout_secs: default_topic_sync_timeout_secs(),
        }
    }
}

fn default_minutely_cron() -> String {
    "0 * * * * * *".to_string()
}

fn default_group_sync_timeout_secs() -> u64 {
    120
}

fn default_topic_sync_timeout_secs() -> u64 {
    60
}

fn default_gc_safety_margin_secs() -> u64 {
    300
}

fn default_fetch_concurrency() -> usize {
    8
}

impl Settings {
    /// Load and validate settings from a YAML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        let settings: Settings = serde_yaml::from_str(&raw)
            .map_err(|e| Error::config(format!("Failed to parse settings: {}", e)))?;
        settings.validate()?;
        Ok(settings)
    }

    /// Validate the settings
    pub fn validate(&self) -> Result<()> {
        if self.clusters.is_empty() {
            return Err(Error::validation("At least one cluster must be configured"));
        }

        for cluster in &self.clusters {
            if cluster.name.is_empty() {
                return Err(Error::validation(format!(
                    "Cluster {} must have a name",
                    cluster.id
                )));
            }
            if cluster.admin_url.is_empty() {
                return Err(Error::validation(format!(
                    "Cluster {} must have an admin URL",
                    cluster.id
                )));
            }
        }

        let mut ids: Vec<i64> = self.clusters.iter().map(|c| c.id).collect();
        ids.sort_unstable();
        ids.dedup();
        if ids.len() != self.clusters.len() {
            return Err(Error::validation("Cluster ids must be unique"));
        }

        for (name, cron) in [
            ("groupSync", &self.group_sync.cron),
            ("topicSync", &self.topic_sync.cron),
        ] {
            Schedule::from_str(cron).map_err(|e| {
                Error::validation(format!("Invalid {} cron expression '{}': {}", name, cron, e))
            })?;
        }

        if self.group_sync.timeout_secs == 0 || self.topic_sync.timeout_secs == 0 {
            return Err(Error::validation("Task timeouts must be greater than 0"));
        }

        if self.group_sync.gc_safety_margin_secs == 0 {
            return Err(Error::validation(
                "gcSafetyMarginSecs must be greater than 0",
            ));
        }

        if self.group_sync.fetch_concurrency == 0 {
            return Err(Error::validation("fetchConcurrency must be greater than 0"));
        }

        if self.request_timeout_secs == 0 {
            return Err(Error::validation("requestTimeoutSecs must be greater than 0"));
        }

        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

impl GroupSyncSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn gc_safety_margin(&self) -> Duration {
        Duration::from_secs(self.gc_safety_margin_secs)
    }
}

impl TopicSyncSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn minimal_settings() -> Settings {
        Settings {
            metrics_port: default_metrics_port(),
            request_timeout_secs: default_request_timeout_secs(),
            clusters: vec![PhysicalCluster::new(1, "c1", "http://admin-1:8080")],
            group_sync: GroupSyncSettings::default(),
            topic_sync: TopicSyncSettings::default(),
        }
    }

    #[test]
    fn minimal_settings_validate() {
        assert!(minimal_settings().validate().is_ok());
    }

    #[test]
    fn empty_cluster_list_is_rejected() {
        let mut settings = minimal_settings();
        settings.clusters.clear();
        assert!(settings.validate().is_err());
    }

    #[test]
    fn duplicate_cluster_ids_are_rejected() {
        let mut settings = minimal_settings();
        settings
            .clusters
            .push(PhysicalCluster::new(1, "c1-copy", "http://admin-2:8080"));
        assert!(settings.validate().is_err());
    }

    #[test]
    fn invalid_cron_is_rejected() {
        let mut settings = minimal_settings();
        settings.group_sync.cron = "not a cron".to_string();
        let err = settings.validate().unwrap_err();
        assert!(err.to_string().contains("cron"));
    }

    #[test]
    fn zero_gc_margin_is_rejected() {
        let mut settings = minimal_settings();
        settings.group_sync.gc_safety_margin_secs = 0;
        assert!(settings.validate().is_err());
    }

    #[test]
    fn load_applies_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "clusters:\n  - id: 7\n    name: prod\n    adminUrl: http://admin:8080"
        )
        .unwrap();

        let settings = Settings::load(file.path()).unwrap();
        assert_eq!(settings.metrics_port, 8080);
        assert_eq!(settings.group_sync.gc_safety_margin_secs, 300);
        assert_eq!(settings.clusters[0].id, 7);
    }
}

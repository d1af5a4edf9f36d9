//! HTTP-backed metadata client
//!
//! Talks to each cluster's admin surface:
//!
//! - `GET {admin_url}/v1/groups` — group names
//! - `GET {admin_url}/v1/groups/{name}` — group detail, 404 if vanished
//! - `GET {admin_url}/v1/topics` — topic names

use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;

use crate::error::{Error, Result};
use crate::model::{Group, PhysicalCluster};
use crate::sources::{GroupSource, TopicSource};

/// Metadata client over a cluster's admin HTTP surface
pub struct HttpMetadataClient {
    http: reqwest::Client,
}

impl HttpMetadataClient {
    /// Build a client whose individual requests are bounded by
    /// `request_timeout`. The bound must be well under the dispatcher-level
    /// task timeout.
    pub fn new(request_timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(request_timeout)
            .build()?;
        Ok(Self { http })
    }

    async fn get_names(&self, cluster: &PhysicalCluster, path: &str) -> Result<Vec<String>> {
        let url = format!("{}/v1/{}", cluster.admin_url.trim_end_matches('/'), path);
        let response = self.http.get(&url).send().await.map_err(|e| {
            Error::transport(format!("cluster {}: GET {}: {}", cluster.id, url, e))
        })?;

        if !response.status().is_success() {
            return Err(Error::transport(format!(
                "cluster {}: GET {} returned {}",
                cluster.id,
                url,
                response.status()
            )));
        }

        Ok(response.json::<Vec<String>>().await?)
    }
}

#[async_trait]
impl GroupSource for HttpMetadataClient {
    async fn list_group_names(&self, cluster: &PhysicalCluster) -> Result<Vec<String>> {
        self.get_names(cluster, "groups").await
    }

    async fn describe_group(
        &self,
        cluster: &PhysicalCluster,
        name: &str,
    ) -> Result<Option<Group>> {
        let url = format!(
            "{}/v1/groups/{}",
            cluster.admin_url.trim_end_matches('/'),
            name
        );
        let response = self.http.get(&url).send().await.map_err(|e| {
            Error::transport(format!("cluster {}: GET {}: {}", cluster.id, url, e))
        })?;

        // Group vanished between enumeration and description
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }

        if !response.status().is_success() {
            return Err(Error::transport(format!(
                "cluster {}: GET {} returned {}",
                cluster.id,
                url,
                response.status()
            )));
        }

        Ok(Some(response.json::<Group>().await?))
    }
}

#[async_trait]
impl TopicSource for HttpMetadataClient {
    async fn list_topic_names(&self, cluster: &PhysicalCluster) -> Result<Vec<String>> {
        self.get_names(cluster, "topics").await
    }
}

// Copyright (c) 2026 The clusterset authors
// SPDX-License-Identifier: Apache-2.0

//! EKS cluster discovery: cursor-paginated enumeration plus tag filtering.
//!
//! Discovery walks the EKS `ListClusters` cursor exactly as returned, then
//! describes each cluster to obtain its endpoint, certificate-authority data
//! and tag set. Any list or describe failure aborts the whole call: a
//! truncated desired-set downstream would make the diff engine misclassify
//! still-desired clusters as deletable.
//!
//! The EKS API sits behind the [`ClusterApi`] trait so discovery logic can
//! be tested against an in-memory fake.

use crate::error::{Error, Result};
use async_trait::async_trait;
use aws_sdk_eks::error::DisplayErrorContext;
use std::collections::BTreeMap;
use tracing::{debug, info};

/// A cluster as seen by the cloud provider. Produced transiently by
/// discovery; never persisted.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DiscoveredCluster {
    /// Cluster name, unique within the AWS account and region.
    pub name: String,

    /// API server endpoint URL.
    pub endpoint: String,

    /// Base64-encoded certificate-authority data.
    pub ca_data: String,

    /// Control-plane tags.
    pub tags: BTreeMap<String, String>,
}

/// One page of cluster names from the provider.
#[derive(Clone, Debug, Default)]
pub struct ClusterPage {
    /// Cluster names on this page.
    pub names: Vec<String>,

    /// Continuation cursor; `None` means this was the last page.
    pub next_token: Option<String>,
}

/// Narrow view of the EKS API used by discovery.
#[async_trait]
pub trait ClusterApi: Send + Sync {
    /// List one page of cluster names, starting at `next_token`.
    async fn list_clusters(&self, next_token: Option<String>) -> Result<ClusterPage>;

    /// Retrieve full attributes for one cluster.
    async fn describe_cluster(&self, name: &str) -> Result<DiscoveredCluster>;
}

/// [`ClusterApi`] implementation backed by the AWS SDK.
#[derive(Clone)]
pub struct EksClusterApi {
    client: aws_sdk_eks::Client,
}

impl EksClusterApi {
    /// Wrap an EKS client built from the resolved credential chain.
    #[must_use]
    pub fn new(client: aws_sdk_eks::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ClusterApi for EksClusterApi {
    async fn list_clusters(&self, next_token: Option<String>) -> Result<ClusterPage> {
        let output = self
            .client
            .list_clusters()
            .set_next_token(next_token)
            .send()
            .await
            .map_err(|e| {
                Error::Discovery(format!("listing clusters: {}", DisplayErrorContext(&e)))
            })?;

        Ok(ClusterPage {
            names: output.clusters().to_vec(),
            next_token: output.next_token().map(ToString::to_string),
        })
    }

    async fn describe_cluster(&self, name: &str) -> Result<DiscoveredCluster> {
        let output = self
            .client
            .describe_cluster()
            .name(name)
            .send()
            .await
            .map_err(|e| {
                Error::Discovery(format!(
                    "describing cluster {name:?}: {}",
                    DisplayErrorContext(&e)
                ))
            })?;

        let cluster = output
            .cluster()
            .ok_or_else(|| Error::Discovery(format!("describe of {name:?} returned no cluster")))?;

        let endpoint = cluster
            .endpoint()
            .ok_or_else(|| Error::Discovery(format!("cluster {name:?} has no endpoint")))?
            .to_string();

        let ca_data = cluster
            .certificate_authority()
            .and_then(|ca| ca.data())
            .ok_or_else(|| Error::Discovery(format!("cluster {name:?} has no CA data")))?
            .to_string();

        let tags = cluster
            .tags()
            .map(|t| t.iter().map(|(k, v)| (k.clone(), v.clone())).collect())
            .unwrap_or_default();

        Ok(DiscoveredCluster {
            name: name.to_string(),
            endpoint,
            ca_data,
            tags,
        })
    }
}

/// True if every selector entry is present on the cluster with exactly that
/// value. An empty selector matches every cluster.
#[must_use]
pub fn matches_tags(
    cluster_tags: &BTreeMap<String, String>,
    selector: &BTreeMap<String, String>,
) -> bool {
    selector
        .iter()
        .all(|(k, v)| cluster_tags.get(k).is_some_and(|value| value == v))
}

/// Enumerate all clusters matching the tag selector.
///
/// Follows the continuation cursor exactly as returned until the provider
/// reports no further pages, describing each cluster along the way.
///
/// # Errors
///
/// Returns the first list or describe error; no partial result is returned.
pub async fn discover_clusters(
    api: &dyn ClusterApi,
    selector_tags: &BTreeMap<String, String>,
) -> Result<Vec<DiscoveredCluster>> {
    info!("Computing desired clusters from EKS");

    let mut matched = Vec::new();
    let mut next_token = None;

    loop {
        debug!(cursor = ?next_token, "Calling EKS ListClusters");
        let page = api.list_clusters(next_token).await?;
        debug!(count = page.names.len(), "Listed cluster names");

        for name in &page.names {
            let cluster = api.describe_cluster(name).await?;

            if matches_tags(&cluster.tags, selector_tags) {
                matched.push(cluster);
            } else {
                debug!(
                    cluster = %name,
                    tags = ?cluster.tags,
                    selector = ?selector_tags,
                    "Cluster did not match selector"
                );
            }
        }

        next_token = page.next_token;
        if next_token.is_none() {
            break;
        }
    }

    info!(matched = matched.len(), "Discovery finished");
    Ok(matched)
}

#[cfg(test)]
#[path = "discovery_tests.rs"]
mod discovery_tests;

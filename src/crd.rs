// Copyright (c) 2026 The clusterset authors
// SPDX-License-Identifier: Apache-2.0

//! Custom Resource Definition for the `ClusterSet` resource.
//!
//! A `ClusterSet` declares a tag predicate over the EKS clusters visible to
//! a (possibly assumed) IAM role, plus a template applied to every Argo CD
//! cluster secret the operator synthesizes for a matching cluster.
//!
//! # Example
//!
//! ```rust
//! use clusterset::crd::{ClusterSelector, ClusterSetSpec, SecretTemplate};
//! use std::collections::BTreeMap;
//!
//! let spec = ClusterSetSpec {
//!     selector: ClusterSelector {
//!         role_arn: Some("arn:aws:iam::111122223333:role/discovery".to_string()),
//!         eks_tags: BTreeMap::from([("env".to_string(), "prod".to_string())]),
//!     },
//!     template: SecretTemplate::default(),
//! };
//! assert_eq!(spec.selector.eks_tags.len(), 1);
//! ```

use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Selector determining which EKS clusters are in scope.
///
/// A cluster matches when every `eksTags` entry is present on the cluster
/// with exactly that value. An empty tag map matches all clusters visible
/// to the role.
#[derive(Clone, Debug, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ClusterSelector {
    /// IAM role assumed before calling the EKS API. When absent, the
    /// default credential chain is used as-is.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role_arn: Option<String>,

    /// Tag-equality predicate over EKS control-plane tags (ANDed).
    #[serde(default)]
    pub eks_tags: BTreeMap<String, String>,
}

/// Template applied to every synthesized cluster secret.
#[derive(Clone, Debug, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SecretTemplate {
    /// Metadata merged onto each secret.
    #[serde(default)]
    pub metadata: SecretTemplateMetadata,
}

/// Metadata section of the secret template.
#[derive(Clone, Debug, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SecretTemplateMetadata {
    /// Labels merged onto each secret. The Argo CD sentinel label is always
    /// applied and cannot be overridden here.
    #[serde(default)]
    pub labels: BTreeMap<String, String>,

    /// Connection config written into each secret's auth payload.
    #[serde(default)]
    pub config: SecretTemplateConfig,
}

/// Connection config section of the secret template.
#[derive(Clone, Debug, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SecretTemplateConfig {
    /// AWS auth settings embedded in the secret payload.
    #[serde(default)]
    pub aws_auth_config: AwsAuthConfigTemplate,
}

/// AWS auth settings embedded in the secret payload.
#[derive(Clone, Debug, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct AwsAuthConfigTemplate {
    /// Role ARN Argo CD assumes when talking to the registered cluster.
    #[serde(default)]
    pub role_arn: String,
}

/// `ClusterSet` declares a set of EKS clusters to mirror into Argo CD
/// cluster secrets.
#[derive(CustomResource, Clone, Debug, Default, Serialize, Deserialize, JsonSchema)]
#[kube(
    group = "clusterset.dev",
    version = "v1alpha1",
    kind = "ClusterSet",
    namespaced,
    doc = "ClusterSet mirrors the EKS clusters matching a tag selector into Argo CD cluster secrets in its namespace."
)]
#[kube(status = "ClusterSetStatus")]
#[kube(printcolumn = r#"{"name":"Last Sync", "type":"date", "jsonPath":".status.lastSyncTime"}"#)]
#[serde(rename_all = "camelCase")]
pub struct ClusterSetSpec {
    /// Which clusters are in scope.
    #[serde(default)]
    pub selector: ClusterSelector,

    /// Template applied to every synthesized secret.
    #[serde(default)]
    pub template: SecretTemplate,
}

/// Observed state of a `ClusterSet`, written after each successful sync.
#[derive(Clone, Debug, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ClusterSetStatus {
    /// Names currently registered for this set.
    #[serde(default)]
    pub clusters: RegisteredClusters,

    /// RFC 3339 timestamp of the last successful sync.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_sync_time: Option<String>,

    /// Coarse lifecycle phase ("Synced").
    #[serde(default)]
    pub phase: String,

    /// Machine-readable reason for the current phase.
    #[serde(default)]
    pub reason: String,

    /// Human-readable message for the current phase.
    #[serde(default)]
    pub message: String,
}

/// Cluster names registered by the last successful sync.
#[derive(Clone, Debug, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisteredClusters {
    /// Sorted list of registered cluster names.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub names: Vec<String>,
}

#[cfg(test)]
#[path = "crd_tests.rs"]
mod crd_tests;

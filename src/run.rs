// Copyright (c) 2026 The clusterset authors
// SPDX-License-Identifier: Apache-2.0

//! One-shot command implementations shared with the controller.
//!
//! Each operation takes its collaborators ([`SecretStore`], [`ClusterApi`])
//! by reference so the same code path serves the CLI against real clients
//! and the tests against in-memory fakes.
//!
//! Dry-run behavior is intentionally asymmetric, matching the command
//! surface users rely on: `delete --dry-run` consults nothing at all, and
//! `create --dry-run` only describes the live cluster when the endpoint and
//! CA data were not both supplied on the command line. The set-level
//! commands always perform live discovery and skip only the registry
//! mutations.

use crate::diff::{apply_diff, compute_diff, sync_secrets, Diff, SyncSummary};
use crate::discovery::{discover_clusters, ClusterApi};
use crate::error::{Error, Result};
use crate::secret::{cluster_secret, cluster_secret_from_discovered};
use crate::store::{registration_selector, SecretStore};
use k8s_openapi::api::core::v1::Secret;
use std::collections::BTreeMap;
use tracing::info;

/// Inputs for the single-secret `create` and `delete` commands.
#[derive(Clone, Debug, Default)]
pub struct RecordConfig {
    /// Compute everything, mutate nothing.
    pub dry_run: bool,

    /// Target namespace.
    pub namespace: String,

    /// Cluster (and secret) name.
    pub name: String,

    /// API server endpoint; when absent the cluster is described live.
    pub endpoint: Option<String>,

    /// Base64 CA bundle; when absent the cluster is described live.
    pub ca_data: Option<String>,

    /// Labels merged onto the secret.
    pub labels: BTreeMap<String, String>,

    /// Role ARN written into the secret's auth payload.
    pub aws_auth_config_role_arn: String,
}

/// Inputs for the set-level commands (`create-missing`, `delete-missing`,
/// `sync`).
#[derive(Clone, Debug, Default)]
pub struct ClusterSetConfig {
    /// Compute everything, mutate nothing.
    pub dry_run: bool,

    /// Target namespace.
    pub namespace: String,

    /// Tag-equality selector over EKS clusters; empty matches all.
    pub eks_tags: BTreeMap<String, String>,

    /// Labels merged onto every secret.
    pub labels: BTreeMap<String, String>,

    /// Role ARN written into each secret's auth payload.
    pub aws_auth_config_role_arn: String,
}

/// Compute the desired secret set for a cluster-set config: discover
/// matching clusters and synthesize one secret each.
///
/// # Errors
///
/// Propagates discovery failures; never returns a partial set.
pub async fn desired_secrets(
    api: &dyn ClusterApi,
    config: &ClusterSetConfig,
) -> Result<Vec<Secret>> {
    let clusters = discover_clusters(api, &config.eks_tags).await?;

    Ok(clusters
        .iter()
        .map(|cluster| {
            cluster_secret_from_discovered(
                &config.namespace,
                cluster,
                &config.labels,
                &config.aws_auth_config_role_arn,
            )
        })
        .collect())
}

/// Create one cluster secret.
///
/// When endpoint and CA data are both supplied the secret is synthesized
/// from them alone; otherwise the cluster is described live. Dry-run renders
/// the would-be secret as YAML instead of creating it.
///
/// # Errors
///
/// Surfaces describe and create failures, including `AlreadyExists`: the
/// single-object command does not swallow it.
pub async fn create(
    store: &dyn SecretStore,
    api: &dyn ClusterApi,
    config: &RecordConfig,
) -> Result<String> {
    let secret = match (&config.endpoint, &config.ca_data) {
        (Some(endpoint), Some(ca_data)) if !endpoint.is_empty() && !ca_data.is_empty() => {
            cluster_secret(
                &config.namespace,
                &config.name,
                &config.labels,
                endpoint,
                ca_data,
                &config.aws_auth_config_role_arn,
            )
        }
        _ => {
            let cluster = api.describe_cluster(&config.name).await?;
            cluster_secret_from_discovered(
                &config.namespace,
                &cluster,
                &config.labels,
                &config.aws_auth_config_role_arn,
            )
        }
    };

    if config.dry_run {
        return Ok(serde_yaml::to_string(&secret)?);
    }

    store.create(&secret).await?;
    info!(secret = %config.name, "Created cluster secret");

    Ok(format!("cluster secret {:?} created\n", config.name))
}

/// Delete one cluster secret by name.
///
/// Dry-run consults nothing; it only reports what would be deleted.
///
/// # Errors
///
/// Surfaces delete failures, including `NotFound`: the single-object
/// command does not swallow it.
pub async fn delete(store: &dyn SecretStore, config: &RecordConfig) -> Result<String> {
    if config.dry_run {
        return Ok(format!(
            "cluster secret {:?} deleted (dry run)\n",
            config.name
        ));
    }

    store.delete(&config.name).await?;
    info!(secret = %config.name, "Deleted cluster secret");

    Ok(format!("cluster secret {:?} deleted\n", config.name))
}

/// Create every desired secret that does not exist yet. Existing names are
/// reported as unchanged, never an error.
///
/// # Errors
///
/// Propagates discovery failures and non-idempotent create failures.
pub async fn create_missing(
    store: &dyn SecretStore,
    api: &dyn ClusterApi,
    config: &ClusterSetConfig,
) -> Result<SyncSummary> {
    let desired = desired_secrets(api, config).await?;

    // Attempt every desired record; AlreadyExists is swallowed by the
    // engine, so this converges without a prior listing.
    let diff = Diff {
        unchanged: Vec::new(),
        delete: Vec::new(),
        create: desired,
    };

    apply_diff(store, &diff, config.dry_run).await
}

/// Delete every registered secret whose cluster is no longer desired.
///
/// # Errors
///
/// Propagates discovery, list and non-idempotent delete failures.
pub async fn delete_missing(
    store: &dyn SecretStore,
    api: &dyn ClusterApi,
    config: &ClusterSetConfig,
) -> Result<SyncSummary> {
    let desired = desired_secrets(api, config).await?;
    let actual = store.list(&registration_selector(&config.labels)).await?;

    let full = compute_diff(&desired, &actual);
    let diff = Diff {
        create: Vec::new(),
        delete: full.delete,
        unchanged: full.unchanged,
    };

    apply_diff(store, &diff, config.dry_run).await
}

/// Full convergence: one discovery pass, then create missing and delete
/// redundant secrets against the current registry listing.
///
/// # Errors
///
/// Propagates the first discovery or registry error; nothing after the
/// failure is attempted.
pub async fn sync(
    store: &dyn SecretStore,
    api: &dyn ClusterApi,
    config: &ClusterSetConfig,
) -> Result<SyncSummary> {
    let desired = desired_secrets(api, config).await?;
    let selector = registration_selector(&config.labels);

    sync_secrets(store, &desired, &selector, config.dry_run).await
}

/// Render a sync summary for one-shot command output.
#[must_use]
pub fn summarize(summary: &SyncSummary, dry_run: bool) -> String {
    let suffix = if dry_run { " (dry run)" } else { "" };
    let mut out = String::new();

    for name in &summary.created {
        out.push_str(&format!("cluster secret {name:?} created{suffix}\n"));
    }
    for name in &summary.deleted {
        out.push_str(&format!("cluster secret {name:?} deleted{suffix}\n"));
    }
    if summary.created.is_empty() && summary.deleted.is_empty() {
        out.push_str("no changes\n");
    }

    out
}

/// Validate that a record config names its cluster.
///
/// # Errors
///
/// Returns [`Error::InvalidInput`] when the name is empty.
pub fn validate_record(config: &RecordConfig) -> Result<()> {
    if config.name.is_empty() {
        return Err(Error::InvalidInput("--name is required".to_string()));
    }
    Ok(())
}

#[cfg(test)]
#[path = "run_tests.rs"]
mod run_tests;

// Copyright (c) 2026 The clusterset authors
// SPDX-License-Identifier: Apache-2.0

//! Set-difference between desired and actual cluster secrets.
//!
//! Desired state comes from discovery + synthesis, actual state from listing
//! the registry by sentinel label. Both sets are keyed by secret name:
//!
//! - create-set = desired \ actual, applied first;
//! - delete-set = actual \ desired, applied second;
//! - the intersection is left untouched (no in-place update of drifted
//!   content for a name that is still desired).
//!
//! `AlreadyExists` on create and `NotFound` on delete count as successful
//! convergence. Any other failure aborts the pass without attempting the
//! remaining records, so applying the same diff again is always safe:
//! running [`apply_diff`] twice against unchanged inputs performs zero
//! mutations the second time.

use crate::error::Result;
use crate::store::SecretStore;
use k8s_openapi::api::core::v1::Secret;
use kube::ResourceExt;
use std::collections::BTreeSet;
use tracing::{debug, info};

/// The create/delete decision for one reconcile pass.
#[derive(Clone, Debug, Default)]
pub struct Diff {
    /// Secrets to create, in desired-set order.
    pub create: Vec<Secret>,

    /// Names to delete, in actual-set order.
    pub delete: Vec<String>,

    /// Names present in both sets, left untouched.
    pub unchanged: Vec<String>,
}

impl Diff {
    /// True when the registry already matches the desired state.
    #[must_use]
    pub fn is_converged(&self) -> bool {
        self.create.is_empty() && self.delete.is_empty()
    }
}

/// What a sync pass did (or, under dry-run, would have done).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SyncSummary {
    /// Names created this pass.
    pub created: Vec<String>,

    /// Names deleted this pass.
    pub deleted: Vec<String>,

    /// The full desired name-set after the pass, sorted.
    pub registered: Vec<String>,
}

/// Compute the create/delete sets by name.
#[must_use]
pub fn compute_diff(desired: &[Secret], actual: &[Secret]) -> Diff {
    let desired_names: BTreeSet<String> = desired.iter().map(ResourceExt::name_any).collect();
    let actual_names: BTreeSet<String> = actual.iter().map(ResourceExt::name_any).collect();

    let create = desired
        .iter()
        .filter(|s| !actual_names.contains(&s.name_any()))
        .cloned()
        .collect();

    let delete = actual
        .iter()
        .map(ResourceExt::name_any)
        .filter(|name| !desired_names.contains(name))
        .collect();

    let unchanged = desired_names.intersection(&actual_names).cloned().collect();

    Diff {
        create,
        delete,
        unchanged,
    }
}

/// Apply a diff against the registry: creates first, then deletes.
///
/// With `dry_run` set, no store call is made; the summary reports what
/// would have happened.
///
/// # Errors
///
/// Returns the first non-idempotent store error. Records after the failing
/// one are not attempted, and no partial summary is returned.
pub async fn apply_diff(store: &dyn SecretStore, diff: &Diff, dry_run: bool) -> Result<SyncSummary> {
    let mut created = Vec::new();
    let mut deleted = Vec::new();

    for secret in &diff.create {
        let name = secret.name_any();

        if dry_run {
            info!(secret = %name, "Would create cluster secret (dry run)");
            created.push(name);
            continue;
        }

        match store.create(secret).await {
            Ok(()) => {
                info!(secret = %name, "Created cluster secret");
                created.push(name);
            }
            Err(e) if e.is_already_exists() => {
                debug!(secret = %name, "Cluster secret already exists, no change");
            }
            Err(e) => return Err(e),
        }
    }

    for name in &diff.delete {
        if dry_run {
            info!(secret = %name, "Would delete cluster secret (dry run)");
            deleted.push(name.clone());
            continue;
        }

        match store.delete(name).await {
            Ok(()) => {
                info!(secret = %name, "Deleted cluster secret");
                deleted.push(name.clone());
            }
            Err(e) if e.is_not_found() => {
                debug!(secret = %name, "Cluster secret already gone, no change");
            }
            Err(e) => return Err(e),
        }
    }

    let mut registered: Vec<String> = diff
        .create
        .iter()
        .map(ResourceExt::name_any)
        .chain(diff.unchanged.iter().cloned())
        .collect();
    registered.sort();

    Ok(SyncSummary {
        created,
        deleted,
        registered,
    })
}

/// One full convergence pass: list actual state, diff against `desired`,
/// apply.
///
/// `label_selector` must be the same selector the desired secrets carry,
/// so the listing returns exactly the records this set owns.
///
/// # Errors
///
/// Returns the first listing or apply error; no mutation happens after a
/// failure.
pub async fn sync_secrets(
    store: &dyn SecretStore,
    desired: &[Secret],
    label_selector: &str,
    dry_run: bool,
) -> Result<SyncSummary> {
    let actual = store.list(label_selector).await?;
    let diff = compute_diff(desired, &actual);

    if diff.is_converged() {
        debug!("Registry already matches desired state");
    }

    apply_diff(store, &diff, dry_run).await
}

#[cfg(test)]
#[path = "diff_tests.rs"]
mod diff_tests;

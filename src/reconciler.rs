// Copyright (c) 2026 The clusterset authors
// SPDX-License-Identifier: Apache-2.0

//! `ClusterSet` reconciliation: the finalizer state machine that gates when
//! the sync engine runs.
//!
//! Each tick is a stateless recomputation. The object is re-fetched at the
//! start of the tick, the transition is decided by the pure
//! [`next_transition`] function, and exactly one of the following happens:
//!
//! - `AddFinalizer` — persist the finalizer token and end the tick. No sync
//!   runs until the token has durably landed, so deletion cleanup can rely
//!   on it.
//! - `Sync` — discovery, synthesis and diff application, then a status
//!   update and a completion event. Ends by scheduling the next pass after
//!   the sync period, since cloud-side changes never arrive as watch
//!   events.
//! - `RemoveFinalizer` — deletion was requested; drop the token to unblock
//!   physical removal. No sync is attempted.
//! - `Ignore` — deletion in progress with our token already gone.
//!
//! Failed syncs record a warning event against the owning object, then
//! surface to the controller's error policy, which requeues after a fixed
//! 10-second delay. Optimistic-concurrency conflicts on the owning object
//! take the same path: requeue, re-fetch, never retry a stale write.

use crate::aws;
use crate::constants::{
    ERROR_REQUEUE_DURATION_SECS, FINALIZER_CLUSTER_SET, PHASE_SYNCED, REASON_SYNC_FAILED,
    REASON_SYNC_FINISHED, SYNC_PERIOD_SECS,
};
use crate::crd::{ClusterSet, ClusterSetStatus, RegisteredClusters};
use crate::diff::SyncSummary;
use crate::discovery::EksClusterApi;
use crate::error::{Error, Result};
use kube::Resource;
use crate::events::EventSink;
use crate::run::{self, ClusterSetConfig};
use crate::store::KubeSecretStore;
use chrono::Utc;
use kube::api::{Patch, PatchParams};
use kube::runtime::controller::Action;
use kube::{Api, Client, ResourceExt};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info};

/// Dependencies handed to every reconcile tick.
#[derive(Clone)]
pub struct Context {
    /// Kubernetes client for API operations.
    pub client: Client,

    /// Sink for reconcile notifications.
    pub sink: Arc<dyn EventSink>,
}

/// The lifecycle transition a tick must perform.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Transition {
    /// Active object without our finalizer: persist the token, do not sync.
    AddFinalizer,

    /// Active object carrying the finalizer: steady-state sync.
    Sync,

    /// Deletion requested while the finalizer is present: remove it.
    RemoveFinalizer,

    /// Deletion in progress, token already gone; nothing left to do.
    Ignore,
}

/// Decide the transition for the object as fetched this tick.
///
/// Pure function of the object's deletion timestamp and finalizer list.
#[must_use]
pub fn next_transition(set: &ClusterSet) -> Transition {
    let has_finalizer = set
        .meta()
        .finalizers
        .as_ref()
        .is_some_and(|f| f.iter().any(|name| name == FINALIZER_CLUSTER_SET));

    if set.meta().deletion_timestamp.is_none() {
        if has_finalizer {
            Transition::Sync
        } else {
            Transition::AddFinalizer
        }
    } else if has_finalizer {
        Transition::RemoveFinalizer
    } else {
        Transition::Ignore
    }
}

/// Build the status written after a successful sync.
#[must_use]
pub fn synced_status(set_name: &str, summary: &SyncSummary, now: &str) -> ClusterSetStatus {
    ClusterSetStatus {
        clusters: RegisteredClusters {
            names: summary.registered.clone(),
        },
        last_sync_time: Some(now.to_string()),
        phase: PHASE_SYNCED.to_string(),
        reason: REASON_SYNC_FINISHED.to_string(),
        message: format!(
            "Sync finished on {:?}: {} created, {} deleted, {} registered",
            set_name,
            summary.created.len(),
            summary.deleted.len(),
            summary.registered.len()
        ),
    }
}

/// Reconcile one `ClusterSet`.
///
/// # Errors
///
/// Returns an error for any failed API call; the controller's error policy
/// turns it into a fixed-delay requeue.
pub async fn reconcile(set: Arc<ClusterSet>, ctx: Arc<Context>) -> Result<Action> {
    let namespace = set.namespace().unwrap_or_default();
    let name = set.name_any();
    let api: Api<ClusterSet> = Api::namespaced(ctx.client.clone(), &namespace);

    // Always re-read current spec/status before deciding a transition;
    // the watch cache may lag behind the write we made last tick.
    let Some(current) = api
        .get_opt(&name)
        .await
        .map_err(|e| Error::from_kube(e, &name))?
    else {
        debug!(clusterset = %name, "Object gone, nothing to reconcile");
        return Ok(Action::await_change());
    };

    match next_transition(&current) {
        Transition::AddFinalizer => {
            info!(clusterset = %name, "Adding finalizer");
            add_finalizer(&api, &current).await?;
            // The finalizer write triggers the next tick; syncing now would
            // race the persist.
            Ok(Action::await_change())
        }
        Transition::RemoveFinalizer => {
            info!(clusterset = %name, "Deletion requested, removing finalizer");
            remove_finalizer(&api, &current).await?;
            Ok(Action::await_change())
        }
        Transition::Ignore => Ok(Action::await_change()),
        Transition::Sync => {
            let summary = match sync_cluster_set(&ctx, &current, &namespace).await {
                Ok(summary) => summary,
                Err(e) => {
                    report_sync_failure(ctx.sink.as_ref(), &current, &e).await;
                    return Err(e);
                }
            };

            let status = synced_status(&name, &summary, &Utc::now().to_rfc3339());
            let message = status.message.clone();
            if let Err(e) = api
                .patch_status(
                    &name,
                    &PatchParams::default(),
                    &Patch::Merge(json!({ "status": status })),
                )
                .await
                .map_err(|e| Error::from_kube(e, &name))
            {
                report_sync_failure(ctx.sink.as_ref(), &current, &e).await;
                return Err(e);
            }

            ctx.sink.record(&current, REASON_SYNC_FINISHED, &message).await;

            info!(
                clusterset = %name,
                created = summary.created.len(),
                deleted = summary.deleted.len(),
                "Sync finished"
            );
            Ok(sync_requeue())
        }
    }
}

/// Action after a successful sync: re-run after the sync period. EKS-side
/// creates and deletes never produce a watch event, so steady-state drift
/// is only observed by rediscovering on a schedule.
#[must_use]
pub fn sync_requeue() -> Action {
    Action::requeue(Duration::from_secs(SYNC_PERIOD_SECS))
}

/// Publish a warning event for a failed sync before the error reaches the
/// requeue policy.
pub async fn report_sync_failure(sink: &dyn EventSink, set: &ClusterSet, err: &Error) {
    sink.record_warning(set, REASON_SYNC_FAILED, &err.to_string()).await;
}

/// Run one sync pass for the set: discovery against the selector role and
/// tags, synthesis with the template, diff against the namespace registry.
async fn sync_cluster_set(
    ctx: &Context,
    set: &ClusterSet,
    namespace: &str,
) -> Result<SyncSummary> {
    let spec = &set.spec;

    let eks = aws::eks_client(spec.selector.role_arn.as_deref()).await;
    let cluster_api = EksClusterApi::new(eks);
    let store = KubeSecretStore::new(ctx.client.clone(), namespace);

    let config = ClusterSetConfig {
        dry_run: false,
        namespace: namespace.to_string(),
        eks_tags: spec.selector.eks_tags.clone(),
        labels: spec.template.metadata.labels.clone(),
        aws_auth_config_role_arn: spec.template.metadata.config.aws_auth_config.role_arn.clone(),
    };

    run::sync(&store, &cluster_api, &config).await
}

/// Persist the finalizer token on a copy of the fetched object.
///
/// The fetched object is never mutated in place; the patch is built from a
/// fresh copy of its finalizer list.
async fn add_finalizer(api: &Api<ClusterSet>, set: &ClusterSet) -> Result<()> {
    let name = set.name_any();
    let mut finalizers = set.meta().finalizers.clone().unwrap_or_default();
    finalizers.push(FINALIZER_CLUSTER_SET.to_string());

    api.patch(
        &name,
        &PatchParams::default(),
        &Patch::Merge(json!({ "metadata": { "finalizers": finalizers } })),
    )
    .await
    .map_err(|e| Error::from_kube(e, &name))?;

    Ok(())
}

/// Remove the finalizer token, unblocking physical deletion.
async fn remove_finalizer(api: &Api<ClusterSet>, set: &ClusterSet) -> Result<()> {
    let name = set.name_any();
    let mut finalizers = set.meta().finalizers.clone().unwrap_or_default();
    finalizers.retain(|f| f != FINALIZER_CLUSTER_SET);

    api.patch(
        &name,
        &PatchParams::default(),
        &Patch::Merge(json!({ "metadata": { "finalizers": finalizers } })),
    )
    .await
    .map_err(|e| Error::from_kube(e, &name))?;

    Ok(())
}

/// Error policy for the controller: fixed-delay requeue, no backoff.
#[must_use]
pub fn error_policy(set: Arc<ClusterSet>, err: &Error, _ctx: Arc<Context>) -> Action {
    error!(clusterset = %set.name_any(), "Reconcile failed: {err}");
    Action::requeue(Duration::from_secs(ERROR_REQUEUE_DURATION_SECS))
}

#[cfg(test)]
#[path = "reconciler_tests.rs"]
mod reconciler_tests;

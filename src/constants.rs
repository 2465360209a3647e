// Copyright (c) 2026 The clusterset authors
// SPDX-License-Identifier: Apache-2.0

//! Global constants for the clusterset operator.
//!
//! This module contains all string and numeric constants used throughout the
//! codebase. Constants are organized by category for easy maintenance.

// ============================================================================
// API Constants
// ============================================================================

/// API group for the `ClusterSet` CRD
pub const API_GROUP: &str = "clusterset.dev";

/// API version for the `ClusterSet` CRD
pub const API_VERSION: &str = "v1alpha1";

/// Fully qualified API version (group/version)
pub const API_GROUP_VERSION: &str = "clusterset.dev/v1alpha1";

/// Kind name for the `ClusterSet` resource
pub const KIND_CLUSTER_SET: &str = "ClusterSet";

// ============================================================================
// Argo CD Cluster Secret Constants
// ============================================================================

/// Label key Argo CD uses to discover cluster secrets
pub const SECRET_LABEL_KEY_ARGOCD_TYPE: &str = "argocd.argoproj.io/secret-type";

/// Label value marking a secret as a cluster registration
pub const SECRET_LABEL_VALUE_ARGOCD_CLUSTER: &str = "cluster";

/// `stringData` key carrying the cluster name
pub const SECRET_KEY_NAME: &str = "name";

/// `stringData` key carrying the API server endpoint
pub const SECRET_KEY_SERVER: &str = "server";

/// `stringData` key carrying the JSON connection config
pub const SECRET_KEY_CONFIG: &str = "config";

// ============================================================================
// Finalizers
// ============================================================================

/// Finalizer for `ClusterSet` resources
pub const FINALIZER_CLUSTER_SET: &str = "clusterset.dev/clusterset-finalizer";

// ============================================================================
// Controller Error Handling Constants
// ============================================================================

/// Requeue duration after a failed sync (10 seconds, fixed delay)
pub const ERROR_REQUEUE_DURATION_SECS: u64 = 10;

/// Interval between steady-state syncs. EKS-side changes produce no watch
/// events, so each successful sync schedules the next one.
pub const SYNC_PERIOD_SECS: u64 = 30;

// ============================================================================
// Status Phases
// ============================================================================

/// Phase reported after a successful sync
pub const PHASE_SYNCED: &str = "Synced";

/// Reason reported after a successful sync
pub const REASON_SYNC_FINISHED: &str = "SyncFinished";

/// Reason reported when a sync fails
pub const REASON_SYNC_FAILED: &str = "SyncFailed";

// ============================================================================
// Runtime Constants
// ============================================================================

/// Number of worker threads for the Tokio runtime
pub const TOKIO_WORKER_THREADS: usize = 4;

/// Reporter name used when emitting Kubernetes events
pub const EVENT_REPORTER: &str = "clusterset-controller";

/// STS session name used when assuming the selector role
pub const STS_SESSION_NAME: &str = "clusterset";

// Copyright (c) 2026 The clusterset authors
// SPDX-License-Identifier: Apache-2.0

//! Error types for the clusterset operator.
//!
//! The taxonomy mirrors how the sync engine reacts to failures:
//!
//! - [`Error::AlreadyExists`] on create and [`Error::NotFound`] on delete are
//!   swallowed by the diff engine and treated as successful convergence.
//! - [`Error::Conflict`] (optimistic-concurrency failure on the owning
//!   object) is transient; the controller requeues and re-fetches rather
//!   than retrying the same stale write.
//! - Everything else aborts the current operation and is surfaced to the
//!   caller: one-shot commands exit non-zero, controller mode requeues after
//!   a fixed delay.

use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// The main error type for the clusterset operator.
#[derive(Debug, Error)]
pub enum Error {
    /// A secret with this name already exists in the registry.
    #[error("cluster secret {0:?} already exists")]
    AlreadyExists(String),

    /// The secret to delete was not found in the registry.
    #[error("cluster secret {0:?} not found")]
    NotFound(String),

    /// Optimistic-concurrency conflict while persisting the owning object.
    #[error("conflicting write on {0:?}, requeue and re-fetch")]
    Conflict(String),

    /// EKS enumeration or describe failure. Aborts the whole discovery call
    /// so an incomplete desired-set never reaches the diff engine.
    #[error("discovering clusters: {0}")]
    Discovery(String),

    /// Kubernetes API error that is none of the idempotent outcomes above.
    #[error("kubernetes api: {0}")]
    Kube(#[source] kube::Error),

    /// Missing or invalid command-line input.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Rendering a secret for dry-run output failed.
    #[error("rendering secret: {0}")]
    Render(#[from] serde_yaml::Error),
}

impl Error {
    /// True if this error means a create already converged.
    #[must_use]
    pub fn is_already_exists(&self) -> bool {
        matches!(self, Error::AlreadyExists(_))
    }

    /// True if this error means a delete already converged.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound(_))
    }

    /// True if this error should be retried after re-fetching current state.
    #[must_use]
    pub fn is_conflict(&self) -> bool {
        matches!(self, Error::Conflict(_))
    }

    /// Classify a kube API error for the object named `name`.
    ///
    /// Maps the HTTP status reasons the registry store cares about onto the
    /// idempotent/transient variants; everything else is passed through as
    /// [`Error::Kube`].
    #[must_use]
    pub fn from_kube(err: kube::Error, name: &str) -> Self {
        if let kube::Error::Api(ref ae) = err {
            match ae.reason.as_str() {
                "AlreadyExists" => return Error::AlreadyExists(name.to_string()),
                "NotFound" => return Error::NotFound(name.to_string()),
                "Conflict" => return Error::Conflict(name.to_string()),
                _ => {}
            }
        }
        Error::Kube(err)
    }
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod error_tests;

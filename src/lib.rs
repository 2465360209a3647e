// Copyright (c) 2026 The clusterset authors
// SPDX-License-Identifier: Apache-2.0

//! # clusterset - EKS cluster registration operator for Argo CD
//!
//! clusterset continuously mirrors the EKS clusters matching a tag selector
//! into Argo CD cluster secrets, so Argo CD can target them without manual
//! registration.
//!
//! ## Overview
//!
//! The core is a stateless convergence loop: enumerate EKS clusters through
//! the paginated API, synthesize the desired secret for each match, diff the
//! desired set against the secrets currently labelled as cluster
//! registrations, and create/delete to converge. A `ClusterSet` custom
//! resource owns the loop in controller mode; the same engine backs the
//! one-shot CLI commands.
//!
//! ## Modules
//!
//! - [`crd`] - The `ClusterSet` Custom Resource Definition
//! - [`discovery`] - Paginated EKS enumeration and tag filtering
//! - [`secret`] - Pure synthesis of Argo CD cluster secrets
//! - [`diff`] - Desired/actual set difference and application
//! - [`store`] - Narrow interface over the secret registry
//! - [`reconciler`] - Finalizer state machine and controller glue
//! - [`run`] - One-shot command implementations
//! - [`aws`] - Credential resolution and EKS client construction
//! - [`events`] - Injected event sink
//! - [`cli`] - Command-line surface

pub mod aws;
pub mod cli;
pub mod constants;
pub mod crd;
pub mod diff;
pub mod discovery;
pub mod error;
pub mod events;
pub mod reconciler;
pub mod run;
pub mod secret;
pub mod store;

#[cfg(test)]
pub(crate) mod testutil;

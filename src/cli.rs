// Copyright (c) 2026 The clusterset authors
// SPDX-License-Identifier: Apache-2.0

//! Command-line interface definitions.
//!
//! One binary, six subcommands: the single-secret `create`/`delete`, the
//! set-level `create-missing`/`delete-missing`/`sync`, and
//! `controller-manager` which runs the watch-driven reconciler.

use crate::error::{Error, Result};
use clap::{Args, Parser, Subcommand};
use std::collections::BTreeMap;

/// Register EKS clusters with Argo CD as cluster secrets.
#[derive(Parser, Debug)]
#[command(name = "clusterset")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create one cluster secret.
    Create(RecordArgs),

    /// Delete one cluster secret.
    Delete(RecordArgs),

    /// Create secrets for matching clusters that are not yet registered.
    CreateMissing(SetArgs),

    /// Delete secrets whose cluster no longer matches the selector.
    DeleteMissing(SetArgs),

    /// Full convergence: create missing, delete redundant.
    Sync(SetArgs),

    /// Run the ClusterSet controller.
    ControllerManager,
}

/// Flags shared by every one-shot command.
#[derive(Args, Clone, Debug)]
pub struct CommonArgs {
    /// Compute everything, mutate nothing.
    #[arg(long)]
    pub dry_run: bool,

    /// Target namespace; defaults to the client's namespace.
    #[arg(long)]
    pub namespace: Option<String>,

    /// IAM role to assume for EKS API calls.
    #[arg(long)]
    pub role_arn: Option<String>,

    /// Comma-separated KEY=VALUE labels merged onto each secret.
    #[arg(long, value_delimiter = ',')]
    pub labels: Vec<String>,

    /// Role ARN written into each secret's awsAuthConfig payload.
    #[arg(long, default_value = "")]
    pub aws_auth_config_role_arn: String,
}

/// Flags for the single-secret commands.
#[derive(Args, Clone, Debug)]
pub struct RecordArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Cluster (and secret) name.
    #[arg(long)]
    pub name: String,

    /// API server endpoint; described live when absent.
    #[arg(long)]
    pub endpoint: Option<String>,

    /// Base64 CA bundle; described live when absent.
    #[arg(long)]
    pub ca_data: Option<String>,
}

/// Flags for the set-level commands.
#[derive(Args, Clone, Debug)]
pub struct SetArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Comma-separated KEY=VALUE pairs of EKS control-plane tags.
    #[arg(long = "eks-tags", value_delimiter = ',')]
    pub eks_tags: Vec<String>,
}

/// Parse comma-split `KEY=VALUE` pairs into a map.
///
/// # Errors
///
/// Returns [`Error::InvalidInput`] for entries without `=` or with an empty
/// key.
pub fn parse_key_values(pairs: &[String]) -> Result<BTreeMap<String, String>> {
    let mut map = BTreeMap::new();

    for pair in pairs {
        let (key, value) = pair
            .split_once('=')
            .ok_or_else(|| Error::InvalidInput(format!("expected KEY=VALUE, got {pair:?}")))?;

        if key.is_empty() {
            return Err(Error::InvalidInput(format!("empty key in {pair:?}")));
        }

        map.insert(key.to_string(), value.to_string());
    }

    Ok(map)
}

#[cfg(test)]
#[path = "cli_tests.rs"]
mod cli_tests;

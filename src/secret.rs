// Copyright (c) 2026 The clusterset authors
// SPDX-License-Identifier: Apache-2.0

//! Pure synthesis of Argo CD cluster secrets.
//!
//! Everything here is deterministic and free of network or store access, so
//! dry-run previews and actual application share the identical code path and
//! produce byte-identical records.
//!
//! The persisted schema is consumed by Argo CD and must not drift: a secret
//! labelled `argocd.argoproj.io/secret-type=cluster` whose `stringData`
//! carries `name`, `server` and a JSON `config` document with
//! `awsAuthConfig.clusterName`, `awsAuthConfig.roleARN`,
//! `tlsClientConfig.insecure` (always false) and `tlsClientConfig.caData`.

use crate::constants::{
    SECRET_KEY_CONFIG, SECRET_KEY_NAME, SECRET_KEY_SERVER, SECRET_LABEL_KEY_ARGOCD_TYPE,
    SECRET_LABEL_VALUE_ARGOCD_CLUSTER,
};
use crate::discovery::DiscoveredCluster;
use k8s_openapi::api::core::v1::Secret;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use serde_json::json;
use std::collections::BTreeMap;

/// Build the label set for a cluster secret: the Argo CD sentinel label plus
/// the caller's labels. Caller labels may add or override any key except the
/// sentinel key, which always wins.
#[must_use]
pub fn secret_labels(labels: &BTreeMap<String, String>) -> BTreeMap<String, String> {
    let mut merged = labels.clone();
    merged.insert(
        SECRET_LABEL_KEY_ARGOCD_TYPE.to_string(),
        SECRET_LABEL_VALUE_ARGOCD_CLUSTER.to_string(),
    );
    merged
}

/// Render the JSON connection config embedded in the secret.
#[must_use]
pub fn connection_config(name: &str, role_arn: &str, ca_data: &str) -> String {
    let config = json!({
        "awsAuthConfig": {
            "clusterName": name,
            "roleARN": role_arn,
        },
        "tlsClientConfig": {
            "insecure": false,
            "caData": ca_data,
        },
    });

    // json! only produces serializable values, to_string cannot fail here
    serde_json::to_string_pretty(&config).unwrap_or_default()
}

/// Construct the Argo CD cluster secret for one cluster.
///
/// Pure function of its inputs; the caller decides whether the result is
/// persisted or only rendered for a dry run.
#[must_use]
pub fn cluster_secret(
    namespace: &str,
    name: &str,
    labels: &BTreeMap<String, String>,
    endpoint: &str,
    ca_data: &str,
    aws_auth_role_arn: &str,
) -> Secret {
    let string_data = BTreeMap::from([
        (SECRET_KEY_NAME.to_string(), name.to_string()),
        (SECRET_KEY_SERVER.to_string(), endpoint.to_string()),
        (
            SECRET_KEY_CONFIG.to_string(),
            connection_config(name, aws_auth_role_arn, ca_data),
        ),
    ]);

    Secret {
        metadata: ObjectMeta {
            name: Some(name.to_string()),
            namespace: Some(namespace.to_string()),
            labels: Some(secret_labels(labels)),
            ..ObjectMeta::default()
        },
        string_data: Some(string_data),
        ..Secret::default()
    }
}

/// Construct the cluster secret for a discovered cluster.
#[must_use]
pub fn cluster_secret_from_discovered(
    namespace: &str,
    cluster: &DiscoveredCluster,
    labels: &BTreeMap<String, String>,
    aws_auth_role_arn: &str,
) -> Secret {
    cluster_secret(
        namespace,
        &cluster.name,
        labels,
        &cluster.endpoint,
        &cluster.ca_data,
        aws_auth_role_arn,
    )
}

#[cfg(test)]
#[path = "secret_tests.rs"]
mod secret_tests;

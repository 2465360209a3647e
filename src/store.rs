// Copyright (c) 2026 The clusterset authors
// SPDX-License-Identifier: Apache-2.0

//! Narrow interface over the cluster-secret registry.
//!
//! The diff engine and the one-shot commands only ever need three verbs on
//! the secret collection: list by label selector, create, delete. Keeping
//! them behind [`SecretStore`] lets the sync path run against an in-memory
//! fake in tests, and keeps the kube error classification in one place.

use crate::constants::{SECRET_LABEL_KEY_ARGOCD_TYPE, SECRET_LABEL_VALUE_ARGOCD_CLUSTER};
use crate::error::{Error, Result};
use async_trait::async_trait;
use k8s_openapi::api::core::v1::Secret;
use kube::api::{Api, DeleteParams, ListParams, PostParams};
use kube::{Client, ResourceExt};
use std::collections::BTreeMap;
use tracing::debug;

/// The registry of Argo CD cluster secrets in one namespace.
#[async_trait]
pub trait SecretStore: Send + Sync {
    /// List secrets matching a label selector string.
    async fn list(&self, label_selector: &str) -> Result<Vec<Secret>>;

    /// Create a secret. Fails with [`Error::AlreadyExists`] if the name is
    /// already present.
    async fn create(&self, secret: &Secret) -> Result<()>;

    /// Delete a secret by name. Fails with [`Error::NotFound`] if absent.
    async fn delete(&self, name: &str) -> Result<()>;
}

/// Build the label selector that identifies this set's cluster secrets:
/// the Argo CD sentinel label plus any template labels.
#[must_use]
pub fn registration_selector(template_labels: &BTreeMap<String, String>) -> String {
    let mut parts =
        vec![format!("{SECRET_LABEL_KEY_ARGOCD_TYPE}={SECRET_LABEL_VALUE_ARGOCD_CLUSTER}")];

    for (k, v) in template_labels {
        parts.push(format!("{k}={v}"));
    }

    parts.join(",")
}

/// [`SecretStore`] backed by the Kubernetes API.
#[derive(Clone)]
pub struct KubeSecretStore {
    api: Api<Secret>,
}

impl KubeSecretStore {
    /// Store over the secrets of one namespace.
    #[must_use]
    pub fn new(client: Client, namespace: &str) -> Self {
        Self {
            api: Api::namespaced(client, namespace),
        }
    }
}

#[async_trait]
impl SecretStore for KubeSecretStore {
    async fn list(&self, label_selector: &str) -> Result<Vec<Secret>> {
        debug!(selector = %label_selector, "Listing cluster secrets");

        let params = ListParams::default().labels(label_selector);
        let list = self
            .api
            .list(&params)
            .await
            .map_err(|e| Error::from_kube(e, label_selector))?;

        Ok(list.items)
    }

    async fn create(&self, secret: &Secret) -> Result<()> {
        let name = secret.name_any();
        debug!(secret = %name, "Creating cluster secret");

        self.api
            .create(&PostParams::default(), secret)
            .await
            .map_err(|e| Error::from_kube(e, &name))?;

        Ok(())
    }

    async fn delete(&self, name: &str) -> Result<()> {
        debug!(secret = %name, "Deleting cluster secret");

        self.api
            .delete(name, &DeleteParams::default())
            .await
            .map_err(|e| Error::from_kube(e, name))?;

        Ok(())
    }
}

#[cfg(test)]
#[path = "store_tests.rs"]
mod store_tests;

// Copyright (c) 2026 The clusterset authors
// SPDX-License-Identifier: Apache-2.0

//! In-memory fakes for the store and cluster API seams, shared by the unit
//! tests.

use crate::discovery::{ClusterApi, ClusterPage, DiscoveredCluster};
use crate::error::{Error, Result};
use crate::store::SecretStore;
use async_trait::async_trait;
use k8s_openapi::api::core::v1::Secret;
use kube::ResourceExt;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// In-memory [`SecretStore`] with mutation counters and failure injection.
#[derive(Default)]
pub struct MemoryStore {
    secrets: Mutex<BTreeMap<String, Secret>>,
    pub create_calls: AtomicUsize,
    pub delete_calls: AtomicUsize,
    pub list_calls: AtomicUsize,
    fail_create_on: Option<String>,
    fail_delete_on: Option<String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_secrets(secrets: Vec<Secret>) -> Self {
        let map = secrets.into_iter().map(|s| (s.name_any(), s)).collect();
        Self {
            secrets: Mutex::new(map),
            ..Self::default()
        }
    }

    /// Fail any create of this name with a generic kube error.
    pub fn fail_create_on(mut self, name: &str) -> Self {
        self.fail_create_on = Some(name.to_string());
        self
    }

    /// Fail any delete of this name with a generic kube error.
    pub fn fail_delete_on(mut self, name: &str) -> Self {
        self.fail_delete_on = Some(name.to_string());
        self
    }

    pub fn names(&self) -> Vec<String> {
        self.secrets.lock().unwrap().keys().cloned().collect()
    }

    pub fn create_count(&self) -> usize {
        self.create_calls.load(Ordering::SeqCst)
    }

    pub fn delete_count(&self) -> usize {
        self.delete_calls.load(Ordering::SeqCst)
    }
}

fn matches_selector(secret: &Secret, selector: &str) -> bool {
    let labels = secret.metadata.labels.clone().unwrap_or_default();

    selector.split(',').filter(|s| !s.is_empty()).all(|pair| {
        pair.split_once('=')
            .is_some_and(|(k, v)| labels.get(k).is_some_and(|value| value == v))
    })
}

#[async_trait]
impl SecretStore for MemoryStore {
    async fn list(&self, label_selector: &str) -> Result<Vec<Secret>> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);

        Ok(self
            .secrets
            .lock()
            .unwrap()
            .values()
            .filter(|s| matches_selector(s, label_selector))
            .cloned()
            .collect())
    }

    async fn create(&self, secret: &Secret) -> Result<()> {
        self.create_calls.fetch_add(1, Ordering::SeqCst);
        let name = secret.name_any();

        if self.fail_create_on.as_deref() == Some(name.as_str()) {
            return Err(Error::Discovery(format!("injected create failure for {name}")));
        }

        let mut secrets = self.secrets.lock().unwrap();
        if secrets.contains_key(&name) {
            return Err(Error::AlreadyExists(name));
        }

        secrets.insert(name, secret.clone());
        Ok(())
    }

    async fn delete(&self, name: &str) -> Result<()> {
        self.delete_calls.fetch_add(1, Ordering::SeqCst);

        if self.fail_delete_on.as_deref() == Some(name) {
            return Err(Error::Discovery(format!("injected delete failure for {name}")));
        }

        if self.secrets.lock().unwrap().remove(name).is_none() {
            return Err(Error::NotFound(name.to_string()));
        }

        Ok(())
    }
}

/// In-memory [`ClusterApi`] serving fixed pages with cursor tokens.
#[derive(Default)]
pub struct FakeClusterApi {
    pages: Vec<Vec<String>>,
    clusters: BTreeMap<String, DiscoveredCluster>,
    fail_list_page: Option<usize>,
    fail_describe_on: Option<String>,
    pub list_calls: AtomicUsize,
    pub describe_calls: AtomicUsize,
}

impl FakeClusterApi {
    pub fn new(clusters: Vec<DiscoveredCluster>) -> Self {
        let names = clusters.iter().map(|c| c.name.clone()).collect();
        Self {
            pages: vec![names],
            clusters: clusters.into_iter().map(|c| (c.name.clone(), c)).collect(),
            ..Self::default()
        }
    }

    /// Split the cluster list across explicit pages.
    pub fn with_pages(clusters: Vec<DiscoveredCluster>, pages: Vec<Vec<&str>>) -> Self {
        Self {
            pages: pages
                .into_iter()
                .map(|p| p.into_iter().map(str::to_string).collect())
                .collect(),
            clusters: clusters.into_iter().map(|c| (c.name.clone(), c)).collect(),
            ..Self::default()
        }
    }

    pub fn fail_list_page(mut self, page: usize) -> Self {
        self.fail_list_page = Some(page);
        self
    }

    pub fn fail_describe_on(mut self, name: &str) -> Self {
        self.fail_describe_on = Some(name.to_string());
        self
    }
}

#[async_trait]
impl ClusterApi for FakeClusterApi {
    async fn list_clusters(&self, next_token: Option<String>) -> Result<ClusterPage> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);

        let index = match next_token.as_deref() {
            None => 0,
            Some(token) => token
                .strip_prefix("cursor-")
                .and_then(|i| i.parse().ok())
                .ok_or_else(|| Error::Discovery(format!("unknown cursor {token:?}")))?,
        };

        if self.fail_list_page == Some(index) {
            return Err(Error::Discovery(format!("injected list failure on page {index}")));
        }

        let names = self
            .pages
            .get(index)
            .cloned()
            .ok_or_else(|| Error::Discovery(format!("no page {index}")))?;

        let next_token = if index + 1 < self.pages.len() {
            Some(format!("cursor-{}", index + 1))
        } else {
            None
        };

        Ok(ClusterPage { names, next_token })
    }

    async fn describe_cluster(&self, name: &str) -> Result<DiscoveredCluster> {
        self.describe_calls.fetch_add(1, Ordering::SeqCst);

        if self.fail_describe_on.as_deref() == Some(name) {
            return Err(Error::Discovery(format!("injected describe failure for {name}")));
        }

        self.clusters
            .get(name)
            .cloned()
            .ok_or_else(|| Error::Discovery(format!("no such cluster {name:?}")))
    }
}

/// Build a discovered cluster with the given tags.
pub fn discovered(name: &str, tags: &[(&str, &str)]) -> DiscoveredCluster {
    DiscoveredCluster {
        name: name.to_string(),
        endpoint: format!("https://{name}.eks.example.com"),
        ca_data: format!("Y2EtZGF0YS0t{name}"),
        tags: tags
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect(),
    }
}

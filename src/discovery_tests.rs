// Copyright (c) 2026 The clusterset authors
// SPDX-License-Identifier: Apache-2.0

//! Unit tests for pagination and tag filtering.

use super::*;
use crate::testutil::{discovered, FakeClusterApi};
use std::sync::atomic::Ordering;

fn tags(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
        .collect()
}

#[test]
fn empty_selector_matches_everything() {
    assert!(matches_tags(&tags(&[]), &tags(&[])));
    assert!(matches_tags(&tags(&[("env", "prod")]), &tags(&[])));
}

#[test]
fn selector_requires_exact_value() {
    let selector = tags(&[("env", "prod")]);

    assert!(matches_tags(&tags(&[("env", "prod")]), &selector));
    assert!(!matches_tags(&tags(&[("env", "staging")]), &selector));
}

#[test]
fn missing_key_excludes_cluster() {
    let selector = tags(&[("env", "prod")]);

    assert!(!matches_tags(&tags(&[("team", "x")]), &selector));
    assert!(!matches_tags(&tags(&[]), &selector));
}

#[test]
fn all_selector_entries_must_match() {
    let selector = tags(&[("env", "prod"), ("team", "x")]);

    assert!(matches_tags(
        &tags(&[("env", "prod"), ("team", "x"), ("extra", "y")]),
        &selector
    ));
    assert!(!matches_tags(&tags(&[("env", "prod")]), &selector));
}

#[tokio::test]
async fn discovery_filters_by_selector_tags() {
    // env=prod matches A and C; B is staging, D untagged.
    let api = FakeClusterApi::new(vec![
        discovered("a", &[("env", "prod")]),
        discovered("b", &[("env", "staging")]),
        discovered("c", &[("env", "prod"), ("team", "x")]),
        discovered("d", &[]),
    ]);

    let matched = discover_clusters(&api, &tags(&[("env", "prod")])).await.unwrap();

    let names: Vec<&str> = matched.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["a", "c"]);
}

#[tokio::test]
async fn empty_selector_discovers_all_clusters() {
    let api = FakeClusterApi::new(vec![
        discovered("a", &[("env", "prod")]),
        discovered("b", &[]),
    ]);

    let matched = discover_clusters(&api, &tags(&[])).await.unwrap();

    assert_eq!(matched.len(), 2);
}

#[tokio::test]
async fn discovery_walks_every_page_exactly_once() {
    let clusters = vec![
        discovered("a", &[]),
        discovered("b", &[]),
        discovered("c", &[]),
        discovered("d", &[]),
        discovered("e", &[]),
    ];
    let api = FakeClusterApi::with_pages(clusters, vec![vec!["a", "b"], vec!["c", "d"], vec!["e"]]);

    let matched = discover_clusters(&api, &tags(&[])).await.unwrap();

    let names: Vec<&str> = matched.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["a", "b", "c", "d", "e"]);
    assert_eq!(api.list_calls.load(Ordering::SeqCst), 3);
    assert_eq!(api.describe_calls.load(Ordering::SeqCst), 5);
}

#[tokio::test]
async fn list_failure_aborts_the_whole_call() {
    let clusters = vec![discovered("a", &[]), discovered("b", &[])];
    let api = FakeClusterApi::with_pages(clusters, vec![vec!["a"], vec!["b"]]).fail_list_page(1);

    let result = discover_clusters(&api, &tags(&[])).await;

    // Page 0 succeeded, but no partial set escapes.
    assert!(result.is_err());
}

#[tokio::test]
async fn describe_failure_aborts_the_whole_call() {
    let api = FakeClusterApi::new(vec![
        discovered("a", &[]),
        discovered("b", &[]),
        discovered("c", &[]),
    ])
    .fail_describe_on("b");

    let result = discover_clusters(&api, &tags(&[])).await;

    assert!(result.is_err());
    // "c" was never described after "b" failed.
    assert_eq!(api.describe_calls.load(Ordering::SeqCst), 2);
}

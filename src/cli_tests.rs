// Copyright (c) 2026 The clusterset authors
// SPDX-License-Identifier: Apache-2.0

//! Unit tests for the command-line surface.

use super::*;
use clap::Parser;

#[test]
fn parses_key_value_pairs() {
    let map = parse_key_values(&["env=prod".to_string(), "team=platform".to_string()]).unwrap();

    assert_eq!(map.get("env").map(String::as_str), Some("prod"));
    assert_eq!(map.get("team").map(String::as_str), Some("platform"));
}

#[test]
fn empty_value_is_allowed() {
    let map = parse_key_values(&["env=".to_string()]).unwrap();

    assert_eq!(map.get("env").map(String::as_str), Some(""));
}

#[test]
fn pair_without_equals_is_rejected() {
    let err = parse_key_values(&["just-a-key".to_string()]).unwrap_err();

    assert!(matches!(err, Error::InvalidInput(_)));
}

#[test]
fn empty_key_is_rejected() {
    let err = parse_key_values(&["=value".to_string()]).unwrap_err();

    assert!(matches!(err, Error::InvalidInput(_)));
}

#[test]
fn no_pairs_yields_empty_map() {
    assert!(parse_key_values(&[]).unwrap().is_empty());
}

#[test]
fn sync_flags_parse() {
    let cli = Cli::try_parse_from([
        "clusterset",
        "sync",
        "--dry-run",
        "--namespace",
        "argocd",
        "--role-arn",
        "arn:aws:iam::1:role/discovery",
        "--eks-tags",
        "env=prod,team=x",
        "--labels",
        "managed-by=clusterset",
        "--aws-auth-config-role-arn",
        "arn:aws:iam::1:role/argocd",
    ])
    .unwrap();

    let Commands::Sync(args) = cli.command else {
        panic!("expected sync");
    };
    assert!(args.common.dry_run);
    assert_eq!(args.common.namespace.as_deref(), Some("argocd"));
    // value_delimiter splits the comma-joined tag list.
    assert_eq!(args.eks_tags, vec!["env=prod", "team=x"]);
    assert_eq!(args.common.labels, vec!["managed-by=clusterset"]);
    assert_eq!(
        args.common.aws_auth_config_role_arn,
        "arn:aws:iam::1:role/argocd"
    );
}

#[test]
fn create_requires_a_name() {
    assert!(Cli::try_parse_from(["clusterset", "create"]).is_err());
}

#[test]
fn create_accepts_explicit_endpoint_and_ca() {
    let cli = Cli::try_parse_from([
        "clusterset",
        "create",
        "--name",
        "prod-1",
        "--endpoint",
        "https://prod-1.eks.example.com",
        "--ca-data",
        "Y2E=",
    ])
    .unwrap();

    let Commands::Create(args) = cli.command else {
        panic!("expected create");
    };
    assert_eq!(args.name, "prod-1");
    assert_eq!(args.endpoint.as_deref(), Some("https://prod-1.eks.example.com"));
    assert_eq!(args.ca_data.as_deref(), Some("Y2E="));
    assert!(!args.common.dry_run);
}

#[test]
fn delete_defaults_leave_endpoint_unset() {
    let cli = Cli::try_parse_from(["clusterset", "delete", "--name", "prod-1"]).unwrap();

    let Commands::Delete(args) = cli.command else {
        panic!("expected delete");
    };
    assert!(args.endpoint.is_none());
    assert!(args.ca_data.is_none());
    assert!(args.common.aws_auth_config_role_arn.is_empty());
}

#[test]
fn controller_manager_takes_no_flags() {
    let cli = Cli::try_parse_from(["clusterset", "controller-manager"]).unwrap();

    assert!(matches!(cli.command, Commands::ControllerManager));
}

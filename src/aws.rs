// Copyright (c) 2026 The clusterset authors
// SPDX-License-Identifier: Apache-2.0

//! AWS credential resolution and EKS client construction.
//!
//! Credentials come from the SDK's default chain (environment, shared
//! config/profile, IRSA, instance metadata). When a selector carries a role
//! ARN, an STS assume-role provider is layered on top so discovery acts on
//! behalf of that role.

use crate::constants::STS_SESSION_NAME;
use aws_config::sts::AssumeRoleProvider;
use aws_config::BehaviorVersion;

/// Build an EKS client, optionally assuming `role_arn` first.
///
/// An empty or absent role ARN uses the base credential chain as-is.
pub async fn eks_client(role_arn: Option<&str>) -> aws_sdk_eks::Client {
    let base = aws_config::defaults(BehaviorVersion::latest()).load().await;

    match role_arn.filter(|arn| !arn.is_empty()) {
        Some(arn) => {
            let provider = AssumeRoleProvider::builder(arn)
                .session_name(STS_SESSION_NAME)
                .configure(&base)
                .build()
                .await;

            let config = aws_config::defaults(BehaviorVersion::latest())
                .credentials_provider(provider)
                .load()
                .await;

            aws_sdk_eks::Client::new(&config)
        }
        None => aws_sdk_eks::Client::new(&base),
    }
}

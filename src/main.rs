// Copyright (c) 2026 The clusterset authors
// SPDX-License-Identifier: Apache-2.0

use anyhow::Result;
use clap::Parser;
use clusterset::{
    aws,
    cli::{parse_key_values, Cli, Commands, RecordArgs, SetArgs},
    constants::TOKIO_WORKER_THREADS,
    crd::ClusterSet,
    discovery::EksClusterApi,
    events::KubeEventSink,
    reconciler::{error_policy, reconcile, Context},
    run::{self, ClusterSetConfig, RecordConfig},
    store::KubeSecretStore,
};
use futures::StreamExt;
use k8s_openapi::api::core::v1::Secret;
use kube::{
    runtime::{watcher::Config, Controller},
    Api, Client,
};
use std::sync::Arc;
use tracing::{debug, info};

fn main() -> Result<()> {
    let cli = Cli::parse();

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(TOKIO_WORKER_THREADS)
        .thread_name("clusterset")
        .enable_all()
        .build()?;

    runtime.block_on(async_main(cli))
}

async fn async_main(cli: Cli) -> Result<()> {
    // Respects RUST_LOG for the filter and RUST_LOG_FORMAT for text/json
    // output, defaulting to INFO text.
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let log_format = std::env::var("RUST_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());

    match log_format.to_lowercase().as_str() {
        "json" => {
            tracing_subscriber::fmt()
                .with_env_filter(env_filter)
                .with_target(false)
                .json()
                .init();
        }
        _ => {
            tracing_subscriber::fmt()
                .with_env_filter(env_filter)
                .with_target(false)
                .compact()
                .init();
        }
    }

    match cli.command {
        Commands::Create(args) => {
            let output = run_create(args).await?;
            print!("{output}");
            Ok(())
        }
        Commands::Delete(args) => {
            let output = run_delete(args).await?;
            print!("{output}");
            Ok(())
        }
        Commands::CreateMissing(args) => run_set_command(args, SetCommand::CreateMissing).await,
        Commands::DeleteMissing(args) => run_set_command(args, SetCommand::DeleteMissing).await,
        Commands::Sync(args) => run_set_command(args, SetCommand::Sync).await,
        Commands::ControllerManager => run_controller_manager().await,
    }
}

fn record_config(args: &RecordArgs, client: &Client) -> Result<RecordConfig> {
    Ok(RecordConfig {
        dry_run: args.common.dry_run,
        namespace: namespace_or_default(args.common.namespace.as_deref(), client),
        name: args.name.clone(),
        endpoint: args.endpoint.clone(),
        ca_data: args.ca_data.clone(),
        labels: parse_key_values(&args.common.labels)?,
        aws_auth_config_role_arn: args.common.aws_auth_config_role_arn.clone(),
    })
}

async fn run_create(args: RecordArgs) -> Result<String> {
    let client = Client::try_default().await?;
    let config = record_config(&args, &client)?;
    run::validate_record(&config)?;

    let store = KubeSecretStore::new(client, &config.namespace);
    let eks = aws::eks_client(args.common.role_arn.as_deref()).await;
    let api = EksClusterApi::new(eks);

    Ok(run::create(&store, &api, &config).await?)
}

async fn run_delete(args: RecordArgs) -> Result<String> {
    let client = Client::try_default().await?;
    let config = record_config(&args, &client)?;
    run::validate_record(&config)?;

    let store = KubeSecretStore::new(client, &config.namespace);

    Ok(run::delete(&store, &config).await?)
}

enum SetCommand {
    CreateMissing,
    DeleteMissing,
    Sync,
}

async fn run_set_command(args: SetArgs, command: SetCommand) -> Result<()> {
    let client = Client::try_default().await?;
    let namespace = namespace_or_default(args.common.namespace.as_deref(), &client);

    let config = ClusterSetConfig {
        dry_run: args.common.dry_run,
        namespace: namespace.clone(),
        eks_tags: parse_key_values(&args.eks_tags)?,
        labels: parse_key_values(&args.common.labels)?,
        aws_auth_config_role_arn: args.common.aws_auth_config_role_arn.clone(),
    };

    let store = KubeSecretStore::new(client, &namespace);
    let eks = aws::eks_client(args.common.role_arn.as_deref()).await;
    let api = EksClusterApi::new(eks);

    let summary = match command {
        SetCommand::CreateMissing => run::create_missing(&store, &api, &config).await?,
        SetCommand::DeleteMissing => run::delete_missing(&store, &api, &config).await?,
        SetCommand::Sync => run::sync(&store, &api, &config).await?,
    };

    print!("{}", run::summarize(&summary, config.dry_run));
    Ok(())
}

async fn run_controller_manager() -> Result<()> {
    info!("Starting ClusterSet controller");

    let client = Client::try_default().await?;
    debug!("Kubernetes client initialized");

    let context = Arc::new(Context {
        client: client.clone(),
        sink: Arc::new(KubeEventSink::new(client.clone())),
    });

    let sets = Api::<ClusterSet>::all(client.clone());
    let secrets = Api::<Secret>::all(client);

    Controller::new(sets, Config::default())
        .owns(secrets, Config::default())
        .shutdown_on_signal()
        .run(reconcile, error_policy, context)
        .for_each(|result| async move {
            match result {
                Ok((object, _)) => debug!(object = %object.name, "Reconciled"),
                Err(e) => debug!("Reconcile error delegated to policy: {e}"),
            }
        })
        .await;

    info!("Controller stream ended");
    Ok(())
}

fn namespace_or_default(namespace: Option<&str>, client: &Client) -> String {
    match namespace {
        Some(ns) if !ns.is_empty() => ns.to_string(),
        _ => client.default_namespace().to_string(),
    }
}

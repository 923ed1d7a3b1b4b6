// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use anyhow::{Context as _, Result};
use k8s_openapi::apiextensions_apiserver::pkg::apis::apiextensions::v1::CustomResourceDefinition;
use kube::{Client, CustomResourceExt};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use keel::config::Config;
use keel::kubernetes::wait_for_crds;
use keel::managed::{ExternalClient, Managed, Reconciler};
use keel::reconcilers::{self, Context};
use keel::remote::{HttpRemote, HyperTransport, InMemoryRemote, RemoteAdapter, RestResource};
use keel::types::{Bucket, KeyValue, ServerConfiguration, VaultSecret};

#[tokio::main]
async fn main() -> Result<()> {
    if std::env::args().any(|a| a == "--print-crds") {
        return print_crds();
    }

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("Starting Keel operator");

    // Load configuration
    let config = Config::from_env()?;
    info!(
        "Configuration loaded: endpoint={}, poll_interval={:?}, testing_mode={}",
        config
            .provider_endpoint
            .as_ref()
            .map(|u| u.as_str())
            .unwrap_or("<in-memory>"),
        config.poll_interval,
        config.testing_mode
    );

    // Create Kubernetes client
    let client = Client::try_default().await?;
    info!("Connected to Kubernetes cluster");

    info!("Waiting for managed resource CRDs to become available...");
    wait_for_crds(
        &client,
        &[
            KeyValue::RESOURCE,
            VaultSecret::RESOURCE,
            ServerConfiguration::RESOURCE,
            Bucket::RESOURCE,
        ],
    )
    .await?;

    let shutdown = CancellationToken::new();
    let signal = shutdown.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Shutdown requested");
        }
        signal.cancel();
    });

    let context =
        |external| Context::new(client.clone(), external, config.clone(), shutdown.clone());

    info!("Starting controllers...");

    tokio::try_join!(
        reconcilers::run::<KeyValue>(context(external::<KeyValue>(&config)?)),
        reconcilers::run::<VaultSecret>(context(external::<VaultSecret>(&config)?)),
        reconcilers::run::<ServerConfiguration>(context(external::<ServerConfiguration>(&config)?)),
        reconcilers::run::<Bucket>(context(external::<Bucket>(&config)?)),
    )?;

    info!("All controllers stopped");
    Ok(())
}

/// Build the external client for kind `R` on top of the configured remote.
fn external<R: RestResource>(config: &Config) -> Result<Arc<dyn ExternalClient>> {
    let adapter: Arc<dyn RemoteAdapter<R>> = if config.testing_mode {
        warn!("Testing mode: {} resources are kept in memory", R::RESOURCE);
        Arc::new(InMemoryRemote::<R>::new())
    } else {
        let endpoint = config
            .provider_endpoint
            .clone()
            .context("PROVIDER_ENDPOINT environment variable not set")?;
        Arc::new(
            HttpRemote::<R>::new(endpoint, HyperTransport::new())
                .with_token(config.provider_token.clone()),
        )
    };
    Ok(Arc::new(Reconciler::<R>::new(adapter)))
}

fn print_crds() -> Result<()> {
    let crds: [CustomResourceDefinition; 4] = [
        KeyValue::crd(),
        VaultSecret::crd(),
        ServerConfiguration::crd(),
        Bucket::crd(),
    ];
    for crd in crds {
        println!("---");
        print!("{}", serde_yaml::to_string(&crd)?);
    }
    Ok(())
}

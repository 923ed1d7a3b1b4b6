// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! CRD availability checking utilities

use crate::constants::crd::{POLL_INTERVAL_SECS, POLL_MAX_INTERVAL_SECS};
use crate::constants::{API_GROUP, API_VERSION};
use crate::error::Result;
use kube::{discovery::Discovery, Client};
use std::time::Duration;
use tokio::time::sleep;
use tracing::{info, warn};

/// Wait for the CRDs of all managed `kinds` to become available.
/// This uses exponential backoff starting at POLL_INTERVAL_SECS seconds.
pub async fn wait_for_crds(client: &Client, kinds: &[&str]) -> Result<()> {
    let mut interval = POLL_INTERVAL_SECS;

    loop {
        match missing_kinds(client, kinds).await {
            Ok(missing) if missing.is_empty() => {
                info!("All {} CRDs ({}/{}) are available", kinds.len(), API_GROUP, API_VERSION);
                return Ok(());
            }
            Ok(missing) => {
                info!(
                    "CRDs not yet available: {}, waiting {} seconds...",
                    missing.join(", "),
                    interval
                );
            }
            Err(e) => {
                warn!(
                    "Error checking for CRDs: {}, retrying in {} seconds...",
                    e, interval
                );
            }
        }

        sleep(Duration::from_secs(interval)).await;

        // Exponential backoff with max cap
        interval = (interval * 2).min(POLL_MAX_INTERVAL_SECS);
    }
}

/// The kinds that discovery does not (yet) serve.
async fn missing_kinds(client: &Client, kinds: &[&str]) -> Result<Vec<String>> {
    let discovery = Discovery::new(client.clone())
        .filter(&[API_GROUP])
        .run()
        .await?;

    let served: Vec<String> = discovery
        .groups()
        .filter(|g| g.name() == API_GROUP)
        .flat_map(|g| g.recommended_resources())
        .filter(|(ar, _)| ar.version == API_VERSION)
        .map(|(ar, _)| ar.kind)
        .collect();

    Ok(kinds
        .iter()
        .filter(|k| !served.iter().any(|s| s == *k))
        .map(|k| k.to_string())
        .collect())
}

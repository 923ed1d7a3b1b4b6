// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use anyhow::{bail, Context, Result};
use std::env;
use std::time::Duration;
use url::Url;

/// Operator configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the provider gateway. Absent only in testing mode.
    pub provider_endpoint: Option<Url>,
    pub provider_token: Option<String>,
    /// Requeue delay after a successful reconcile
    pub poll_interval: Duration,
    /// Requeue delay after a failed reconcile
    pub error_requeue: Duration,
    /// Deadline for a single remote call
    pub call_timeout: Duration,
    /// Use the in-memory remote instead of the provider gateway
    pub testing_mode: bool,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let testing_mode: bool = lookup("TESTING_MODE")
            .map(|v| v.parse().unwrap_or(false))
            .unwrap_or(false);

        let provider_endpoint = match lookup("PROVIDER_ENDPOINT") {
            Some(raw) => Some(
                Url::parse(&raw)
                    .with_context(|| format!("PROVIDER_ENDPOINT is not a valid URL: {}", raw))?,
            ),
            None if testing_mode => None,
            None => bail!("PROVIDER_ENDPOINT environment variable not set"),
        };

        Ok(Config {
            provider_endpoint,
            provider_token: lookup("PROVIDER_TOKEN").filter(|t| !t.is_empty()),
            poll_interval: seconds(&lookup, "POLL_INTERVAL_SECS", 60)?,
            error_requeue: seconds(&lookup, "ERROR_REQUEUE_SECS", 60)?,
            call_timeout: seconds(&lookup, "REMOTE_CALL_TIMEOUT_SECS", 30)?,
            testing_mode,
        })
    }
}

fn seconds(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &str,
    default: u64,
) -> Result<Duration> {
    let secs = match lookup(name) {
        Some(raw) => raw
            .parse::<u64>()
            .with_context(|| format!("{} must be a number of seconds, got {:?}", name, raw))?,
        None => default,
    };
    if secs == 0 {
        bail!("{} must be greater than zero", name);
    }
    Ok(Duration::from_secs(secs))
}

// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Deadline and cancellation carried by one reconcile invocation.

use super::error::RemoteError;
use std::future::Future;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

#[derive(Debug, Clone)]
pub struct Tick {
    cancel: CancellationToken,
    timeout: Duration,
}

impl Tick {
    pub fn new(timeout: Duration) -> Self {
        Self::with_token(CancellationToken::new(), timeout)
    }

    pub fn with_token(cancel: CancellationToken, timeout: Duration) -> Self {
        Self { cancel, timeout }
    }

    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Run one remote call under this tick's deadline. Cancellation and
    /// timeouts surface as transport errors so the scheduler retries them.
    pub async fn run<T, F>(&self, call: F) -> Result<T, RemoteError>
    where
        F: Future<Output = Result<T, RemoteError>>,
    {
        tokio::select! {
            biased;
            _ = self.cancel.cancelled() => Err(RemoteError::transport("remote call cancelled")),
            res = tokio::time::timeout(self.timeout, call) => match res {
                Ok(res) => res,
                Err(_) => Err(RemoteError::transport(format!(
                    "remote call timed out after {}s",
                    self.timeout.as_secs_f64()
                ))),
            },
        }
    }
}

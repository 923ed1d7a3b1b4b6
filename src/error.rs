// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use crate::managed::ManagedError;
use kube::runtime::finalizer;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum KeelError {
    #[error("Kubernetes API error: {0}")]
    KubeError(#[from] kube::Error),

    #[error(transparent)]
    ManagedError(#[from] ManagedError),

    #[error("Finalizer error: {0}")]
    FinalizerError(#[source] Box<finalizer::Error<KeelError>>),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

impl KeelError {
    /// The reconcile core error behind this one, if any.
    pub fn managed(&self) -> Option<&ManagedError> {
        match self {
            KeelError::ManagedError(e) => Some(e),
            KeelError::FinalizerError(e) => match e.as_ref() {
                finalizer::Error::ApplyFailed(inner) | finalizer::Error::CleanupFailed(inner) => {
                    inner.managed()
                }
                _ => None,
            },
            _ => None,
        }
    }

    pub fn is_misuse(&self) -> bool {
        self.managed().is_some_and(ManagedError::is_misuse)
    }

    /// Whether the failure may clear up without a change to the declaration.
    /// Kubernetes API failures count as transient.
    pub fn is_retryable(&self) -> bool {
        self.managed().map_or(true, ManagedError::is_retryable)
    }
}

impl From<finalizer::Error<KeelError>> for KeelError {
    fn from(e: finalizer::Error<KeelError>) -> Self {
        KeelError::FinalizerError(Box::new(e))
    }
}

pub type Result<T> = std::result::Result<T, KeelError>;

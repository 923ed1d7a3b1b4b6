// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Error taxonomy of the reconciliation core.

use std::fmt;
use thiserror::Error;

/// Outcome of a remote call that did not succeed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RemoteError {
    /// The remote object does not exist.
    #[error("{0} not found")]
    NotFound(String),

    /// Network, auth or serialization failure talking to the remote system.
    #[error("transport error: {0}")]
    Transport(String),

    /// The remote system refused the operation (validation, quota, conflict).
    #[error("rejected by remote ({status}): {message}")]
    Rejected { status: u16, message: String },
}

impl RemoteError {
    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound(what.into())
    }

    pub fn transport(message: impl fmt::Display) -> Self {
        Self::Transport(message.to_string())
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

/// Failure to snapshot or compare the observed remote object.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("cannot determine if {resource} is up-to-date: {reason}")]
pub struct ComparisonError {
    pub resource: &'static str,
    pub reason: String,
}

impl ComparisonError {
    pub fn new(resource: &'static str, reason: impl fmt::Display) -> Self {
        Self {
            resource,
            reason: reason.to_string(),
        }
    }
}

/// The reconcile phase a remote call belonged to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    Get,
    Create,
    Update,
    Delete,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Phase::Get => "get",
            Phase::Create => "create",
            Phase::Update => "update",
            Phase::Delete => "delete",
        })
    }
}

/// Error returned by the reconciler to its scheduler.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ManagedError {
    #[error("cannot {phase} {resource}: {source}")]
    Remote {
        phase: Phase,
        resource: &'static str,
        #[source]
        source: RemoteError,
    },

    /// A resource of the wrong kind was handed to a reconciler.
    #[error("unexpected resource, it must be {expected}")]
    Misuse { expected: &'static str },
}

impl ManagedError {
    pub fn remote(phase: Phase, resource: &'static str, source: RemoteError) -> Self {
        Self::Remote {
            phase,
            resource,
            source,
        }
    }

    pub fn phase(&self) -> Option<Phase> {
        match self {
            Self::Remote { phase, .. } => Some(*phase),
            Self::Misuse { .. } => None,
        }
    }

    /// Transport failures may clear up on their own; rejections and misuse
    /// need someone to change the declaration or the code.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Remote {
                source: RemoteError::Transport(_),
                ..
            }
        )
    }

    pub fn is_misuse(&self) -> bool {
        matches!(self, Self::Misuse { .. })
    }
}

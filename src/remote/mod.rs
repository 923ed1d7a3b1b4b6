// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Remote adapters: clients for the external system of record.

pub mod http;
pub mod memory;

pub use self::http::{HttpRemote, HyperTransport, RestResource, Transport};
pub use memory::{InMemoryRemote, Operation};

use crate::managed::{Managed, RemoteError};
use async_trait::async_trait;

/// The three remote operations for one resource kind.
///
/// Implementations are shared across resources and must tolerate
/// concurrent calls for distinct identities.
#[async_trait]
pub trait RemoteAdapter<R: Managed>: Send + Sync {
    /// Fetch the remote object. Absence is [`RemoteError::NotFound`].
    async fn get(&self, id: &R::Identity) -> Result<R::Remote, RemoteError>;

    /// Idempotent upsert: repeating it with the same parameters succeeds
    /// and leaves the same remote state.
    async fn create_or_update(&self, desired: &R::Parameters) -> Result<R::Remote, RemoteError>;

    async fn delete(&self, id: &R::Identity) -> Result<(), RemoteError>;
}

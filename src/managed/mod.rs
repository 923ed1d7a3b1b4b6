// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Reconciliation core: converge a remote object toward its declaration.
//!
//! A resource kind plugs in by implementing [`Managed`], which exposes the
//! desired parameters and status of the declaration plus the three pure
//! strategy functions (late-initialization, projection onto the remote
//! shape, observation mirroring). The generic [`Reconciler`] drives a
//! [`RemoteAdapter`](crate::remote::RemoteAdapter) with them.

pub mod drift;
pub mod error;
pub mod external;
pub mod late_init;
pub mod reconciler;
pub mod tick;

pub use drift::{is_up_to_date, DriftCheck};
pub use error::{ComparisonError, ManagedError, Phase, RemoteError};
pub use external::ExternalClient;
pub use reconciler::Reconciler;
pub use tick::Tick;

use crate::types::condition::{DeletionPolicy, ManagedStatus};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt::{Debug, Display};
use std::hash::Hash;

/// A declaration of one externally hosted resource.
pub trait Managed: Send + Sync + 'static {
    /// Kind name used in logs and error messages.
    const RESOURCE: &'static str;

    /// Fields that address the remote object. Never change after creation.
    type Identity: Clone + Eq + Hash + Debug + Display + Send + Sync;
    type Parameters: Clone + PartialEq + Debug + Serialize + Send + Sync;
    type Remote: Clone + Default + Debug + Serialize + DeserializeOwned + Send + Sync;
    type Observation: Clone + Default + PartialEq + Debug + Serialize + Send + Sync;

    fn identity(params: &Self::Parameters) -> Self::Identity;

    fn parameters(&self) -> &Self::Parameters;
    fn parameters_mut(&mut self) -> &mut Self::Parameters;

    fn status(&self) -> Option<&ManagedStatus<Self::Observation>>;
    fn status_mut(&mut self) -> &mut ManagedStatus<Self::Observation>;

    fn deletion_policy(&self) -> DeletionPolicy;

    /// Fill unset desired fields from the remote object.
    fn late_initialize(params: &mut Self::Parameters, remote: &Self::Remote);

    /// Override every remote field that has a desired counterpart.
    fn override_parameters(params: &Self::Parameters, remote: Self::Remote) -> Self::Remote;

    /// Mirror provider metadata into the observation, fill-only.
    fn generate_observation(observation: &mut Self::Observation, remote: &Self::Remote);
}

/// What one Observe call found out about the remote object.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExternalObservation {
    pub resource_exists: bool,
    pub resource_up_to_date: bool,
    pub resource_late_initialized: bool,
}

impl ExternalObservation {
    pub fn absent() -> Self {
        Self::default()
    }
}

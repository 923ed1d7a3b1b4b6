// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Generic Observe / Create / Update / Delete loop for one resource kind.

use super::drift::is_up_to_date;
use super::error::{ManagedError, Phase, RemoteError};
use super::late_init::late_initialize;
use super::tick::Tick;
use super::{ExternalObservation, Managed};
use crate::remote::RemoteAdapter;
use crate::types::condition::Condition;
use std::marker::PhantomData;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// Drives a [`RemoteAdapter`] for resources of kind `R`.
///
/// Holds no per-resource state; the caller serialises calls for any one
/// resource.
pub struct Reconciler<R: Managed> {
    adapter: Arc<dyn RemoteAdapter<R>>,
    _kind: PhantomData<fn() -> R>,
}

impl<R: Managed> Reconciler<R> {
    pub fn new(adapter: Arc<dyn RemoteAdapter<R>>) -> Self {
        Self {
            adapter,
            _kind: PhantomData,
        }
    }

    /// Look up the remote object, late-initialize the declaration from it,
    /// mirror provider metadata into status and check for drift.
    #[instrument(skip_all, fields(kind = R::RESOURCE, id = %R::identity(cr.parameters())))]
    pub async fn observe(
        &self,
        cr: &mut R,
        tick: &Tick,
    ) -> Result<ExternalObservation, ManagedError> {
        let id = R::identity(cr.parameters());

        let remote = match tick.run(self.adapter.get(&id)).await {
            Ok(remote) => remote,
            Err(RemoteError::NotFound(_)) => {
                debug!("{} {} does not exist", R::RESOURCE, id);
                return Ok(ExternalObservation::absent());
            }
            Err(e) => return Err(ManagedError::remote(Phase::Get, R::RESOURCE, e)),
        };

        let late_initialized = late_initialize::<R>(cr.parameters_mut(), &remote);
        if late_initialized {
            debug!("Late-initialized {} {} from remote", R::RESOURCE, id);
        }

        let status = cr.status_mut();
        status.set_condition(Condition::available());
        R::generate_observation(&mut status.at_provider, &remote);

        let check = is_up_to_date::<R>(cr.parameters(), &remote);
        if let Some(e) = &check.error {
            warn!("Treating {} {} as up-to-date: {}", R::RESOURCE, id, e);
        }

        Ok(ExternalObservation {
            resource_exists: true,
            resource_up_to_date: check.up_to_date,
            resource_late_initialized: late_initialized,
        })
    }

    /// Create the remote object. A partial failure is reported, not undone.
    #[instrument(skip_all, fields(kind = R::RESOURCE, id = %R::identity(cr.parameters())))]
    pub async fn create(&self, cr: &mut R, tick: &Tick) -> Result<(), ManagedError> {
        cr.status_mut().set_condition(Condition::creating());
        self.upsert(cr, tick, Phase::Create).await?;
        info!("Created {} {}", R::RESOURCE, R::identity(cr.parameters()));
        Ok(())
    }

    #[instrument(skip_all, fields(kind = R::RESOURCE, id = %R::identity(cr.parameters())))]
    pub async fn update(&self, cr: &mut R, tick: &Tick) -> Result<(), ManagedError> {
        self.upsert(cr, tick, Phase::Update).await?;
        info!("Updated {} {}", R::RESOURCE, R::identity(cr.parameters()));
        Ok(())
    }

    /// Delete the remote object. An object that is already gone counts as
    /// deleted.
    #[instrument(skip_all, fields(kind = R::RESOURCE, id = %R::identity(cr.parameters())))]
    pub async fn delete(&self, cr: &mut R, tick: &Tick) -> Result<(), ManagedError> {
        cr.status_mut().set_condition(Condition::deleting());
        let id = R::identity(cr.parameters());

        match tick.run(self.adapter.delete(&id)).await {
            Ok(()) => {
                info!("Deleted {} {}", R::RESOURCE, id);
                Ok(())
            }
            Err(RemoteError::NotFound(_)) => {
                debug!("{} {} already gone", R::RESOURCE, id);
                Ok(())
            }
            Err(e) => Err(ManagedError::remote(Phase::Delete, R::RESOURCE, e)),
        }
    }

    async fn upsert(&self, cr: &R, tick: &Tick, phase: Phase) -> Result<(), ManagedError> {
        tick.run(self.adapter.create_or_update(cr.parameters()))
            .await
            .map(|_| ())
            .map_err(|e| ManagedError::remote(phase, R::RESOURCE, e))
    }
}

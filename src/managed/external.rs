// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Type-erased face of a [`Reconciler`] handed to the scheduler.

use super::error::ManagedError;
use super::reconciler::Reconciler;
use super::tick::Tick;
use super::{ExternalObservation, Managed};
use async_trait::async_trait;
use std::any::Any;
use tracing::error;

/// Operations the scheduler invokes on an opaque resource handle.
#[async_trait]
pub trait ExternalClient: Send + Sync {
    async fn observe(
        &self,
        mg: &mut (dyn Any + Send),
        tick: &Tick,
    ) -> Result<ExternalObservation, ManagedError>;
    async fn create(&self, mg: &mut (dyn Any + Send), tick: &Tick) -> Result<(), ManagedError>;
    async fn update(&self, mg: &mut (dyn Any + Send), tick: &Tick) -> Result<(), ManagedError>;
    async fn delete(&self, mg: &mut (dyn Any + Send), tick: &Tick) -> Result<(), ManagedError>;
}

fn downcast<R: Managed>(mg: &mut (dyn Any + Send)) -> Result<&mut R, ManagedError> {
    mg.downcast_mut::<R>().ok_or_else(|| {
        error!("Reconciler for {} was handed a different kind", R::RESOURCE);
        ManagedError::Misuse {
            expected: R::RESOURCE,
        }
    })
}

#[async_trait]
impl<R: Managed> ExternalClient for Reconciler<R> {
    async fn observe(
        &self,
        mg: &mut (dyn Any + Send),
        tick: &Tick,
    ) -> Result<ExternalObservation, ManagedError> {
        let cr = downcast::<R>(mg)?;
        Reconciler::observe(self, cr, tick).await
    }

    async fn create(&self, mg: &mut (dyn Any + Send), tick: &Tick) -> Result<(), ManagedError> {
        let cr = downcast::<R>(mg)?;
        Reconciler::create(self, cr, tick).await
    }

    async fn update(&self, mg: &mut (dyn Any + Send), tick: &Tick) -> Result<(), ManagedError> {
        let cr = downcast::<R>(mg)?;
        Reconciler::update(self, cr, tick).await
    }

    async fn delete(&self, mg: &mut (dyn Any + Send), tick: &Tick) -> Result<(), ManagedError> {
        let cr = downcast::<R>(mg)?;
        Reconciler::delete(self, cr, tick).await
    }
}

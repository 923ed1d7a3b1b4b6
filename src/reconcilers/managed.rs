// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Managed resource controller - drives one kind's declarations through
//! the external client on every watch event and poll.

use crate::config::Config;
use crate::constants::events::{actions, reasons};
use crate::constants::{CREATE_REQUEUE_SECS, FINALIZER, OPERATOR_NAME};
use crate::error::{KeelError, Result};
use crate::kubernetes::persist;
use crate::managed::{ExternalClient, Managed, Phase, Tick};
use crate::types::{Condition, DeletionPolicy};
use futures::StreamExt;
use kube::{
    runtime::{
        controller::Action,
        events::{Event, EventType, Recorder, Reporter},
        finalizer::{finalizer, Event as FinalizerEvent},
        Controller,
    },
    Api, Client, Resource, ResourceExt,
};
use kube_runtime::watcher::Config as WatcherConfig;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt::Debug;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, instrument, warn};

/// A managed kind that can be watched and written back through the API.
pub trait ManagedResource:
    Managed + Resource<DynamicType = ()> + Clone + Serialize + DeserializeOwned + Debug
{
}

impl<T> ManagedResource for T where
    T: Managed + Resource<DynamicType = ()> + Clone + Serialize + DeserializeOwned + Debug
{
}

pub struct Context {
    client: Client,
    external: Arc<dyn ExternalClient>,
    config: Config,
    shutdown: CancellationToken,
    recorder: Recorder,
}

impl Context {
    pub fn new(
        client: Client,
        external: Arc<dyn ExternalClient>,
        config: Config,
        shutdown: CancellationToken,
    ) -> Self {
        let recorder = Recorder::new(client.clone(), Reporter::from(OPERATOR_NAME));
        Self {
            client,
            external,
            config,
            shutdown,
            recorder,
        }
    }

    /// A fresh deadline for one reconcile, cancelled on shutdown.
    fn tick(&self) -> Tick {
        Tick::with_token(self.shutdown.child_token(), self.config.call_timeout)
    }

    /// Publish a Kubernetes Event about `cr`. Failing to publish is logged only.
    async fn publish<R: ManagedResource>(
        &self,
        cr: &R,
        type_: EventType,
        reason: &str,
        action: &str,
        note: String,
    ) {
        let event = Event {
            type_,
            reason: reason.into(),
            note: Some(note),
            action: action.into(),
            secondary: None,
        };
        if let Err(e) = self.recorder.publish(&event, &cr.object_ref(&())).await {
            warn!("Failed to publish {} event for {}: {}", reason, cr.name_any(), e);
        }
    }
}

/// Run the controller for kind `R` until `shutdown` is cancelled.
pub async fn run<R: ManagedResource>(ctx: Context) -> anyhow::Result<()> {
    let api: Api<R> = Api::all(ctx.client.clone());
    let signal = ctx.shutdown.clone();
    let context = Arc::new(ctx);

    info!("Starting {} controller", R::RESOURCE);

    Controller::new(api, WatcherConfig::default())
        .graceful_shutdown_on(async move { signal.cancelled().await })
        .run(reconcile::<R>, error_policy::<R>, context)
        .for_each(|res| async move {
            match res {
                Ok((obj, _)) => debug!("Reconciled {}: {}", R::RESOURCE, obj.name),
                Err(e) => warn!("Reconciliation error: {}", e),
            }
        })
        .await;

    info!("{} controller stopped", R::RESOURCE);
    Ok(())
}

async fn reconcile<R: ManagedResource>(cr: Arc<R>, ctx: Arc<Context>) -> Result<Action> {
    let api: Api<R> = Api::all(ctx.client.clone());
    let api_ref = &api;
    let ctx = ctx.as_ref();

    finalizer(&api, FINALIZER, cr, |event| async move {
        match event {
            FinalizerEvent::Apply(cr) => apply(api_ref, cr, ctx).await,
            FinalizerEvent::Cleanup(cr) => cleanup(api_ref, cr, ctx).await,
        }
    })
    .await
    .map_err(KeelError::from)
}

/// Event reason for a failed reconcile, by the phase that failed.
fn failure_reason(error: &KeelError) -> &'static str {
    match error.managed().and_then(|e| e.phase()) {
        Some(Phase::Get) => reasons::CANNOT_OBSERVE,
        Some(Phase::Create) => reasons::CANNOT_CREATE,
        Some(Phase::Update) => reasons::CANNOT_UPDATE,
        Some(Phase::Delete) => reasons::CANNOT_DELETE,
        None => reasons::RECONCILE_ERROR,
    }
}

/// Observe the external resource and create or update it as needed.
#[instrument(skip_all, fields(kind = R::RESOURCE, name = %cr.name_any()))]
async fn apply<R: ManagedResource>(api: &Api<R>, cr: Arc<R>, ctx: &Context) -> Result<Action> {
    let mut working = (*cr).clone();
    let tick = ctx.tick();

    let result = converge(api, &mut working, ctx, &tick).await;
    match &result {
        Ok(_) => working.status_mut().set_condition(Condition::reconcile_success()),
        Err(e) => {
            working
                .status_mut()
                .set_condition(Condition::reconcile_error(e.to_string()));
            ctx.publish(
                &working,
                EventType::Warning,
                failure_reason(e),
                actions::RECONCILE,
                e.to_string(),
            )
            .await;
        }
    }

    let patched = if working.status() != cr.status() {
        persist::status(api, &working).await
    } else {
        Ok(())
    };

    let action = result?;
    patched?;
    Ok(action)
}

async fn converge<R: ManagedResource>(
    api: &Api<R>,
    cr: &mut R,
    ctx: &Context,
    tick: &Tick,
) -> Result<Action> {
    let observation = ctx.external.observe(cr, tick).await?;

    if observation.resource_late_initialized {
        // Not fatal: the next observation late-initializes again.
        if let Err(e) = persist::declaration(api, cr).await {
            warn!(
                "Failed to persist late-initialized {} {}: {}",
                R::RESOURCE,
                cr.name_any(),
                e
            );
        }
    }

    if !observation.resource_exists {
        ctx.external.create(cr, tick).await?;
        info!("Created external {} for {}", R::RESOURCE, cr.name_any());
        ctx.publish(
            &*cr,
            EventType::Normal,
            reasons::CREATED,
            actions::RECONCILE,
            format!("Created external {}", R::RESOURCE),
        )
        .await;
        return Ok(Action::requeue(Duration::from_secs(CREATE_REQUEUE_SECS)));
    }

    if !observation.resource_up_to_date {
        ctx.external.update(cr, tick).await?;
        info!("Updated external {} for {}", R::RESOURCE, cr.name_any());
        ctx.publish(
            &*cr,
            EventType::Normal,
            reasons::UPDATED,
            actions::RECONCILE,
            format!("Updated external {}", R::RESOURCE),
        )
        .await;
    } else {
        debug!("External {} for {} is up-to-date", R::RESOURCE, cr.name_any());
    }

    Ok(Action::requeue(ctx.config.poll_interval))
}

/// Release the external resource before the finalizer is removed.
#[instrument(skip_all, fields(kind = R::RESOURCE, name = %cr.name_any()))]
async fn cleanup<R: ManagedResource>(api: &Api<R>, cr: Arc<R>, ctx: &Context) -> Result<Action> {
    if cr.deletion_policy() == DeletionPolicy::Orphan {
        info!(
            "Deletion policy of {} is Orphan, leaving the external {} in place",
            cr.name_any(),
            R::RESOURCE
        );
        return Ok(Action::await_change());
    }

    let mut working = (*cr).clone();
    let tick = ctx.tick();

    if let Err(e) = ctx.external.delete(&mut working, &tick).await {
        working
            .status_mut()
            .set_condition(Condition::reconcile_error(e.to_string()));
        ctx.publish(
            &working,
            EventType::Warning,
            reasons::CANNOT_DELETE,
            actions::DELETE,
            e.to_string(),
        )
        .await;
        if let Err(pe) = persist::status(api, &working).await {
            warn!("Failed to record delete failure of {}: {}", cr.name_any(), pe);
        }
        return Err(e.into());
    }

    info!("Deleted external {} for {}", R::RESOURCE, cr.name_any());
    ctx.publish(
        &working,
        EventType::Normal,
        reasons::DELETED,
        actions::DELETE,
        format!("Deleted external {}", R::RESOURCE),
    )
    .await;
    Ok(Action::await_change())
}

fn error_policy<R: ManagedResource>(cr: Arc<R>, error: &KeelError, ctx: Arc<Context>) -> Action {
    if error.is_misuse() {
        error!(
            %error,
            kind = R::RESOURCE,
            name = %cr.name_any(),
            "reconciler misconfigured"
        );
    } else {
        warn!(
            %error,
            kind = R::RESOURCE,
            name = %cr.name_any(),
            retryable = error.is_retryable(),
            "reconciliation failed"
        );
    }
    Action::requeue(ctx.config.error_requeue)
}

// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Writing declarations and their status back to the API server.

use crate::constants::OPERATOR_NAME;
use crate::error::Result;
use crate::managed::Managed;
use kube::api::{Patch, PatchParams, PostParams};
use kube::{Api, Resource, ResourceExt};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::json;
use std::fmt::Debug;
use tracing::{debug, instrument};

/// Persist a late-initialized declaration.
///
/// A full replace keeps explicit `null`s intact and fails on a
/// resourceVersion conflict instead of clobbering a concurrent edit.
#[instrument(skip(api, cr), fields(name = %cr.name_any()))]
pub async fn declaration<R>(api: &Api<R>, cr: &R) -> Result<R>
where
    R: Managed + Resource + Clone + Serialize + DeserializeOwned + Debug,
{
    let pp = PostParams {
        field_manager: Some(OPERATOR_NAME.to_string()),
        ..Default::default()
    };
    let updated = api.replace(&cr.name_any(), &pp, cr).await?;
    debug!("Persisted late-initialized {}", R::RESOURCE);
    Ok(updated)
}

/// Merge the resource's status into the status subresource.
#[instrument(skip(api, cr), fields(name = %cr.name_any()))]
pub async fn status<R>(api: &Api<R>, cr: &R) -> Result<()>
where
    R: Managed + Resource + Clone + Serialize + DeserializeOwned + Debug,
{
    let Some(status) = cr.status() else {
        return Ok(());
    };
    let patch = json!({ "status": status });
    let pp = PatchParams {
        field_manager: Some(OPERATOR_NAME.to_string()),
        ..Default::default()
    };
    api.patch_status(&cr.name_any(), &pp, &Patch::Merge(&patch)).await?;
    Ok(())
}

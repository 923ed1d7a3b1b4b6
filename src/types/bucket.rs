// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Bucket: an object storage bucket.

use crate::managed::{late_init, Managed, RemoteError};
use crate::remote::http::{url_with_segments, RestResource};
use crate::types::condition::{DeletionPolicy, ManagedStatus};
use crate::types::Field;
use kube::CustomResource;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use url::Url;

#[derive(CustomResource, Serialize, Deserialize, Clone, Debug, PartialEq, schemars::JsonSchema)]
#[kube(group = "cloud.keel.dev", version = "v1alpha1", kind = "Bucket")]
#[kube(status = "BucketStatus", derive = "PartialEq")]
#[kube(
    printcolumn = r#"{"name":"READY","type":"string","jsonPath":".status.conditions[?(@.type=='Ready')].status"}"#,
    printcolumn = r#"{"name":"PREDEFINED-ACL","type":"string","jsonPath":".spec.forProvider.predefinedAcl"}"#
)]
#[serde(rename_all = "camelCase")]
pub struct BucketSpec {
    pub for_provider: BucketParameters,
    #[serde(default)]
    pub deletion_policy: DeletionPolicy,
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, schemars::JsonSchema)]
pub enum PredefinedAcl {
    Private,
    PublicRead,
    PublicReadWrite,
    AuthenticatedRead,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct BucketParameters {
    /// Globally unique bucket name. Immutable.
    pub name: String,
    #[serde(default, skip_serializing_if = "Field::is_unset")]
    pub location: Field<String>,
    #[serde(default, skip_serializing_if = "Field::is_unset")]
    pub storage_class: Field<String>,
    #[serde(default, skip_serializing_if = "Field::is_unset")]
    pub predefined_acl: Field<PredefinedAcl>,
    #[serde(default, skip_serializing_if = "Field::is_unset")]
    pub versioning: Field<bool>,
    #[serde(default, skip_serializing_if = "Field::is_unset")]
    pub labels: Field<BTreeMap<String, String>>,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct BucketObservation {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub self_link: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_created: Option<String>,
}

pub type BucketStatus = ManagedStatus<BucketObservation>;

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BucketObject {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage_class: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub predefined_acl: Option<PredefinedAcl>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub versioning: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub labels: Option<BTreeMap<String, String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub self_link: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_created: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub etag: Option<String>,
}

impl Managed for Bucket {
    const RESOURCE: &'static str = "Bucket";

    type Identity = String;
    type Parameters = BucketParameters;
    type Remote = BucketObject;
    type Observation = BucketObservation;

    fn identity(params: &BucketParameters) -> String {
        params.name.clone()
    }

    fn parameters(&self) -> &BucketParameters {
        &self.spec.for_provider
    }

    fn parameters_mut(&mut self) -> &mut BucketParameters {
        &mut self.spec.for_provider
    }

    fn status(&self) -> Option<&BucketStatus> {
        self.status.as_ref()
    }

    fn status_mut(&mut self) -> &mut BucketStatus {
        self.status.get_or_insert_with(Default::default)
    }

    fn deletion_policy(&self) -> DeletionPolicy {
        self.spec.deletion_policy
    }

    fn late_initialize(params: &mut BucketParameters, remote: &BucketObject) {
        params.location.late_init(remote.location.as_ref());
        params.storage_class.late_init(remote.storage_class.as_ref());
        params.predefined_acl.late_init(remote.predefined_acl.as_ref());
        params.versioning.late_init(remote.versioning.as_ref());
        params.labels.late_init(remote.labels.as_ref());
    }

    fn override_parameters(params: &BucketParameters, mut remote: BucketObject) -> BucketObject {
        remote.name = Some(params.name.clone());
        params.location.project(&mut remote.location);
        params.storage_class.project(&mut remote.storage_class);
        params.predefined_acl.project(&mut remote.predefined_acl);
        params.versioning.project(&mut remote.versioning);
        params.labels.project(&mut remote.labels);
        remote
    }

    fn generate_observation(observation: &mut BucketObservation, remote: &BucketObject) {
        late_init::observe(&mut observation.self_link, remote.self_link.as_ref());
        late_init::observe(&mut observation.time_created, remote.time_created.as_ref());
    }
}

impl RestResource for Bucket {
    fn resource_url(base: &Url, id: &String) -> Result<Url, RemoteError> {
        url_with_segments(base, &["buckets", id])
    }
}

// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! ServerConfiguration: one configuration entry of a database server.

use crate::managed::{late_init, Managed, RemoteError};
use crate::remote::http::{url_with_segments, RestResource};
use crate::types::condition::{DeletionPolicy, ManagedStatus};
use crate::types::Field;
use kube::CustomResource;
use serde::{Deserialize, Serialize};
use std::fmt;
use url::Url;

#[derive(CustomResource, Serialize, Deserialize, Clone, Debug, PartialEq, schemars::JsonSchema)]
#[kube(group = "cloud.keel.dev", version = "v1alpha1", kind = "ServerConfiguration")]
#[kube(status = "ServerConfigurationStatus", derive = "PartialEq")]
#[kube(
    printcolumn = r#"{"name":"READY","type":"string","jsonPath":".status.conditions[?(@.type=='Ready')].status"}"#,
    printcolumn = r#"{"name":"VALUE","type":"string","jsonPath":".spec.forProvider.value"}"#
)]
#[serde(rename_all = "camelCase")]
pub struct ServerConfigurationSpec {
    pub for_provider: ServerConfigurationParameters,
    #[serde(default)]
    pub deletion_policy: DeletionPolicy,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ServerConfigurationParameters {
    /// Database server the entry belongs to. Immutable.
    pub server_name: String,
    /// Configuration name, e.g. `max_connections`. Immutable.
    pub name: String,
    #[serde(default, skip_serializing_if = "Field::is_unset")]
    pub value: Field<String>,
    #[serde(default, skip_serializing_if = "Field::is_unset")]
    pub source: Field<String>,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ServerConfigurationObservation {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_value: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allowed_values: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

pub type ServerConfigurationStatus = ManagedStatus<ServerConfigurationObservation>;

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ServerConfigurationObject {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allowed_values: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ServerConfigurationIdentity {
    pub server_name: String,
    pub name: String,
}

impl fmt::Display for ServerConfigurationIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.server_name, self.name)
    }
}

impl Managed for ServerConfiguration {
    const RESOURCE: &'static str = "ServerConfiguration";

    type Identity = ServerConfigurationIdentity;
    type Parameters = ServerConfigurationParameters;
    type Remote = ServerConfigurationObject;
    type Observation = ServerConfigurationObservation;

    fn identity(params: &ServerConfigurationParameters) -> ServerConfigurationIdentity {
        ServerConfigurationIdentity {
            server_name: params.server_name.clone(),
            name: params.name.clone(),
        }
    }

    fn parameters(&self) -> &ServerConfigurationParameters {
        &self.spec.for_provider
    }

    fn parameters_mut(&mut self) -> &mut ServerConfigurationParameters {
        &mut self.spec.for_provider
    }

    fn status(&self) -> Option<&ServerConfigurationStatus> {
        self.status.as_ref()
    }

    fn status_mut(&mut self) -> &mut ServerConfigurationStatus {
        self.status.get_or_insert_with(Default::default)
    }

    fn deletion_policy(&self) -> DeletionPolicy {
        self.spec.deletion_policy
    }

    fn late_initialize(
        params: &mut ServerConfigurationParameters,
        remote: &ServerConfigurationObject,
    ) {
        params.value.late_init(remote.value.as_ref());
        params.source.late_init(remote.source.as_ref());
    }

    fn override_parameters(
        params: &ServerConfigurationParameters,
        mut remote: ServerConfigurationObject,
    ) -> ServerConfigurationObject {
        remote.name = Some(params.name.clone());
        params.value.project(&mut remote.value);
        params.source.project(&mut remote.source);
        remote
    }

    fn generate_observation(
        observation: &mut ServerConfigurationObservation,
        remote: &ServerConfigurationObject,
    ) {
        late_init::observe(&mut observation.default_value, remote.default_value.as_ref());
        late_init::observe(&mut observation.data_type, remote.data_type.as_ref());
        late_init::observe(&mut observation.allowed_values, remote.allowed_values.as_ref());
        late_init::observe(&mut observation.description, remote.description.as_ref());
    }
}

impl RestResource for ServerConfiguration {
    fn resource_url(base: &Url, id: &ServerConfigurationIdentity) -> Result<Url, RemoteError> {
        url_with_segments(base, &["servers", &id.server_name, "configurations", &id.name])
    }
}

// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! VaultSecret: a secret stored in a key vault.

use crate::managed::{late_init, Managed, RemoteError};
use crate::remote::http::{url_with_segments, RestResource};
use crate::types::condition::{DeletionPolicy, ManagedStatus};
use crate::types::Field;
use kube::CustomResource;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use url::Url;

#[derive(CustomResource, Serialize, Deserialize, Clone, Debug, PartialEq, schemars::JsonSchema)]
#[kube(group = "cloud.keel.dev", version = "v1alpha1", kind = "VaultSecret")]
#[kube(status = "VaultSecretStatus", derive = "PartialEq")]
#[kube(
    printcolumn = r#"{"name":"READY","type":"string","jsonPath":".status.conditions[?(@.type=='Ready')].status"}"#,
    printcolumn = r#"{"name":"SYNCED","type":"string","jsonPath":".status.conditions[?(@.type=='Synced')].status"}"#
)]
#[serde(rename_all = "camelCase")]
pub struct VaultSecretSpec {
    pub for_provider: VaultSecretParameters,
    #[serde(default)]
    pub deletion_policy: DeletionPolicy,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct VaultSecretParameters {
    /// Vault holding the secret. Immutable.
    pub vault: String,
    /// Immutable.
    pub name: String,
    pub value: String,
    #[serde(default, skip_serializing_if = "Field::is_unset")]
    pub content_type: Field<String>,
    #[serde(default, skip_serializing_if = "Field::is_unset")]
    pub attributes: Field<SecretAttributes>,
    #[serde(default, skip_serializing_if = "Field::is_unset")]
    pub tags: Field<BTreeMap<String, String>>,
}

/// Declared secret attributes; each one is optional on its own.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SecretAttributes {
    #[serde(default, skip_serializing_if = "Field::is_unset")]
    pub enabled: Field<bool>,
    #[serde(default, skip_serializing_if = "Field::is_unset")]
    pub not_before: Field<String>,
    #[serde(default, skip_serializing_if = "Field::is_unset")]
    pub expires: Field<String>,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct VaultSecretObservation {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kid: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub managed: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recovery_level: Option<String>,
}

pub type VaultSecretStatus = ManagedStatus<VaultSecretObservation>;

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct VaultSecretObject {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attributes: Option<RemoteSecretAttributes>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<BTreeMap<String, String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kid: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub managed: Option<bool>,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RemoteSecretAttributes {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub not_before: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recovery_level: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct VaultSecretIdentity {
    pub vault: String,
    pub name: String,
}

impl fmt::Display for VaultSecretIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.vault, self.name)
    }
}

impl SecretAttributes {
    fn late_init(&mut self, remote: &RemoteSecretAttributes) {
        self.enabled.late_init(remote.enabled.as_ref());
        self.not_before.late_init(remote.not_before.as_ref());
        self.expires.late_init(remote.expires.as_ref());
    }

    fn project(&self, remote: &mut RemoteSecretAttributes) {
        self.enabled.project(&mut remote.enabled);
        self.not_before.project(&mut remote.not_before);
        self.expires.project(&mut remote.expires);
    }
}

impl Managed for VaultSecret {
    const RESOURCE: &'static str = "VaultSecret";

    type Identity = VaultSecretIdentity;
    type Parameters = VaultSecretParameters;
    type Remote = VaultSecretObject;
    type Observation = VaultSecretObservation;

    fn identity(params: &VaultSecretParameters) -> VaultSecretIdentity {
        VaultSecretIdentity {
            vault: params.vault.clone(),
            name: params.name.clone(),
        }
    }

    fn parameters(&self) -> &VaultSecretParameters {
        &self.spec.for_provider
    }

    fn parameters_mut(&mut self) -> &mut VaultSecretParameters {
        &mut self.spec.for_provider
    }

    fn status(&self) -> Option<&VaultSecretStatus> {
        self.status.as_ref()
    }

    fn status_mut(&mut self) -> &mut VaultSecretStatus {
        self.status.get_or_insert_with(Default::default)
    }

    fn deletion_policy(&self) -> DeletionPolicy {
        self.spec.deletion_policy
    }

    fn late_initialize(params: &mut VaultSecretParameters, remote: &VaultSecretObject) {
        params.content_type.late_init(remote.content_type.as_ref());
        params.tags.late_init(remote.tags.as_ref());

        let Some(observed) = &remote.attributes else {
            return;
        };
        if let Some(attributes) = params.attributes.as_mut() {
            attributes.late_init(observed);
        } else if params.attributes.is_unset() {
            let mut attributes = SecretAttributes::default();
            attributes.late_init(observed);
            // Server-computed attributes alone have no declared counterpart.
            if attributes != SecretAttributes::default() {
                params.attributes = Field::Set(attributes);
            }
        }
    }

    fn override_parameters(
        params: &VaultSecretParameters,
        mut remote: VaultSecretObject,
    ) -> VaultSecretObject {
        remote.name = Some(params.name.clone());
        remote.value = Some(params.value.clone());
        params.content_type.project(&mut remote.content_type);
        params.tags.project(&mut remote.tags);

        // An explicitly empty attribute block carries no preferences.
        if let Some(attributes) = params.attributes.as_option() {
            let mut observed = remote.attributes.take().unwrap_or_default();
            attributes.project(&mut observed);
            remote.attributes = (observed != RemoteSecretAttributes::default()).then_some(observed);
        }
        remote
    }

    fn generate_observation(observation: &mut VaultSecretObservation, remote: &VaultSecretObject) {
        late_init::observe(&mut observation.id, remote.id.as_ref());
        late_init::observe(&mut observation.kid, remote.kid.as_ref());
        late_init::observe(&mut observation.managed, remote.managed.as_ref());
        if let Some(attributes) = &remote.attributes {
            late_init::observe(&mut observation.created, attributes.created.as_ref());
            late_init::observe(&mut observation.updated, attributes.updated.as_ref());
            late_init::observe(&mut observation.recovery_level, attributes.recovery_level.as_ref());
        }
    }
}

impl RestResource for VaultSecret {
    fn resource_url(base: &Url, id: &VaultSecretIdentity) -> Result<Url, RemoteError> {
        url_with_segments(base, &["vaults", &id.vault, "secrets", &id.name])
    }
}

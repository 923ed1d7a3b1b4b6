// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! KeyValue: one key-value pair in a configuration store.

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
#[kube(group = "cloud.keel.dev", version = "v1alpha1", kind = "KeyValue")]
#[kube(status = "KeyValueStatus", derive = "PartialEq")]
#[kube(
    printcolumn = r#"{"name":"READY","type":"string","jsonPath":".status.conditions[?(@.type=='Ready')].status"}"#,
    printcolumn = r#"{"name":"SYNCED","type":"string","jsonPath":".status.conditions[?(@.type=='Synced')].status"}"#
)]
#[serde(rename_all = "camelCase")]
pub struct KeyValueSpec {
    pub for_provider: KeyValueParameters,
    #[serde(default)]
    pub deletion_policy: DeletionPolicy,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct KeyValueParameters {
    /// Name of the configuration store. Immutable.
    pub store: String,
    /// Immutable.
    pub key: String,
    /// Immutable.
    pub label: String,
    pub value: String,
    #[serde(default, skip_serializing_if = "Field::is_unset")]
    pub content_type: Field<String>,
    #[serde(default, skip_serializing_if = "Field::is_unset")]
    pub locked: Field<bool>,
    #[serde(default, skip_serializing_if = "Field::is_unset")]
    pub tags: Field<BTreeMap<String, String>>,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct KeyValueObservation {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub etag: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_modified: Option<String>,
}

pub type KeyValueStatus = ManagedStatus<KeyValueObservation>;

/// The key-value pair as stored by the provider.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct KeyValueObject {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locked: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<BTreeMap<String, String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub etag: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_modified: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct KeyValueIdentity {
    pub store: String,
    pub key: String,
    pub label: String,
}

impl fmt::Display for KeyValueIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{} (label {:?})", self.store, self.key, self.label)
    }
}

impl Managed for KeyValue {
    const RESOURCE: &'static str = "KeyValue";

    type Identity = KeyValueIdentity;
    type Parameters = KeyValueParameters;
    type Remote = KeyValueObject;
    type Observation = KeyValueObservation;

    fn identity(params: &KeyValueParameters) -> KeyValueIdentity {
        KeyValueIdentity {
            store: params.store.clone(),
            key: params.key.clone(),
            label: params.label.clone(),
        }
    }

    fn parameters(&self) -> &KeyValueParameters {
        &self.spec.for_provider
    }

    fn parameters_mut(&mut self) -> &mut KeyValueParameters {
        &mut self.spec.for_provider
    }

    fn status(&self) -> Option<&KeyValueStatus> {
        self.status.as_ref()
    }

    fn status_mut(&mut self) -> &mut KeyValueStatus {
        self.status.get_or_insert_with(Default::default)
    }

    fn deletion_policy(&self) -> DeletionPolicy {
        self.spec.deletion_policy
    }

    fn late_initialize(params: &mut KeyValueParameters, remote: &KeyValueObject) {
        params.content_type.late_init(remote.content_type.as_ref());
        params.locked.late_init(remote.locked.as_ref());
        params.tags.late_init(remote.tags.as_ref());
    }

    fn override_parameters(
        params: &KeyValueParameters,
        mut remote: KeyValueObject,
    ) -> KeyValueObject {
        remote.key = Some(params.key.clone());
        remote.label = Some(params.label.clone());
        remote.value = Some(params.value.clone());
        params.content_type.project(&mut remote.content_type);
        params.locked.project(&mut remote.locked);
        params.tags.project(&mut remote.tags);
        remote
    }

    fn generate_observation(observation: &mut KeyValueObservation, remote: &KeyValueObject) {
        late_init::observe(&mut observation.etag, remote.etag.as_ref());
        late_init::observe(&mut observation.last_modified, remote.last_modified.as_ref());
    }
}

impl RestResource for KeyValue {
    fn resource_url(base: &Url, id: &KeyValueIdentity) -> Result<Url, RemoteError> {
        let mut url = url_with_segments(base, &["stores", &id.store, "kv", &id.key])?;
        url.query_pairs_mut().append_pair("label", &id.label);
        Ok(url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::managed::is_up_to_date;

    fn tags() -> BTreeMap<String, String> {
        BTreeMap::from([("created_by".to_string(), "x".to_string())])
    }

    fn params() -> KeyValueParameters {
        KeyValueParameters {
            store: "main".to_string(),
            key: "k".to_string(),
            label: "l".to_string(),
            value: "v1".to_string(),
            content_type: Field::Unset,
            locked: Field::Unset,
            tags: Field::Set(tags()),
        }
    }

    fn object() -> KeyValueObject {
        KeyValueObject {
            key: Some("k".to_string()),
            label: Some("l".to_string()),
            value: Some("v1".to_string()),
            tags: Some(tags()),
            etag: Some("e1".to_string()),
            last_modified: Some("2026-03-21T10:00:00Z".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_spec_from_yaml() {
        let spec: KeyValueSpec = serde_yaml::from_str(
            r#"
forProvider:
  store: main
  key: k
  label: l
  value: v1
  contentType: null
  tags:
    team: core
"#,
        )
        .unwrap();

        let p = spec.for_provider;
        assert_eq!(p.content_type, Field::Empty);
        assert_eq!(p.locked, Field::Unset);
        assert_eq!(p.tags.as_option().unwrap()["team"], "core");
        assert_eq!(spec.deletion_policy, DeletionPolicy::Delete);
    }

    #[test]
    fn test_late_initialize_fills_unset_fields() {
        let mut p = KeyValueParameters {
            tags: Field::Unset,
            ..params()
        };
        let remote = KeyValueObject {
            content_type: Some("text/plain".to_string()),
            locked: Some(true),
            ..object()
        };

        KeyValue::late_initialize(&mut p, &remote);

        assert_eq!(p.tags, Field::Set(tags()));
        assert_eq!(p.content_type, Field::Set("text/plain".to_string()));
        assert_eq!(p.locked, Field::Set(true));
    }

    #[test]
    fn test_late_initialize_keeps_declared_fields() {
        let mut p = KeyValueParameters {
            content_type: Field::Set("application/json".to_string()),
            locked: Field::Empty,
            ..params()
        };
        let remote = KeyValueObject {
            content_type: Some("text/plain".to_string()),
            locked: Some(true),
            tags: Some(BTreeMap::from([("other".to_string(), "y".to_string())])),
            ..object()
        };
        let before = p.clone();

        KeyValue::late_initialize(&mut p, &remote);

        assert_eq!(p, before);
    }

    #[test]
    fn test_late_initialize_report() {
        let mut p = KeyValueParameters {
            tags: Field::Unset,
            ..params()
        };
        assert!(late_init::late_initialize::<KeyValue>(&mut p, &object()));
        assert!(!late_init::late_initialize::<KeyValue>(&mut p, &object()));
    }

    #[test]
    fn test_up_to_date() {
        assert!(is_up_to_date::<KeyValue>(&params(), &object()).up_to_date);
    }

    #[test]
    fn test_value_drift() {
        let p = KeyValueParameters {
            value: "v2".to_string(),
            ..params()
        };
        let check = is_up_to_date::<KeyValue>(&p, &object());

        assert!(!check.up_to_date);
        assert_eq!(check.error, None);
    }

    #[test]
    fn test_server_only_fields_never_drift() {
        let remote = KeyValueObject {
            etag: Some("something-else".to_string()),
            last_modified: None,
            ..object()
        };
        assert!(is_up_to_date::<KeyValue>(&params(), &remote).up_to_date);
    }

    #[test]
    fn test_unset_optional_field_never_drifts() {
        let remote = KeyValueObject {
            content_type: Some("text/plain".to_string()),
            ..object()
        };
        assert!(is_up_to_date::<KeyValue>(&params(), &remote).up_to_date);
    }

    #[test]
    fn test_explicitly_empty_field_drifts_against_remote_value() {
        let p = KeyValueParameters {
            content_type: Field::Empty,
            ..params()
        };
        let remote = KeyValueObject {
            content_type: Some("text/plain".to_string()),
            ..object()
        };
        assert!(!is_up_to_date::<KeyValue>(&p, &remote).up_to_date);
        assert!(is_up_to_date::<KeyValue>(&p, &object()).up_to_date);
    }

    #[test]
    fn test_tag_drift() {
        let p = KeyValueParameters {
            tags: Field::Set(BTreeMap::new()),
            ..params()
        };
        assert!(!is_up_to_date::<KeyValue>(&p, &object()).up_to_date);
    }

    #[test]
    fn test_drift_check_leaves_observed_untouched() {
        let remote = object();
        let p = KeyValueParameters {
            value: "v2".to_string(),
            ..params()
        };
        is_up_to_date::<KeyValue>(&p, &remote);
        assert_eq!(remote, object());
    }

    #[test]
    fn test_generate_observation_is_fill_only() {
        let mut obs = KeyValueObservation::default();
        KeyValue::generate_observation(&mut obs, &object());
        assert_eq!(obs.etag.as_deref(), Some("e1"));
        assert_eq!(obs.last_modified.as_deref(), Some("2026-03-21T10:00:00Z"));

        let newer = KeyValueObject {
            etag: Some("e2".to_string()),
            last_modified: None,
            ..object()
        };
        KeyValue::generate_observation(&mut obs, &newer);
        assert_eq!(obs.etag.as_deref(), Some("e1"));
        assert_eq!(obs.last_modified.as_deref(), Some("2026-03-21T10:00:00Z"));
    }

    #[test]
    fn test_resource_url() {
        let base = Url::parse("http://gateway.local/").unwrap();
        let id = KeyValue::identity(&params());
        let url = KeyValue::resource_url(&base, &id).unwrap();

        assert_eq!(url.as_str(), "http://gateway.local/stores/main/kv/k?label=l");
    }

    #[test]
    fn test_crd_schema_carries_status_and_nullable_fields() {
        use kube::CustomResourceExt;

        let crd = serde_json::to_value(KeyValue::crd()).unwrap();
        let schema = &crd["spec"]["versions"][0]["schema"]["openAPIV3Schema"]["properties"];

        assert!(schema["status"]["properties"]["atProvider"].is_object());
        let for_provider = &schema["spec"]["properties"]["forProvider"]["properties"];
        assert_eq!(for_provider["contentType"]["nullable"], true);
        assert_eq!(for_provider["value"]["type"], "string");
    }
}

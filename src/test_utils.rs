// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Test utilities for mocking the Kubernetes API and the provider gateway.

use crate::managed::{Managed, RemoteError};
use crate::remote::Transport;
use crate::types::keyvalue::{KeyValue, KeyValueObject, KeyValueParameters, KeyValueSpec};
use crate::types::{DeletionPolicy, Field, ManagedStatus};
use async_trait::async_trait;
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use http::header::AUTHORIZATION;
use http::{Request, Response};
use kube::client::Body;
use kube::Client;
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex};
use std::task::{Context, Poll};
use tower::Service;

type Responses = Arc<Mutex<HashMap<(String, String), (u16, String)>>>;

/// A request seen by one of the mocks.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    pub uri: String,
    pub query: Option<String>,
    pub authorization: Option<String>,
    pub body: Bytes,
}

/// A mock HTTP service for the kube client that returns predefined
/// responses based on request paths.
#[derive(Clone, Default)]
pub struct MockService {
    responses: Responses,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl MockService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a response for requests with `method` matching the exact path
    pub fn on(self, method: &str, path: &str, status: u16, body: &str) -> Self {
        self.responses
            .lock()
            .unwrap()
            .insert((method.to_string(), path.to_string()), (status, body.to_string()));
        self
    }

    /// Build a kube Client from this mock service
    pub fn into_client(self) -> Client {
        Client::new(self, "default")
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }
}

impl Service<Request<Body>> for MockService {
    type Response = Response<Body>;
    type Error = tower::BoxError;
    type Future = std::pin::Pin<
        Box<dyn std::future::Future<Output = Result<Self::Response, Self::Error>> + Send>,
    >;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: Request<Body>) -> Self::Future {
        let method = req.method().to_string();
        let path = req.uri().path().to_string();
        let query = req.uri().query().map(str::to_string);
        let response = self
            .responses
            .lock()
            .unwrap()
            .get(&(method.clone(), path.clone()))
            .cloned();
        let requests = self.requests.clone();

        Box::pin(async move {
            let body = http_body_util::BodyExt::collect(req.into_body())
                .await?
                .to_bytes();
            requests.lock().unwrap().push(RecordedRequest {
                method,
                uri: path,
                query,
                authorization: None,
                body,
            });

            let (status, body) = response.unwrap_or_else(|| (404, not_found_json()));
            Ok(Response::builder()
                .status(status)
                .header("content-type", "application/json")
                .body(Body::from(body.into_bytes()))
                .unwrap())
        })
    }
}

/// A mock gateway transport keyed by method and path-and-query.
/// Unmatched requests get an empty 404.
#[derive(Clone, Default)]
pub struct MockTransport {
    responses: Responses,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on(self, method: &str, path_and_query: &str, status: u16, body: &str) -> Self {
        self.responses.lock().unwrap().insert(
            (method.to_string(), path_and_query.to_string()),
            (status, body.to_string()),
        );
        self
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn send(&self, request: Request<Bytes>) -> Result<Response<Bytes>, RemoteError> {
        let method = request.method().to_string();
        let uri = request
            .uri()
            .path_and_query()
            .map(|p| p.as_str().to_string())
            .unwrap_or_default();
        let authorization = request
            .headers()
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        self.requests.lock().unwrap().push(RecordedRequest {
            method: method.clone(),
            uri: uri.clone(),
            query: None,
            authorization,
            body: request.into_body(),
        });

        let (status, body) = self
            .responses
            .lock()
            .unwrap()
            .get(&(method, uri))
            .cloned()
            .unwrap_or((404, String::new()));

        Ok(Response::builder()
            .status(status)
            .body(Bytes::from(body))
            .unwrap())
    }
}

/// Create a 404 not found response for the kube API
pub fn not_found_json() -> String {
    serde_json::json!({
        "kind": "Status",
        "apiVersion": "v1",
        "status": "Failure",
        "message": "not found",
        "reason": "NotFound",
        "code": 404
    })
    .to_string()
}

pub fn tags() -> BTreeMap<String, String> {
    BTreeMap::from([("created_by".to_string(), "x".to_string())])
}

/// Desired parameters `{key:"k", label:"l", value:"v1", tags:{created_by:x}}`.
pub fn kv_params() -> KeyValueParameters {
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

/// The remote counterpart of [`kv_params`], plus a server etag.
pub fn kv_object() -> KeyValueObject {
    KeyValueObject {
        key: Some("k".to_string()),
        label: Some("l".to_string()),
        value: Some("v1".to_string()),
        tags: Some(tags()),
        etag: Some("e1".to_string()),
        ..Default::default()
    }
}

pub fn key_value(params: KeyValueParameters) -> KeyValue {
    key_value_with_policy(params, DeletionPolicy::Delete)
}

pub fn key_value_with_policy(
    params: KeyValueParameters,
    deletion_policy: DeletionPolicy,
) -> KeyValue {
    KeyValue::new(
        "feature-k",
        KeyValueSpec {
            for_provider: params,
            deletion_policy,
        },
    )
}

/// A kind whose remote object cannot be serialized to JSON once it holds
/// an entry: map keys must be strings.
pub struct Unserializable {
    pub params: String,
    pub status: Option<ManagedStatus<()>>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct UnserializableRemote {
    pub by_pair: BTreeMap<(u8, u8), String>,
}

pub fn unserializable_remote() -> UnserializableRemote {
    UnserializableRemote {
        by_pair: BTreeMap::from([((1, 2), "x".to_string())]),
    }
}

impl Managed for Unserializable {
    const RESOURCE: &'static str = "Unserializable";
    type Identity = String;
    type Parameters = String;
    type Remote = UnserializableRemote;
    type Observation = ();

    fn identity(params: &String) -> String {
        params.clone()
    }
    fn parameters(&self) -> &String {
        &self.params
    }
    fn parameters_mut(&mut self) -> &mut String {
        &mut self.params
    }
    fn status(&self) -> Option<&ManagedStatus<()>> {
        self.status.as_ref()
    }
    fn status_mut(&mut self) -> &mut ManagedStatus<()> {
        self.status.get_or_insert_with(Default::default)
    }
    fn deletion_policy(&self) -> DeletionPolicy {
        DeletionPolicy::Delete
    }
    fn late_initialize(_params: &mut String, _remote: &UnserializableRemote) {}
    fn override_parameters(
        _params: &String,
        remote: UnserializableRemote,
    ) -> UnserializableRemote {
        remote
    }
    fn generate_observation(_observation: &mut (), _remote: &UnserializableRemote) {}
}

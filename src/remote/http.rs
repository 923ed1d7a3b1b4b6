// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! JSON-over-HTTP adapter for a provider gateway.
//!
//! GET reads the object, PUT upserts it and DELETE removes it. The HTTP
//! status code decides the error kind; message text is never inspected.

use super::RemoteAdapter;
use crate::managed::{Managed, RemoteError};
use async_trait::async_trait;
use bytes::Bytes;
use http::header::{AUTHORIZATION, CONTENT_TYPE};
use http::{Method, Request, Response, StatusCode};
use http_body_util::{BodyExt, Full};
use hyper::body::Incoming;
use hyper_util::client::legacy::{connect::HttpConnector, Client};
use hyper_util::rt::TokioExecutor;
use std::marker::PhantomData;
use tracing::{debug, instrument};
use url::Url;

/// Sends one request and buffers the response.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: Request<Bytes>) -> Result<Response<Bytes>, RemoteError>;
}

/// Plain HTTP transport backed by the hyper connection pool.
#[derive(Clone)]
pub struct HyperTransport {
    client: Client<HttpConnector, Full<Bytes>>,
}

impl HyperTransport {
    pub fn new() -> Self {
        Self {
            client: Client::builder(TokioExecutor::new()).build_http(),
        }
    }
}

impl Default for HyperTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Transport for HyperTransport {
    async fn send(&self, request: Request<Bytes>) -> Result<Response<Bytes>, RemoteError> {
        let response: Response<Incoming> = self
            .client
            .request(request.map(Full::new))
            .await
            .map_err(RemoteError::transport)?;

        let (parts, body) = response.into_parts();
        let body = body
            .collect()
            .await
            .map_err(RemoteError::transport)?
            .to_bytes();

        Ok(Response::from_parts(parts, body))
    }
}

/// Where a kind's objects live on the gateway.
pub trait RestResource: Managed {
    fn resource_url(base: &Url, id: &Self::Identity) -> Result<Url, RemoteError>;
}

/// Append percent-encoded path segments to `base`.
pub fn url_with_segments(base: &Url, segments: &[&str]) -> Result<Url, RemoteError> {
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|_| RemoteError::transport(format!("endpoint {} cannot be a base URL", base)))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

pub struct HttpRemote<R, T = HyperTransport> {
    base: Url,
    token: Option<String>,
    transport: T,
    _kind: PhantomData<fn() -> R>,
}

impl<R: RestResource, T: Transport> HttpRemote<R, T> {
    pub fn new(base: Url, transport: T) -> Self {
        Self {
            base,
            token: None,
            transport,
            _kind: PhantomData,
        }
    }

    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token;
        self
    }

    async fn call(
        &self,
        method: Method,
        id: &R::Identity,
        body: Option<Vec<u8>>,
    ) -> Result<Bytes, RemoteError> {
        let url = R::resource_url(&self.base, id)?;
        debug!("{} {}", method, url);

        let mut builder = Request::builder().method(method).uri(url.as_str());
        if body.is_some() {
            builder = builder.header(CONTENT_TYPE, "application/json");
        }
        if let Some(token) = &self.token {
            builder = builder.header(AUTHORIZATION, format!("Bearer {}", token));
        }
        let request = builder
            .body(body.map(Bytes::from).unwrap_or_default())
            .map_err(RemoteError::transport)?;

        let response = self.transport.send(request).await?;
        classify(response, || format!("{} {}", R::RESOURCE, id))
    }
}

/// Map a response onto the error taxonomy.
fn classify(
    response: Response<Bytes>,
    what: impl FnOnce() -> String,
) -> Result<Bytes, RemoteError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response.into_body());
    }

    let body = response.into_body();
    let message = match String::from_utf8_lossy(&body).trim() {
        "" => status.canonical_reason().unwrap_or("no message").to_string(),
        text => text.to_string(),
    };

    match status {
        StatusCode::NOT_FOUND => Err(RemoteError::not_found(what())),
        StatusCode::UNAUTHORIZED
        | StatusCode::FORBIDDEN
        | StatusCode::REQUEST_TIMEOUT
        | StatusCode::TOO_MANY_REQUESTS => {
            Err(RemoteError::Transport(format!("{}: {}", status.as_u16(), message)))
        }
        s if s.is_client_error() => Err(RemoteError::Rejected {
            status: s.as_u16(),
            message,
        }),
        s => Err(RemoteError::Transport(format!("{}: {}", s.as_u16(), message))),
    }
}

fn decode<R: Managed>(body: &[u8]) -> Result<R::Remote, RemoteError> {
    serde_json::from_slice(body)
        .map_err(|e| RemoteError::transport(format!("cannot decode {}: {}", R::RESOURCE, e)))
}

#[async_trait]
impl<R: RestResource, T: Transport> RemoteAdapter<R> for HttpRemote<R, T> {
    #[instrument(skip(self), fields(kind = R::RESOURCE))]
    async fn get(&self, id: &R::Identity) -> Result<R::Remote, RemoteError> {
        let body = self.call(Method::GET, id, None).await?;
        decode::<R>(&body)
    }

    #[instrument(skip(self, desired), fields(kind = R::RESOURCE))]
    async fn create_or_update(&self, desired: &R::Parameters) -> Result<R::Remote, RemoteError> {
        let id = R::identity(desired);
        let payload = R::override_parameters(desired, R::Remote::default());
        let bytes = serde_json::to_vec(&payload)
            .map_err(|e| RemoteError::transport(format!("cannot encode {}: {}", R::RESOURCE, e)))?;

        let body = self.call(Method::PUT, &id, Some(bytes)).await?;
        if body.is_empty() {
            return Ok(payload);
        }
        decode::<R>(&body)
    }

    #[instrument(skip(self), fields(kind = R::RESOURCE))]
    async fn delete(&self, id: &R::Identity) -> Result<(), RemoteError> {
        self.call(Method::DELETE, id, None).await.map(|_| ())
    }
}

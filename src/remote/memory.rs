// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! In-memory remote system of record, used in testing mode and tests.

use super::RemoteAdapter;
use crate::managed::{Managed, RemoteError};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::debug;

/// Remote operation, for fault injection and call counting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Get,
    CreateOrUpdate,
    Delete,
}

type WriteHook<R> = Arc<dyn Fn(&mut <R as Managed>::Remote, u64) + Send + Sync>;

struct State<R: Managed> {
    objects: HashMap<R::Identity, R::Remote>,
    failures: HashMap<Operation, RemoteError>,
    calls: HashMap<Operation, usize>,
    writes: u64,
}

/// Thread-safe map of remote objects keyed by identity.
pub struct InMemoryRemote<R: Managed> {
    state: Mutex<State<R>>,
    on_write: Option<WriteHook<R>>,
}

impl<R: Managed> InMemoryRemote<R> {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(State {
                objects: HashMap::new(),
                failures: HashMap::new(),
                calls: HashMap::new(),
                writes: 0,
            }),
            on_write: None,
        }
    }

    /// Seed a remote object.
    pub fn with_object(self, id: R::Identity, remote: R::Remote) -> Self {
        self.insert(id, remote);
        self
    }

    /// Make every call of `op` fail with `error` until cleared.
    pub fn with_failure(self, op: Operation, error: RemoteError) -> Self {
        self.fail(op, error);
        self
    }

    /// Hook run on every upsert, to stamp server-populated fields. The
    /// second argument counts writes, starting at 1.
    pub fn on_write(mut self, hook: impl Fn(&mut R::Remote, u64) + Send + Sync + 'static) -> Self {
        self.on_write = Some(Arc::new(hook));
        self
    }

    pub fn insert(&self, id: R::Identity, remote: R::Remote) {
        self.lock().objects.insert(id, remote);
    }

    pub fn object(&self, id: &R::Identity) -> Option<R::Remote> {
        self.lock().objects.get(id).cloned()
    }

    pub fn fail(&self, op: Operation, error: RemoteError) {
        self.lock().failures.insert(op, error);
    }

    pub fn clear_failure(&self, op: Operation) {
        self.lock().failures.remove(&op);
    }

    pub fn calls(&self, op: Operation) -> usize {
        self.lock().calls.get(&op).copied().unwrap_or(0)
    }

    fn lock(&self) -> MutexGuard<'_, State<R>> {
        // A panic while holding the lock leaves the map itself intact.
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn begin(&self, op: Operation) -> Result<MutexGuard<'_, State<R>>, RemoteError> {
        let mut state = self.lock();
        *state.calls.entry(op).or_insert(0) += 1;
        if let Some(err) = state.failures.get(&op).cloned() {
            return Err(err);
        }
        Ok(state)
    }
}

impl<R: Managed> Default for InMemoryRemote<R> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<R: Managed> RemoteAdapter<R> for InMemoryRemote<R> {
    async fn get(&self, id: &R::Identity) -> Result<R::Remote, RemoteError> {
        let state = self.begin(Operation::Get)?;
        state
            .objects
            .get(id)
            .cloned()
            .ok_or_else(|| RemoteError::not_found(format!("{} {}", R::RESOURCE, id)))
    }

    async fn create_or_update(&self, desired: &R::Parameters) -> Result<R::Remote, RemoteError> {
        let mut state = self.begin(Operation::CreateOrUpdate)?;
        let id = R::identity(desired);
        let base = state.objects.get(&id).cloned().unwrap_or_default();
        let mut next = R::override_parameters(desired, base);

        state.writes += 1;
        if let Some(hook) = &self.on_write {
            hook(&mut next, state.writes);
        }

        debug!("Stored {} {}", R::RESOURCE, id);
        state.objects.insert(id, next.clone());
        Ok(next)
    }

    async fn delete(&self, id: &R::Identity) -> Result<(), RemoteError> {
        let mut state = self.begin(Operation::Delete)?;
        state
            .objects
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| RemoteError::not_found(format!("{} {}", R::RESOURCE, id)))
    }
}

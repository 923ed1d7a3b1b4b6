// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Kubernetes controllers that reconcile managed resources.

pub mod managed;

pub use managed::{run, Context, ManagedResource};

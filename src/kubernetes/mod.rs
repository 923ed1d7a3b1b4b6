// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Kubernetes utilities for CRD discovery and persisting declarations.

pub mod crd;
pub mod persist;

pub use crd::wait_for_crds;

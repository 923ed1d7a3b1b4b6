// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Fill-only merge helpers used by the per-kind strategies.

use super::Managed;

/// Late-initialize `params` from `remote`, reporting whether anything
/// changed.
pub fn late_initialize<R: Managed>(params: &mut R::Parameters, remote: &R::Remote) -> bool {
    let before = params.clone();
    R::late_initialize(params, remote);
    before != *params
}

/// Mirror an observed value into a status slot if the slot is still empty.
pub fn observe<T: Clone>(slot: &mut Option<T>, observed: Option<&T>) {
    if slot.is_none() {
        *slot = observed.cloned();
    }
}

// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Status conditions and the status block shared by all managed kinds.

use crate::constants::conditions::{reasons, types};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Condition {
    #[serde(rename = "type")]
    pub condition_type: String,
    pub status: String,
    pub reason: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl Condition {
    fn new(condition_type: &str, status: bool, reason: &str) -> Self {
        Self {
            condition_type: condition_type.to_string(),
            status: if status { "True" } else { "False" }.to_string(),
            reason: reason.to_string(),
            message: None,
        }
    }

    /// The remote object was confirmed to exist.
    pub fn available() -> Self {
        Self::new(types::READY, true, reasons::AVAILABLE)
    }

    pub fn creating() -> Self {
        Self::new(types::READY, false, reasons::CREATING)
    }

    pub fn deleting() -> Self {
        Self::new(types::READY, false, reasons::DELETING)
    }

    pub fn reconcile_success() -> Self {
        Self::new(types::SYNCED, true, reasons::RECONCILE_SUCCESS)
    }

    pub fn reconcile_error(message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
            ..Self::new(types::SYNCED, false, reasons::RECONCILE_ERROR)
        }
    }

    pub fn is_true(&self) -> bool {
        self.status == "True"
    }
}

/// Status block of a managed resource: conditions plus the provider
/// reported observation.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
#[schemars(bound = "O: schemars::JsonSchema + Default")]
pub struct ManagedStatus<O> {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub conditions: Vec<Condition>,
    #[serde(default)]
    pub at_provider: O,
}

impl<O> ManagedStatus<O> {
    /// Replace the condition of the same type, or append it.
    pub fn set_condition(&mut self, condition: Condition) {
        match self
            .conditions
            .iter_mut()
            .find(|c| c.condition_type == condition.condition_type)
        {
            Some(existing) => *existing = condition,
            None => self.conditions.push(condition),
        }
    }

    pub fn condition(&self, condition_type: &str) -> Option<&Condition> {
        self.conditions
            .iter()
            .find(|c| c.condition_type == condition_type)
    }

    pub fn is_available(&self) -> bool {
        self.condition(types::READY)
            .is_some_and(|c| c.is_true() && c.reason == reasons::AVAILABLE)
    }
}

/// What happens to the remote object when the declaration is deleted.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq, schemars::JsonSchema)]
pub enum DeletionPolicy {
    #[default]
    Delete,
    Orphan,
}

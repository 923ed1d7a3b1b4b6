// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Drift detection: project desired parameters onto a copy of the remote
//! object and compare it against the original.
//!
//! Remote fields with no desired counterpart are copied through unchanged
//! and so can never cause drift.

use super::error::ComparisonError;
use super::Managed;
use serde_json::Value;

/// Result of a drift comparison.
///
/// When the comparison itself fails the check reports up-to-date and
/// carries the error for logging.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DriftCheck {
    pub up_to_date: bool,
    pub error: Option<ComparisonError>,
}

impl DriftCheck {
    fn compared(up_to_date: bool) -> Self {
        Self {
            up_to_date,
            error: None,
        }
    }

    fn fail_open(error: ComparisonError) -> Self {
        Self {
            up_to_date: true,
            error: Some(error),
        }
    }
}

pub fn is_up_to_date<R: Managed>(params: &R::Parameters, observed: &R::Remote) -> DriftCheck {
    match compare::<R>(params, observed) {
        Ok(up_to_date) => DriftCheck::compared(up_to_date),
        Err(e) => DriftCheck::fail_open(e),
    }
}

fn compare<R: Managed>(
    params: &R::Parameters,
    observed: &R::Remote,
) -> Result<bool, ComparisonError> {
    let snapshot =
        serde_json::to_value(observed).map_err(|e| ComparisonError::new(R::RESOURCE, e))?;
    // The copy is rebuilt from the snapshot so the caller's object is never touched.
    let copy: R::Remote =
        serde_json::from_value(snapshot.clone()).map_err(|e| ComparisonError::new(R::RESOURCE, e))?;

    let projected = R::override_parameters(params, copy);
    let projected: Value =
        serde_json::to_value(&projected).map_err(|e| ComparisonError::new(R::RESOURCE, e))?;

    Ok(projected == snapshot)
}

// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

/// API group of all managed resource kinds
pub const API_GROUP: &str = "cloud.keel.dev";

/// API version of all managed resource kinds
pub const API_VERSION: &str = "v1alpha1";

/// Finalizer that guards the remote object until it has been deleted
pub const FINALIZER: &str = "cloud.keel.dev/external";

/// The operator name used as field manager and event reporter
pub const OPERATOR_NAME: &str = "keel";

/// Condition types and reasons written into resource status
pub mod conditions {
    pub mod types {
        /// Whether the remote object exists and is usable
        pub const READY: &str = "Ready";
        /// Whether the last reconcile tick succeeded
        pub const SYNCED: &str = "Synced";
    }

    pub mod reasons {
        pub const AVAILABLE: &str = "Available";
        pub const CREATING: &str = "Creating";
        pub const DELETING: &str = "Deleting";
        pub const RECONCILE_SUCCESS: &str = "ReconcileSuccess";
        pub const RECONCILE_ERROR: &str = "ReconcileError";
    }
}

/// Kubernetes Event reasons and actions
pub mod events {
    pub mod reasons {
        pub const CANNOT_OBSERVE: &str = "CannotObserveExternalResource";
        pub const CANNOT_CREATE: &str = "CannotCreateExternalResource";
        pub const CANNOT_UPDATE: &str = "CannotUpdateExternalResource";
        pub const CANNOT_DELETE: &str = "CannotDeleteExternalResource";
        pub const CREATED: &str = "CreatedExternalResource";
        pub const UPDATED: &str = "UpdatedExternalResource";
        pub const DELETED: &str = "DeletedExternalResource";
        pub const RECONCILE_ERROR: &str = "ReconcileError";
    }

    pub mod actions {
        pub const RECONCILE: &str = "Reconcile";
        pub const DELETE: &str = "Delete";
    }
}

/// CRD polling configuration
pub mod crd {
    /// Initial polling interval in seconds when waiting for CRDs
    pub const POLL_INTERVAL_SECS: u64 = 10;
    /// Maximum polling interval in seconds (exponential backoff cap)
    pub const POLL_MAX_INTERVAL_SECS: u64 = 60;
}

/// Requeue delay right after a create, before the first real poll
pub const CREATE_REQUEUE_SECS: u64 = 10;

// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Managed resource kinds and the types they share.

pub mod bucket;
pub mod condition;
pub mod field;
pub mod keyvalue;
pub mod server_configuration;
pub mod vault_secret;

pub use bucket::Bucket;
pub use condition::{Condition, DeletionPolicy, ManagedStatus};
pub use field::Field;
pub use keyvalue::KeyValue;
pub use server_configuration::ServerConfiguration;
pub use vault_secret::VaultSecret;

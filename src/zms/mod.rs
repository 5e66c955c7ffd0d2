// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Athenz ZMS client and resource types.

pub mod client;
pub mod types;

pub use client::{new_zms_client, ZmsClient};
pub use types::{Domain, Membership, ResourceError, Role, RoleMember, Roles};

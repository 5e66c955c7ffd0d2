// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use crate::zms::Role;
use kube::CustomResource;
use serde::{Deserialize, Serialize};

/// Mirror of a signed Athenz domain, maintained in the cluster by the syncer
#[derive(CustomResource, Serialize, Deserialize, Clone, Debug, schemars::JsonSchema)]
#[kube(group = "athenz.io", version = "v1", kind = "AthenzDomain")]
#[kube(status = "AthenzDomainStatus")]
#[serde(rename_all = "camelCase")]
pub struct AthenzDomainSpec {
    pub domain: DomainData,
    #[serde(default)]
    pub signature: String,
    #[serde(default)]
    pub key_id: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct DomainData {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modified: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    #[serde(default)]
    pub roles: Vec<Role>,
    /// Signed policies, kept opaque
    #[serde(skip_serializing_if = "Option::is_none")]
    pub policies: Option<serde_json::Value>,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct AthenzDomainStatus {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl AthenzDomain {
    /// Find a role by its short name or its full `<domain>:role.<name>` name
    pub fn role(&self, name: &str) -> Option<&Role> {
        let full_name = format!("{}:role.{}", self.spec.domain.name, name);
        self.spec
            .domain
            .roles
            .iter()
            .find(|r| r.name == name || r.name == full_name)
    }

    /// Check if `member` belongs to the role named `role`
    pub fn has_role_member(&self, role: &str, member: &str) -> bool {
        self.role(role).is_some_and(|r| r.has_member(member))
    }
}

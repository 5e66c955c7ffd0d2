// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! ZMS API client bound to a mutual TLS transport

use crate::constants::zms::AUDIT_REF_HEADER;
use crate::error::{FrameworkError, Result};
use crate::tls::Transport;
use crate::zms::types::{Domain, Membership, ResourceError, Role, Roles};
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};
use url::Url;

#[derive(Clone, Debug)]
pub struct ZmsClient {
    base_url: String,
    transport: Transport,
}

/// Create a ZMS client. No request is made and the URL is not checked until first use.
pub fn new_zms_client(transport: Transport, base_url: &str) -> ZmsClient {
    ZmsClient {
        base_url: base_url.to_string(),
        transport,
    }
}

impl ZmsClient {
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn transport(&self) -> &Transport {
        &self.transport
    }

    /// Build a request URL by appending percent-encoded path segments to the base URL
    fn url(&self, segments: &[&str]) -> Result<Url> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| FrameworkError::InvalidUrl(format!("'{}': {}", self.base_url, e)))?;
        {
            let mut path = url.path_segments_mut().map_err(|()| {
                FrameworkError::InvalidUrl(format!("'{}' cannot be a base URL", self.base_url))
            })?;
            path.pop_if_empty().extend(segments);
        }
        Ok(url)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T> {
        debug!("GET {}", url);
        let response = self.transport.http().get(url).send().await?;
        Ok(check_status(response).await?.json().await?)
    }

    #[instrument(skip(self))]
    pub async fn get_domain(&self, domain: &str) -> Result<Domain> {
        self.get_json(self.url(&["domain", domain])?).await
    }

    #[instrument(skip(self))]
    pub async fn get_role(&self, domain: &str, role: &str) -> Result<Role> {
        self.get_json(self.url(&["domain", domain, "role", role])?)
            .await
    }

    /// List the roles of a domain, including their members
    #[instrument(skip(self))]
    pub async fn get_roles(&self, domain: &str) -> Result<Roles> {
        let mut url = self.url(&["domain", domain, "role"])?;
        url.query_pairs_mut().append_pair("members", "true");
        self.get_json(url).await
    }

    #[instrument(skip(self, role))]
    pub async fn put_role(
        &self,
        domain: &str,
        role_name: &str,
        role: &Role,
        audit_ref: &str,
    ) -> Result<()> {
        let url = self.url(&["domain", domain, "role", role_name])?;
        debug!("PUT {}", url);
        let response = self
            .transport
            .http()
            .put(url)
            .header(AUDIT_REF_HEADER, audit_ref)
            .json(role)
            .send()
            .await?;
        check_status(response).await?;
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn delete_role(&self, domain: &str, role_name: &str, audit_ref: &str) -> Result<()> {
        let url = self.url(&["domain", domain, "role", role_name])?;
        self.delete(url, audit_ref).await
    }

    #[instrument(skip(self, membership))]
    pub async fn put_membership(
        &self,
        domain: &str,
        role_name: &str,
        member: &str,
        membership: &Membership,
        audit_ref: &str,
    ) -> Result<()> {
        let url = self.url(&["domain", domain, "role", role_name, "member", member])?;
        debug!("PUT {}", url);
        let response = self
            .transport
            .http()
            .put(url)
            .header(AUDIT_REF_HEADER, audit_ref)
            .json(membership)
            .send()
            .await?;
        check_status(response).await?;
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn delete_membership(
        &self,
        domain: &str,
        role_name: &str,
        member: &str,
        audit_ref: &str,
    ) -> Result<()> {
        let url = self.url(&["domain", domain, "role", role_name, "member", member])?;
        self.delete(url, audit_ref).await
    }

    async fn delete(&self, url: Url, audit_ref: &str) -> Result<()> {
        debug!("DELETE {}", url);
        let response = self
            .transport
            .http()
            .delete(url)
            .header(AUDIT_REF_HEADER, audit_ref)
            .send()
            .await?;
        check_status(response).await?;
        Ok(())
    }
}

/// Turn a non-success response into a ZMS error, using the ResourceError body when present
async fn check_status(response: reqwest::Response) -> Result<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ResourceError>(&body)
        .map(|e| e.message)
        .unwrap_or(body);

    Err(FrameworkError::Zms {
        status: status.as_u16(),
        message,
    })
}

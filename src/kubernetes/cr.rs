// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! AthenzDomain client and informer pair

use crate::error::{FrameworkError, Result};
use crate::kubernetes::informer::AthenzDomainInformer;
use crate::types::AthenzDomain;
use kube::api::{DeleteParams, PostParams};
use kube::{Api, Client, Config as KConfig};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{debug, info, instrument};

/// Create a typed AthenzDomain API and its informer from a resolved cluster config.
///
/// The informer is not started here.
pub fn new_cr_client(config: KConfig) -> Result<(Api<AthenzDomain>, AthenzDomainInformer)> {
    let client = Client::try_from(config).map_err(|e| {
        FrameworkError::ClientConstruction(format!("Failed to create athenz domains client: {}", e))
    })?;
    let api: Api<AthenzDomain> = Api::all(client);
    let informer = AthenzDomainInformer::new(api.clone());
    Ok((api, informer))
}

/// Access to AthenzDomain resources, live through the API or from the informer cache
#[derive(Clone)]
pub struct CrClient {
    api: Api<AthenzDomain>,
    informer: Arc<AthenzDomainInformer>,
}

impl CrClient {
    pub fn new(api: Api<AthenzDomain>, informer: AthenzDomainInformer) -> Self {
        Self {
            api,
            informer: Arc::new(informer),
        }
    }

    pub fn api(&self) -> &Api<AthenzDomain> {
        &self.api
    }

    pub fn informer(&self) -> &Arc<AthenzDomainInformer> {
        &self.informer
    }

    /// Run the informer in the background. The task is never stopped explicitly.
    pub fn start_informer(&self) -> JoinHandle<Result<()>> {
        let informer = self.informer.clone();
        tokio::spawn(async move { informer.run().await })
    }

    /// Fetch an AthenzDomain from the API server
    #[instrument(skip(self))]
    pub async fn get(&self, name: &str) -> Result<Option<AthenzDomain>> {
        Ok(self.api.get_opt(name).await?)
    }

    pub fn get_cached(&self, name: &str) -> Option<Arc<AthenzDomain>> {
        self.informer.get(name)
    }

    pub fn list_cached(&self) -> Vec<Arc<AthenzDomain>> {
        self.informer.list()
    }

    #[instrument(skip(self, domain), fields(domain = %domain.spec.domain.name))]
    pub async fn create(&self, domain: &AthenzDomain) -> Result<AthenzDomain> {
        let created = self.api.create(&PostParams::default(), domain).await?;
        info!("AthenzDomain {} created", domain.spec.domain.name);
        Ok(created)
    }

    /// Delete an AthenzDomain; a missing resource is not an error
    #[instrument(skip(self))]
    pub async fn delete(&self, name: &str) -> Result<()> {
        match self.api.delete(name, &DeleteParams::default()).await {
            Ok(_) => {
                info!("AthenzDomain {} deleted", name);
                Ok(())
            }
            Err(kube::Error::Api(err)) if err.code == 404 => {
                debug!("AthenzDomain {} already gone", name);
                Ok(())
            }
            Err(e) => Err(e.into()),
        }
    }
}

// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Watch-based cache of AthenzDomain resources.
//!
//! There is no periodic resync: the cache is driven purely by watch events,
//! with the watcher's default backoff on errors. Lookups are by name only.

use crate::error::{FrameworkError, Result};
use crate::types::AthenzDomain;
use futures::StreamExt;
use kube::runtime::reflector::{self, store::Writer, ObjectRef, Store};
use kube::runtime::{watcher, WatchStreamExt};
use kube::{Api, ResourceExt};
use std::sync::{Arc, Mutex};
use tracing::{debug, info, warn};

pub struct AthenzDomainInformer {
    api: Api<AthenzDomain>,
    watcher_config: watcher::Config,
    store: Store<AthenzDomain>,
    writer: Mutex<Option<Writer<AthenzDomain>>>,
}

impl AthenzDomainInformer {
    pub fn new(api: Api<AthenzDomain>) -> Self {
        let (store, writer) = reflector::store();
        Self {
            api,
            watcher_config: watcher::Config::default(),
            store,
            writer: Mutex::new(Some(writer)),
        }
    }

    pub fn store(&self) -> &Store<AthenzDomain> {
        &self.store
    }

    /// Cached AthenzDomain by name
    pub fn get(&self, name: &str) -> Option<Arc<AthenzDomain>> {
        self.store.get(&ObjectRef::new(name))
    }

    pub fn list(&self) -> Vec<Arc<AthenzDomain>> {
        self.store.state()
    }

    /// Resolves once the initial list has been applied to the cache
    pub async fn wait_for_cache_sync(&self) -> Result<()> {
        self.store
            .wait_until_ready()
            .await
            .map_err(|e| FrameworkError::Informer(e.to_string()))
    }

    /// Watch AthenzDomains and keep the cache up to date.
    ///
    /// Runs until the watch stream ends. An informer can only be run once.
    pub async fn run(&self) -> Result<()> {
        let writer = self
            .writer
            .lock()
            .map_err(|_| FrameworkError::Informer("writer lock poisoned".to_string()))?
            .take()
            .ok_or_else(|| FrameworkError::Informer("informer is already running".to_string()))?;

        info!("Starting AthenzDomain informer");

        reflector::reflector(
            writer,
            watcher(self.api.clone(), self.watcher_config.clone()).default_backoff(),
        )
        .for_each(|event| async move {
            match event {
                Ok(watcher::Event::Apply(domain)) => {
                    debug!("AthenzDomain {} applied", domain.name_any())
                }
                Ok(watcher::Event::Delete(domain)) => {
                    debug!("AthenzDomain {} deleted", domain.name_any())
                }
                Ok(watcher::Event::InitDone) => debug!("AthenzDomain cache synced"),
                Ok(_) => {}
                Err(e) => warn!("AthenzDomain watch error: {}", e),
            }
        })
        .await;

        warn!("AthenzDomain informer stopped");
        Ok(())
    }
}

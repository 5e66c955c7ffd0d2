// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Shared clients for the e2e tests and their process-wide lifecycle.
//!
//! Setup builds every client before anything is published: a failure in any
//! step leaves no handle behind. Teardown only drops the handle. Connections
//! and informer watches are left to process exit.
//!
//! The kube clients are bound to the tokio runtime that ran setup; tests that
//! share the framework must run on that same runtime.

use crate::config::Options;
use crate::error::{FrameworkError, Result};
use crate::kubernetes::{
    home_dir, load_cluster_config, new_cluster_client, new_cr_client, CrClient,
};
use crate::logging;
use crate::tls::{build_transport, install_crypto_provider};
use crate::zms::{new_zms_client, ZmsClient};
use kube::Client;
use std::sync::{Arc, PoisonError, RwLock};
use tokio::sync::Mutex;
use tracing::{debug, error, info, instrument, warn};

/// Clients shared by all e2e tests
#[derive(Clone)]
pub struct Framework {
    pub k8s_client: Client,
    pub zms_client: ZmsClient,
    pub cr_client: CrClient,
}

impl Framework {
    /// Build all clients in dependency order: cluster config, cluster client,
    /// AthenzDomain client and informer, then the ZMS client.
    #[instrument(skip_all)]
    pub async fn new(options: &Options) -> Result<Self> {
        let source = options.cluster_config_source(home_dir().as_deref());
        debug!("Cluster config source: {:?}", source);
        let config = load_cluster_config(&source).await?;

        let k8s_client = new_cluster_client(config.clone())
            .inspect_err(|e| error!("Failed to create k8s client: {}", e))?;

        let (api, informer) = new_cr_client(config)
            .inspect_err(|e| error!("Failed to create athenz domains client: {}", e))?;
        let cr_client = CrClient::new(api, informer);

        if options.zms_url.is_empty() {
            warn!("No ZMS URL configured, ZMS requests will fail");
        }
        let transport = build_transport(&options.key, &options.cert)
            .inspect_err(|e| error!("Failed to create zms client: {}", e))?;
        let zms_client = new_zms_client(transport, &options.zms_url);

        Ok(Self {
            k8s_client,
            zms_client,
            cr_client,
        })
    }
}

/// Lifecycle state of the shared framework
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FixtureState {
    Uninitialized,
    Ready,
    TornDown,
}

enum Slot {
    Uninitialized,
    Ready(Arc<Framework>),
    TornDown,
}

static GLOBAL: RwLock<Slot> = RwLock::new(Slot::Uninitialized);

/// Serializes setup and teardown
static LIFECYCLE: Mutex<()> = Mutex::const_new(());

/// The published framework, if setup has completed and teardown has not run
pub fn global() -> Option<Arc<Framework>> {
    match &*GLOBAL.read().unwrap_or_else(PoisonError::into_inner) {
        Slot::Ready(framework) => Some(framework.clone()),
        _ => None,
    }
}

pub fn state() -> FixtureState {
    match &*GLOBAL.read().unwrap_or_else(PoisonError::into_inner) {
        Slot::Uninitialized => FixtureState::Uninitialized,
        Slot::Ready(_) => FixtureState::Ready,
        Slot::TornDown => FixtureState::TornDown,
    }
}

fn publish(slot: Slot) {
    *GLOBAL.write().unwrap_or_else(PoisonError::into_inner) = slot;
}

async fn initialize(options: &Options) -> Result<Arc<Framework>> {
    install_crypto_provider();
    logging::init(&options.log_location, &options.log_mode);

    let framework = Arc::new(Framework::new(options).await?);
    publish(Slot::Ready(framework.clone()));
    info!("e2e setup successfully");
    Ok(framework)
}

/// Create the shared clients and publish them.
///
/// Fails with `AlreadyInitialized` if a framework is already published. On any
/// other failure nothing is published and the state is unchanged.
pub async fn setup(options: &Options) -> Result<Arc<Framework>> {
    let _guard = LIFECYCLE.lock().await;
    if state() == FixtureState::Ready {
        return Err(FrameworkError::AlreadyInitialized);
    }
    initialize(options).await
}

/// Return the published framework, running setup first if there is none.
/// Concurrent callers share a single setup.
pub async fn get_or_setup(options: &Options) -> Result<Arc<Framework>> {
    let _guard = LIFECYCLE.lock().await;
    if let Some(framework) = global() {
        return Ok(framework);
    }
    initialize(options).await
}

/// Drop the published framework
pub async fn teardown() -> Result<()> {
    let _guard = LIFECYCLE.lock().await;
    if state() != FixtureState::Ready {
        debug!("e2e framework is not set up, nothing to tear down");
        return Ok(());
    }
    publish(Slot::TornDown);
    info!("e2e teardown successfully");
    Ok(())
}

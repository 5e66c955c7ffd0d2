// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use anyhow::Result;
use clap::Parser;
use k8s_openapi::api::core::v1::Namespace;
use kube::api::{Api, ListParams};
use tracing::info;

use athenz_syncer_e2e::config::Options;
use athenz_syncer_e2e::framework;
use athenz_syncer_e2e::kubernetes::wait_for_athenz_domain_crd;

#[tokio::main]
async fn main() -> Result<()> {
    let options = Options::parse();

    // Logging is initialized by setup from the log flags
    let fw = framework::setup(&options).await?;
    info!("e2e framework ready, ZMS at '{}'", fw.zms_client.base_url());

    info!("Waiting for AthenzDomain CRD to become available...");
    wait_for_athenz_domain_crd(&fw.k8s_client).await?;

    let namespaces: Api<Namespace> = Api::all(fw.k8s_client.clone());
    let listed = namespaces.list(&ListParams::default().limit(1)).await?;
    info!(
        "Cluster API reachable, listed {} namespace(s)",
        listed.items.len()
    );

    let domains = fw.cr_client.api().list(&ListParams::default()).await?;
    info!("Found {} AthenzDomain resource(s)", domains.items.len());

    drop(fw);
    framework::teardown().await?;
    Ok(())
}

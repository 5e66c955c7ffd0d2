// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Kubernetes client factories, the AthenzDomain informer and CRD discovery.

pub mod client;
pub mod cr;
pub mod crd;
pub mod informer;

pub use client::{
    home_dir, load_cluster_config, new_cluster_client, resolve_cluster_config,
    ClusterConfigSource,
};
pub use cr::{new_cr_client, CrClient};
pub use crd::wait_for_athenz_domain_crd;
pub use informer::AthenzDomainInformer;

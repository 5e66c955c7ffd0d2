// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Cluster connection config resolution and cluster client creation

use crate::constants::KUBECONFIG_HOME_PATH;
use crate::error::{FrameworkError, Result};
use kube::config::{KubeConfigOptions, Kubeconfig};
use kube::{Client, Config as KConfig};
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument};

/// Where the cluster connection config is taken from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClusterConfigSource {
    /// Kubeconfig path given on the command line
    Explicit(PathBuf),
    /// Service account credentials supplied by the pod environment
    InCluster,
    /// `<home>/.kube/config`
    HomeDefault(PathBuf),
    /// No path could be derived; treated like an empty kubeconfig path
    Unset,
}

/// Pick exactly one config source: explicit path, then in-cluster, then the home default.
pub fn resolve_cluster_config(
    explicit: Option<&Path>,
    in_cluster: bool,
    home: Option<&Path>,
) -> ClusterConfigSource {
    if let Some(path) = explicit.filter(|p| !p.as_os_str().is_empty()) {
        return ClusterConfigSource::Explicit(path.to_path_buf());
    }
    if in_cluster {
        return ClusterConfigSource::InCluster;
    }
    match home.filter(|h| !h.as_os_str().is_empty()) {
        Some(home) => ClusterConfigSource::HomeDefault(KUBECONFIG_HOME_PATH.iter().fold(
            home.to_path_buf(),
            |path, part| path.join(part),
        )),
        None => ClusterConfigSource::Unset,
    }
}

/// Home directory of the invoking user.
/// On Unix this falls back to the passwd entry when `HOME` is unset.
pub fn home_dir() -> Option<PathBuf> {
    dirs::home_dir()
}

/// Build the client config for a resolved source
#[instrument]
pub async fn load_cluster_config(source: &ClusterConfigSource) -> Result<KConfig> {
    match source {
        ClusterConfigSource::Explicit(path) | ClusterConfigSource::HomeDefault(path) => {
            info!("Using kubeconfig {}", path.display());
            load_kubeconfig(path).await
        }
        ClusterConfigSource::InCluster => {
            info!("Using in-cluster config");
            KConfig::incluster().map_err(|e| {
                FrameworkError::ConfigResolution(format!("Failed to load in-cluster config: {}", e))
            })
        }
        ClusterConfigSource::Unset => {
            debug!("No kubeconfig path resolvable, falling back to in-cluster config");
            KConfig::incluster().map_err(|e| {
                FrameworkError::ConfigResolution(format!(
                    "No kubeconfig path could be derived and in-cluster config is unavailable: {}",
                    e
                ))
            })
        }
    }
}

async fn load_kubeconfig(path: &Path) -> Result<KConfig> {
    let kubeconfig = Kubeconfig::read_from(path).map_err(|e| {
        FrameworkError::ConfigResolution(format!(
            "Failed to read kubeconfig {}: {}",
            path.display(),
            e
        ))
    })?;

    KConfig::from_custom_kubeconfig(kubeconfig, &KubeConfigOptions::default())
        .await
        .map_err(|e| {
            FrameworkError::ConfigResolution(format!(
                "Failed to create config from {}: {}",
                path.display(),
                e
            ))
        })
}

/// Create a client for the cluster resource API. No request is made.
pub fn new_cluster_client(config: KConfig) -> Result<Client> {
    Client::try_from(config)
        .map_err(|e| FrameworkError::ClientConstruction(format!("Failed to create k8s client: {}", e)))
}

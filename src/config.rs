// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use crate::constants::defaults;
use crate::error::{FrameworkError, Result};
use crate::kubernetes::client::{resolve_cluster_config, ClusterConfigSource};
use clap::{ArgAction, Parser};
use std::path::{Path, PathBuf};

/// e2e framework configuration, from command line flags with environment fallbacks
#[derive(Parser, Debug, Clone)]
#[command(
    name = "athenz-syncer-e2e",
    about = "Bootstraps the shared clients used by the k8s-athenz-syncer e2e tests"
)]
pub struct Options {
    /// Absolute path to the kubeconfig file
    #[arg(long, env = "E2E_KUBECONFIG", default_value = "")]
    pub kubeconfig: String,

    /// Set to true to use in cluster config
    #[arg(
        long = "inClusterConfig",
        env = "E2E_IN_CLUSTER_CONFIG",
        default_value_t = true,
        action = ArgAction::Set
    )]
    pub in_cluster_config: bool,

    /// Athenz private key file
    #[arg(long, env = "E2E_KEY", default_value = defaults::KEY_PATH)]
    pub key: PathBuf,

    /// Athenz certificate file
    #[arg(long, env = "E2E_CERT", default_value = defaults::CERT_PATH)]
    pub cert: PathBuf,

    /// Athenz ZMS API URL
    #[arg(long = "zms-url", env = "E2E_ZMS_URL", default_value = "")]
    pub zms_url: String,

    /// Log location
    #[arg(long = "log-location", env = "E2E_LOG_LOCATION", default_value = defaults::LOG_LOCATION)]
    pub log_location: PathBuf,

    /// Logger mode
    #[arg(long = "log-mode", env = "E2E_LOG_MODE", default_value = defaults::LOG_MODE)]
    pub log_mode: String,
}

impl Options {
    /// Load options from the environment only.
    /// The test harness owns argv, so flags are not read here.
    pub fn from_env() -> Result<Self> {
        Self::try_parse_from(["athenz-syncer-e2e"])
            .map_err(|e| FrameworkError::ConfigResolution(e.to_string()))
    }

    /// Explicit kubeconfig path, with an empty value treated as absent
    pub fn explicit_kubeconfig(&self) -> Option<&Path> {
        Some(Path::new(&self.kubeconfig)).filter(|p| !p.as_os_str().is_empty())
    }

    /// Resolve where the cluster connection config comes from
    pub fn cluster_config_source(&self, home: Option<&Path>) -> ClusterConfigSource {
        resolve_cluster_config(self.explicit_kubeconfig(), self.in_cluster_config, home)
    }
}

// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

/// Default values for the e2e framework flags
pub mod defaults {
    pub const KEY_PATH: &str = "/var/run/athenz/service.key.pem";
    pub const CERT_PATH: &str = "/var/run/athenz/service.cert.pem";
    pub const LOG_LOCATION: &str = "/var/log/k8s-athenz-syncer/k8s-athenz-syncer.log";
    pub const LOG_MODE: &str = "info";
}

/// Coordinates of the AthenzDomain custom resource
pub mod crd {
    pub const GROUP: &str = "athenz.io";
    pub const VERSION: &str = "v1";
    pub const KIND: &str = "AthenzDomain";
    /// Initial polling interval in seconds when waiting for CRD
    pub const POLL_INTERVAL_SECS: u64 = 10;
    /// Maximum polling interval in seconds (exponential backoff cap)
    pub const POLL_MAX_INTERVAL_SECS: u64 = 60;
}

/// ZMS request details
pub mod zms {
    /// Header carrying the audit reference on modifying calls
    pub const AUDIT_REF_HEADER: &str = "Y-Audit-Ref";
}

/// Default kubeconfig location relative to the user's home directory
pub const KUBECONFIG_HOME_PATH: [&str; 2] = [".kube", "config"];

// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FrameworkError {
    #[error("Failed to resolve cluster config: {0}")]
    ConfigResolution(String),

    #[error("Failed to load client credentials: {0}")]
    CredentialLoad(String),

    #[error("Failed to construct client: {0}")]
    ClientConstruction(String),

    #[error("Kubernetes API error: {0}")]
    KubeError(#[from] kube::Error),

    #[error("ZMS request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("ZMS returned {status}: {message}")]
    Zms { status: u16, message: String },

    #[error("Invalid ZMS URL: {0}")]
    InvalidUrl(String),

    #[error("e2e framework is already initialized")]
    AlreadyInitialized,

    #[error("Informer error: {0}")]
    Informer(String),
}

pub type Result<T> = std::result::Result<T, FrameworkError>;

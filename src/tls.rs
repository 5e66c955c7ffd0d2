// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Client credential loading and the mutual TLS transport used for ZMS.
//!
//! Credentials are read once. Certificate rotation on disk is not picked up;
//! the e2e run is short-lived and a fresh process loads fresh files.

use crate::error::{FrameworkError, Result};
use rustls::pki_types::pem::PemObject;
use rustls::pki_types::{CertificateDer, PrivateKeyDer};
use rustls::sign::CertifiedKey;
use std::fs;
use std::path::Path;
use tracing::{debug, instrument};
use zeroize::Zeroizing;

/// Install ring as the process-wide rustls provider, if no provider is installed yet
pub fn install_crypto_provider() {
    let _ = rustls::crypto::ring::default_provider().install_default();
}

/// A private key and the certificate chain it belongs to
pub struct TlsIdentity {
    cert_chain: Vec<CertificateDer<'static>>,
    cert_pem: Vec<u8>,
    key_pem: Zeroizing<Vec<u8>>,
}

impl TlsIdentity {
    /// The leaf certificate presented during the handshake
    pub fn leaf(&self) -> &CertificateDer<'static> {
        &self.cert_chain[0]
    }

    pub fn cert_chain(&self) -> &[CertificateDer<'static>] {
        &self.cert_chain
    }

    /// Certificate chain followed by the private key, as reqwest expects it
    fn pem_bundle(&self) -> Zeroizing<Vec<u8>> {
        let mut bundle = Zeroizing::new(Vec::with_capacity(
            self.cert_pem.len() + self.key_pem.len() + 1,
        ));
        bundle.extend_from_slice(&self.cert_pem);
        if !self.cert_pem.ends_with(b"\n") {
            bundle.push(b'\n');
        }
        bundle.extend_from_slice(&self.key_pem);
        bundle
    }
}

impl std::fmt::Debug for TlsIdentity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TlsIdentity")
            .field("certificates", &self.cert_chain.len())
            .finish_non_exhaustive()
    }
}

/// Load a key/certificate pair from PEM files.
///
/// Fails unless the certificate chain and key both parse and the key's public
/// half matches the leaf certificate.
#[instrument]
pub fn load_identity(key_path: &Path, cert_path: &Path) -> Result<TlsIdentity> {
    let cert_pem = fs::read(cert_path).map_err(|e| {
        FrameworkError::CredentialLoad(format!(
            "Unable to read certificate {}: {}",
            cert_path.display(),
            e
        ))
    })?;
    let key_pem = Zeroizing::new(fs::read(key_path).map_err(|e| {
        FrameworkError::CredentialLoad(format!(
            "Unable to read private key {}: {}",
            key_path.display(),
            e
        ))
    })?);

    let cert_chain = CertificateDer::pem_slice_iter(&cert_pem)
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| {
            FrameworkError::CredentialLoad(format!(
                "Unable to parse certificate {}: {}",
                cert_path.display(),
                e
            ))
        })?;
    if cert_chain.is_empty() {
        return Err(FrameworkError::CredentialLoad(format!(
            "No certificate found in {}",
            cert_path.display()
        )));
    }

    let key = PrivateKeyDer::from_pem_slice(&key_pem).map_err(|e| {
        FrameworkError::CredentialLoad(format!(
            "Unable to parse private key {}: {}",
            key_path.display(),
            e
        ))
    })?;

    let provider = rustls::crypto::ring::default_provider();
    let signing_key = provider.key_provider.load_private_key(key).map_err(|e| {
        FrameworkError::CredentialLoad(format!(
            "Unsupported private key {}: {}",
            key_path.display(),
            e
        ))
    })?;

    CertifiedKey::new(cert_chain.clone(), signing_key)
        .keys_match()
        .map_err(|e| {
            FrameworkError::CredentialLoad(format!(
                "Private key {} does not match certificate {}: {}",
                key_path.display(),
                cert_path.display(),
                e
            ))
        })?;

    debug!("Loaded client identity with {} certificate(s)", cert_chain.len());

    Ok(TlsIdentity {
        cert_chain,
        cert_pem,
        key_pem,
    })
}

/// HTTP transport presenting a client identity on every TLS handshake
#[derive(Clone, Debug)]
pub struct Transport {
    http: reqwest::Client,
    client_certificate: CertificateDer<'static>,
}

impl Transport {
    pub fn http(&self) -> &reqwest::Client {
        &self.http
    }

    /// Leaf certificate this transport presents to servers
    pub fn client_certificate(&self) -> &CertificateDer<'static> {
        &self.client_certificate
    }
}

/// Build a mutual TLS transport from a key and certificate on disk.
///
/// Server certificates are validated against the webpki roots; nothing is pinned.
pub fn build_transport(key_path: &Path, cert_path: &Path) -> Result<Transport> {
    let identity = load_identity(key_path, cert_path)?;
    transport_for(&identity)
}

/// Build a transport for an already loaded identity
pub fn transport_for(identity: &TlsIdentity) -> Result<Transport> {
    let client_identity = reqwest::Identity::from_pem(&identity.pem_bundle()).map_err(|e| {
        FrameworkError::CredentialLoad(format!("Unable to formulate client identity: {}", e))
    })?;

    let http = reqwest::Client::builder()
        .use_rustls_tls()
        .identity(client_identity)
        .build()
        .map_err(|e| {
            FrameworkError::ClientConstruction(format!("Failed to build HTTP transport: {}", e))
        })?;

    Ok(Transport {
        http,
        client_certificate: identity.leaf().clone(),
    })
}

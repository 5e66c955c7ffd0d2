// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Test utilities: a mock Kubernetes API, fixture files and a one-shot HTTP responder.

use http::{Request, Response, StatusCode};
use kube::client::Body;
use kube::Client;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::task::{Context, Poll};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinHandle;
use tower::Service;

/// A mock HTTP service that returns predefined responses based on request paths.
#[derive(Clone)]
pub struct MockService {
    responses: Arc<Mutex<HashMap<(String, String), (u16, String)>>>,
}

impl MockService {
    pub fn new() -> Self {
        Self {
            responses: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    fn on(self, method: &str, path: &str, status: u16, body: &str) -> Self {
        self.responses.lock().unwrap().insert(
            (method.to_string(), path.to_string()),
            (status, body.to_string()),
        );
        self
    }

    /// Add a response for GET requests matching the exact path
    pub fn on_get(self, path: &str, status: u16, body: &str) -> Self {
        self.on("GET", path, status, body)
    }

    /// Add a response for POST requests matching the exact path
    pub fn on_post(self, path: &str, status: u16, body: &str) -> Self {
        self.on("POST", path, status, body)
    }

    /// Add a response for DELETE requests matching the exact path
    pub fn on_delete(self, path: &str, status: u16, body: &str) -> Self {
        self.on("DELETE", path, status, body)
    }

    /// Build a kube Client from this mock service
    pub fn into_client(self) -> Client {
        Client::new(self, "default")
    }

    fn find_response(&self, method: &str, path: &str) -> Option<(u16, String)> {
        let responses = self.responses.lock().unwrap();

        // Try exact match first
        if let Some(resp) = responses.get(&(method.to_string(), path.to_string())) {
            return Some(resp.clone());
        }

        // Try prefix match for paths like /apis/athenz.io/v1/athenzdomains/foo
        for ((m, p), resp) in responses.iter() {
            if m == method && path.starts_with(p) {
                return Some(resp.clone());
            }
        }

        None
    }
}

impl Default for MockService {
    fn default() -> Self {
        Self::new()
    }
}

impl Service<Request<Body>> for MockService {
    type Response = Response<Body>;
    type Error = tower::BoxError;
    type Future = std::pin::Pin<
        Box<dyn std::future::Future<Output = Result<Self::Response, Self::Error>> + Send>,
    >;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: Request<Body>) -> Self::Future {
        let method = req.method().to_string();
        let path = req.uri().path().to_string();

        let (status, body) = self
            .find_response(&method, &path)
            .unwrap_or_else(|| (404, not_found_json()));

        Box::pin(async move {
            Ok(Response::builder()
                .status(status)
                .header("content-type", "application/json")
                .body(Body::from(body.into_bytes()))
                .unwrap())
        })
    }
}

fn not_found_json() -> String {
    serde_json::json!({
        "kind": "Status",
        "apiVersion": "v1",
        "status": "Failure",
        "message": "not found",
        "reason": "NotFound",
        "code": 404
    })
    .to_string()
}

fn athenz_domain_value(name: &str, roles: &[(&str, Vec<&str>)]) -> serde_json::Value {
    let roles: Vec<_> = roles
        .iter()
        .map(|(role, members)| {
            serde_json::json!({
                "name": format!("{}:role.{}", name, role),
                "members": members
            })
        })
        .collect();

    serde_json::json!({
        "apiVersion": "athenz.io/v1",
        "kind": "AthenzDomain",
        "metadata": {
            "name": name,
            "uid": format!("uid-{}", name),
            "resourceVersion": "1"
        },
        "spec": {
            "domain": {
                "name": name,
                "enabled": true,
                "roles": roles
            },
            "signature": "test-signature",
            "keyId": "0"
        }
    })
}

/// Create a mock AthenzDomain JSON response with the given roles and members
pub fn athenz_domain_json(name: &str, roles: &[(&str, Vec<&str>)]) -> String {
    athenz_domain_value(name, roles).to_string()
}

/// Create a mock AthenzDomain list JSON response
pub fn athenz_domain_list_json(domains: &[(&str, Vec<(&str, Vec<&str>)>)]) -> String {
    let items: Vec<_> = domains
        .iter()
        .map(|(name, roles)| athenz_domain_value(name, roles))
        .collect();

    serde_json::json!({
        "apiVersion": "athenz.io/v1",
        "kind": "AthenzDomainList",
        "metadata": {"resourceVersion": "100"},
        "items": items
    })
    .to_string()
}

/// Key and self-signed certificate written to disk
pub struct GeneratedIdentity {
    pub key_path: PathBuf,
    pub cert_path: PathBuf,
    pub cert_der: Vec<u8>,
}

/// Generate a fresh key pair and self-signed certificate as `<name>.key.pem` / `<name>.cert.pem`
pub fn write_identity(dir: &Path, name: &str) -> GeneratedIdentity {
    let key_pair = rcgen::KeyPair::generate().unwrap();
    let cert = rcgen::CertificateParams::new(vec![format!("{}.e2e.local", name)])
        .unwrap()
        .self_signed(&key_pair)
        .unwrap();

    let key_path = dir.join(format!("{}.key.pem", name));
    let cert_path = dir.join(format!("{}.cert.pem", name));
    fs::write(&key_path, key_pair.serialize_pem()).unwrap();
    fs::write(&cert_path, cert.pem()).unwrap();

    GeneratedIdentity {
        key_path,
        cert_path,
        cert_der: cert.der().to_vec(),
    }
}

/// Write a token-authenticated kubeconfig pointing at a local API server
pub fn write_kubeconfig(dir: &Path) -> PathBuf {
    let path = dir.join("kubeconfig");
    fs::write(
        &path,
        r#"apiVersion: v1
kind: Config
clusters:
- name: e2e
  cluster:
    server: https://127.0.0.1:6443
    insecure-skip-tls-verify: true
contexts:
- name: e2e
  context:
    cluster: e2e
    user: e2e
current-context: e2e
users:
- name: e2e
  user:
    token: e2e-token
"#,
    )
    .unwrap();
    path
}

/// Serve a single HTTP response on a local port.
///
/// Returns the base URL and a handle resolving to the raw request that was received.
pub async fn respond_once(status: u16, body: &str) -> (String, JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base_url = format!("http://{}", listener.local_addr().unwrap());
    let body = body.to_string();

    let handle = tokio::spawn(async move {
        let (mut stream, _) = listener.accept().await.unwrap();
        let request = read_request(&mut stream).await;

        let reason = StatusCode::from_u16(status)
            .ok()
            .and_then(|s| s.canonical_reason())
            .unwrap_or("");
        let response = format!(
            "HTTP/1.1 {} {}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
            status,
            reason,
            body.len(),
            body
        );
        stream.write_all(response.as_bytes()).await.unwrap();
        let _ = stream.shutdown().await;
        request
    });

    (base_url, handle)
}

async fn read_request(stream: &mut TcpStream) -> String {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];

    loop {
        let n = stream.read(&mut chunk).await.unwrap();
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);

        if let Some(end) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            let headers = String::from_utf8_lossy(&buf[..end]).to_ascii_lowercase();
            let content_length = headers
                .lines()
                .find_map(|line| line.strip_prefix("content-length:"))
                .and_then(|v| v.trim().parse::<usize>().ok())
                .unwrap_or(0);
            if buf.len() >= end + 4 + content_length {
                break;
            }
        }
    }

    String::from_utf8_lossy(&buf).into_owned()
}

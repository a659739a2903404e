//! Shared utilities for integration testing.

#![allow(dead_code)]

use std::io::{self, Write};
use std::net::{SocketAddr, TcpListener};
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
use axum_server::tls_rustls::RustlsConfig;
use hello_rapp::observability::dispatch::LogEntry;
use hello_rapp::AppConfig;
use rustls::server::WebPkiClientVerifier;
use rustls::{RootCertStore, ServerConfig};

/// Directory holding the test CA, server and client key pairs.
pub fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests").join("fixtures")
}

/// Configuration with the fixture CA and client pair, pointing remote
/// logging at `log_endpoint`.
pub fn mtls_config(log_endpoint: &str) -> AppConfig {
    let dir = fixtures_dir().to_string_lossy().into_owned();
    AppConfig {
        container_name: "hello-world".into(),
        ca_cert_file_path: dir.clone(),
        ca_cert_file_name: "ca.pem".into(),
        app_cert_file_path: dir,
        app_cert: "client.pem".into(),
        app_key: "client-key.pem".into(),
        log_endpoint: log_endpoint.into(),
        ..AppConfig::default()
    }
}

/// In-memory writer shared between a logger and the test body.
#[derive(Clone, Default)]
pub struct Buffer(Arc<Mutex<Vec<u8>>>);

impl Buffer {
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl Write for Buffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Poll `condition` until it holds or `timeout` elapses.
pub async fn wait_until<F: Fn() -> bool>(timeout: Duration, condition: F) -> bool {
    let deadline = tokio::time::Instant::now() + timeout;
    while tokio::time::Instant::now() < deadline {
        if condition() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    condition()
}

/// HTTPS log collector requiring a client certificate signed by the
/// fixture CA. Records the start and end of every request it handles.
pub struct Collector {
    pub addr: SocketAddr,
    events: Arc<Mutex<Vec<String>>>,
}

impl Collector {
    /// Endpoint in the form expected by `LOG_ENDPOINT`.
    pub fn endpoint(&self) -> String {
        format!("127.0.0.1:{}", self.addr.port())
    }

    pub fn events(&self) -> Vec<String> {
        self.events.lock().unwrap().clone()
    }
}

#[derive(Clone)]
struct CollectorState {
    events: Arc<Mutex<Vec<String>>>,
    seen: Arc<AtomicUsize>,
    first_delay: Duration,
}

async fn collect(State(state): State<CollectorState>, Json(entry): Json<LogEntry>) -> StatusCode {
    let n = state.seen.fetch_add(1, Ordering::SeqCst);
    state.events.lock().unwrap().push(format!("begin {}", entry.message));
    if n == 0 {
        tokio::time::sleep(state.first_delay).await;
    }
    state.events.lock().unwrap().push(format!("end {}", entry.message));
    StatusCode::OK
}

/// Start a collector on an ephemeral port. The first request is held for
/// `first_delay` before it is answered.
pub async fn start_collector(first_delay: Duration) -> Collector {
    start_collector_with_identity(first_delay, "server.pem", "server-key.pem").await
}

/// Start a collector presenting the named fixture certificate pair.
pub async fn start_collector_with_identity(first_delay: Duration, cert: &str, key: &str) -> Collector {
    let events = Arc::new(Mutex::new(Vec::new()));
    let state = CollectorState {
        events: events.clone(),
        seen: Arc::new(AtomicUsize::new(0)),
        first_delay,
    };
    let app = Router::new().route("/", post(collect)).with_state(state);

    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    listener.set_nonblocking(true).unwrap();
    let addr = listener.local_addr().unwrap();

    let server = axum_server::from_tcp_rustls(listener, RustlsConfig::from_config(collector_tls(cert, key)));
    tokio::spawn(async move {
        let _ = server.serve(app.into_make_service()).await;
    });

    Collector { addr, events }
}

fn collector_tls(cert: &str, key: &str) -> Arc<ServerConfig> {
    let dir = fixtures_dir();
    let read_certs = |name: &str| {
        let mut reader = io::BufReader::new(std::fs::File::open(dir.join(name)).unwrap());
        rustls_pemfile::certs(&mut reader)
            .collect::<Result<Vec<_>, _>>()
            .unwrap()
    };

    let mut roots = RootCertStore::empty();
    roots.add_parsable_certificates(read_certs("ca.pem"));

    let provider = Arc::new(rustls::crypto::ring::default_provider());
    let verifier = WebPkiClientVerifier::builder_with_provider(Arc::new(roots), provider.clone())
        .build()
        .unwrap();

    let mut key_reader = io::BufReader::new(std::fs::File::open(dir.join(key)).unwrap());
    let private_key = rustls_pemfile::private_key(&mut key_reader).unwrap().unwrap();

    let config = ServerConfig::builder_with_provider(provider)
        .with_protocol_versions(&[&rustls::version::TLS13])
        .unwrap()
        .with_client_cert_verifier(verifier)
        .with_single_cert(read_certs(cert), private_key)
        .unwrap();

    Arc::new(config)
}

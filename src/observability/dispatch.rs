//! Remote log dispatch over mutual TLS.
//!
//! # Responsibilities
//! - Build the wire record for an accepted log line
//! - Ship records to the remote collector, one request at a time
//! - Report delivery failures to the local sink only
//!
//! # Design Decisions
//! - A single worker task drains a bounded queue, so at most one POST is in
//!   flight and records arrive in submission order
//! - Submitting never waits for network I/O; a full queue drops the record
//! - Each POST has a deadline so a hung collector cannot stall the queue forever

use std::sync::Arc;
use std::time::Duration;

use arc_swap::ArcSwap;
use reqwest::header::CONTENT_TYPE;
use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::runtime::Handle;
use tokio::sync::mpsc;
use url::Url;

use crate::observability::logging::{LocalSink, Severity};
use crate::observability::metrics;

/// Version stamped on every record.
pub const LOG_ENTRY_VERSION: &str = "0.0.1";

/// Service identifier stamped on every record.
pub const SERVICE_ID: &str = "rapp-eric-oss-hello-world-go-app";

/// Records waiting for the worker before new ones are dropped.
pub const DISPATCH_QUEUE_CAPACITY: usize = 1024;

/// Deadline for a single POST to the collector.
pub const DISPATCH_TIMEOUT: Duration = Duration::from_secs(10);

/// Wire record shipped to the remote collector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    pub timestamp: String,
    pub version: String,
    pub message: String,
    pub service_id: String,
    pub severity: String,
}

impl LogEntry {
    pub fn new(message: &str, severity: Severity) -> Self {
        Self {
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
            version: LOG_ENTRY_VERSION.to_string(),
            message: message.to_string(),
            service_id: SERVICE_ID.to_string(),
            severity: severity.label().to_string(),
        }
    }
}

/// Why a record was not handed to the collector.
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("remote logging is not configured")]
    Disabled,

    #[error("invalid log endpoint '{endpoint}': {source}")]
    Endpoint {
        endpoint: String,
        #[source]
        source: url::ParseError,
    },

    #[error("failed to serialize log entry: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("dispatch queue is full, log entry dropped")]
    QueueFull,

    #[error("dispatch worker has stopped")]
    Closed,

    #[error("request failed for mTLS logging: {0}")]
    Request(#[from] reqwest::Error),
}

/// Collector URL for a configured endpoint host.
pub fn endpoint_url(endpoint: &str) -> Result<Url, DispatchError> {
    Url::parse(&format!("https://{}", endpoint)).map_err(|source| DispatchError::Endpoint {
        endpoint: endpoint.to_string(),
        source,
    })
}

/// Handle to the background worker that ships records to the collector.
///
/// Dropping the last handle closes the queue; the worker delivers what is
/// already queued and then exits.
pub struct RemoteDispatcher {
    tx: mpsc::Sender<Vec<u8>>,
    url: Url,
}

impl RemoteDispatcher {
    /// Spawn the worker on `runtime`.
    pub fn spawn(runtime: &Handle, client: reqwest::Client, url: Url, sink: Arc<ArcSwap<LocalSink>>) -> Self {
        let (tx, rx) = mpsc::channel(DISPATCH_QUEUE_CAPACITY);
        runtime.spawn(run_worker(rx, client, url.clone(), sink));
        Self { tx, url }
    }

    /// Queue a record for delivery.
    pub fn submit(&self, entry: &LogEntry) -> Result<(), DispatchError> {
        let body = serde_json::to_vec(entry)?;
        self.tx.try_send(body).map_err(|e| match e {
            mpsc::error::TrySendError::Full(_) => {
                metrics::record_dispatch_dropped();
                DispatchError::QueueFull
            }
            mpsc::error::TrySendError::Closed(_) => DispatchError::Closed,
        })
    }
}

impl std::fmt::Debug for RemoteDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RemoteDispatcher").field("url", &self.url.as_str()).finish()
    }
}

async fn run_worker(
    mut rx: mpsc::Receiver<Vec<u8>>,
    client: reqwest::Client,
    url: Url,
    sink: Arc<ArcSwap<LocalSink>>,
) {
    while let Some(body) = rx.recv().await {
        if let Err(e) = post(&client, &url, body).await {
            metrics::record_dispatch_failure();
            sink.load().write(Severity::Error, &e.to_string());
        }
    }
    tracing::debug!(url = %url, "Log dispatch worker stopped");
}

async fn post(client: &reqwest::Client, url: &Url, body: Vec<u8>) -> Result<(), DispatchError> {
    let response = client
        .post(url.clone())
        .header(CONTENT_TYPE, "application/json")
        .body(body)
        .send()
        .await?;

    // Drain the body so the connection can be reused; its content is ignored.
    let _ = response.bytes().await;
    Ok(())
}

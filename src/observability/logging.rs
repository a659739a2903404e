//! Structured, leveled logging with remote dispatch.
//!
//! # Responsibilities
//! - Gate log lines by a severity threshold
//! - Write accepted lines to a local sink (stdout by default)
//! - Mirror accepted lines to the remote collector over mutual TLS
//! - Pick the threshold from the per-container log-control file
//!
//! # Design Decisions
//! - Uses the tracing crate for the local sink, with a dedicated
//!   `Dispatch` per logger so its writer and level can change at runtime
//! - Threshold and sink filter live in one swappable value and never diverge
//! - Remote delivery is best-effort and never reaches the caller

use std::io::{self, Write};
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};

use arc_swap::{ArcSwap, ArcSwapOption};
use tracing::Dispatch;
use tracing_subscriber::filter::LevelFilter;

use crate::config::AppConfig;
use crate::net::tls::build_mutual_trust_config;
use crate::observability::control::{read_log_controls, threshold_for, ControlFileError};
use crate::observability::dispatch::{
    endpoint_url, DispatchError, LogEntry, RemoteDispatcher, DISPATCH_TIMEOUT,
};

/// Log severity, ordered from least to most verbose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    Fatal,
    Error,
    Warning,
    Info,
    Debug,
}

impl Severity {
    /// Label used in the wire record.
    pub fn label(self) -> &'static str {
        match self {
            Severity::Fatal => "fatal",
            Severity::Error => "error",
            Severity::Warning => "warning",
            Severity::Info => "info",
            Severity::Debug => "debug",
        }
    }

    /// Parse a severity label from the log-control file.
    pub fn from_control_label(label: &str) -> Option<Self> {
        match label {
            "critical" => Some(Severity::Fatal),
            "error" => Some(Severity::Error),
            "warning" => Some(Severity::Warning),
            "info" => Some(Severity::Info),
            "debug" => Some(Severity::Debug),
            _ => None,
        }
    }

    // tracing has no fatal level; nothing is emitted at Fatal.
    fn level_filter(self) -> LevelFilter {
        match self {
            Severity::Fatal => LevelFilter::OFF,
            Severity::Error => LevelFilter::ERROR,
            Severity::Warning => LevelFilter::WARN,
            Severity::Info => LevelFilter::INFO,
            Severity::Debug => LevelFilter::DEBUG,
        }
    }
}

type SinkWriter = Arc<Mutex<Box<dyn Write + Send>>>;

fn shared<W: Write + Send + 'static>(writer: W) -> SinkWriter {
    Arc::new(Mutex::new(Box::new(writer)))
}

/// Handle on a [`SinkWriter`] handed to the formatter for each event.
struct SharedWriter(SinkWriter);

impl SharedWriter {
    fn lock(&self) -> io::Result<MutexGuard<'_, Box<dyn Write + Send>>> {
        self.0
            .lock()
            .map_err(|_| io::Error::other("log writer lock poisoned"))
    }
}

impl Write for SharedWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.lock()?.write(buf)
    }

    fn write_all(&mut self, buf: &[u8]) -> io::Result<()> {
        self.lock()?.write_all(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.lock()?.flush()
    }
}

/// Local output of a [`Logger`]: a writer, the active threshold, and the
/// tracing dispatcher that formats lines into the writer.
pub struct LocalSink {
    threshold: Severity,
    writer: SinkWriter,
    dispatch: Dispatch,
}

impl LocalSink {
    fn new(writer: SinkWriter, threshold: Severity) -> Self {
        let make_writer = {
            let writer = writer.clone();
            move || SharedWriter(writer.clone())
        };
        let subscriber = tracing_subscriber::fmt()
            .with_writer(make_writer)
            .with_max_level(threshold.level_filter())
            .with_ansi(false)
            .with_target(false)
            .finish();

        Self {
            threshold,
            writer,
            dispatch: Dispatch::new(subscriber),
        }
    }

    pub fn threshold(&self) -> Severity {
        self.threshold
    }

    /// Write one line, subject only to the sink's level filter.
    pub fn write(&self, severity: Severity, message: &str) {
        tracing::dispatcher::with_default(&self.dispatch, || match severity {
            Severity::Fatal | Severity::Error => tracing::error!("{}", message),
            Severity::Warning => tracing::warn!("{}", message),
            Severity::Info => tracing::info!("{}", message),
            Severity::Debug => tracing::debug!("{}", message),
        });
    }
}

struct LoggerInner {
    sink: Arc<ArcSwap<LocalSink>>,
    remote: ArcSwapOption<RemoteDispatcher>,
}

/// Leveled logger that mirrors accepted lines to a remote collector.
///
/// Cheap to clone; clones share state, so `set_level`, `set_output` and
/// `reinit` on one clone are seen by all.
#[derive(Clone)]
pub struct Logger {
    inner: Arc<LoggerInner>,
}

impl Logger {
    /// Initialize a logger writing to stdout.
    pub fn init(config: Arc<AppConfig>) -> Self {
        Self::init_with_writer(config, io::stdout())
    }

    /// Initialize a logger writing to `writer`.
    ///
    /// Anything reported while reading the log-control file goes to `writer`.
    pub fn init_with_writer<W: Write + Send + 'static>(config: Arc<AppConfig>, writer: W) -> Self {
        let logger = Self {
            inner: Arc::new(LoggerInner {
                sink: Arc::new(ArcSwap::from_pointee(LocalSink::new(shared(io::sink()), Severity::Info))),
                remote: ArcSwapOption::empty(),
            }),
        };
        logger.reinit_with_writer(config, writer);
        logger
    }

    /// Re-run initialization against `config`, resetting output to stdout.
    pub fn reinit(&self, config: Arc<AppConfig>) {
        self.reinit_with_writer(config, io::stdout());
    }

    /// Re-run initialization against `config`, writing to `writer`.
    ///
    /// The previous remote dispatcher is released; it finishes delivering
    /// what was already queued.
    pub fn reinit_with_writer<W: Write + Send + 'static>(&self, config: Arc<AppConfig>, writer: W) {
        self.inner
            .sink
            .store(Arc::new(LocalSink::new(shared(writer), Severity::Info)));
        self.inner.remote.store(self.remote_dispatcher(&config).map(Arc::new));
        self.apply_log_control(&config);
    }

    /// Set the threshold and the local sink filter together.
    pub fn set_level(&self, level: Severity) {
        self.inner
            .sink
            .rcu(|sink| LocalSink::new(sink.writer.clone(), level));
    }

    /// Redirect the local sink. Remote dispatch is unaffected.
    pub fn set_output<W: Write + Send + 'static>(&self, writer: W) {
        let writer = shared(writer);
        self.inner
            .sink
            .rcu(|sink| LocalSink::new(writer.clone(), sink.threshold));
    }

    /// Active threshold.
    pub fn threshold(&self) -> Severity {
        self.inner.sink.load().threshold
    }

    /// Whether accepted lines are mirrored to a remote collector.
    pub fn remote_enabled(&self) -> bool {
        self.inner.remote.load().is_some()
    }

    pub fn error(&self, message: &str) {
        self.emit(Severity::Error, message);
    }

    pub fn warning(&self, message: &str) {
        self.emit(Severity::Warning, message);
    }

    pub fn info(&self, message: &str) {
        self.emit(Severity::Info, message);
    }

    pub fn debug(&self, message: &str) {
        self.emit(Severity::Debug, message);
    }

    /// Queue `message` for the remote collector.
    ///
    /// Returns once the record is queued; delivery happens in the background.
    pub fn dispatch(&self, message: &str, severity: Severity) -> Result<(), DispatchError> {
        let remote = self.inner.remote.load();
        match &*remote {
            Some(remote) => remote.submit(&LogEntry::new(message, severity)),
            None => Err(DispatchError::Disabled),
        }
    }

    fn emit(&self, severity: Severity, message: &str) {
        let sink = self.inner.sink.load();
        if sink.threshold < severity {
            return;
        }
        sink.write(severity, message);

        // Remote delivery is best-effort.
        let _ = self.dispatch(message, severity);
    }

    // Writes bypass the threshold gate and are never dispatched.
    fn write_local(&self, severity: Severity, message: &str) {
        self.inner.sink.load().write(severity, message);
    }

    fn remote_dispatcher(&self, config: &AppConfig) -> Option<RemoteDispatcher> {
        let trust = build_mutual_trust_config(config)?;

        let url = match endpoint_url(&config.log_endpoint) {
            Ok(url) => url,
            Err(e) => {
                self.write_local(Severity::Warning, &format!("{}, remote logging disabled", e));
                return None;
            }
        };

        let client = match trust.http_client_builder().timeout(DISPATCH_TIMEOUT).build() {
            Ok(client) => client,
            Err(e) => {
                self.write_local(
                    Severity::Warning,
                    &format!("Could not build mTLS logging client, remote logging disabled: {}", e),
                );
                return None;
            }
        };

        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            self.write_local(Severity::Warning, "No async runtime, remote logging disabled");
            return None;
        };

        Some(RemoteDispatcher::spawn(&runtime, client, url, self.inner.sink.clone()))
    }

    fn apply_log_control(&self, config: &AppConfig) {
        match read_log_controls(Path::new(&config.log_control_file)) {
            Ok(controls) => {
                if let Some(level) = threshold_for(&controls, &config.container_name) {
                    self.set_level(level);
                }
            }
            Err(e @ ControlFileError::Read { .. }) => {
                self.write_local(Severity::Error, &e.to_string());
                self.write_local(
                    Severity::Warning,
                    "Could not read from LogControlFile, setting level to INFO",
                );
            }
            Err(e @ ControlFileError::Parse(_)) => {
                self.write_local(Severity::Error, &e.to_string());
                self.write_local(
                    Severity::Warning,
                    "Could not parse LogControlFile, setting level to INFO",
                );
            }
        }
    }
}

impl std::fmt::Debug for Logger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Logger")
            .field("threshold", &self.threshold())
            .field("remote_enabled", &self.remote_enabled())
            .finish()
    }
}

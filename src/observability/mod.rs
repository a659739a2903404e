//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Handlers and subsystems produce:
//!     → logging.rs (leveled lines, local sink)
//!         → dispatch.rs (JSON records, remote collector over mTLS)
//!     → metrics.rs (counters)
//!
//! At logger initialization:
//!     control.rs (per-container threshold from the log-control file)
//!
//! Consumers:
//!     → stdout (container log collection)
//!     → remote HTTPS collector
//!     → Metrics endpoint (Prometheus scrape)
//! ```
//!
//! # Design Decisions
//! - Remote delivery never blocks or fails the caller
//! - Metrics are cheap (atomic increments)

pub mod control;
pub mod dispatch;
pub mod logging;
pub mod metrics;

pub use logging::{Logger, Severity};

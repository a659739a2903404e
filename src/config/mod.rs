//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! process environment
//!     → loader.rs (read, trim, default)
//!     → AppConfig (immutable snapshot)
//!     → provider.rs (ArcSwap, shared via Arc to all subsystems)
//!     → validation.rs (warnings logged at startup)
//!
//! On reload (SIGHUP):
//!     loader.rs reads the environment again
//!     → atomic swap of Arc<AppConfig>
//!     → holders of the previous Arc are unaffected
//!
//! On log-control file change:
//!     watcher.rs notifies → logger re-initializes from the current snapshot
//! ```
//!
//! # Design Decisions
//! - Snapshots are immutable; changes require a full reload
//! - All fields have defaults; malformed values degrade to them
//! - Validation produces warnings, never startup failures

pub mod loader;
pub mod provider;
pub mod schema;
pub mod validation;
pub mod watcher;

pub use provider::ConfigProvider;
pub use schema::{AppConfig, Protocol};

//! Network layer subsystem.
//!
//! # Data Flow
//! ```text
//! Inbound:
//!     LOCAL_PROTOCOL=https → tls.rs (server certificate + key) → axum-server
//!
//! Outbound:
//!     CA bundle                 → tls.rs → plain trust  → identity provider
//!     CA bundle + client pair   → tls.rs → mutual trust → remote log collector
//! ```
//!
//! # Design Decisions
//! - Trust configurations are rebuilt from the current snapshot, never cached
//! - Missing certificate material is a capability check (`Option`), not an error
//! - Outbound connections negotiate TLS 1.3 only

pub mod tls;

pub use tls::{build_mutual_trust_config, build_trust_config, TrustConfig, TrustKind};

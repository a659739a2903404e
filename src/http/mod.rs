//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP/TLS connection
//!     → server.rs (Axum setup, plain or rustls listener)
//!     → request.rs (request ID, client address line)
//!     → handlers: /hello (login + logging), /health, /metrics
//!     → Send to client
//! ```

pub mod request;
pub mod server;

pub use request::{client_ip_info, MakeRequestUuidV4};
pub use server::{AppState, HttpServer};

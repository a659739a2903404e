//! Identity provider login subsystem.
//!
//! # Data Flow
//! ```text
//! /hello handler
//!     → client.rs (client-credentials grant, form POST)
//!     → net::tls (plain trust from the CA bundle)
//!     → identity provider token endpoint
//!     → types.rs (Token, or a typed LoginError)
//! ```
//!
//! # Design Decisions
//! - Login failures are reported to the caller, never turned into a failed response
//! - Non-2xx answers carry status, status text and body
//! - Transport and decoding failures are distinct variants

pub mod client;
pub mod types;

pub use client::{login, LoginClient};
pub use types::{LoginError, LoginResult, Token};

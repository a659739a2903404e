//! Token and error definitions for the client-credentials login.

use serde::Deserialize;
use thiserror::Error;

/// Token endpoint path appended to the identity provider base URL.
pub const LOGIN_PATH: &str = "/auth/realms/master/protocol/openid-connect/token";

/// Tenant sent with every login.
pub const TENANT_ID: &str = "master";

/// Token returned by the identity provider.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Token {
    #[serde(rename = "accessToken", alias = "access_token", default)]
    pub access_token: String,
}

/// Errors that can occur during login.
#[derive(Debug, Error)]
pub enum LoginError {
    /// Client id or secret is empty; no request was made.
    #[error("Empty parameters provided for IamClientID or IamClientSecret")]
    MissingCredentials,

    /// The HTTP client could not be constructed.
    #[error("Could not build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    /// DNS, connection or TLS failure.
    #[error("Request Failed with following error: {0}")]
    Transport(#[source] reqwest::Error),

    /// The response body could not be read.
    #[error("Reading response body failed: {0}")]
    Body(#[source] reqwest::Error),

    /// The identity provider answered with a non-2xx status.
    #[error("{status_text}")]
    Http {
        status: u16,
        status_text: String,
        body: Vec<u8>,
    },

    /// The response body is not a token.
    #[error("JSON Unmarshal Failed with following error: {0}")]
    Decode(#[from] serde_json::Error),
}

impl LoginError {
    /// HTTP status of the response, if one was received.
    pub fn status(&self) -> Option<u16> {
        match self {
            LoginError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Result type for login operations.
pub type LoginResult<T> = Result<T, LoginError>;

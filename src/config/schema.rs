//! Configuration schema definitions.
//!
//! This module defines the complete configuration snapshot for the service.
//! Every field carries a default so a snapshot is always fully populated,
//! even when the process environment is empty.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Default port the HTTP server listens on.
pub const DEFAULT_LOCAL_PORT: u16 = 8050;

/// Environment variable names read by the loader.
pub mod env {
    pub const LOCAL_PORT: &str = "LOCAL_PORT";
    pub const LOCAL_PROTOCOL: &str = "LOCAL_PROTOCOL";
    pub const CERT_FILE: &str = "CERT_FILE";
    pub const KEY_FILE: &str = "KEY_FILE";
    pub const CONTAINER_NAME: &str = "CONTAINER_NAME";
    pub const IAM_CLIENT_ID: &str = "IAM_CLIENT_ID";
    pub const IAM_CLIENT_SECRET: &str = "IAM_CLIENT_SECRET";
    pub const IAM_BASE_URL: &str = "IAM_BASE_URL";
    pub const CA_CERT_FILE_NAME: &str = "CA_CERT_FILE_NAME";
    pub const CA_CERT_FILE_PATH: &str = "CA_CERT_FILE_PATH";
    pub const LOG_CTRL_FILE: &str = "LOG_CTRL_FILE";
    pub const LOG_ENDPOINT: &str = "LOG_ENDPOINT";
    pub const APP_KEY: &str = "APP_KEY";
    pub const APP_CERT: &str = "APP_CERT";
    pub const APP_CERT_FILE_PATH: &str = "APP_CERT_FILE_PATH";
}

/// Protocol the local server speaks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Protocol {
    Http,
    Https,
}

/// Immutable configuration snapshot read from the process environment.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct AppConfig {
    /// Port for the local HTTP(S) listener.
    pub local_port: u16,

    /// Protocol selector, `http` or `https`.
    pub local_protocol: String,

    /// Server certificate (PEM) used when serving `https`.
    pub cert_file: String,

    /// Server private key (PEM) used when serving `https`.
    pub key_file: String,

    /// Identity of the container this process runs in.
    pub container_name: String,

    /// OAuth2 client identifier.
    pub iam_client_id: String,

    /// OAuth2 client secret.
    pub iam_client_secret: String,

    /// Base URL of the identity provider.
    pub iam_base_url: String,

    /// File name of the CA bundle.
    pub ca_cert_file_name: String,

    /// Directory holding the CA bundle.
    pub ca_cert_file_path: String,

    /// Path of the JSON log-control file.
    pub log_control_file: String,

    /// Host (and optional port/path) of the remote log collector.
    pub log_endpoint: String,

    /// File name of the mTLS client key.
    pub app_key: String,

    /// File name of the mTLS client certificate.
    pub app_cert: String,

    /// Directory holding the mTLS client certificate and key.
    pub app_cert_file_path: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            local_port: DEFAULT_LOCAL_PORT,
            local_protocol: "http".to_string(),
            cert_file: "certificate.pem".to_string(),
            key_file: "key.pem".to_string(),
            container_name: String::new(),
            iam_client_id: String::new(),
            iam_client_secret: String::new(),
            iam_base_url: String::new(),
            ca_cert_file_name: String::new(),
            ca_cert_file_path: String::new(),
            log_control_file: String::new(),
            log_endpoint: String::new(),
            app_key: String::new(),
            app_cert: String::new(),
            app_cert_file_path: String::new(),
        }
    }
}

impl AppConfig {
    /// Protocol the listener should use. Anything other than `https` is plain HTTP.
    pub fn protocol(&self) -> Protocol {
        if self.local_protocol == "https" {
            Protocol::Https
        } else {
            Protocol::Http
        }
    }

    /// Full path of the CA bundle.
    pub fn ca_cert_path(&self) -> PathBuf {
        join(&self.ca_cert_file_path, &self.ca_cert_file_name)
    }

    /// Full path of the mTLS client certificate.
    pub fn app_cert_path(&self) -> PathBuf {
        join(&self.app_cert_file_path, &self.app_cert)
    }

    /// Full path of the mTLS client key.
    pub fn app_key_path(&self) -> PathBuf {
        join(&self.app_cert_file_path, &self.app_key)
    }
}

// An empty directory means "relative to the working directory".
fn join(dir: &str, file: &str) -> PathBuf {
    if dir.is_empty() {
        PathBuf::from(file)
    } else {
        PathBuf::from(dir).join(file)
    }
}

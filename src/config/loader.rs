//! Configuration loading from the process environment.
//!
//! Loading never fails: absent, empty or malformed values fall back to the
//! defaults declared in [`AppConfig::default`].

use std::str::FromStr;

use crate::config::schema::{env, AppConfig};

/// Load a configuration snapshot from the process environment.
pub fn load_config() -> AppConfig {
    load_config_from(|name| std::env::var(name).ok())
}

/// Load a configuration snapshot using `lookup` to resolve variable names.
///
/// Used by tests to supply an isolated environment.
pub fn load_config_from<F>(lookup: F) -> AppConfig
where
    F: Fn(&str) -> Option<String>,
{
    let defaults = AppConfig::default();

    AppConfig {
        local_port: env_parse(&lookup, env::LOCAL_PORT, defaults.local_port),
        local_protocol: env_string(&lookup, env::LOCAL_PROTOCOL, defaults.local_protocol),
        cert_file: env_string(&lookup, env::CERT_FILE, defaults.cert_file),
        key_file: env_string(&lookup, env::KEY_FILE, defaults.key_file),
        container_name: env_string(&lookup, env::CONTAINER_NAME, defaults.container_name),
        iam_client_id: env_string(&lookup, env::IAM_CLIENT_ID, defaults.iam_client_id),
        iam_client_secret: env_string(&lookup, env::IAM_CLIENT_SECRET, defaults.iam_client_secret),
        iam_base_url: env_string(&lookup, env::IAM_BASE_URL, defaults.iam_base_url),
        ca_cert_file_name: env_string(&lookup, env::CA_CERT_FILE_NAME, defaults.ca_cert_file_name),
        ca_cert_file_path: env_string(&lookup, env::CA_CERT_FILE_PATH, defaults.ca_cert_file_path),
        log_control_file: env_string(&lookup, env::LOG_CTRL_FILE, defaults.log_control_file),
        log_endpoint: env_string(&lookup, env::LOG_ENDPOINT, defaults.log_endpoint),
        app_key: env_string(&lookup, env::APP_KEY, defaults.app_key),
        app_cert: env_string(&lookup, env::APP_CERT, defaults.app_cert),
        app_cert_file_path: env_string(&lookup, env::APP_CERT_FILE_PATH, defaults.app_cert_file_path),
    }
}

fn env_parse<F, T>(lookup: &F, name: &str, default: T) -> T
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    lookup(name)
        .and_then(|value| value.trim().parse().ok())
        .unwrap_or(default)
}

fn env_string<F>(lookup: &F, name: &str, default: String) -> String
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(name) {
        Some(value) if !value.trim().is_empty() => value.trim().to_string(),
        _ => default,
    }
}

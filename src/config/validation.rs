//! Configuration validation.
//!
//! Loading never fails, so validation reports warnings instead of errors:
//! the service still starts, and the operator sees what is degraded.

use std::path::Path;

use crate::config::schema::{AppConfig, Protocol};

/// A semantic problem found in a configuration snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigWarning {
    /// `LOCAL_PROTOCOL` is neither `http` nor `https`.
    UnknownProtocol(String),
    /// `https` was selected but a server certificate file is missing.
    MissingServerCertificate(String),
    /// IAM client id or secret is empty, so logins will be rejected.
    MissingIamCredentials,
    /// A log endpoint is configured but no client certificate material is.
    RemoteLoggingWithoutClientCert,
}

impl std::fmt::Display for ConfigWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigWarning::UnknownProtocol(p) => {
                write!(f, "Unknown protocol '{}', serving plain http", p)
            }
            ConfigWarning::MissingServerCertificate(path) => {
                write!(f, "Server certificate material not found: {}", path)
            }
            ConfigWarning::MissingIamCredentials => {
                write!(f, "IAM client id or secret is empty")
            }
            ConfigWarning::RemoteLoggingWithoutClientCert => {
                write!(f, "Log endpoint set without client certificate, remote logging disabled")
            }
        }
    }
}

/// Validate a snapshot, returning every warning found.
pub fn validate_config(config: &AppConfig) -> Vec<ConfigWarning> {
    let mut warnings = Vec::new();

    if config.local_protocol != "http" && config.local_protocol != "https" {
        warnings.push(ConfigWarning::UnknownProtocol(config.local_protocol.clone()));
    }

    if config.protocol() == Protocol::Https {
        for file in [&config.cert_file, &config.key_file] {
            if !Path::new(file).exists() {
                warnings.push(ConfigWarning::MissingServerCertificate(file.clone()));
            }
        }
    }

    if config.iam_client_id.is_empty() || config.iam_client_secret.is_empty() {
        warnings.push(ConfigWarning::MissingIamCredentials);
    }

    if !config.log_endpoint.is_empty() && (config.app_cert.is_empty() || config.app_key.is_empty()) {
        warnings.push(ConfigWarning::RemoteLoggingWithoutClientCert);
    }

    warnings
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete() -> AppConfig {
        AppConfig {
            iam_client_id: "id".into(),
            iam_client_secret: "secret".into(),
            ..AppConfig::default()
        }
    }

    #[test]
    fn test_complete_config_has_no_warnings() {
        assert!(validate_config(&complete()).is_empty());
    }

    #[test]
    fn test_unknown_protocol() {
        let config = AppConfig {
            local_protocol: "ftp".into(),
            ..complete()
        };
        assert_eq!(
            validate_config(&config),
            vec![ConfigWarning::UnknownProtocol("ftp".into())]
        );
    }

    #[test]
    fn test_https_without_certificates() {
        let config = AppConfig {
            local_protocol: "https".into(),
            cert_file: "/nonexistent/cert.pem".into(),
            key_file: "/nonexistent/key.pem".into(),
            ..complete()
        };
        let warnings = validate_config(&config);
        assert_eq!(warnings.len(), 2);
        assert!(warnings.iter().all(|w| matches!(w, ConfigWarning::MissingServerCertificate(_))));
    }

    #[test]
    fn test_missing_credentials_and_client_cert() {
        let config = AppConfig {
            log_endpoint: "logs.example.com".into(),
            ..AppConfig::default()
        };
        let warnings = validate_config(&config);
        assert!(warnings.contains(&ConfigWarning::MissingIamCredentials));
        assert!(warnings.contains(&ConfigWarning::RemoteLoggingWithoutClientCert));
    }
}

//! Trust configuration built from the fixture CA and client pair.

use hello_rapp::net::tls::{build_mutual_trust_config, build_trust_config, TrustKind};
use rustls::ProtocolVersion;

mod common;

#[test]
fn test_fixtures_build_both_configurations() {
    let config = common::mtls_config("localhost:9000");

    let plain = build_trust_config(&config).expect("plain trust");
    assert_eq!(plain.kind(), TrustKind::Plain);
    assert_eq!(plain.root_count(), 1);
    assert!(!plain.has_client_identity());
    assert_eq!(plain.min_protocol_version(), ProtocolVersion::TLSv1_3);

    let mutual = build_mutual_trust_config(&config).expect("mutual trust");
    assert_eq!(mutual.kind(), TrustKind::Mutual);
    assert!(mutual.has_client_identity());
    assert_eq!(mutual.min_protocol_version(), ProtocolVersion::TLSv1_3);
}

#[test]
fn test_server_certificate_is_not_a_ca_bundle_substitute() {
    let mut config = common::mtls_config("localhost:9000");
    config.ca_cert_file_name = "server-key.pem".into();

    assert!(build_trust_config(&config).is_none());
    assert!(build_mutual_trust_config(&config).is_none());
}

#[test]
fn test_mutual_requires_client_certificate() {
    let mut config = common::mtls_config("localhost:9000");
    config.app_cert = "missing.pem".into();

    assert!(build_trust_config(&config).is_some());
    assert!(build_mutual_trust_config(&config).is_none());
}

#[test]
fn test_unset_directories_resolve_relative_to_cwd() {
    let config = hello_rapp::AppConfig {
        ca_cert_file_name: "no-such-ca.pem".into(),
        ..hello_rapp::AppConfig::default()
    };
    assert!(build_trust_config(&config).is_none());
}

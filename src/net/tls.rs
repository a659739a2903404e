//! TLS configuration and certificate loading.
//!
//! Two concerns live here: the server-side certificate used when the service
//! listens on `https`, and the client-side trust configurations used for
//! outbound calls (plain trust for the identity provider, mutual TLS for the
//! remote log collector).

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use axum_server::tls_rustls::RustlsConfig;
use rustls::client::WantsClientCert;
use rustls::pki_types::{CertificateDer, PrivateKeyDer};
use rustls::{ClientConfig, ConfigBuilder, ProtocolVersion, RootCertStore, SupportedProtocolVersion};
use thiserror::Error;

use crate::config::AppConfig;

/// Protocol versions offered by every outbound trust configuration, lowest first.
static CLIENT_PROTOCOL_VERSIONS: &[&SupportedProtocolVersion] = &[&rustls::version::TLS13];

/// Errors raised while assembling TLS material.
#[derive(Debug, Error)]
pub enum TlsError {
    #[error("failed to read {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("no certificates found in {0:?}")]
    NoCertificates(PathBuf),

    #[error("no private key found in {0:?}")]
    NoPrivateKey(PathBuf),

    #[error("TLS configuration rejected: {0}")]
    Rustls(#[from] rustls::Error),
}

/// Install ring as the process-wide rustls crypto provider.
///
/// More than one provider is compiled in, so rustls cannot pick one on its
/// own. Calling this again after a provider is installed has no effect.
pub fn install_crypto_provider() {
    let _ = rustls::crypto::ring::default_provider().install_default();
}

/// Load TLS configuration from certificate and key files.
pub async fn load_tls_config(cert_path: &Path, key_path: &Path) -> Result<RustlsConfig, std::io::Error> {
    if !cert_path.exists() {
        return Err(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("Certificate file not found: {:?}", cert_path),
        ));
    }
    if !key_path.exists() {
        return Err(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("Private key file not found: {:?}", key_path),
        ));
    }

    install_crypto_provider();
    RustlsConfig::from_pem_file(cert_path, key_path).await
}

/// Which flavour of trust configuration was built.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrustKind {
    /// Server verification only.
    Plain,
    /// Server verification plus a client certificate.
    Mutual,
}

/// A client-side TLS configuration built from the configured CA bundle.
///
/// Peer verification always goes through the webpki verifier against the
/// loaded roots; no configuration built here skips verification.
#[derive(Clone)]
pub struct TrustConfig {
    kind: TrustKind,
    roots: usize,
    client: Arc<ClientConfig>,
}

impl TrustConfig {
    pub fn kind(&self) -> TrustKind {
        self.kind
    }

    /// Number of CA certificates in the root store.
    pub fn root_count(&self) -> usize {
        self.roots
    }

    /// Whether a client certificate is presented during the handshake.
    pub fn has_client_identity(&self) -> bool {
        self.client.client_auth_cert_resolver.has_certs()
    }

    /// Lowest protocol version the configuration will negotiate.
    pub fn min_protocol_version(&self) -> ProtocolVersion {
        CLIENT_PROTOCOL_VERSIONS
            .first()
            .map(|v| v.version)
            .unwrap_or(ProtocolVersion::TLSv1_3)
    }

    /// A reqwest client builder preloaded with this trust configuration.
    pub fn http_client_builder(&self) -> reqwest::ClientBuilder {
        reqwest::Client::builder().use_preconfigured_tls(ClientConfig::clone(&self.client))
    }
}

impl std::fmt::Debug for TrustConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TrustConfig")
            .field("kind", &self.kind)
            .field("roots", &self.roots)
            .field("client_identity", &self.has_client_identity())
            .finish()
    }
}

/// Build the server-trust configuration from the configured CA bundle.
///
/// Returns `None` when the bundle cannot be loaded; callers treat that as
/// "verified outbound TLS unavailable".
pub fn build_trust_config(config: &AppConfig) -> Option<TrustConfig> {
    match try_build_trust_config(config) {
        Ok(trust) => Some(trust),
        Err(e) => {
            tracing::debug!(error = %e, "Trust configuration unavailable");
            None
        }
    }
}

/// Build the mutual-TLS configuration used by the remote log dispatcher.
///
/// Returns `None` if either the CA bundle or the client key pair cannot be
/// loaded; a configuration without its client identity is never returned.
pub fn build_mutual_trust_config(config: &AppConfig) -> Option<TrustConfig> {
    match try_build_mutual_trust_config(config) {
        Ok(trust) => Some(trust),
        Err(e) => {
            tracing::debug!(error = %e, "Mutual trust configuration unavailable");
            None
        }
    }
}

pub fn try_build_trust_config(config: &AppConfig) -> Result<TrustConfig, TlsError> {
    let (builder, roots) = client_builder(&config.ca_cert_path())?;

    Ok(TrustConfig {
        kind: TrustKind::Plain,
        roots,
        client: Arc::new(builder.with_no_client_auth()),
    })
}

pub fn try_build_mutual_trust_config(config: &AppConfig) -> Result<TrustConfig, TlsError> {
    let (builder, roots) = client_builder(&config.ca_cert_path())?;
    let certs = read_certificates(&config.app_cert_path())?;
    let key = read_private_key(&config.app_key_path())?;

    Ok(TrustConfig {
        kind: TrustKind::Mutual,
        roots,
        client: Arc::new(builder.with_client_auth_cert(certs, key)?),
    })
}

fn client_builder(ca_path: &Path) -> Result<(ConfigBuilder<ClientConfig, WantsClientCert>, usize), TlsError> {
    let mut roots = RootCertStore::empty();
    let (added, ignored) = roots.add_parsable_certificates(read_certificates(ca_path)?);
    if added == 0 {
        return Err(TlsError::NoCertificates(ca_path.to_path_buf()));
    }
    if ignored > 0 {
        tracing::warn!(path = ?ca_path, ignored, "Ignored unparsable CA certificates");
    }

    let provider = Arc::new(rustls::crypto::ring::default_provider());
    let builder = ClientConfig::builder_with_provider(provider)
        .with_protocol_versions(CLIENT_PROTOCOL_VERSIONS)?
        .with_root_certificates(roots);

    Ok((builder, added))
}

fn open(path: &Path) -> Result<BufReader<File>, TlsError> {
    File::open(path)
        .map(BufReader::new)
        .map_err(|source| TlsError::Io { path: path.to_path_buf(), source })
}

fn read_certificates(path: &Path) -> Result<Vec<CertificateDer<'static>>, TlsError> {
    let certs = rustls_pemfile::certs(&mut open(path)?)
        .collect::<Result<Vec<_>, _>>()
        .map_err(|source| TlsError::Io { path: path.to_path_buf(), source })?;

    if certs.is_empty() {
        return Err(TlsError::NoCertificates(path.to_path_buf()));
    }
    Ok(certs)
}

fn read_private_key(path: &Path) -> Result<PrivateKeyDer<'static>, TlsError> {
    rustls_pemfile::private_key(&mut open(path)?)
        .map_err(|source| TlsError::Io { path: path.to_path_buf(), source })?
        .ok_or_else(|| TlsError::NoPrivateKey(path.to_path_buf()))
}

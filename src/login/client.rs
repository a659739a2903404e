//! OAuth2 client-credentials login against the identity provider.
//!
//! # Responsibilities
//! - Build the form body for the client-credentials grant
//! - POST it to the token endpoint over verified TLS
//! - Separate HTTP status failures from transport and decoding failures

use reqwest::header::HeaderMap;

use crate::config::AppConfig;
use crate::login::types::{LoginError, LoginResult, Token, LOGIN_PATH, TENANT_ID};
use crate::net::tls::build_trust_config;

/// HTTP client for the identity provider.
#[derive(Debug, Clone)]
pub struct LoginClient {
    http: reqwest::Client,
}

impl LoginClient {
    /// Create a client trusting the configured CA bundle.
    ///
    /// Without a CA bundle the platform's default roots are used.
    pub fn new(config: &AppConfig) -> LoginResult<Self> {
        let builder = match build_trust_config(config) {
            Some(trust) => trust.http_client_builder(),
            None => reqwest::Client::builder(),
        };
        let http = builder.build().map_err(LoginError::Client)?;
        Ok(Self { http })
    }

    /// Run the client-credentials grant and return the token.
    pub async fn login(&self, client_id: &str, client_secret: &str, base_url: &str) -> LoginResult<Token> {
        if client_id.is_empty() || client_secret.is_empty() {
            return Err(LoginError::MissingCredentials);
        }

        let url = format!("{}{}", base_url, LOGIN_PATH);
        let body = self
            .post_form(&url, &form_data(client_id, client_secret), HeaderMap::new())
            .await?;

        Ok(serde_json::from_slice(&body)?)
    }

    /// POST a url-encoded form and return the response body of a 2xx answer.
    pub async fn post_form(
        &self,
        endpoint: &str,
        form: &[(&str, &str)],
        headers: HeaderMap,
    ) -> LoginResult<Vec<u8>> {
        let response = self
            .http
            .post(endpoint)
            .headers(headers)
            .form(form)
            .send()
            .await
            .map_err(LoginError::Transport)?;

        let status = response.status();
        let body = response.bytes().await.map_err(LoginError::Body)?.to_vec();

        if !status.is_success() {
            let status_text = match status.canonical_reason() {
                Some(reason) => format!("{} {}", status.as_u16(), reason),
                None => status.as_u16().to_string(),
            };
            return Err(LoginError::Http {
                status: status.as_u16(),
                status_text,
                body,
            });
        }

        Ok(body)
    }
}

/// Form fields for the client-credentials grant.
pub fn form_data<'a>(client_id: &'a str, client_secret: &'a str) -> [(&'static str, &'a str); 4] {
    [
        ("grant_type", "client_credentials"),
        ("client_id", client_id),
        ("client_secret", client_secret),
        ("tenant_id", TENANT_ID),
    ]
}

/// Log in with the IAM credentials from `config`.
///
/// A fresh client is built per call so trust material follows reloads.
pub async fn login(config: &AppConfig) -> LoginResult<Token> {
    if config.iam_client_id.is_empty() || config.iam_client_secret.is_empty() {
        return Err(LoginError::MissingCredentials);
    }

    LoginClient::new(config)?
        .login(&config.iam_client_id, &config.iam_client_secret, &config.iam_base_url)
        .await
}

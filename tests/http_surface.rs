//! Router-level tests for /hello, /health and /metrics.

use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use hello_rapp::config::ConfigProvider;
use hello_rapp::http::{AppState, HttpServer};
use hello_rapp::{AppConfig, Logger, Severity};
use metrics_exporter_prometheus::PrometheusBuilder;
use tower::ServiceExt;
use wiremock::matchers::method;
use wiremock::{Mock, MockServer, ResponseTemplate};

mod common;
use common::Buffer;

fn server_with(config: AppConfig, buffer: Buffer) -> HttpServer {
    server_and_logger(config, buffer).0
}

fn server_and_logger(config: AppConfig, buffer: Buffer) -> (HttpServer, Logger) {
    let config = Arc::new(config);
    let logger = Logger::init_with_writer(config.clone(), buffer);
    let provider = Arc::new(ConfigProvider::with_source(move || AppConfig::clone(&config)));

    let server = HttpServer::new(AppState {
        config: provider,
        logger: logger.clone(),
        metrics: PrometheusBuilder::new().build_recorder().handle(),
    });
    (server, logger)
}

async fn get(server: &HttpServer, uri: &str) -> (StatusCode, String, Option<String>) {
    let request = Request::builder()
        .uri(uri)
        .header("x-forwarded-for", "10.0.0.7")
        .body(Body::empty())
        .unwrap();
    let response = server.router().oneshot(request).await.unwrap();

    let status = response.status();
    let request_id = response
        .headers()
        .get("x-request-id")
        .map(|v| v.to_str().unwrap().to_string());
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, String::from_utf8(body.to_vec()).unwrap(), request_id)
}

#[tokio::test]
async fn test_health_returns_ok() {
    let server = server_with(AppConfig::default(), Buffer::default());
    let (status, body, _) = get(&server, "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "Ok");
}

#[tokio::test]
async fn test_hello_answers_even_when_login_fails() {
    let buffer = Buffer::default();
    let server = server_with(AppConfig::default(), buffer.clone());

    let (status, body, request_id) = get(&server, "/hello").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "Hello World!!");
    assert!(request_id.is_some_and(|id| !id.is_empty()));

    let output = buffer.contents();
    assert!(output.contains("Request IP: X-Forwarded-For: '10.0.0.7', RemoteAddr: ''"));
    assert!(output.contains("Login Failed. Empty parameters provided for IamClientID or IamClientSecret"));
}

#[tokio::test]
async fn test_hello_logs_login_success_at_debug() {
    let iam = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"accessToken":"t"}"#))
        .expect(1)
        .mount(&iam)
        .await;

    let buffer = Buffer::default();
    let (server, logger) = server_and_logger(
        AppConfig {
            iam_client_id: "hello".into(),
            iam_client_secret: "s3cret".into(),
            iam_base_url: iam.uri(),
            ..AppConfig::default()
        },
        buffer.clone(),
    );
    logger.set_level(Severity::Debug);

    let (status, body, _) = get(&server, "/hello").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "Hello World!!");

    let output = buffer.contents();
    assert!(output.contains("Entering api handler..."));
    assert!(output.contains("Login Success."));
    assert!(output.contains("Leaving api handler..."));
}

#[tokio::test]
async fn test_metrics_endpoint_renders() {
    let server = server_with(AppConfig::default(), Buffer::default());
    let (status, _, _) = get(&server, "/metrics").await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_unknown_route_is_not_found() {
    let server = server_with(AppConfig::default(), Buffer::default());
    let (status, _, _) = get(&server, "/missing").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_https_without_certificate_fails_to_start() {
    let server = server_with(
        AppConfig {
            local_protocol: "https".into(),
            cert_file: "/nonexistent/certificate.pem".into(),
            ..AppConfig::default()
        },
        Buffer::default(),
    );
    let shutdown = hello_rapp::Shutdown::new();

    let err = server
        .run("127.0.0.1:0".parse().unwrap(), shutdown.subscribe())
        .await
        .unwrap_err();
    assert_eq!(err.kind(), std::io::ErrorKind::NotFound);
}

#[tokio::test]
async fn test_server_stops_on_shutdown() {
    let server = server_with(AppConfig::default(), Buffer::default());
    let shutdown = hello_rapp::Shutdown::new();
    let task = tokio::spawn(server.run("127.0.0.1:0".parse().unwrap(), shutdown.subscribe()));

    tokio::time::sleep(std::time::Duration::from_millis(100)).await;
    shutdown.trigger();

    let result = tokio::time::timeout(std::time::Duration::from_secs(5), task)
        .await
        .expect("server did not stop")
        .unwrap();
    assert!(result.is_ok());
}

//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with all handlers
//! - Wire up middleware (tracing, timeout, request ID, status metrics)
//! - Serve plain HTTP or TLS depending on the configured protocol
//! - Stop accepting and drain on shutdown

use axum::{
    body::Body,
    extract::{ConnectInfo, State},
    http::Request,
    middleware::{self, Next},
    response::Response,
    routing::get,
    Router,
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::{ConfigProvider, Protocol};
use crate::http::request::{client_ip_info, MakeRequestUuidV4};
use crate::login;
use crate::net::tls::load_tls_config;
use crate::observability::metrics;
use crate::observability::Logger;

/// Upper bound on a single request, login included.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Time given to open connections after shutdown on the TLS listener.
pub const TLS_DRAIN_TIMEOUT: Duration = Duration::from_secs(10);

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ConfigProvider>,
    pub logger: Logger,
    pub metrics: PrometheusHandle,
}

/// HTTP server for the greeting service.
pub struct HttpServer {
    router: Router,
    state: AppState,
}

impl HttpServer {
    /// Create a new HTTP server around the shared state.
    pub fn new(state: AppState) -> Self {
        let router = Self::build_router(state.clone());
        Self { router, state }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(state: AppState) -> Router {
        Router::new()
            .route("/hello", get(hello_handler))
            .route("/health", get(health_handler))
            .route("/metrics", get(metrics_handler))
            .with_state(state)
            .layer(middleware::from_fn(record_status))
            .layer(TimeoutLayer::new(REQUEST_TIMEOUT))
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuidV4))
            .layer(TraceLayer::new_for_http())
    }

    /// The router, for serving or for driving in tests.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server on `addr` until `shutdown` fires.
    pub async fn run(self, addr: SocketAddr, shutdown: broadcast::Receiver<()>) -> Result<(), std::io::Error> {
        let config = self.state.config.snapshot();
        let app = self.router.into_make_service_with_connect_info::<SocketAddr>();

        match config.protocol() {
            Protocol::Http => {
                let listener = TcpListener::bind(addr).await?;
                tracing::info!(address = %listener.local_addr()?, "HTTP server starting");

                axum::serve(listener, app)
                    .with_graceful_shutdown(wait_for_shutdown(shutdown))
                    .await?;
            }
            Protocol::Https => {
                let tls = load_tls_config(Path::new(&config.cert_file), Path::new(&config.key_file)).await?;
                tracing::info!(address = %addr, "HTTPS server starting");

                let handle = axum_server::Handle::new();
                let drain = handle.clone();
                tokio::spawn(async move {
                    wait_for_shutdown(shutdown).await;
                    drain.graceful_shutdown(Some(TLS_DRAIN_TIMEOUT));
                });

                axum_server::bind_rustls(addr, tls)
                    .handle(handle)
                    .serve(app)
                    .await?;
            }
        }

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Greeting handler. Logs in against the identity provider on every call;
/// a failed login is logged and never changes the response.
async fn hello_handler(State(state): State<AppState>, request: Request<Body>) -> &'static str {
    let logger = &state.logger;
    logger.debug("Entering api handler...");

    let remote_addr = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.to_string())
        .unwrap_or_default();
    logger.info(&format!("Request IP: {}", client_ip_info(request.headers(), &remote_addr)));

    metrics::record_request();

    let config = state.config.snapshot();
    match login::login(&config).await {
        Ok(_) => logger.debug("Login Success."),
        Err(e) => {
            metrics::record_request_failure();
            logger.error(&format!("Login Failed. {}", e));
        }
    }

    logger.debug("Leaving api handler...");
    "Hello World!!"
}

async fn health_handler() -> &'static str {
    "Ok"
}

async fn metrics_handler(State(state): State<AppState>) -> String {
    state.metrics.render()
}

async fn record_status(request: Request<Body>, next: Next) -> Response {
    let response = next.run(request).await;
    metrics::record_http_response(response.status().as_u16());
    response
}

async fn wait_for_shutdown(mut shutdown: broadcast::Receiver<()>) {
    let _ = shutdown.recv().await;
    tracing::info!("Shutdown signal received");
}

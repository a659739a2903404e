//! Hello World rApp (v1)
//!
//! A demonstration service built with Tokio and Axum.
//!
//! # Architecture Overview
//!
//! ```text
//!                        ┌──────────────────────────────────────────────────┐
//!                        │                  HELLO WORLD RAPP                 │
//!                        │                                                   │
//!     GET /hello         │  ┌─────────┐    ┌─────────┐    ┌──────────────┐  │
//!     ───────────────────┼─▶│  http   │───▶│ handler │───▶│    login     │──┼──▶ Identity
//!                        │  │ server  │    │         │    │ (plain TLS)  │  │    Provider
//!                        │  └─────────┘    └────┬────┘    └──────────────┘  │
//!                        │                      │                           │
//!                        │                      ▼                           │
//!                        │               ┌──────────────┐  ┌────────────┐   │
//!                        │               │    logger    │─▶│  dispatch  │───┼──▶ Remote Log
//!                        │               │ (threshold)  │  │ (mTLS, 1×) │   │    Collector
//!                        │               └──────────────┘  └────────────┘   │
//!                        │                                                   │
//!                        │  ┌─────────────────────────────────────────────┐ │
//!                        │  │            Cross-Cutting Concerns            │ │
//!                        │  │  config (env, ArcSwap) · net::tls · metrics  │ │
//!                        │  │  lifecycle (signals, reload, shutdown)       │ │
//!                        │  └─────────────────────────────────────────────┘ │
//!                        └──────────────────────────────────────────────────┘
//! ```

use std::net::SocketAddr;
use std::sync::Arc;

use hello_rapp::config::ConfigProvider;
use hello_rapp::http::{AppState, HttpServer};
use hello_rapp::lifecycle::{reload, startup, Shutdown, SignalEvent, Signals};
use hello_rapp::observability::{metrics, Logger};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    startup::init_tracing();
    hello_rapp::net::tls::install_crypto_provider();

    tracing::info!("hello-rapp v{} starting", env!("CARGO_PKG_VERSION"));

    let provider = Arc::new(ConfigProvider::from_env());
    let config = provider.snapshot();

    tracing::info!(
        port = config.local_port,
        protocol = %config.local_protocol,
        container = %config.container_name,
        "Configuration loaded"
    );
    startup::report_config_warnings(&config);

    let metrics_handle = metrics::init_metrics()?;

    let logger = Logger::init(config.clone());
    logger.info("Hello World Sample App");

    let shutdown = Shutdown::new();
    let mut signals = Signals::register()?;

    let _control_watcher =
        reload::watch_log_control(provider.clone(), logger.clone(), shutdown.subscribe());

    let server = HttpServer::new(AppState {
        config: provider.clone(),
        logger: logger.clone(),
        metrics: metrics_handle,
    });
    let addr = SocketAddr::from(([0, 0, 0, 0], config.local_port));
    let mut server_task = tokio::spawn(server.run(addr, shutdown.subscribe()));

    logger.info("Server is ready to receive web requests");

    loop {
        tokio::select! {
            event = signals.recv() => match event {
                SignalEvent::Reload => reload::reload(&provider, &logger),
                SignalEvent::Shutdown => break,
            },
            result = &mut server_task => {
                // The listener stopped on its own: bind or TLS failure.
                if let Ok(Err(e)) = &result {
                    logger.error(&e.to_string());
                }
                result??;
                return Ok(());
            }
        }
    }

    logger.info("Terminating Hello World");
    shutdown.trigger();
    server_task.await??;

    tracing::info!("Shutdown complete");
    Ok(())
}

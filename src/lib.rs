//! Hello World rApp service library.

pub mod config;
pub mod http;
pub mod net;
pub mod lifecycle;
pub mod login;
pub mod observability;

pub use config::{AppConfig, ConfigProvider};
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use observability::{Logger, Severity};

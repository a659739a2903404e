//! Shared, atomically reloadable configuration snapshot.

use std::sync::Arc;

use arc_swap::ArcSwap;

use crate::config::loader::load_config;
use crate::config::schema::AppConfig;

type Source = dyn Fn() -> AppConfig + Send + Sync;

/// Holds the current [`AppConfig`] snapshot.
///
/// Readers take an `Arc` to the snapshot and keep it for as long as they
/// need; [`ConfigProvider::reload`] swaps in a freshly loaded snapshot
/// without touching the one they hold.
pub struct ConfigProvider {
    current: ArcSwap<AppConfig>,
    source: Box<Source>,
}

impl ConfigProvider {
    /// Create a provider backed by the process environment.
    pub fn from_env() -> Self {
        Self::with_source(load_config)
    }

    /// Create a provider that loads snapshots from `source`.
    pub fn with_source<F>(source: F) -> Self
    where
        F: Fn() -> AppConfig + Send + Sync + 'static,
    {
        let initial = source();
        Self {
            current: ArcSwap::from_pointee(initial),
            source: Box::new(source),
        }
    }

    /// Current snapshot.
    pub fn snapshot(&self) -> Arc<AppConfig> {
        self.current.load_full()
    }

    /// Re-read the source and replace the current snapshot.
    pub fn reload(&self) {
        let next = (self.source)();
        self.current.store(Arc::new(next));
        tracing::info!("Configuration reloaded");
    }
}

impl std::fmt::Debug for ConfigProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConfigProvider")
            .field("current", &self.snapshot())
            .finish_non_exhaustive()
    }
}

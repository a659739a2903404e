//! Configuration and logger reload.
//!
//! Two triggers re-initialize the logger: SIGHUP (which also re-reads the
//! environment) and a change to the log-control file.

use std::path::Path;
use std::sync::Arc;

use notify::RecommendedWatcher;
use tokio::sync::broadcast;

use crate::config::watcher::LogControlWatcher;
use crate::config::ConfigProvider;
use crate::observability::Logger;

/// Re-read the environment and re-initialize the logger from the new snapshot.
pub fn reload(provider: &ConfigProvider, logger: &Logger) {
    provider.reload();
    logger.reinit(provider.snapshot());
    logger.info("Configuration and logger reloaded");
}

/// Re-initialize `logger` whenever the configured log-control file changes.
///
/// Returns the watcher handle, which must be kept alive, or `None` when no
/// control file is configured or it cannot be watched.
pub fn watch_log_control(
    provider: Arc<ConfigProvider>,
    logger: Logger,
    mut shutdown: broadcast::Receiver<()>,
) -> Option<RecommendedWatcher> {
    let path = provider.snapshot().log_control_file.clone();
    if path.is_empty() {
        return None;
    }

    let (watcher, mut changes) = LogControlWatcher::new(Path::new(&path));
    let handle = match watcher.run() {
        Ok(handle) => handle,
        Err(e) => {
            logger.warning(&format!("Could not watch log control file {}: {}", path, e));
            return None;
        }
    };

    tokio::spawn(async move {
        loop {
            tokio::select! {
                change = changes.recv() => {
                    if change.is_none() {
                        break;
                    }
                    logger.reinit(provider.snapshot());
                    logger.debug("Logger re-initialized from log control file");
                }
                _ = shutdown.recv() => break,
            }
        }
    });

    Some(handle)
}

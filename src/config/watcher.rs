//! Log-control file watcher for hot reload.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::time::Duration;
use notify::{Watcher, RecursiveMode, Event, RecommendedWatcher, Config};
use tokio::sync::mpsc;

/// Entry that Kubernetes volume updates swap instead of touching the file.
const ATOMIC_DATA_LINK: &str = "..data";

/// A watcher that monitors the log-control file for changes.
///
/// The parent directory is watched rather than the file, so a file that is
/// replaced by rename or symlink swap keeps being tracked.
pub struct LogControlWatcher {
    path: PathBuf,
    change_tx: mpsc::UnboundedSender<()>,
}

impl LogControlWatcher {
    /// Create a new LogControlWatcher.
    ///
    /// Returns the watcher and a receiver that yields one message per change.
    pub fn new(path: &Path) -> (Self, mpsc::UnboundedReceiver<()>) {
        let (change_tx, change_rx) = mpsc::unbounded_channel();

        (Self {
            path: path.to_path_buf(),
            change_tx,
        }, change_rx)
    }

    /// Start watching the file in a background thread.
    ///
    /// The returned handle must be kept alive for as long as events are wanted.
    pub fn run(self) -> Result<RecommendedWatcher, notify::Error> {
        let tx = self.change_tx.clone();
        let file_name = self
            .path
            .file_name()
            .map(|name| name.to_os_string())
            .ok_or_else(|| notify::Error::path_not_found().add_path(self.path.clone()))?;
        let directory = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };

        let mut watcher = RecommendedWatcher::new(move |res: notify::Result<Event>| {
            match res {
                Ok(event) => {
                    let changed = event.kind.is_modify() || event.kind.is_create();
                    if changed && touches(&event, &file_name) {
                        tracing::info!("Log control file change detected");
                        let _ = tx.send(());
                    }
                }
                Err(e) => tracing::error!("Watch error: {:?}", e),
            }
        }, Config::default().with_poll_interval(Duration::from_secs(2)))?;

        watcher.watch(&directory, RecursiveMode::NonRecursive)?;

        tracing::info!(path = ?self.path, "Log control watcher started");
        Ok(watcher)
    }
}

fn touches(event: &Event, file_name: &OsString) -> bool {
    event.paths.iter().any(|path| match path.file_name() {
        Some(name) => name == file_name.as_os_str() || name == ATOMIC_DATA_LINK,
        None => false,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn next_change(rx: &mut mpsc::UnboundedReceiver<()>) -> bool {
        matches!(tokio::time::timeout(Duration::from_secs(5), rx.recv()).await, Ok(Some(())))
    }

    fn drain(rx: &mut mpsc::UnboundedReceiver<()>) {
        while rx.try_recv().is_ok() {}
    }

    #[test]
    fn test_missing_directory_cannot_be_watched() {
        let (watcher, _rx) = LogControlWatcher::new(Path::new("/nonexistent/logcontrol.json"));
        assert!(watcher.run().is_err());
    }

    #[tokio::test]
    async fn test_modification_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("logcontrol.json");
        std::fs::write(&path, "[]").unwrap();

        let (watcher, mut rx) = LogControlWatcher::new(&path);
        let _handle = watcher.run().unwrap();

        std::fs::write(&path, r#"[{"severity":"debug","container":"x"}]"#).unwrap();

        assert!(next_change(&mut rx).await);
    }

    #[tokio::test]
    async fn test_changes_after_replacement_are_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("logcontrol.json");
        std::fs::write(&path, "[]").unwrap();

        let (watcher, mut rx) = LogControlWatcher::new(&path);
        let _handle = watcher.run().unwrap();

        let staged = dir.path().join("logcontrol.json.tmp");
        std::fs::write(&staged, r#"[{"severity":"debug","container":"x"}]"#).unwrap();
        std::fs::rename(&staged, &path).unwrap();
        assert!(next_change(&mut rx).await);

        tokio::time::sleep(Duration::from_millis(100)).await;
        drain(&mut rx);

        std::fs::write(&path, r#"[{"severity":"error","container":"x"}]"#).unwrap();
        assert!(next_change(&mut rx).await);
    }

    #[tokio::test]
    async fn test_unrelated_files_are_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("logcontrol.json");
        std::fs::write(&path, "[]").unwrap();

        let (watcher, mut rx) = LogControlWatcher::new(&path);
        let _handle = watcher.run().unwrap();

        std::fs::write(dir.path().join("other.json"), "{}").unwrap();
        tokio::time::sleep(Duration::from_millis(300)).await;

        assert!(rx.try_recv().is_err());
    }
}

//! Per-container log level control file.
//!
//! The file is a JSON array of `{"severity": ..., "container": ...}`
//! objects. Only the first entry naming the current container is used.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::observability::logging::Severity;

/// One entry of the log-control file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LogControl {
    #[serde(default)]
    pub severity: String,
    #[serde(default)]
    pub container: String,
}

/// Errors reading the log-control file.
#[derive(Debug, Error)]
pub enum ControlFileError {
    #[error("could not read log control file {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("could not parse log control file: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Read and parse the log-control file at `path`.
pub fn read_log_controls(path: &Path) -> Result<Vec<LogControl>, ControlFileError> {
    let data = std::fs::read(path).map_err(|source| ControlFileError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(serde_json::from_slice(&data)?)
}

/// Severity selected for `container`, if any.
///
/// Scanning stops at the first entry for the container; an unrecognised
/// label on that entry selects nothing.
pub fn threshold_for(controls: &[LogControl], container: &str) -> Option<Severity> {
    controls
        .iter()
        .find(|c| c.container == container)
        .and_then(|c| Severity::from_control_label(&c.severity))
}

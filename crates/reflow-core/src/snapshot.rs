//! Diagnostic JSON snapshots of intermediate stage outputs.
//!
//! When a snapshot directory is configured, the pipeline serializes the
//! output of each post-segmentation stage as pretty-printed JSON for
//! inspection. This is debugging tooling, not part of the functional
//! contract; snapshots are disabled by default.

use crate::error::{ReflowError, Result};
use serde::Serialize;
use std::fs;
use std::path::PathBuf;

/// Writes named JSON snapshots into a fixed directory.
#[derive(Debug, Clone)]
pub struct SnapshotWriter {
    dir: PathBuf,
}

impl SnapshotWriter {
    /// Create a writer rooted at `dir`; the directory is created lazily on
    /// the first write.
    #[inline]
    #[must_use = "returns a writer rooted at the given directory"]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Serialize `value` to `<dir>/<name>.json`.
    ///
    /// # Errors
    ///
    /// Returns [`ReflowError::Snapshot`] when serialization fails and
    /// [`ReflowError::Io`] when the directory or file cannot be written.
    pub fn write<T: Serialize>(&self, name: &str, value: &T) -> Result<()> {
        fs::create_dir_all(&self.dir)?;
        let path = self.dir.join(format!("{name}.json"));
        let json = serde_json::to_string_pretty(value).map_err(|source| ReflowError::Snapshot {
            path: path.clone(),
            source,
        })?;
        fs::write(&path, json)?;
        log::debug!("wrote snapshot {}", path.display());
        Ok(())
    }
}

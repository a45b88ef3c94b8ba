//! Snapshot-file adapter source.
//!
//! Reads a JSON array of [`RawAdapter`] records, letting the probe replay
//! data captured on another host or run on targets without native
//! enumeration.

use std::path::{Path, PathBuf};

use super::{AdapterFetcher, FetchError, RawAdapter};

/// [`AdapterFetcher`] backed by a JSON snapshot file.
#[derive(Debug, Clone)]
pub struct SnapshotFetcher {
    path: PathBuf,
}

impl SnapshotFetcher {
    /// Creates a fetcher reading from the given path.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the path of the snapshot file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Decodes a snapshot document.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::SnapshotParse`] if the content is not a JSON
    /// array of adapter records.
    pub fn parse(path: &Path, content: &str) -> Result<Vec<RawAdapter>, FetchError> {
        serde_json::from_str(content).map_err(|source| FetchError::SnapshotParse {
            path: path.to_path_buf(),
            source,
        })
    }
}

impl AdapterFetcher for SnapshotFetcher {
    fn fetch(&self) -> Result<Vec<RawAdapter>, FetchError> {
        let content = std::fs::read_to_string(&self.path).map_err(|source| FetchError::Io {
            context: format!("Failed to read snapshot '{}'", self.path.display()),
            source,
        })?;

        Self::parse(&self.path, &content)
    }
}

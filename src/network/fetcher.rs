//! Adapter fetching trait and error types.

use std::path::PathBuf;

use super::RawAdapter;
use thiserror::Error;

/// Error type for adapter enumeration.
///
/// Every variant is fatal for a discovery run: the probe exits before any
/// document is produced.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Windows API call failed.
    #[cfg(windows)]
    #[error("Windows API error: {0}")]
    WindowsApi(#[from] windows::core::Error),

    /// An operating system call failed.
    #[error("{context}: {source}")]
    Io {
        /// What was being attempted.
        context: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// A snapshot file could not be decoded.
    #[error("Failed to parse snapshot '{}': {source}", path.display())]
    SnapshotParse {
        /// Path to the snapshot file.
        path: PathBuf,
        /// Underlying JSON error.
        #[source]
        source: serde_json::Error,
    },

    /// Platform-specific error with a generic message.
    #[error("Platform error: {message}")]
    Platform {
        /// Error message describing the platform-specific failure.
        message: String,
    },

    /// No native enumeration exists for this target.
    #[error("Adapter enumeration is not supported on this platform; use --snapshot")]
    Unsupported,
}

/// Trait for fetching raw network adapter records.
///
/// # Implementation Notes
///
/// - Implementations return ALL adapters, including ones that are down;
///   the report builder owns the skip rules
/// - Adapter order and address order within each adapter must be the
///   platform's discovery order
pub trait AdapterFetcher {
    /// Fetches the current state of all network adapters.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError`] when the platform call fails, a snapshot cannot
    /// be read, or the target has no native enumeration.
    fn fetch(&self) -> Result<Vec<RawAdapter>, FetchError>;
}

impl<T: AdapterFetcher + ?Sized> AdapterFetcher for Box<T> {
    fn fetch(&self) -> Result<Vec<RawAdapter>, FetchError> {
        self.as_ref().fetch()
    }
}

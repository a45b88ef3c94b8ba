//! Rendering and writing the discovery document.
//!
//! The document is serialized completely in memory before anything reaches
//! the sink, so a failed run never leaves partial JSON behind.

use std::io::Write;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::discovery::DiscoveryReport;

/// Error type for output operations.
#[derive(Debug, Error)]
pub enum OutputError {
    /// Failed to serialize the report.
    #[error("Failed to serialize report: {0}")]
    Serialize(#[source] serde_json::Error),

    /// Failed to write the document.
    #[error("Failed to write {target}: {source}")]
    Write {
        /// Human-readable sink description.
        target: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}

/// Where the document goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Sink {
    /// Standard output.
    Stdout,
    /// A file, replaced atomically.
    File(PathBuf),
}

impl Sink {
    /// Builds a sink from an optional output path.
    #[must_use]
    pub fn from_path(path: Option<&Path>) -> Self {
        path.map_or(Self::Stdout, |p| Self::File(p.to_path_buf()))
    }

    fn describe(&self) -> String {
        match self {
            Self::Stdout => "stdout".to_string(),
            Self::File(path) => format!("'{}'", path.display()),
        }
    }
}

/// Serializes the report. `pretty` selects indented output.
///
/// # Errors
///
/// Returns [`OutputError::Serialize`] if serialization fails.
pub fn render(report: &DiscoveryReport, pretty: bool) -> Result<String, OutputError> {
    let text = if pretty {
        serde_json::to_string_pretty(report)
    } else {
        serde_json::to_string(report)
    };
    text.map_err(OutputError::Serialize)
}

/// Writes a rendered document, followed by a newline, to the sink.
///
/// File sinks use write-to-temp-then-rename:
/// 1. Write to `{path}.tmp`
/// 2. Rename `{path}.tmp` to `{path}`
///
/// # Errors
///
/// Returns [`OutputError::Write`] if any write fails.
pub fn write_document(sink: &Sink, document: &str) -> Result<(), OutputError> {
    let fail = |source| OutputError::Write {
        target: sink.describe(),
        source,
    };

    match sink {
        Sink::Stdout => {
            let mut out = std::io::stdout().lock();
            writeln!(out, "{document}").map_err(fail)?;
            out.flush().map_err(fail)
        }
        Sink::File(path) => write_atomic(path, document).map_err(fail),
    }
}

fn write_atomic(path: &Path, document: &str) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    // report.json -> report.json.tmp, not report.tmp
    let temp_path = PathBuf::from(format!("{}.tmp", path.display()));
    std::fs::write(&temp_path, format!("{document}\n"))?;
    std::fs::rename(&temp_path, path).inspect_err(|_| {
        let _ = std::fs::remove_file(&temp_path);
    })
}

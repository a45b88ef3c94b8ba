//! Error types for address resolution and report building.

use std::net::AddrParseError;

use thiserror::Error;

use super::EntryError;

/// A raw address record that cannot be trusted.
///
/// Always fatal for the run: a malformed record means the data source is
/// unreliable, so no document is produced.
#[derive(Debug, Error)]
pub enum ResolveError {
    /// The address text is not an IP literal.
    #[error("Could not parse address '{literal}': {source}")]
    MalformedAddress {
        /// The raw literal.
        literal: String,
        /// Parser error.
        #[source]
        source: AddrParseError,
    },

    /// The mask text is not an IP literal.
    #[error("Could not parse mask '{mask}' of address '{address}': {source}")]
    MalformedMask {
        /// The address the mask belongs to.
        address: String,
        /// The raw mask literal.
        mask: String,
        /// Parser error.
        #[source]
        source: AddrParseError,
    },

    /// The resolved values violate an entry invariant.
    #[error("Invalid entry for '{literal}': {source}")]
    InvalidEntry {
        /// The raw literal.
        literal: String,
        /// The violated invariant.
        #[source]
        source: EntryError,
    },
}

/// Error type for report generation.
#[derive(Debug, Error)]
pub enum ReportError {
    /// An adapter carried a malformed address record.
    #[error("Adapter '{adapter}': {source}")]
    Resolve {
        /// Friendly name of the adapter.
        adapter: String,
        /// The resolver failure.
        #[source]
        source: ResolveError,
    },
}

impl ReportError {
    /// Friendly name of the adapter that failed.
    #[must_use]
    pub fn adapter(&self) -> &str {
        match self {
            Self::Resolve { adapter, .. } => adapter,
        }
    }
}

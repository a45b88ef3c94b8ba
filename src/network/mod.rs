//! Network layer: raw adapter records and the sources that produce them.
//!
//! This module provides types and traits for:
//! - Representing raw adapter records ([`RawAdapter`], [`RawUnicastAddress`])
//! - Adapter state and type classification ([`OperState`], [`AdapterKind`])
//! - Fetching adapter information ([`AdapterFetcher`])
//! - Replaying captured data ([`SnapshotFetcher`])
//! - Name-based filtering ([`filter`])
//! - Platform-specific implementations ([`platform`])

mod adapter;
mod fetcher;
pub mod filter;
pub mod platform;
mod snapshot;


pub use adapter::{AdapterKind, OperState, RawAdapter, RawUnicastAddress};
pub use fetcher::{AdapterFetcher, FetchError};
pub use snapshot::SnapshotFetcher;

//! Address normalization and the discovery document.
//!
//! Takes the raw adapter list produced by a [`crate::network::AdapterFetcher`]
//! and turns it into a [`DiscoveryReport`]:
//! - [`prefix_and_broadcast`]: prefix length and broadcast from a mask
//! - [`classify_v6`]: IPv6 scope labels
//! - [`Resolver`]: per-address policy for missing or mismatched masks
//! - [`ReportBuilder`]: adapter filtering and document assembly
//!
//! Nothing in this module performs I/O or logging. Build events are
//! delivered to a [`ReportObserver`].

mod entry;
mod error;
mod mask;
mod observer;
mod report;
mod resolver;
mod scope;

pub use entry::{AddressEntry, EntryError, Qualifier, split_zone};
pub use error::{ReportError, ResolveError};
pub use mask::{LengthMismatch, NON_COMPUTABLE_PREFIX, Subnet, mask_from_prefix, prefix_and_broadcast};
pub use observer::{NoopObserver, ReportObserver};
pub use report::{
    AdapterBlock, AdapterMap, DESCRIPTION, DISCOVER_TYPE, DiscoveryReport, ReportBuilder, SOURCE,
    format_hardware_address,
};
pub use resolver::{
    DEFAULT_PREFIX, LOOPBACK_NO_MASK_PREFIX, NO_MASK_PREFIX, Resolution, ResolutionPath, Resolver,
};
pub use scope::{Scope, classify_v6};

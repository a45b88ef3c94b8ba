//! Hooks for watching a report being built.
//!
//! The builder reports progress through [`ReportObserver`] instead of
//! logging, so the discovery core stays free of global logging state.

use crate::network::RawAdapter;

use super::{AddressEntry, ResolutionPath};

/// Receives report-building events. Every method defaults to a no-op.
pub trait ReportObserver {
    /// The adapter was left out because it is not operationally up.
    fn adapter_skipped(&self, adapter: &RawAdapter) {
        let _ = adapter;
    }

    /// The adapter was added to the report with `address_count` entries.
    fn adapter_included(&self, adapter: &RawAdapter, address_count: usize) {
        let _ = (adapter, address_count);
    }

    /// One address was normalized. `path` tells which resolver branch
    /// produced it; anything other than `Computed` is a fallback.
    fn address_resolved(&self, adapter: &RawAdapter, entry: &AddressEntry, path: ResolutionPath) {
        let _ = (adapter, entry, path);
    }

    /// A second adapter with an already-used friendly name replaced the
    /// earlier block.
    fn duplicate_adapter(&self, friendly_name: &str) {
        let _ = friendly_name;
    }
}

impl<T: ReportObserver + ?Sized> ReportObserver for &T {
    fn adapter_skipped(&self, adapter: &RawAdapter) {
        (**self).adapter_skipped(adapter);
    }

    fn adapter_included(&self, adapter: &RawAdapter, address_count: usize) {
        (**self).adapter_included(adapter, address_count);
    }

    fn address_resolved(&self, adapter: &RawAdapter, entry: &AddressEntry, path: ResolutionPath) {
        (**self).address_resolved(adapter, entry, path);
    }

    fn duplicate_adapter(&self, friendly_name: &str) {
        (**self).duplicate_adapter(friendly_name);
    }
}

/// Observer that ignores every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl ReportObserver for NoopObserver {}

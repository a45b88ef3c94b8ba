//! Adapter filtering by name.
//!
//! # Design
//!
//! - **Pure Matcher**: [`NameRegexFilter`] only answers "does this adapter
//!   match?" without include/exclude semantics.
//! - **Filter Chain**: [`FilterChain`] combines matchers:
//!   - Exclude filters: AND logic (must pass ALL excludes)
//!   - Include filters: OR logic (pass ANY include, empty = match all)
//! - **Decorator**: [`FilteredFetcher`] applies filtering transparently
//!   to any [`AdapterFetcher`] implementation.
//!
//! Filtering happens before the report builder sees the adapters, so the
//! builder's own skip rule (down adapters) is unaffected.

use regex::Regex;

use super::{AdapterFetcher, FetchError, RawAdapter};

/// Trait for filtering network adapters.
pub trait AdapterFilter {
    /// Returns `true` if the adapter matches this filter.
    fn matches(&self, adapter: &RawAdapter) -> bool;
}

/// Filter chain with include/exclude semantics.
///
/// Evaluation order:
/// 1. **Exclude filters (AND)**: Any match → reject.
/// 2. **Include filters (OR)**: Any match → accept. Empty includes = match all.
///
/// # Examples
///
/// ```
/// use netconfig::network::filter::{AdapterFilter, FilterChain, NameRegexFilter};
/// use netconfig::network::{AdapterKind, OperState, RawAdapter};
///
/// let chain = FilterChain::new()
///     .exclude(NameRegexFilter::new(r"^vEthernet").unwrap())
///     .include(NameRegexFilter::new(r"^(Ethernet|vEthernet)").unwrap());
///
/// let eth = RawAdapter::new("{1}", "Ethernet", AdapterKind::Ethernet, OperState::Up);
/// let hyperv = RawAdapter::new("{2}", "vEthernet (WSL)", AdapterKind::Virtual, OperState::Up);
/// let wifi = RawAdapter::new("{3}", "Wi-Fi", AdapterKind::Wireless, OperState::Up);
///
/// assert!(chain.matches(&eth));
/// assert!(!chain.matches(&hyperv)); // Excluded
/// assert!(!chain.matches(&wifi));   // Not included
/// ```
#[derive(Default)]
pub struct FilterChain {
    includes: Vec<Box<dyn AdapterFilter>>,
    excludes: Vec<Box<dyn AdapterFilter>>,
}

impl FilterChain {
    /// Creates an empty filter chain (matches all adapters).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an include filter (OR semantics).
    #[must_use]
    pub fn include<F: AdapterFilter + 'static>(mut self, filter: F) -> Self {
        self.includes.push(Box::new(filter));
        self
    }

    /// Adds an exclude filter (any match rejects).
    #[must_use]
    pub fn exclude<F: AdapterFilter + 'static>(mut self, filter: F) -> Self {
        self.excludes.push(Box::new(filter));
        self
    }

    /// Returns the number of include filters.
    #[must_use]
    pub fn include_count(&self) -> usize {
        self.includes.len()
    }

    /// Returns the number of exclude filters.
    #[must_use]
    pub fn exclude_count(&self) -> usize {
        self.excludes.len()
    }

    /// Returns true if no filters are configured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.includes.is_empty() && self.excludes.is_empty()
    }
}

impl AdapterFilter for FilterChain {
    fn matches(&self, adapter: &RawAdapter) -> bool {
        if self.excludes.iter().any(|f| f.matches(adapter)) {
            return false;
        }

        self.includes.is_empty() || self.includes.iter().any(|f| f.matches(adapter))
    }
}

impl std::fmt::Debug for FilterChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FilterChain")
            .field("include_count", &self.includes.len())
            .field("exclude_count", &self.excludes.len())
            .finish()
    }
}

/// Matches adapters whose friendly name matches a regex.
#[derive(Debug)]
pub struct NameRegexFilter {
    pattern: Regex,
}

impl NameRegexFilter {
    /// Creates a name filter with the given regex pattern.
    ///
    /// # Errors
    ///
    /// Returns an error if the regex pattern is invalid.
    pub fn new(pattern: &str) -> Result<Self, regex::Error> {
        Ok(Self {
            pattern: Regex::new(pattern)?,
        })
    }

    /// Returns a reference to the regex pattern.
    #[must_use]
    #[allow(clippy::missing_const_for_fn)] // Regex is not a const type
    pub fn pattern(&self) -> &Regex {
        &self.pattern
    }
}

impl AdapterFilter for NameRegexFilter {
    fn matches(&self, adapter: &RawAdapter) -> bool {
        self.pattern.is_match(&adapter.friendly_name)
    }
}

/// A fetcher decorator that applies a filter to results.
#[derive(Debug)]
pub struct FilteredFetcher<F, A> {
    inner: F,
    filter: A,
}

impl<F, A> FilteredFetcher<F, A> {
    /// Creates a new filtered fetcher.
    #[must_use]
    pub const fn new(inner: F, filter: A) -> Self {
        Self { inner, filter }
    }

    /// Returns a reference to the inner fetcher.
    pub const fn inner(&self) -> &F {
        &self.inner
    }

    /// Returns a reference to the filter.
    pub const fn filter(&self) -> &A {
        &self.filter
    }
}

impl<F: AdapterFetcher, A: AdapterFilter> AdapterFetcher for FilteredFetcher<F, A> {
    fn fetch(&self) -> Result<Vec<RawAdapter>, FetchError> {
        let adapters = self.inner.fetch()?;
        Ok(adapters
            .into_iter()
            .filter(|adapter| self.filter.matches(adapter))
            .collect())
    }
}

impl<T: AdapterFilter + ?Sized> AdapterFilter for &T {
    fn matches(&self, adapter: &RawAdapter) -> bool {
        (*self).matches(adapter)
    }
}

impl AdapterFilter for Box<dyn AdapterFilter> {
    fn matches(&self, adapter: &RawAdapter) -> bool {
        self.as_ref().matches(adapter)
    }
}

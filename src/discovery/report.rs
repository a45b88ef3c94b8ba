//! The discovery document and the builder that assembles it.

use std::fmt;
use std::marker::PhantomData;

use serde::de::{self, MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::network::RawAdapter;

use super::{AddressEntry, NoopObserver, ReportError, ReportObserver, Resolver};

/// Value of the `discovertype` field.
pub const DISCOVER_TYPE: &str = "netconfig";

/// Value of the `description` field.
pub const DESCRIPTION: &str = "IP Network Configuration";

/// Value of the `source` field.
pub const SOURCE: &str = "netconfig";

/// Renders a hardware address as six colon-separated uppercase hex pairs.
///
/// Shorter inputs are zero-padded, longer inputs truncated.
///
/// ```
/// use netconfig::discovery::format_hardware_address;
///
/// assert_eq!(format_hardware_address(&[0, 0x1b, 0x21, 0xa, 0xb, 0xc]), "00:1B:21:0A:0B:0C");
/// assert_eq!(format_hardware_address(&[]), "00:00:00:00:00:00");
/// ```
#[must_use]
pub fn format_hardware_address(bytes: &[u8]) -> String {
    (0..6)
        .map(|i| format!("{:02X}", bytes.get(i).copied().unwrap_or(0)))
        .collect::<Vec<_>>()
        .join(":")
}

/// One adapter's block in the `data` object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdapterBlock {
    /// Hardware address, `AA:BB:CC:DD:EE:FF`.
    pub address: String,
    /// MTU in bytes.
    pub mtu: u32,
    /// Always `UP` for adapters present in the document.
    pub operstate: String,
    /// Normalized addresses in enumeration order.
    #[serde(
        serialize_with = "serialize_entries",
        deserialize_with = "deserialize_entries"
    )]
    pub ipaddrs: Vec<AddressEntry>,
}

impl AdapterBlock {
    /// Finds the entry with the given document key.
    #[must_use]
    pub fn entry(&self, key: &str) -> Option<&AddressEntry> {
        self.ipaddrs.iter().find(|e| e.key() == key)
    }
}

/// Adapter blocks keyed by friendly name, in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AdapterMap {
    entries: Vec<(String, AdapterBlock)>,
}

impl AdapterMap {
    /// Creates an empty map.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Inserts a block. An existing key keeps its position and gets the new
    /// content; returns true in that case.
    pub fn insert(&mut self, name: impl Into<String>, block: AdapterBlock) -> bool {
        let name = name.into();
        if let Some((_, existing)) = self.entries.iter_mut().find(|(n, _)| *n == name) {
            *existing = block;
            true
        } else {
            self.entries.push((name, block));
            false
        }
    }

    /// Looks up a block by friendly name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&AdapterBlock> {
        self.entries
            .iter()
            .find_map(|(n, block)| (n == name).then_some(block))
    }

    /// Returns true if the named adapter is present.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Friendly names in insertion order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(n, _)| n.as_str())
    }

    /// Iterates over `(name, block)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &AdapterBlock)> {
        self.entries.iter().map(|(n, b)| (n.as_str(), b))
    }

    /// Number of adapters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if no adapter is present.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Serialize for AdapterMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, block) in &self.entries {
            map.serialize_entry(name, block)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for AdapterMap {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let pairs = deserializer.deserialize_map(OrderedPairs::<AdapterBlock>(PhantomData))?;
        let mut map = Self::new();
        for (name, block) in pairs {
            map.insert(name, block);
        }
        Ok(map)
    }
}

fn serialize_entries<S: Serializer>(
    entries: &[AddressEntry],
    serializer: S,
) -> Result<S::Ok, S::Error> {
    let mut map = serializer.serialize_map(Some(entries.len()))?;
    for entry in entries {
        map.serialize_entry(&entry.key(), entry.qualifier())?;
    }
    map.end()
}

fn deserialize_entries<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Vec<AddressEntry>, D::Error> {
    let pairs = deserializer.deserialize_map(OrderedPairs::<serde_json::Value>(PhantomData))?;
    pairs
        .into_iter()
        .map(|(key, qualifier)| AddressEntry::parse(&key, &qualifier).map_err(de::Error::custom))
        .collect()
}

/// Collects a map's entries as a vector, keeping document order.
struct OrderedPairs<V>(PhantomData<V>);

impl<'de, V: Deserialize<'de>> Visitor<'de> for OrderedPairs<V> {
    type Value = Vec<(String, V)>;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("an object")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
        let mut pairs = Vec::with_capacity(access.size_hint().unwrap_or(0));
        while let Some((key, value)) = access.next_entry()? {
            pairs.push((key, value));
        }
        Ok(pairs)
    }
}

/// The complete discovery document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscoveryReport {
    /// Always [`DISCOVER_TYPE`].
    pub discovertype: String,
    /// Always [`DESCRIPTION`].
    pub description: String,
    /// Always [`SOURCE`].
    pub source: String,
    /// Machine hostname; empty when unresolvable.
    pub host: String,
    /// Up adapters keyed by friendly name.
    pub data: AdapterMap,
}

impl DiscoveryReport {
    /// Creates a report with the fixed metadata and no adapters.
    #[must_use]
    pub fn empty(host: impl Into<String>) -> Self {
        Self {
            discovertype: DISCOVER_TYPE.to_string(),
            description: DESCRIPTION.to_string(),
            source: SOURCE.to_string(),
            host: host.into(),
            data: AdapterMap::new(),
        }
    }
}

/// Builds a [`DiscoveryReport`] from a raw adapter list in a single pass.
///
/// # Example
///
/// ```
/// use netconfig::discovery::ReportBuilder;
/// use netconfig::network::{AdapterKind, OperState, RawAdapter, RawUnicastAddress};
///
/// let adapters = vec![
///     RawAdapter::new("eth0", "eth0", AdapterKind::Ethernet, OperState::Up)
///         .with_unicast(RawUnicastAddress::with_mask("192.168.1.10", "255.255.255.0")),
/// ];
///
/// let report = ReportBuilder::new("host1").build(&adapters).unwrap();
/// let block = report.data.get("eth0").unwrap();
/// assert!(block.entry("192.168.1.10/24").is_some());
/// ```
pub struct ReportBuilder<'o> {
    host: String,
    observer: &'o dyn ReportObserver,
}

impl fmt::Debug for ReportBuilder<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReportBuilder")
            .field("host", &self.host)
            .finish_non_exhaustive()
    }
}

impl ReportBuilder<'static> {
    /// Creates a builder with no observer.
    #[must_use]
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            observer: &NoopObserver,
        }
    }
}

impl<'o> ReportBuilder<'o> {
    /// Attaches an observer for build events.
    #[must_use]
    pub fn with_observer<'n>(self, observer: &'n dyn ReportObserver) -> ReportBuilder<'n> {
        ReportBuilder {
            host: self.host,
            observer,
        }
    }

    /// Builds the report.
    ///
    /// Adapters that are not up are skipped. Every other adapter appears,
    /// loopback included, even with no addresses.
    ///
    /// # Errors
    ///
    /// Returns [`ReportError::Resolve`] on the first malformed address
    /// record; no partial report is returned.
    pub fn build(self, adapters: &[RawAdapter]) -> Result<DiscoveryReport, ReportError> {
        let Self { host, observer } = self;
        let mut report = DiscoveryReport::empty(host);

        for adapter in adapters {
            if !adapter.oper_state.is_up() {
                observer.adapter_skipped(adapter);
                continue;
            }

            let block = adapter_block(adapter, observer)?;
            let address_count = block.ipaddrs.len();
            if report.data.insert(adapter.friendly_name.clone(), block) {
                observer.duplicate_adapter(&adapter.friendly_name);
            }
            observer.adapter_included(adapter, address_count);
        }

        Ok(report)
    }
}

fn adapter_block(
    adapter: &RawAdapter,
    observer: &dyn ReportObserver,
) -> Result<AdapterBlock, ReportError> {
    let resolver = Resolver::new(adapter);
    let fail = |source| ReportError::Resolve {
        adapter: adapter.friendly_name.clone(),
        source,
    };

    let mut ipaddrs: Vec<AddressEntry> = Vec::with_capacity(adapter.unicast.len());
    for record in &adapter.unicast {
        let resolution = resolver.resolve(&record.address).map_err(fail)?;
        let path = resolution.path;
        let entry = resolution.into_entry(adapter.is_loopback()).map_err(fail)?;
        observer.address_resolved(adapter, &entry, path);

        let key = entry.key();
        match ipaddrs.iter_mut().find(|e| e.key() == key) {
            Some(existing) => *existing = entry,
            None => ipaddrs.push(entry),
        }
    }

    Ok(AdapterBlock {
        address: format_hardware_address(&adapter.hardware_address),
        mtu: adapter.mtu,
        operstate: adapter.oper_state.as_str().to_string(),
        ipaddrs,
    })
}

#[cfg(test)]
#[path = "report_tests.rs"]
mod tests;

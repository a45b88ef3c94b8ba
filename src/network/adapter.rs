//! Raw adapter records as reported by the platform.
//!
//! These are plain owned values materialized once per run by an
//! [`AdapterFetcher`](super::AdapterFetcher). The discovery core only ever
//! reads them; it never talks to the OS.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Operational state of an adapter.
///
/// Platforms report more states (testing, dormant, lower-layer-down, ...);
/// everything that is not "up" is folded into [`OperState::Down`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OperState {
    /// The adapter can pass packets.
    Up,
    /// Any other state.
    Down,
}

impl OperState {
    /// Returns true if the adapter is operationally up.
    #[must_use]
    pub const fn is_up(self) -> bool {
        matches!(self, Self::Up)
    }

    /// Label used in the discovery document.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Up => "UP",
            Self::Down => "DOWN",
        }
    }
}

impl fmt::Display for OperState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Network adapter type classification.
///
/// Only [`AdapterKind::Loopback`] changes how addresses are normalized; the
/// other kinds are carried for filtering and diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AdapterKind {
    /// Physical Ethernet adapter.
    Ethernet,
    /// Wireless (Wi-Fi) adapter.
    Wireless,
    /// Loopback adapter (localhost).
    Loopback,
    /// Virtual adapter (tunnel, PPP, ...).
    Virtual,
    /// Unknown or other adapter type, preserving the original type code for debugging.
    Other(u32),
}

impl AdapterKind {
    /// Returns true if this is a loopback adapter.
    #[must_use]
    pub const fn is_loopback(&self) -> bool {
        matches!(self, Self::Loopback)
    }
}

/// One unicast address record with its optional subnet mask.
///
/// Both fields are kept as the literal text the platform produced. Parsing
/// happens in the resolver so that a malformed record fails the whole report
/// instead of being silently dropped at enumeration time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawUnicastAddress {
    /// IP literal, possibly carrying a `%zone` suffix (`fe80::1%12`).
    pub address: String,
    /// Subnet mask as an IP literal (`255.255.255.0`), when the platform knows it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mask: Option<String>,
}

impl RawUnicastAddress {
    /// Creates a record without mask information.
    #[must_use]
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            mask: None,
        }
    }

    /// Creates a record carrying a subnet mask.
    #[must_use]
    pub fn with_mask(address: impl Into<String>, mask: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            mask: Some(mask.into()),
        }
    }
}

/// A snapshot of a single network adapter as reported by the platform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawAdapter {
    /// Stable internal identifier (adapter GUID on Windows, interface name elsewhere).
    pub id: String,
    /// Human-readable name (e.g., "Ethernet", "Wi-Fi"). Used as the document key.
    pub friendly_name: String,
    /// Hardware (MAC) address bytes.
    #[serde(default)]
    pub hardware_address: Vec<u8>,
    /// Maximum transmission unit in bytes.
    #[serde(default)]
    pub mtu: u32,
    /// Operational state.
    pub oper_state: OperState,
    /// The type of adapter.
    pub kind: AdapterKind,
    /// Unicast addresses in discovery order.
    #[serde(default)]
    pub unicast: Vec<RawUnicastAddress>,
    /// Multicast group addresses in discovery order.
    #[serde(default)]
    pub multicast: Vec<String>,
}

impl RawAdapter {
    /// Creates an adapter with no addresses, an all-zero hardware address and MTU 0.
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        friendly_name: impl Into<String>,
        kind: AdapterKind,
        oper_state: OperState,
    ) -> Self {
        Self {
            id: id.into(),
            friendly_name: friendly_name.into(),
            hardware_address: vec![0; 6],
            mtu: 0,
            oper_state,
            kind,
            unicast: Vec::new(),
            multicast: Vec::new(),
        }
    }

    /// Sets the hardware address (builder pattern).
    #[must_use]
    pub fn with_hardware_address(mut self, bytes: impl Into<Vec<u8>>) -> Self {
        self.hardware_address = bytes.into();
        self
    }

    /// Sets the MTU (builder pattern).
    #[must_use]
    pub const fn with_mtu(mut self, mtu: u32) -> Self {
        self.mtu = mtu;
        self
    }

    /// Appends a unicast address record (builder pattern).
    #[must_use]
    pub fn with_unicast(mut self, address: RawUnicastAddress) -> Self {
        self.unicast.push(address);
        self
    }

    /// Appends a multicast group address (builder pattern).
    #[must_use]
    pub fn with_multicast(mut self, address: impl Into<String>) -> Self {
        self.multicast.push(address.into());
        self
    }

    /// Returns true if the adapter is a loopback interface.
    #[must_use]
    pub const fn is_loopback(&self) -> bool {
        self.kind.is_loopback()
    }

    /// The first multicast address observed on this adapter, if any.
    #[must_use]
    pub fn first_multicast(&self) -> Option<&str> {
        self.multicast.first().map(String::as_str)
    }
}

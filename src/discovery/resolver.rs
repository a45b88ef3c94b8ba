//! Resolves one unicast address of an adapter into prefix and broadcast data.
//!
//! The lookup runs over the adapter's own unicast records, so the mask used
//! for an address is always the one the platform reported with it.

use std::net::IpAddr;

use crate::network::{RawAdapter, RawUnicastAddress};

use super::entry::split_zone;
use super::mask::{LengthMismatch, NON_COMPUTABLE_PREFIX, prefix_and_broadcast};
use super::{AddressEntry, Qualifier, ResolveError, classify_v6};

/// Prefix used when the address is not among the adapter's records, and for
/// IPv6 records without a mask.
pub const DEFAULT_PREFIX: u8 = 128;

/// Prefix for an IPv4 record without a mask on a loopback adapter.
pub const LOOPBACK_NO_MASK_PREFIX: u8 = 8;

/// Prefix for an IPv4 record without a mask on any other adapter.
pub const NO_MASK_PREFIX: u8 = 32;

/// Which policy branch produced a [`Resolution`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolutionPath {
    /// Prefix and broadcast computed from the record's mask.
    Computed,
    /// The record had no mask; multicast fallback applied.
    NoMask,
    /// The mask and address lengths differ; conservative fallback applied.
    NonComputable(LengthMismatch),
    /// The address is not among the adapter's records.
    NotFound,
}

/// Outcome of resolving one address, before scope classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    /// The parsed address.
    pub address: IpAddr,
    /// Zone suffix of the target literal, if any.
    pub zone: Option<String>,
    /// Derived prefix length.
    pub prefix_len: u8,
    /// Broadcast text for IPv4 results (`None` = empty qualifier). Always
    /// `None` for IPv6.
    pub broadcast: Option<String>,
    /// The policy branch taken.
    pub path: ResolutionPath,
}

impl Resolution {
    /// Applies the family-specific qualifier rules and produces the entry.
    ///
    /// IPv4 results carry their broadcast (or an empty qualifier); IPv6
    /// results are classified with [`classify_v6`].
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError::InvalidEntry`] if the prefix is out of range
    /// for the family. The fallback prefixes 64 and 128 are accepted for IPv4.
    pub fn into_entry(self, adapter_is_loopback: bool) -> Result<AddressEntry, ResolveError> {
        let qualifier = match self.address {
            IpAddr::V4(_) => Qualifier::from_broadcast(self.broadcast),
            IpAddr::V6(v6) => Qualifier::Scope(classify_v6(&v6, adapter_is_loopback)),
        };
        let literal = self.address.to_string();

        AddressEntry::new(self.address, self.zone, self.prefix_len, qualifier)
            .map_err(|source| ResolveError::InvalidEntry { literal, source })
    }
}

/// Resolves addresses against one adapter's snapshot. Pure; holds no state.
#[derive(Debug, Clone, Copy)]
pub struct Resolver<'a> {
    adapter: &'a RawAdapter,
}

impl<'a> Resolver<'a> {
    /// Creates a resolver over the given adapter.
    #[must_use]
    pub const fn new(adapter: &'a RawAdapter) -> Self {
        Self { adapter }
    }

    /// Resolves `target` (an IP literal, optionally with `%zone`).
    ///
    /// Policy:
    /// 1. Find the record whose address equals the target (zones ignored).
    /// 2. Found with a mask of the same length: prefix and broadcast from the mask.
    /// 3. Found without a mask: IPv4 gets the first multicast address as
    ///    broadcast and prefix 8 (loopback) or 32; IPv6 gets 128.
    /// 4. Not found: prefix 128, no broadcast.
    /// 5. Mask length differs from the address: prefix 64, IPv4 gets the
    ///    first multicast address as broadcast.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError::MalformedAddress`] if the target or any record
    /// scanned before the match is not an IP literal, and
    /// [`ResolveError::MalformedMask`] if the matching record's mask is not one.
    pub fn resolve(&self, target: &str) -> Result<Resolution, ResolveError> {
        let (address, zone) = parse_literal(target)?;
        let zone = zone.map(str::to_string);

        let Some(record) = self.find(address)? else {
            return Ok(Resolution {
                address,
                zone,
                prefix_len: DEFAULT_PREFIX,
                broadcast: None,
                path: ResolutionPath::NotFound,
            });
        };

        let (prefix_len, broadcast, path) = match &record.mask {
            None => self.without_mask(address),
            Some(mask) => self.with_mask(address, &record.address, mask)?,
        };

        Ok(Resolution {
            address,
            zone,
            prefix_len,
            broadcast,
            path,
        })
    }

    fn find(&self, address: IpAddr) -> Result<Option<&'a RawUnicastAddress>, ResolveError> {
        for record in &self.adapter.unicast {
            let (candidate, _) = parse_literal(&record.address)?;
            if candidate == address {
                return Ok(Some(record));
            }
        }
        Ok(None)
    }

    fn without_mask(&self, address: IpAddr) -> (u8, Option<String>, ResolutionPath) {
        match address {
            IpAddr::V4(_) => {
                let prefix = if self.adapter.is_loopback() {
                    LOOPBACK_NO_MASK_PREFIX
                } else {
                    NO_MASK_PREFIX
                };
                (prefix, self.multicast_fallback(), ResolutionPath::NoMask)
            }
            IpAddr::V6(_) => (DEFAULT_PREFIX, None, ResolutionPath::NoMask),
        }
    }

    fn with_mask(
        &self,
        address: IpAddr,
        record_literal: &str,
        mask_literal: &str,
    ) -> Result<(u8, Option<String>, ResolutionPath), ResolveError> {
        let mask: IpAddr =
            mask_literal
                .trim()
                .parse()
                .map_err(|source| ResolveError::MalformedMask {
                    address: record_literal.to_string(),
                    mask: mask_literal.to_string(),
                    source,
                })?;

        let resolved = match prefix_and_broadcast(&octets(address), &octets(mask)) {
            Ok(subnet) => {
                let broadcast = address.is_ipv4().then(|| subnet.broadcast_string());
                (subnet.prefix_len, broadcast, ResolutionPath::Computed)
            }
            Err(mismatch) => {
                let broadcast = if address.is_ipv4() {
                    self.multicast_fallback()
                } else {
                    None
                };
                (
                    NON_COMPUTABLE_PREFIX,
                    broadcast,
                    ResolutionPath::NonComputable(mismatch),
                )
            }
        };
        Ok(resolved)
    }

    fn multicast_fallback(&self) -> Option<String> {
        self.adapter.first_multicast().map(str::to_string)
    }
}

/// Parses an IP literal after stripping any `%zone` suffix.
fn parse_literal(literal: &str) -> Result<(IpAddr, Option<&str>), ResolveError> {
    let (address, zone) = split_zone(literal.trim());
    let address = address
        .parse()
        .map_err(|source| ResolveError::MalformedAddress {
            literal: literal.to_string(),
            source,
        })?;
    Ok((address, zone))
}

fn octets(address: IpAddr) -> Vec<u8> {
    match address {
        IpAddr::V4(v4) => v4.octets().to_vec(),
        IpAddr::V6(v6) => v6.octets().to_vec(),
    }
}

#[cfg(test)]
#[path = "resolver_tests.rs"]
mod tests;

//! Subnet mask arithmetic.

use std::net::{Ipv4Addr, Ipv6Addr};

use thiserror::Error;

/// Prefix length reported when an address and its mask cannot be combined.
pub const NON_COMPUTABLE_PREFIX: u8 = 64;

/// Prefix length and broadcast address derived from an address and its mask.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subnet {
    /// Number of one-bits in the mask.
    pub prefix_len: u8,
    /// The address with every host bit (zero mask bit) set to one.
    pub broadcast: Vec<u8>,
}

impl Subnet {
    /// Renders the broadcast address: dotted decimal for 4-byte values,
    /// an IPv6 literal for 16-byte values, dotted bytes otherwise.
    #[must_use]
    pub fn broadcast_string(&self) -> String {
        if let Ok(octets) = <[u8; 4]>::try_from(self.broadcast.as_slice()) {
            return Ipv4Addr::from(octets).to_string();
        }
        if let Ok(octets) = <[u8; 16]>::try_from(self.broadcast.as_slice()) {
            return Ipv6Addr::from(octets).to_string();
        }
        self.broadcast
            .iter()
            .map(u8::to_string)
            .collect::<Vec<_>>()
            .join(".")
    }
}

/// The address and mask have different byte lengths.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("address is {address_len} bytes but mask is {mask_len} bytes")]
pub struct LengthMismatch {
    /// Byte length of the address.
    pub address_len: usize,
    /// Byte length of the mask.
    pub mask_len: usize,
}

/// Computes the prefix length and broadcast address of `address` under `mask`.
///
/// Every one-bit of the mask counts toward the prefix length; every zero-bit
/// forces the matching address bit to one. Non-contiguous masks are accepted
/// and counted the same way.
///
/// # Errors
///
/// Returns [`LengthMismatch`] when the two byte sequences differ in length,
/// e.g. an IPv4 address paired with an IPv6-form mask.
///
/// # Examples
///
/// ```
/// use netconfig::discovery::prefix_and_broadcast;
///
/// let subnet = prefix_and_broadcast(&[192, 168, 1, 10], &[255, 255, 255, 0]).unwrap();
/// assert_eq!(subnet.prefix_len, 24);
/// assert_eq!(subnet.broadcast_string(), "192.168.1.255");
/// ```
pub fn prefix_and_broadcast(address: &[u8], mask: &[u8]) -> Result<Subnet, LengthMismatch> {
    if address.len() != mask.len() {
        return Err(LengthMismatch {
            address_len: address.len(),
            mask_len: mask.len(),
        });
    }

    let mut prefix_len: u32 = 0;
    let mut broadcast = address.to_vec();
    for (byte, &mask_byte) in broadcast.iter_mut().zip(mask) {
        prefix_len += mask_byte.count_ones();
        *byte |= !mask_byte;
    }

    Ok(Subnet {
        // At most 16 bytes reach here from IP literals; clamp anything larger.
        prefix_len: u8::try_from(prefix_len).unwrap_or(u8::MAX),
        broadcast,
    })
}

/// Builds the contiguous IPv4 mask for a prefix length (values above 32 saturate).
///
/// ```
/// use netconfig::discovery::mask_from_prefix;
///
/// assert_eq!(mask_from_prefix(20).to_string(), "255.255.240.0");
/// ```
#[must_use]
pub fn mask_from_prefix(prefix_len: u8) -> Ipv4Addr {
    let len = u32::from(prefix_len.min(32));
    Ipv4Addr::from(u32::MAX.checked_shl(32 - len).unwrap_or(0))
}

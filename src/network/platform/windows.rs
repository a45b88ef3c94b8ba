//! Windows-specific adapter enumeration using `GetAdaptersAddresses`.

use std::net::{Ipv4Addr, Ipv6Addr};

use crate::discovery::mask_from_prefix;
use crate::network::{
    AdapterFetcher, AdapterKind, FetchError, OperState, RawAdapter, RawUnicastAddress,
};
use windows::Win32::Foundation::WIN32_ERROR;
use windows::Win32::NetworkManagement::IpHelper::{
    GAA_FLAG_SKIP_ANYCAST, GAA_FLAG_SKIP_DNS_SERVER, GetAdaptersAddresses,
    IF_TYPE_ETHERNET_CSMACD, IF_TYPE_IEEE80211, IF_TYPE_SOFTWARE_LOOPBACK, IP_ADAPTER_ADDRESSES_LH,
};
use windows::Win32::NetworkManagement::Ndis::IfOperStatusUp;
use windows::Win32::Networking::WinSock::{
    AF_INET, AF_INET6, AF_UNSPEC, SOCKADDR, SOCKADDR_IN, SOCKADDR_IN6, SOCKET_ADDRESS,
};

/// Interface type for PPP (Point-to-Point Protocol) adapters.
/// Value from Windows SDK `iptypes.h` - not exported by the `windows` crate.
const IF_TYPE_PPP: u32 = 23;

/// Interface type for tunnel adapters (VPN, etc.).
/// Value from Windows SDK `iptypes.h` - not exported by the `windows` crate.
const IF_TYPE_TUNNEL: u32 = 131;

/// Buffer size hint for `GetAdaptersAddresses`.
/// The API will tell us the actual required size if this is insufficient.
const INITIAL_BUFFER_SIZE: u32 = 16384;

/// Windows implementation of [`AdapterFetcher`] using `GetAdaptersAddresses`.
///
/// # Example
///
/// ```no_run
/// use netconfig::network::{AdapterFetcher, platform::WindowsFetcher};
///
/// let adapters = WindowsFetcher::new().fetch().expect("Failed to fetch adapters");
///
/// for adapter in adapters {
///     println!("{}: {:?}", adapter.friendly_name, adapter.unicast);
/// }
/// ```
#[derive(Debug, Clone, Default)]
pub struct WindowsFetcher {
    _private: (),
}

impl WindowsFetcher {
    /// Creates a new Windows adapter fetcher.
    #[must_use]
    pub const fn new() -> Self {
        Self { _private: () }
    }
}

impl AdapterFetcher for WindowsFetcher {
    fn fetch(&self) -> Result<Vec<RawAdapter>, FetchError> {
        fetch_adapters()
    }
}

/// Walks the adapter list returned by `GetAdaptersAddresses`.
fn fetch_adapters() -> Result<Vec<RawAdapter>, FetchError> {
    let raw_adapters = get_adapter_addresses()?;

    let mut adapters = Vec::new();
    // SAFETY: GetAdaptersAddresses returns a properly aligned buffer for IP_ADAPTER_ADDRESSES_LH.
    #[allow(clippy::cast_ptr_alignment)]
    let mut current = raw_adapters.as_ptr().cast::<IP_ADAPTER_ADDRESSES_LH>();

    // SAFETY: The list is valid as long as the buffer (`raw_adapters`) is alive.
    while !current.is_null() {
        let adapter = unsafe { &*current };
        adapters.push(parse_adapter(adapter)?);
        current = adapter.Next;
    }

    Ok(adapters)
}

/// Calls `GetAdaptersAddresses` and returns the raw buffer containing adapter data.
///
/// This function handles the two-call pattern:
/// 1. First call with estimated buffer size
/// 2. Retry with exact size if buffer was too small
fn get_adapter_addresses() -> Result<Vec<u8>, FetchError> {
    // Multicast groups are kept: they back the no-mask broadcast fallback
    let flags = GAA_FLAG_SKIP_ANYCAST | GAA_FLAG_SKIP_DNS_SERVER;
    let family = u32::from(AF_UNSPEC.0);

    let mut buffer: Vec<u8> = vec![0u8; INITIAL_BUFFER_SIZE as usize];
    let mut size = INITIAL_BUFFER_SIZE;

    // SAFETY: We provide a valid buffer and size. The function writes adapter
    // information to the buffer and updates `size` with the required length.
    let result = unsafe {
        GetAdaptersAddresses(
            family,
            flags,
            None,
            Some(buffer.as_mut_ptr().cast()),
            &raw mut size,
        )
    };

    handle_api_result(result, &mut buffer, &mut size, flags, family)?;

    Ok(buffer)
}

/// Handles the result of `GetAdaptersAddresses`, potentially retrying with a larger buffer.
#[cfg(not(tarpaulin_include))]
fn handle_api_result(
    result: u32,
    buffer: &mut Vec<u8>,
    size: &mut u32,
    flags: windows::Win32::NetworkManagement::IpHelper::GET_ADAPTERS_ADDRESSES_FLAGS,
    family: u32,
) -> Result<(), FetchError> {
    use windows::Win32::Foundation::{ERROR_BUFFER_OVERFLOW, NO_ERROR};

    if result == ERROR_BUFFER_OVERFLOW.0 {
        buffer.resize(*size as usize, 0);

        // SAFETY: Same as above, but with correctly sized buffer
        let result = unsafe {
            GetAdaptersAddresses(
                family,
                flags,
                None,
                Some(buffer.as_mut_ptr().cast()),
                &raw mut *size,
            )
        };

        if result != NO_ERROR.0 {
            return Err(windows::core::Error::from(WIN32_ERROR(result)).into());
        }
    } else if result != NO_ERROR.0 {
        return Err(windows::core::Error::from(WIN32_ERROR(result)).into());
    }

    Ok(())
}

/// Converts one `IP_ADAPTER_ADDRESSES_LH` into a [`RawAdapter`].
fn parse_adapter(adapter: &IP_ADAPTER_ADDRESSES_LH) -> Result<RawAdapter, FetchError> {
    // SAFETY: Both strings point into the adapter buffer, which outlives this call.
    let id = unsafe { adapter.AdapterName.to_string() }.unwrap_or_default();
    let friendly_name = unsafe { adapter.FriendlyName.to_string() }.map_err(|e| {
        FetchError::Platform {
            message: format!("Adapter {id} has an unreadable friendly name: {e}"),
        }
    })?;

    let mac_len = (adapter.PhysicalAddressLength as usize).min(adapter.PhysicalAddress.len());
    let oper_state = if adapter.OperStatus == IfOperStatusUp {
        OperState::Up
    } else {
        OperState::Down
    };

    Ok(RawAdapter {
        id,
        friendly_name,
        hardware_address: adapter.PhysicalAddress[..mac_len].to_vec(),
        mtu: adapter.Mtu,
        oper_state,
        kind: map_adapter_type(adapter.IfType),
        unicast: collect_unicast(adapter)?,
        multicast: collect_multicast(adapter)?,
    })
}

/// Maps Windows `IF_TYPE_*` constants to [`AdapterKind`].
const fn map_adapter_type(if_type: u32) -> AdapterKind {
    match if_type {
        IF_TYPE_ETHERNET_CSMACD => AdapterKind::Ethernet,
        IF_TYPE_IEEE80211 => AdapterKind::Wireless,
        IF_TYPE_SOFTWARE_LOOPBACK => AdapterKind::Loopback,
        IF_TYPE_TUNNEL | IF_TYPE_PPP => AdapterKind::Virtual,
        other => AdapterKind::Other(other),
    }
}

/// Collects unicast addresses in list order.
///
/// IPv4 entries carry the mask derived from the on-link prefix length, the
/// same value .NET exposes as `IPv4Mask`. IPv6 entries carry no mask.
fn collect_unicast(adapter: &IP_ADAPTER_ADDRESSES_LH) -> Result<Vec<RawUnicastAddress>, FetchError> {
    let mut records = Vec::new();
    let mut unicast = adapter.FirstUnicastAddress;

    // SAFETY: Each entry is valid as long as the parent adapter buffer is alive.
    while !unicast.is_null() {
        let entry = unsafe { &*unicast };

        match socket_address_literal(&entry.Address)? {
            Some(SocketLiteral::V4(address)) => records.push(RawUnicastAddress::with_mask(
                address.to_string(),
                mask_from_prefix(entry.OnLinkPrefixLength).to_string(),
            )),
            Some(SocketLiteral::V6(literal)) => records.push(RawUnicastAddress::new(literal)),
            None => {}
        }

        unicast = entry.Next;
    }

    Ok(records)
}

/// Collects multicast group addresses in list order.
fn collect_multicast(adapter: &IP_ADAPTER_ADDRESSES_LH) -> Result<Vec<String>, FetchError> {
    let mut groups = Vec::new();
    let mut multicast = adapter.FirstMulticastAddress;

    // SAFETY: Each entry is valid as long as the parent adapter buffer is alive.
    while !multicast.is_null() {
        let entry = unsafe { &*multicast };

        match socket_address_literal(&entry.Address)? {
            Some(SocketLiteral::V4(address)) => groups.push(address.to_string()),
            Some(SocketLiteral::V6(literal)) => groups.push(literal),
            None => {}
        }

        multicast = entry.Next;
    }

    Ok(groups)
}

enum SocketLiteral {
    V4(Ipv4Addr),
    V6(String),
}

/// Renders a `SOCKET_ADDRESS` as an IP literal.
///
/// IPv6 literals get a `%scope` suffix when the scope id is non-zero.
/// Returns `Ok(None)` for an empty socket address and an error for any
/// family other than `AF_INET`/`AF_INET6`.
#[allow(clippy::cast_ptr_alignment)]
fn socket_address_literal(address: &SOCKET_ADDRESS) -> Result<Option<SocketLiteral>, FetchError> {
    // SAFETY: lpSockaddr is either null or points at a sockaddr inside the adapter buffer.
    let Some(sockaddr) = (unsafe { address.lpSockaddr.as_ref() }) else {
        return Ok(None);
    };

    match sockaddr.sa_family {
        f if f == AF_INET => {
            // SAFETY: We verified the family is AF_INET, so this is a valid cast.
            let sockaddr_in = unsafe { &*(std::ptr::from_ref::<SOCKADDR>(sockaddr).cast::<SOCKADDR_IN>()) };
            // SAFETY: sin_addr contains the IPv4 address bytes in network order.
            let octets = unsafe { sockaddr_in.sin_addr.S_un.S_un_b };
            Ok(Some(SocketLiteral::V4(Ipv4Addr::new(
                octets.s_b1,
                octets.s_b2,
                octets.s_b3,
                octets.s_b4,
            ))))
        }
        f if f == AF_INET6 => {
            // SAFETY: We verified the family is AF_INET6, so this is a valid cast.
            let sockaddr_in6 = unsafe { &*(std::ptr::from_ref::<SOCKADDR>(sockaddr).cast::<SOCKADDR_IN6>()) };
            // SAFETY: Both union views are plain integers of the same storage.
            let octets = unsafe { sockaddr_in6.sin6_addr.u.Byte };
            let scope_id = unsafe { sockaddr_in6.Anonymous.sin6_scope_id };
            Ok(Some(SocketLiteral::V6(ipv6_literal(Ipv6Addr::from(octets), scope_id))))
        }
        other => Err(FetchError::Platform {
            message: format!("Unsupported socket address family {}", other.0),
        }),
    }
}

fn ipv6_literal(address: Ipv6Addr, scope_id: u32) -> String {
    if scope_id == 0 {
        address.to_string()
    } else {
        format!("{address}%{scope_id}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn map_adapter_type_ethernet() {
        assert_eq!(
            map_adapter_type(IF_TYPE_ETHERNET_CSMACD),
            AdapterKind::Ethernet
        );
    }

    #[test]
    fn map_adapter_type_loopback() {
        assert_eq!(
            map_adapter_type(IF_TYPE_SOFTWARE_LOOPBACK),
            AdapterKind::Loopback
        );
    }

    #[test]
    fn map_adapter_type_tunnel_is_virtual() {
        assert_eq!(map_adapter_type(IF_TYPE_TUNNEL), AdapterKind::Virtual);
        assert_eq!(map_adapter_type(IF_TYPE_PPP), AdapterKind::Virtual);
    }

    #[test]
    fn map_adapter_type_unknown_preserves_code() {
        assert_eq!(map_adapter_type(999), AdapterKind::Other(999));
    }

    #[test]
    fn ipv6_literal_appends_non_zero_scope() {
        let address: Ipv6Addr = "fe80::1".parse().unwrap();
        assert_eq!(ipv6_literal(address, 0), "fe80::1");
        assert_eq!(ipv6_literal(address, 12), "fe80::1%12");
    }

    // Integration test: actually enumerates adapters on the build host
    #[test]
    fn fetch_adapters_includes_loopback() {
        let adapters = WindowsFetcher::new().fetch().expect("fetch() failed");

        let has_loopback = adapters.iter().any(|a| {
            a.unicast
                .iter()
                .any(|u| u.address == "127.0.0.1" || u.address == "::1")
        });

        assert!(has_loopback, "Expected a loopback address, got {adapters:?}");
    }

    #[test]
    fn fetched_ipv4_addresses_carry_masks() {
        let adapters = WindowsFetcher::new().fetch().expect("fetch() failed");

        for record in adapters.iter().flat_map(|a| &a.unicast) {
            if record.address.parse::<Ipv4Addr>().is_ok() {
                assert!(record.mask.is_some(), "IPv4 record without mask: {record:?}");
            }
        }
    }
}

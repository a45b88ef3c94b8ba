//! Linux adapter enumeration using `getifaddrs`.
//!
//! `getifaddrs` yields one entry per (interface, address) pair; entries are
//! grouped back into adapters in first-seen order. Link-layer details that
//! `getifaddrs` does not carry (MTU, wireless/virtual kind) come from sysfs.

use std::ffi::CStr;
use std::net::{Ipv4Addr, Ipv6Addr};
use std::path::Path;

use crate::network::{
    AdapterFetcher, AdapterKind, FetchError, OperState, RawAdapter, RawUnicastAddress,
};

const SYSFS_NET: &str = "/sys/class/net";

/// Linux implementation of [`AdapterFetcher`] using `getifaddrs`.
#[derive(Debug, Clone, Default)]
pub struct LinuxFetcher {
    _private: (),
}

impl LinuxFetcher {
    /// Creates a new Linux adapter fetcher.
    #[must_use]
    pub const fn new() -> Self {
        Self { _private: () }
    }
}

impl AdapterFetcher for LinuxFetcher {
    fn fetch(&self) -> Result<Vec<RawAdapter>, FetchError> {
        let list = IfAddrs::new()?;
        let mut adapters: Vec<RawAdapter> = Vec::new();

        for ifa in list.iter() {
            // SAFETY: ifa_name is a valid NUL-terminated string for every entry.
            let name = unsafe { CStr::from_ptr(ifa.ifa_name) }
                .to_string_lossy()
                .into_owned();

            let index = match adapters.iter().position(|a| a.id == name) {
                Some(index) => index,
                None => {
                    adapters.push(new_adapter(&name, ifa.ifa_flags));
                    adapters.len() - 1
                }
            };

            apply_entry(&mut adapters[index], ifa);
        }

        Ok(adapters)
    }
}

/// Owns the list returned by `getifaddrs` and frees it on drop.
struct IfAddrs {
    head: *mut libc::ifaddrs,
}

impl IfAddrs {
    fn new() -> Result<Self, FetchError> {
        let mut head: *mut libc::ifaddrs = std::ptr::null_mut();
        // SAFETY: getifaddrs writes a list head into `head` on success.
        if unsafe { libc::getifaddrs(&raw mut head) } != 0 {
            return Err(FetchError::Io {
                context: "getifaddrs failed".to_string(),
                source: std::io::Error::last_os_error(),
            });
        }
        Ok(Self { head })
    }

    fn iter(&self) -> impl Iterator<Item = &libc::ifaddrs> {
        // SAFETY: Every node is valid until freeifaddrs runs in Drop.
        std::iter::successors(unsafe { self.head.as_ref() }, |ifa| unsafe {
            ifa.ifa_next.as_ref()
        })
    }
}

impl Drop for IfAddrs {
    fn drop(&mut self) {
        if !self.head.is_null() {
            // SAFETY: head came from a successful getifaddrs call.
            unsafe { libc::freeifaddrs(self.head) };
        }
    }
}

/// Operational state from interface flags: administratively up with a carrier.
fn oper_state(flags: libc::c_uint) -> OperState {
    let running = (libc::IFF_UP | libc::IFF_RUNNING) as libc::c_uint;
    if flags & running == running {
        OperState::Up
    } else {
        OperState::Down
    }
}

fn new_adapter(name: &str, flags: libc::c_uint) -> RawAdapter {
    let oper_state = oper_state(flags);
    let kind = if flags & (libc::IFF_LOOPBACK as libc::c_uint) != 0 {
        AdapterKind::Loopback
    } else {
        sysfs_kind(&Path::new(SYSFS_NET).join(name))
    };

    RawAdapter::new(name, name, kind, oper_state).with_mtu(sysfs_mtu(name))
}

/// Folds one `getifaddrs` entry into its adapter.
#[allow(clippy::cast_ptr_alignment)]
fn apply_entry(adapter: &mut RawAdapter, ifa: &libc::ifaddrs) {
    // SAFETY: ifa_addr is either null or a sockaddr whose family tag is valid.
    let Some(addr) = (unsafe { ifa.ifa_addr.as_ref() }) else {
        return;
    };

    match i32::from(addr.sa_family) {
        libc::AF_INET => {
            // SAFETY: Family is AF_INET, so the storage is a sockaddr_in.
            let address = unsafe { ipv4_of(ifa.ifa_addr) };
            let mask = (!ifa.ifa_netmask.is_null())
                // SAFETY: The netmask shares the address family of ifa_addr.
                .then(|| unsafe { ipv4_of(ifa.ifa_netmask) }.to_string());
            adapter.unicast.push(RawUnicastAddress {
                address: address.to_string(),
                mask,
            });
        }
        libc::AF_INET6 => {
            // SAFETY: Family is AF_INET6, so the storage is a sockaddr_in6.
            let sin6 = unsafe { &*ifa.ifa_addr.cast::<libc::sockaddr_in6>() };
            let address = Ipv6Addr::from(sin6.sin6_addr.s6_addr);
            let literal = if sin6.sin6_scope_id == 0 {
                address.to_string()
            } else {
                format!("{address}%{}", adapter.id)
            };
            let mask = (!ifa.ifa_netmask.is_null()).then(|| {
                // SAFETY: The netmask shares the address family of ifa_addr.
                let mask = unsafe { &*ifa.ifa_netmask.cast::<libc::sockaddr_in6>() };
                Ipv6Addr::from(mask.sin6_addr.s6_addr).to_string()
            });
            adapter.unicast.push(RawUnicastAddress {
                address: literal,
                mask,
            });
        }
        libc::AF_PACKET => {
            // SAFETY: Family is AF_PACKET, so the storage is a sockaddr_ll.
            let ll = unsafe { &*ifa.ifa_addr.cast::<libc::sockaddr_ll>() };
            let len = usize::from(ll.sll_halen).min(ll.sll_addr.len());
            adapter.hardware_address = ll.sll_addr[..len].to_vec();
        }
        _ => {}
    }
}

/// Reads the IPv4 address out of a `sockaddr_in`.
///
/// # Safety
///
/// `addr` must point at a valid `sockaddr_in`.
#[allow(clippy::cast_ptr_alignment)]
unsafe fn ipv4_of(addr: *const libc::sockaddr) -> Ipv4Addr {
    let sin = unsafe { &*addr.cast::<libc::sockaddr_in>() };
    Ipv4Addr::from(u32::from_be(sin.sin_addr.s_addr))
}

fn sysfs_mtu(name: &str) -> u32 {
    std::fs::read_to_string(Path::new(SYSFS_NET).join(name).join("mtu"))
        .ok()
        .and_then(|s| s.trim().parse().ok())
        .unwrap_or(0)
}

fn sysfs_kind(device: &Path) -> AdapterKind {
    if device.join("wireless").exists() {
        return AdapterKind::Wireless;
    }
    let is_virtual = std::fs::canonicalize(device)
        .is_ok_and(|p| p.starts_with("/sys/devices/virtual"));
    if is_virtual {
        return AdapterKind::Virtual;
    }

    match std::fs::read_to_string(device.join("type"))
        .ok()
        .and_then(|s| s.trim().parse::<u32>().ok())
    {
        // ARPHRD_ETHER
        Some(1) => AdapterKind::Ethernet,
        Some(other) => AdapterKind::Other(other),
        None => AdapterKind::Other(0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_adapter_maps_flags() {
        let up_loopback = (libc::IFF_UP | libc::IFF_RUNNING | libc::IFF_LOOPBACK) as libc::c_uint;
        let adapter = new_adapter("lo", up_loopback);

        assert_eq!(adapter.oper_state, OperState::Up);
        assert_eq!(adapter.kind, AdapterKind::Loopback);
        assert_eq!(adapter.id, "lo");
        assert_eq!(adapter.friendly_name, "lo");
    }

    #[test]
    fn new_adapter_without_up_flag_is_down() {
        let adapter = new_adapter("lo", libc::IFF_LOOPBACK as libc::c_uint);
        assert_eq!(adapter.oper_state, OperState::Down);
    }

    #[test]
    fn admin_up_without_carrier_is_down() {
        let adapter = new_adapter("eth0", libc::IFF_UP as libc::c_uint);
        assert_eq!(adapter.oper_state, OperState::Down);
    }

    #[test]
    fn running_requires_admin_up() {
        assert_eq!(oper_state(libc::IFF_RUNNING as libc::c_uint), OperState::Down);
        assert_eq!(
            oper_state((libc::IFF_UP | libc::IFF_RUNNING) as libc::c_uint),
            OperState::Up
        );
    }

    #[test]
    fn sysfs_kind_of_missing_device_is_other() {
        assert_eq!(
            sysfs_kind(Path::new("/nonexistent/netconfig-test0")),
            AdapterKind::Other(0)
        );
    }

    #[test]
    fn sysfs_mtu_of_missing_device_is_zero() {
        assert_eq!(sysfs_mtu("netconfig-test-missing0"), 0);
    }

    // Integration test: enumerates the build host's interfaces
    #[test]
    fn fetch_returns_adapters_with_unique_names() {
        let adapters = LinuxFetcher::new().fetch().expect("fetch() failed");

        let mut names: Vec<&str> = adapters.iter().map(|a| a.id.as_str()).collect();
        let total = names.len();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), total);
    }
}

//! IPv6 scope classification.

use std::fmt;
use std::net::Ipv6Addr;

use serde::{Deserialize, Serialize};

/// Reachability domain of an IPv6 address as reported in the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scope {
    /// Host-local: any address on a loopback adapter, or a site-local address.
    Host,
    /// Link-local unicast (`fe80::/10`).
    Link,
    /// Multicast (`ff00::/8`).
    Multicast,
    /// Everything else.
    Global,
}

impl Scope {
    /// Label used in the discovery document.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Host => "host",
            Self::Link => "link",
            Self::Multicast => "multicast",
            Self::Global => "global",
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classifies an IPv6 address. First match wins:
/// loopback adapter, link-local, site-local, multicast, global.
///
/// ```
/// use netconfig::discovery::{Scope, classify_v6};
///
/// assert_eq!(classify_v6(&"fe80::1".parse().unwrap(), false), Scope::Link);
/// assert_eq!(classify_v6(&"::1".parse().unwrap(), true), Scope::Host);
/// ```
#[must_use]
pub const fn classify_v6(address: &Ipv6Addr, adapter_is_loopback: bool) -> Scope {
    if adapter_is_loopback {
        Scope::Host
    } else if is_link_local(address) {
        Scope::Link
    } else if is_site_local(address) {
        Scope::Host
    } else if address.is_multicast() {
        Scope::Multicast
    } else {
        Scope::Global
    }
}

/// `fe80::/10`
const fn is_link_local(address: &Ipv6Addr) -> bool {
    (address.segments()[0] & 0xffc0) == 0xfe80
}

/// `fec0::/10` (deprecated by RFC 3879 but still reported by some stacks)
const fn is_site_local(address: &Ipv6Addr) -> bool {
    (address.segments()[0] & 0xffc0) == 0xfec0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classify(s: &str, loopback: bool) -> Scope {
        classify_v6(&s.parse().unwrap(), loopback)
    }

    #[test]
    fn link_local_on_regular_adapter() {
        assert_eq!(classify("fe80::1", false), Scope::Link);
        assert_eq!(classify("febf:ffff::1", false), Scope::Link);
    }

    #[test]
    fn loopback_adapter_always_host() {
        assert_eq!(classify("::1", true), Scope::Host);
        assert_eq!(classify("fe80::1", true), Scope::Host);
        assert_eq!(classify("2001:db8::1", true), Scope::Host);
    }

    #[test]
    fn site_local_is_host() {
        assert_eq!(classify("fec0::1", false), Scope::Host);
        assert_eq!(classify("feff::1", false), Scope::Host);
    }

    #[test]
    fn multicast() {
        assert_eq!(classify("ff02::1", false), Scope::Multicast);
        assert_eq!(classify("ff05::1:3", false), Scope::Multicast);
    }

    #[test]
    fn everything_else_is_global() {
        assert_eq!(classify("2001:db8::1", false), Scope::Global);
        assert_eq!(classify("fd00::1", false), Scope::Global);
        assert_eq!(classify("::1", false), Scope::Global);
        assert_eq!(classify("fe7f::1", false), Scope::Global);
    }

    #[test]
    fn classification_is_stable() {
        for (address, loopback) in [("fe80::1", false), ("ff02::2", false), ("::1", true)] {
            assert_eq!(classify(address, loopback), classify(address, loopback));
        }
    }

    #[test]
    fn serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Scope::Link).unwrap(), r#""link""#);
        assert_eq!(
            serde_json::from_str::<Scope>(r#""multicast""#).unwrap(),
            Scope::Multicast
        );
        assert_eq!(Scope::Global.to_string(), "global");
    }
}

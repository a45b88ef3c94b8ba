//! Normalized address entries and their document form.

use std::fmt;
use std::net::IpAddr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::Scope;
use super::mask::NON_COMPUTABLE_PREFIX;
use super::resolver::DEFAULT_PREFIX;

/// IPv4 prefixes above 32 that the resolver emits as fallbacks.
const V4_FALLBACK_PREFIXES: [u8; 2] = [NON_COMPUTABLE_PREFIX, DEFAULT_PREFIX];

/// The per-address qualifier object.
///
/// IPv4 entries carry a broadcast address or nothing; IPv6 entries always
/// carry a scope. Serialized as `{"brd": ...}`, `{}` or `{"scope": ...}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "QualifierRepr", try_from = "QualifierRepr")]
pub enum Qualifier {
    /// IPv4 broadcast address.
    Broadcast(String),
    /// IPv4 entry for which no broadcast could be derived.
    Empty,
    /// IPv6 scope label.
    Scope(Scope),
}

#[derive(Serialize, Deserialize)]
struct QualifierRepr {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    brd: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    scope: Option<Scope>,
}

impl From<Qualifier> for QualifierRepr {
    fn from(qualifier: Qualifier) -> Self {
        match qualifier {
            Qualifier::Broadcast(brd) => Self {
                brd: Some(brd),
                scope: None,
            },
            Qualifier::Empty => Self {
                brd: None,
                scope: None,
            },
            Qualifier::Scope(scope) => Self {
                brd: None,
                scope: Some(scope),
            },
        }
    }
}

impl TryFrom<QualifierRepr> for Qualifier {
    type Error = &'static str;

    fn try_from(repr: QualifierRepr) -> Result<Self, Self::Error> {
        match (repr.brd, repr.scope) {
            (Some(brd), None) => Ok(Self::Broadcast(brd)),
            (None, Some(scope)) => Ok(Self::Scope(scope)),
            (None, None) => Ok(Self::Empty),
            (Some(_), Some(_)) => Err("qualifier carries both brd and scope"),
        }
    }
}

impl Qualifier {
    /// Builds an IPv4 qualifier from an optional broadcast string.
    /// An empty string counts as "no broadcast".
    #[must_use]
    pub fn from_broadcast(broadcast: Option<String>) -> Self {
        match broadcast {
            Some(brd) if !brd.is_empty() => Self::Broadcast(brd),
            _ => Self::Empty,
        }
    }
}

/// One IP address bound to an adapter, in normalized form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddressEntry {
    address: IpAddr,
    zone: Option<String>,
    prefix_len: u8,
    qualifier: Qualifier,
}

impl AddressEntry {
    /// Creates an IPv4 or IPv6 entry, checking that the qualifier matches the family.
    ///
    /// # Errors
    ///
    /// Returns [`EntryError::QualifierFamily`] for an IPv4 address with a scope
    /// or an IPv6 address without one, and [`EntryError::PrefixRange`] when the
    /// prefix exceeds the family's bit width. IPv4 entries may also carry the
    /// fallback prefixes 64 (non-computable mask) and 128 (address not found).
    pub fn new(
        address: IpAddr,
        zone: Option<String>,
        prefix_len: u8,
        qualifier: Qualifier,
    ) -> Result<Self, EntryError> {
        let family_ok = matches!(
            (&address, &qualifier),
            (IpAddr::V4(_), Qualifier::Broadcast(_) | Qualifier::Empty)
                | (IpAddr::V6(_), Qualifier::Scope(_))
        );
        if !family_ok {
            return Err(EntryError::QualifierFamily { address });
        }

        if !prefix_in_range(address, prefix_len) {
            return Err(EntryError::PrefixRange {
                address,
                prefix_len: u16::from(prefix_len),
            });
        }

        Ok(Self {
            address,
            zone: zone.filter(|z| !z.is_empty()),
            prefix_len,
            qualifier,
        })
    }

    /// The IP address.
    #[must_use]
    pub const fn address(&self) -> IpAddr {
        self.address
    }

    /// The zone suffix (`12` in `fe80::1%12`), if the platform reported one.
    #[must_use]
    pub fn zone(&self) -> Option<&str> {
        self.zone.as_deref()
    }

    /// The prefix length.
    #[must_use]
    pub const fn prefix_len(&self) -> u8 {
        self.prefix_len
    }

    /// The family-specific qualifier.
    #[must_use]
    pub const fn qualifier(&self) -> &Qualifier {
        &self.qualifier
    }

    /// The document key: `<ip>[%zone]/<prefix>`.
    #[must_use]
    pub fn key(&self) -> String {
        self.to_string()
    }

    /// Rebuilds an entry from its document key and qualifier object.
    ///
    /// # Errors
    ///
    /// Returns an [`EntryError`] if the key is not `<ip>[%zone]/<prefix>`,
    /// the qualifier object is malformed, or the pair violates the
    /// family/qualifier invariant.
    pub fn parse(key: &str, qualifier: &serde_json::Value) -> Result<Self, EntryError> {
        let (literal, prefix) = key
            .rsplit_once('/')
            .ok_or_else(|| EntryError::MalformedKey(key.to_string()))?;
        let prefix_len: u8 = prefix
            .parse()
            .map_err(|_| EntryError::MalformedKey(key.to_string()))?;
        let (address, zone) = split_zone(literal);
        let address: IpAddr = address
            .parse()
            .map_err(|_| EntryError::MalformedKey(key.to_string()))?;
        let qualifier = Qualifier::deserialize(qualifier).map_err(|e| {
            EntryError::MalformedQualifier {
                key: key.to_string(),
                reason: e.to_string(),
            }
        })?;

        Self::new(address, zone.map(str::to_string), prefix_len, qualifier)
    }
}

impl fmt::Display for AddressEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.zone {
            Some(zone) => write!(f, "{}%{}/{}", self.address, zone, self.prefix_len),
            None => write!(f, "{}/{}", self.address, self.prefix_len),
        }
    }
}

fn prefix_in_range(address: IpAddr, prefix_len: u8) -> bool {
    match address {
        IpAddr::V4(_) => prefix_len <= 32 || V4_FALLBACK_PREFIXES.contains(&prefix_len),
        IpAddr::V6(_) => prefix_len <= 128,
    }
}

/// Splits `fe80::1%12` into `("fe80::1", Some("12"))`.
#[must_use]
pub fn split_zone(literal: &str) -> (&str, Option<&str>) {
    match literal.split_once('%') {
        Some((address, zone)) => (address, Some(zone)),
        None => (literal, None),
    }
}

/// Errors building or parsing an [`AddressEntry`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EntryError {
    /// The qualifier kind does not match the address family.
    #[error("Qualifier does not match the address family of {address}")]
    QualifierFamily {
        /// The offending address.
        address: IpAddr,
    },

    /// The prefix exceeds the address family's bit width.
    #[error("Prefix length {prefix_len} out of range for {address}")]
    PrefixRange {
        /// The offending address.
        address: IpAddr,
        /// The rejected prefix length.
        prefix_len: u16,
    },

    /// The document key is not `<ip>[%zone]/<prefix>`.
    #[error("Malformed address key '{0}'")]
    MalformedKey(String),

    /// The qualifier object could not be decoded.
    #[error("Malformed qualifier for '{key}': {reason}")]
    MalformedQualifier {
        /// The address key the qualifier belongs to.
        key: String,
        /// Decoder message.
        reason: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn ip(s: &str) -> IpAddr {
        s.parse().unwrap()
    }

    mod construction {
        use super::*;

        #[test]
        fn ipv4_with_broadcast() {
            let entry = AddressEntry::new(
                ip("192.168.1.10"),
                None,
                24,
                Qualifier::Broadcast("192.168.1.255".to_string()),
            )
            .unwrap();

            assert_eq!(entry.key(), "192.168.1.10/24");
            assert_eq!(entry.prefix_len(), 24);
        }

        #[test]
        fn ipv6_with_zone() {
            let entry = AddressEntry::new(
                ip("fe80::1"),
                Some("12".to_string()),
                128,
                Qualifier::Scope(Scope::Link),
            )
            .unwrap();

            assert_eq!(entry.key(), "fe80::1%12/128");
            assert_eq!(entry.zone(), Some("12"));
        }

        #[test]
        fn empty_zone_is_dropped() {
            let entry =
                AddressEntry::new(ip("::1"), Some(String::new()), 128, Qualifier::Scope(Scope::Host))
                    .unwrap();
            assert_eq!(entry.key(), "::1/128");
        }

        #[test]
        fn ipv4_with_scope_is_rejected() {
            let err = AddressEntry::new(ip("10.0.0.1"), None, 8, Qualifier::Scope(Scope::Global))
                .unwrap_err();
            assert!(matches!(err, EntryError::QualifierFamily { .. }));
        }

        #[test]
        fn ipv6_with_broadcast_is_rejected() {
            let err = AddressEntry::new(ip("2001:db8::1"), None, 64, Qualifier::Empty).unwrap_err();
            assert!(matches!(err, EntryError::QualifierFamily { .. }));
        }

        #[test]
        fn ipv4_prefix_above_32_is_rejected() {
            let err = AddressEntry::new(ip("10.0.0.1"), None, 33, Qualifier::Empty).unwrap_err();
            assert_eq!(
                err,
                EntryError::PrefixRange {
                    address: ip("10.0.0.1"),
                    prefix_len: 33
                }
            );
        }

        #[test]
        fn ipv4_fallback_prefixes_are_accepted() {
            let computed_fallback = AddressEntry::new(
                ip("10.0.0.1"),
                None,
                64,
                Qualifier::Broadcast("224.0.0.1".to_string()),
            )
            .unwrap();
            let not_found = AddressEntry::new(ip("10.0.0.2"), None, 128, Qualifier::Empty).unwrap();

            assert_eq!(computed_fallback.key(), "10.0.0.1/64");
            assert_eq!(not_found.key(), "10.0.0.2/128");
        }

        #[test]
        fn ipv4_prefix_between_fallbacks_is_rejected() {
            let err = AddressEntry::new(ip("10.0.0.1"), None, 65, Qualifier::Empty).unwrap_err();
            assert!(matches!(err, EntryError::PrefixRange { prefix_len: 65, .. }));
        }

        #[test]
        fn ipv6_prefix_above_128_is_rejected() {
            let err = AddressEntry::new(ip("::1"), None, 129, Qualifier::Scope(Scope::Host))
                .unwrap_err();
            assert!(matches!(err, EntryError::PrefixRange { prefix_len: 129, .. }));
        }

        #[test]
        fn from_broadcast_treats_empty_as_missing() {
            assert_eq!(Qualifier::from_broadcast(None), Qualifier::Empty);
            assert_eq!(Qualifier::from_broadcast(Some(String::new())), Qualifier::Empty);
            assert_eq!(
                Qualifier::from_broadcast(Some("10.255.255.255".to_string())),
                Qualifier::Broadcast("10.255.255.255".to_string())
            );
        }
    }

    mod qualifier_json {
        use super::*;

        #[test]
        fn broadcast_shape() {
            let value = serde_json::to_value(Qualifier::Broadcast("10.0.0.255".into())).unwrap();
            assert_eq!(value, json!({ "brd": "10.0.0.255" }));
        }

        #[test]
        fn empty_shape() {
            assert_eq!(serde_json::to_value(Qualifier::Empty).unwrap(), json!({}));
        }

        #[test]
        fn scope_shape() {
            let value = serde_json::to_value(Qualifier::Scope(Scope::Link)).unwrap();
            assert_eq!(value, json!({ "scope": "link" }));
        }

        #[test]
        fn both_fields_are_rejected() {
            let result = serde_json::from_value::<Qualifier>(json!({ "brd": "x", "scope": "host" }));
            assert!(result.is_err());
        }
    }

    mod document_round_trip {
        use super::*;

        fn round_trip(entry: &AddressEntry) -> AddressEntry {
            let value = serde_json::to_value(entry.qualifier()).unwrap();
            AddressEntry::parse(&entry.key(), &value).unwrap()
        }

        #[test]
        fn every_qualifier_kind_survives() {
            let entries = [
                AddressEntry::new(
                    ip("192.168.1.10"),
                    None,
                    24,
                    Qualifier::Broadcast("192.168.1.255".into()),
                )
                .unwrap(),
                AddressEntry::new(ip("169.254.3.4"), None, 32, Qualifier::Empty).unwrap(),
                AddressEntry::new(
                    ip("fe80::abcd"),
                    Some("7".into()),
                    128,
                    Qualifier::Scope(Scope::Link),
                )
                .unwrap(),
                AddressEntry::new(ip("ff02::1"), None, 64, Qualifier::Scope(Scope::Multicast))
                    .unwrap(),
                AddressEntry::new(
                    ip("10.0.0.1"),
                    None,
                    64,
                    Qualifier::Broadcast("224.0.0.1".into()),
                )
                .unwrap(),
            ];

            for entry in &entries {
                assert_eq!(&round_trip(entry), entry);
            }
        }

        #[test]
        fn key_without_prefix_is_malformed() {
            let err = AddressEntry::parse("10.0.0.1", &json!({})).unwrap_err();
            assert_eq!(err, EntryError::MalformedKey("10.0.0.1".into()));
        }

        #[test]
        fn key_with_bad_address_is_malformed() {
            let err = AddressEntry::parse("10.0.0.300/24", &json!({})).unwrap_err();
            assert!(matches!(err, EntryError::MalformedKey(_)));
        }

        #[test]
        fn non_object_qualifier_is_malformed() {
            let err = AddressEntry::parse("10.0.0.1/8", &json!("brd")).unwrap_err();
            assert!(matches!(err, EntryError::MalformedQualifier { .. }));
        }
    }

    #[test]
    fn split_zone_handles_both_forms() {
        assert_eq!(split_zone("fe80::1%eth0"), ("fe80::1", Some("eth0")));
        assert_eq!(split_zone("10.0.0.1"), ("10.0.0.1", None));
    }
}

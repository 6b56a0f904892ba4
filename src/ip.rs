//! Version-agnostic IP address union.

use std::fmt;
use std::str::FromStr;

use serde::{de, Deserialize, Deserializer, Serialize};

use crate::ipv4::Ipv4Address;
use crate::ipv6::Ipv6Address;
use crate::ParseAddressError;

/// An IPv4 or IPv6 address.
///
/// Callers that accept either family parse into this union and branch on the
/// variant; the underlying value types stay directly accessible through
/// [`Self::ipv4`] and [`Self::ipv6`].
///
/// # Examples
/// ```
/// use ip_cidr_core::IpAddress;
///
/// let ip = IpAddress::parse(b"2001:db8::1").unwrap();
/// assert!(ip.is_ipv6());
/// assert_eq!(ip.to_string(), "[2001:db8::1]");
/// ```
#[derive(Copy, Clone, PartialEq, Eq, Hash)]
pub enum IpAddress {
    V4(Ipv4Address),
    V6(Ipv6Address),
}

impl IpAddress {
    /// Parses text in either family's notation.
    ///
    /// The family is decided by the first separator byte: a `.` selects the
    /// dotted-decimal IPv4 parser, a `:` or `[` the IPv6 parser. Text with
    /// no separator at all fits neither notation and yields `None`.
    pub fn parse(text: &[u8]) -> Option<Self> {
        if !text.is_ascii() {
            return None;
        }
        Self::parse_ascii(text)
    }

    pub(crate) fn parse_ascii(text: &[u8]) -> Option<Self> {
        for &byte in text {
            match byte {
                b'.' => return Ipv4Address::parse_ascii(text).map(Self::V4),
                b':' | b'[' => return Ipv6Address::parse_ascii(text).map(Self::V6),
                _ => {}
            }
        }
        None
    }

    /// Whether the held address is IPv4.
    pub const fn is_ipv4(self) -> bool {
        matches!(self, Self::V4(_))
    }

    /// Whether the held address is IPv6.
    pub const fn is_ipv6(self) -> bool {
        matches!(self, Self::V6(_))
    }

    /// The held IPv4 address, if that is the variant. No conversion is
    /// attempted for IPv4-mapped IPv6 addresses.
    pub const fn ipv4(self) -> Option<Ipv4Address> {
        match self {
            Self::V4(ipv4) => Some(ipv4),
            Self::V6(_) => None,
        }
    }

    /// The held IPv6 address, if that is the variant.
    pub const fn ipv6(self) -> Option<Ipv6Address> {
        match self {
            Self::V4(_) => None,
            Self::V6(ipv6) => Some(ipv6),
        }
    }

    /// Whether the held address is a loopback address of its family.
    pub fn is_loopback(self) -> bool {
        match self {
            Self::V4(ipv4) => ipv4.is_loopback(),
            Self::V6(ipv6) => ipv6.is_loopback(),
        }
    }

    /// Whether the held address is a multicast address of its family.
    pub fn is_multicast(self) -> bool {
        match self {
            Self::V4(ipv4) => ipv4.is_multicast(),
            Self::V6(ipv6) => ipv6.is_multicast(),
        }
    }
}

impl From<Ipv4Address> for IpAddress {
    fn from(ipv4: Ipv4Address) -> Self {
        Self::V4(ipv4)
    }
}

impl From<Ipv6Address> for IpAddress {
    fn from(ipv6: Ipv6Address) -> Self {
        Self::V6(ipv6)
    }
}

impl fmt::Display for IpAddress {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::V4(ipv4) => ipv4.fmt(f),
            Self::V6(ipv6) => ipv6.fmt(f),
        }
    }
}

impl fmt::Debug for IpAddress {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::V4(ipv4) => write!(f, "IpAddress::V4({})", ipv4),
            Self::V6(ipv6) => write!(f, "IpAddress::V6({})", ipv6),
        }
    }
}

impl FromStr for IpAddress {
    type Err = ParseAddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s.as_bytes()).ok_or_else(|| ParseAddressError::new("IP address"))
    }
}

impl Serialize for IpAddress {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::ser::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for IpAddress {
    fn deserialize<D>(deserializer: D) -> Result<IpAddress, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        IpAddress::parse(s.as_bytes())
            .ok_or_else(|| de::Error::custom(format!("invalid IP address: {}", s)))
    }
}

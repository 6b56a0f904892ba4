//! IPv4 address value type.

use std::fmt;
use std::ops::BitAnd;
use std::str::FromStr;

use serde::{de, Deserialize, Deserializer, Serialize};

use crate::cidr::Cidr;
use crate::decimal;
use crate::ipv6::Ipv6Address;
use crate::ParseAddressError;

/// Length of the longest textual form, `"255.255.255.255"`.
pub(crate) const MAX_TEXT_LEN: usize = 15;

/// An IPv4 address: 32 bits in network order.
///
/// The first dotted octet occupies the most significant 8 bits, the last the
/// least significant 8 bits. Equality and ordering are bitwise.
///
/// Octal (leading `0`) and hexadecimal (leading `0x`) octet notations are not
/// supported; octets are plain decimal, though the digit-by-digit parser
/// deliberately tolerates leading zeros like `"01"`.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Ipv4Address {
    addr: u32,
}

impl Ipv4Address {
    /// Byte size of an IPv4 address.
    pub const BYTES: usize = 4;

    /// Creates an address from its raw 32-bit network-order representation.
    pub const fn new(addr: u32) -> Self {
        Self { addr }
    }

    /// Creates an address from its four dotted octets.
    ///
    /// # Examples
    /// ```
    /// use ip_cidr_core::Ipv4Address;
    /// assert_eq!(Ipv4Address::from_octets(127, 0, 0, 1).to_string(), "127.0.0.1");
    /// ```
    pub const fn from_octets(a: u8, b: u8, c: u8, d: u8) -> Self {
        Self::new(u32::from_be_bytes([a, b, c, d]))
    }

    /// The raw 32-bit network-order representation.
    pub const fn value(self) -> u32 {
        self.addr
    }

    /// The four octets, most significant first.
    pub const fn octets(self) -> [u8; 4] {
        self.addr.to_be_bytes()
    }

    /// Parses dotted-decimal text like `"192.168.1.98"`.
    ///
    /// Exactly four decimal octets separated by `.`; anything else - wrong
    /// segment count, empty segment, non-digit, value past 255 - yields
    /// `None`.
    pub fn parse(text: &[u8]) -> Option<Self> {
        if !text.is_ascii() {
            return None;
        }
        Self::parse_ascii(text)
    }

    /// Parse path for input already known to be ASCII.
    ///
    /// Scans backward so each decoded octet can be shifted straight into its
    /// bit position without any intermediate segment list.
    pub(crate) fn parse_ascii(text: &[u8]) -> Option<Self> {
        debug_assert!(
            text.is_ascii(),
            "Ipv4Address::parse_ascii requires ASCII input"
        );

        let mut addr: u32 = 0;
        let mut segment: u8 = 0;
        let mut digit_idx: u8 = 0;
        let mut segment_idx: u8 = 0;

        for &byte in text.iter().rev() {
            if byte == b'.' {
                if segment_idx > 3 || digit_idx == 0 {
                    return None;
                }

                addr |= u32::from(segment) << (8 * segment_idx);

                segment = 0;
                digit_idx = 0;
                segment_idx += 1;
            } else {
                let digit = decimal::ascii_digit(byte)?;

                let multiplier: u8 = match digit_idx {
                    0 => 1,
                    1 => 10,
                    2 => 100,
                    _ => return None,
                };

                segment = digit.checked_mul(multiplier)?.checked_add(segment)?;
                digit_idx += 1;
            }
        }

        if segment_idx == 3 && digit_idx != 0 {
            addr |= u32::from(segment) << 24;
            Some(Self::new(addr))
        } else {
            None
        }
    }

    /// Decodes the first 4 bytes of a big-endian buffer.
    ///
    /// Returns `None` if fewer than 4 bytes are available.
    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        let octets: [u8; 4] = bytes.get(..4)?.try_into().ok()?;
        Some(Self::new(u32::from_be_bytes(octets)))
    }

    /// Decodes a truncated big-endian buffer of 0 to 4 leading bytes,
    /// zero-filling the remainder. Used when embedding partial addresses in
    /// wire protocols.
    pub fn from_leading_bytes(bytes: &[u8]) -> Option<Self> {
        if bytes.len() > 4 {
            return None;
        }
        let mut octets = [0u8; 4];
        octets[..bytes.len()].copy_from_slice(bytes);
        Some(Self::new(u32::from_be_bytes(octets)))
    }

    /// Writes the 4-byte big-endian form into the start of `buf`.
    ///
    /// Returns `false` without writing anything if `buf` is too short.
    pub fn encode(self, buf: &mut [u8]) -> bool {
        if buf.len() < 4 {
            return false;
        }
        buf[..4].copy_from_slice(&self.octets());
        true
    }

    /// Whether this is a loopback address: membership in `127.0.0.0/8`.
    pub fn is_loopback(self) -> bool {
        Cidr::<Self>::loopback().contains(self)
    }

    /// Whether this is a multicast address: membership in `224.0.0.0/4`.
    pub fn is_multicast(self) -> bool {
        Cidr::<Self>::multicast().contains(self)
    }

    /// Whether this is a link-local address: membership in `169.254.0.0/16`.
    pub fn is_link_local(self) -> bool {
        Cidr::<Self>::link_local().contains(self)
    }

    /// Narrows an IPv6 address in the IPv4-mapped space `::ffff:0:0/96` to
    /// the IPv4 address held in its low 32 bits.
    ///
    /// This is an exact check; no other IPv6 address converts.
    pub fn from_ipv6(ipv6: Ipv6Address) -> Option<Self> {
        if !Cidr::<Ipv6Address>::ipv4_mapped().contains(ipv6) {
            return None;
        }
        Some(Self::new(ipv6.value() as u32))
    }

    /// Writes the canonical dotted-decimal form into `buf`, returning the
    /// number of bytes written.
    fn write_text(self, buf: &mut [u8; MAX_TEXT_LEN]) -> usize {
        let octets = self.octets();
        let mut len = 0;

        for (idx, &octet) in octets.iter().enumerate() {
            if idx > 0 {
                buf[len] = b'.';
                len += 1;
            }
            decimal::write_u8(octet, &mut |byte| {
                buf[len] = byte;
                len += 1;
            });
        }

        len
    }
}

impl BitAnd for Ipv4Address {
    type Output = Self;

    fn bitand(self, other: Self) -> Self {
        Self::new(self.addr & other.addr)
    }
}

impl From<u32> for Ipv4Address {
    fn from(addr: u32) -> Self {
        Self::new(addr)
    }
}

impl From<Ipv4Address> for u32 {
    fn from(address: Ipv4Address) -> Self {
        address.value()
    }
}

impl fmt::Display for Ipv4Address {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let mut buf = [0u8; MAX_TEXT_LEN];
        let len = self.write_text(&mut buf);
        // the buffer only ever holds ASCII digits and dots
        f.write_str(std::str::from_utf8(&buf[..len]).map_err(|_| fmt::Error)?)
    }
}

impl fmt::Debug for Ipv4Address {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Ipv4Address({})", self)
    }
}

impl FromStr for Ipv4Address {
    type Err = ParseAddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s.as_bytes()).ok_or_else(|| ParseAddressError::new("IPv4 address"))
    }
}

impl Serialize for Ipv4Address {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::ser::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Ipv4Address {
    fn deserialize<D>(deserializer: D) -> Result<Ipv4Address, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ipv4Address::parse(s.as_bytes())
            .ok_or_else(|| de::Error::custom(format!("invalid IPv4 address: {}", s)))
    }
}

//! CIDR prefixes, generic over the address family.

use std::fmt;
use std::hash::Hash;
use std::ops::BitAnd;
use std::str::FromStr;

use serde::{de, Deserialize, Deserializer, Serialize};

use crate::decimal;
use crate::ip::IpAddress;
use crate::ipv4::Ipv4Address;
use crate::ipv6::Ipv6Address;
use crate::ParseAddressError;

mod sealed {
    pub trait Sealed {}
    impl Sealed for super::Ipv4Address {}
    impl Sealed for super::Ipv6Address {}
}

/// The address-family operations [`Cidr`] is built on.
///
/// Implemented by [`Ipv4Address`] and [`Ipv6Address`] only; the trait is
/// sealed.
pub trait Address:
    sealed::Sealed + Copy + Eq + Hash + fmt::Debug + fmt::Display + BitAnd<Output = Self>
{
    /// Bit width of the family: 32 or 128.
    const BIT_WIDTH: u8;

    /// The network mask with `prefix_len` leading one bits. Lengths past
    /// [`Self::BIT_WIDTH`] saturate to the all-ones mask.
    fn mask_of(prefix_len: u8) -> Self;

    /// Number of trailing zero bits, up to [`Self::BIT_WIDTH`].
    fn trailing_zeros(self) -> u8;

    /// Parses the family's textual notation.
    fn from_ascii(text: &[u8]) -> Option<Self>;

    /// Extracts this family's variant from an [`IpAddress`], without any
    /// cross-family conversion.
    fn from_ip_exact(ip: IpAddress) -> Option<Self>;
}

impl Address for Ipv4Address {
    const BIT_WIDTH: u8 = 32;

    fn mask_of(prefix_len: u8) -> Self {
        if prefix_len >= 32 {
            Self::new(u32::MAX)
        } else {
            Self::new(!(u32::MAX >> prefix_len))
        }
    }

    fn trailing_zeros(self) -> u8 {
        self.value().trailing_zeros() as u8
    }

    fn from_ascii(text: &[u8]) -> Option<Self> {
        Self::parse(text)
    }

    fn from_ip_exact(ip: IpAddress) -> Option<Self> {
        ip.ipv4()
    }
}

impl Address for Ipv6Address {
    const BIT_WIDTH: u8 = 128;

    fn mask_of(prefix_len: u8) -> Self {
        if prefix_len >= 128 {
            Self::new(u128::MAX)
        } else {
            Self::new(!(u128::MAX >> prefix_len))
        }
    }

    fn trailing_zeros(self) -> u8 {
        self.value().trailing_zeros() as u8
    }

    fn from_ascii(text: &[u8]) -> Option<Self> {
        Self::parse(text)
    }

    fn from_ip_exact(ip: IpAddress) -> Option<Self> {
        ip.ipv6()
    }
}

/// A CIDR prefix: a network address plus a contiguous leading-ones mask.
///
/// The stored prefix always has its host bits cleared, so two values cover
/// the same network exactly when they compare equal. Containment is a mask
/// and a comparison, O(1).
///
/// # Examples
/// ```
/// use ip_cidr_core::{Cidr, Ipv4Address};
///
/// let net = Cidr::new(Ipv4Address::from_octets(192, 168, 1, 1), 24);
/// assert_eq!(net.to_string(), "192.168.1.0/24");
/// assert!(net.contains(Ipv4Address::from_octets(192, 168, 1, 200)));
/// assert!(!net.contains(Ipv4Address::from_octets(192, 168, 2, 1)));
/// ```
#[derive(Copy, Clone, PartialEq, Eq, Hash)]
pub struct Cidr<A: Address> {
    prefix: A,
    mask: A,
}

impl<A: Address> Cidr<A> {
    /// Creates a prefix from an address and a prefix length.
    ///
    /// Never fails: lengths past the family's bit width are clamped to it,
    /// and host bits in `prefix` are cleared.
    pub fn new(prefix: A, prefix_len: u8) -> Self {
        let len = if prefix_len > A::BIT_WIDTH {
            log::trace!(
                "clamping prefix length {} to /{} for {}",
                prefix_len,
                A::BIT_WIDTH,
                prefix
            );
            A::BIT_WIDTH
        } else {
            prefix_len
        };

        let mask = A::mask_of(len);
        let masked = prefix & mask;
        if masked != prefix {
            log::trace!("cleared host bits of {} under /{}", prefix, len);
        }

        Self {
            prefix: masked,
            mask,
        }
    }

    /// Creates a prefix from an address and an explicit mask.
    ///
    /// Returns `None` unless the mask's one bits are contiguous from the
    /// top. Host bits in `prefix` are cleared as in [`Self::new`].
    pub fn with_mask(prefix: A, mask: A) -> Option<Self> {
        if A::mask_of(A::BIT_WIDTH - mask.trailing_zeros()) != mask {
            return None;
        }
        Some(Self {
            prefix: prefix & mask,
            mask,
        })
    }

    /// The network address, host bits cleared.
    pub fn prefix(self) -> A {
        self.prefix
    }

    /// The network mask.
    pub fn mask(self) -> A {
        self.mask
    }

    /// The prefix length, 0 to the family's bit width.
    pub fn prefix_len(self) -> u8 {
        A::BIT_WIDTH - self.mask.trailing_zeros()
    }

    /// Whether `address` falls inside this prefix.
    pub fn contains(self, address: A) -> bool {
        address & self.mask == self.prefix
    }

    /// Whether `ip` is of this family and falls inside this prefix. No
    /// cross-family conversion: an IPv4 prefix never contains an IPv6
    /// address, mapped or otherwise.
    pub fn contains_ip(self, ip: IpAddress) -> bool {
        match A::from_ip_exact(ip) {
            Some(address) => self.contains(address),
            None => false,
        }
    }

    /// Parses `"<address>/<length>"` notation, e.g. `"10.0.0.0/8"` or
    /// `"[2001:db8::]/32"`.
    ///
    /// The address part uses the family's parser; the length is 1-3 decimal
    /// digits, clamped past the bit width as in [`Self::new`]. Text with no
    /// `/` at all parses as a full-width single-address prefix.
    pub fn parse(text: &[u8]) -> Option<Self> {
        if !text.is_ascii() {
            return None;
        }
        Self::parse_ascii(text)
    }

    pub(crate) fn parse_ascii(text: &[u8]) -> Option<Self> {
        // scan backward so IPv6 colons never look like part of the length
        for (idx, &byte) in text.iter().enumerate().rev() {
            if byte == b'/' {
                let address = A::from_ascii(&text[..idx])?;
                let prefix_len = decimal::parse_u8(&text[idx + 1..])?;
                return Some(Self::new(address, prefix_len));
            }
        }

        let address = A::from_ascii(text)?;
        Some(Self::new(address, A::BIT_WIDTH))
    }
}

impl Cidr<Ipv4Address> {
    /// `127.0.0.0/8`.
    pub fn loopback() -> Self {
        Self::new(Ipv4Address::new(0x7F00_0000), 8)
    }

    /// `224.0.0.0/4`.
    pub fn multicast() -> Self {
        Self::new(Ipv4Address::new(0xE000_0000), 4)
    }

    /// `169.254.0.0/16`.
    pub fn link_local() -> Self {
        Self::new(Ipv4Address::new(0xA9FE_0000), 16)
    }
}

impl Cidr<Ipv6Address> {
    /// `::1/128`.
    pub fn loopback() -> Self {
        Self::new(Ipv6Address::new(1), 128)
    }

    /// `ff00::/8`.
    pub fn multicast() -> Self {
        Self::new(Ipv6Address::new(0xFF00 << 112), 8)
    }

    /// `fe80::/10`.
    pub fn link_local_unicast() -> Self {
        Self::new(Ipv6Address::new(0xFE80 << 112), 10)
    }

    /// `::ffff:0:0/96`, the IPv4-mapped space.
    pub fn ipv4_mapped() -> Self {
        Self::new(Ipv6Address::new(0xFFFF << 32), 96)
    }

    /// `::/96`, the deprecated IPv4-compatible space.
    pub fn ipv4_compatible() -> Self {
        Self::new(Ipv6Address::new(0), 96)
    }
}

impl<A: Address> fmt::Display for Cidr<A> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}/{}", self.prefix, self.prefix_len())
    }
}

impl<A: Address> fmt::Debug for Cidr<A> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Cidr({}/{})", self.prefix, self.prefix_len())
    }
}

impl<A: Address> FromStr for Cidr<A> {
    type Err = ParseAddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s.as_bytes()).ok_or_else(|| ParseAddressError::new("CIDR prefix"))
    }
}

impl<A: Address> Serialize for Cidr<A> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::ser::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de, A: Address> Deserialize<'de> for Cidr<A> {
    fn deserialize<D>(deserializer: D) -> Result<Cidr<A>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Cidr::parse(s.as_bytes())
            .ok_or_else(|| de::Error::custom(format!("invalid CIDR prefix: {}", s)))
    }
}

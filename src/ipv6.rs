//! IPv6 address value type.

use std::fmt;
use std::ops::BitAnd;
use std::str::FromStr;

use serde::{de, Deserialize, Deserializer, Serialize};

use crate::cidr::Cidr;
use crate::ipv4::Ipv4Address;
use crate::ParseAddressError;

/// Length of the longest textual form,
/// `"[ffff:ffff:ffff:ffff:ffff:ffff:ffff:ffff]"`.
pub(crate) const MAX_TEXT_LEN: usize = 41;

/// Maps an ASCII hex digit byte to its value, or `None` for anything else.
#[inline]
fn hex_digit(byte: u8) -> Option<u8> {
    match byte {
        b'0'..=b'9' => Some(byte - b'0'),
        b'a'..=b'f' => Some(byte - b'a' + 10),
        b'A'..=b'F' => Some(byte - b'A' + 10),
        _ => None,
    }
}

/// An IPv6 address: 128 bits in network order.
///
/// The first textual group occupies the most significant 16 bits, the last
/// the least significant 16 bits. Equality and ordering are bitwise.
///
/// The canonical textual form is bracketed and follows RFC 5952: lowercase
/// hex, no leading zeros within a group, and the longest (leftmost on a tie)
/// run of two or more zero groups compressed to `::`.
///
/// # Examples
/// ```
/// use ip_cidr_core::Ipv6Address;
///
/// let ip = Ipv6Address::parse(b"2001:DB8:0:0:0:0:0:1").unwrap();
/// assert_eq!(ip.to_string(), "[2001:db8::1]");
/// ```
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Ipv6Address {
    addr: u128,
}

impl Ipv6Address {
    /// Byte size of an IPv6 address.
    pub const BYTES: usize = 16;

    /// Creates an address from its raw 128-bit network-order representation.
    pub const fn new(addr: u128) -> Self {
        Self { addr }
    }

    /// Creates an address from its eight 16-bit groups, most significant
    /// first.
    pub const fn from_segments(segments: [u16; 8]) -> Self {
        let mut addr: u128 = 0;
        let mut idx = 0;
        while idx < 8 {
            addr = (addr << 16) | segments[idx] as u128;
            idx += 1;
        }
        Self::new(addr)
    }

    /// Creates an address from its sixteen network-order bytes.
    pub const fn from_octets(octets: [u8; 16]) -> Self {
        Self::new(u128::from_be_bytes(octets))
    }

    /// The raw 128-bit network-order representation.
    pub const fn value(self) -> u128 {
        self.addr
    }

    /// The eight 16-bit groups, most significant first.
    pub const fn segments(self) -> [u16; 8] {
        let mut out = [0u16; 8];
        let mut idx = 0;
        while idx < 8 {
            out[idx] = (self.addr >> (112 - 16 * idx)) as u16;
            idx += 1;
        }
        out
    }

    /// The sixteen network-order bytes.
    pub const fn octets(self) -> [u8; 16] {
        self.addr.to_be_bytes()
    }

    /// Parses RFC 4291 text like `"2001:db8::1"` or `"[::ffff:1.2.3.4]"`.
    ///
    /// Accepts an optional matched pair of square brackets, 1-4 hex digits
    /// per group in either case, at most one `::` standing for at least two
    /// groups, and a trailing embedded dotted-quad. Embedded IPv4 text is
    /// only accepted when the resulting address lands in the IPv4-mapped
    /// (`::ffff:0:0/96`) or IPv4-compatible (`::/96`) space.
    pub fn parse(text: &[u8]) -> Option<Self> {
        if !text.is_ascii() {
            return None;
        }
        Self::parse_ascii(text)
    }

    /// Parses IPv6 text whose trailing dotted-quad has already been decoded
    /// by the caller.
    ///
    /// `text` is everything up to but excluding the colon that preceded the
    /// dotted-quad, e.g. `b"::ffff"` for `"::ffff:1.2.3.4"`. With
    /// `pre_parsed` of `None` this behaves exactly like [`Self::parse`].
    pub fn parse_with_embedded_ipv4(
        text: &[u8],
        pre_parsed: Option<Ipv4Address>,
    ) -> Option<Self> {
        if !text.is_ascii() {
            return None;
        }
        Self::parse_ascii_with_embedded_ipv4(text, pre_parsed)
    }

    pub(crate) fn parse_ascii(text: &[u8]) -> Option<Self> {
        Self::parse_ascii_with_embedded_ipv4(text, None)
    }

    pub(crate) fn parse_ascii_with_embedded_ipv4(
        text: &[u8],
        pre_parsed: Option<Ipv4Address>,
    ) -> Option<Self> {
        let (address, embedded) = Self::scan(text, pre_parsed)?;

        // embedded dotted-quads are only meaningful in the two spaces that
        // define an IPv4 payload in the low 32 bits
        if embedded
            && !Cidr::<Self>::ipv4_mapped().contains(address)
            && !Cidr::<Self>::ipv4_compatible().contains(address)
        {
            return None;
        }

        Some(address)
    }

    /// Single-pass scan over ASCII text. Returns the decoded address and
    /// whether an embedded dotted-quad contributed its low bytes.
    fn scan(text: &[u8], pre_parsed: Option<Ipv4Address>) -> Option<(Self, bool)> {
        debug_assert!(text.is_ascii(), "Ipv6Address::scan requires ASCII input");

        if text.len() < 2 {
            return None;
        }

        // an opening bracket requires its closing partner
        let text = if text[0] == b'[' {
            if text[text.len() - 1] != b']' {
                return None;
            }
            &text[1..text.len() - 1]
        } else {
            text
        };

        if text.len() < 2 {
            return None;
        }

        // a leading colon is only legal as the first half of `::`
        let start = if text[0] == b':' {
            if text[1] != b':' {
                return None;
            }
            1
        } else {
            0
        };

        let last = text.len() - 1;

        let mut buf = [0u8; 16];
        let mut written: usize = 0;
        let mut group: u16 = 0;
        let mut group_digits: u8 = 0;
        let mut last_colon: Option<usize> = None;
        let mut compress_at: Option<usize> = None;
        let mut embedded = false;

        for (idx, &byte) in text.iter().enumerate().skip(start) {
            match byte {
                b':' => {
                    if group_digits == 0 {
                        // second colon of a `::`
                        if compress_at.is_some() {
                            return None;
                        }
                        compress_at = Some(written);
                    } else {
                        // a single colon cannot end the text
                        if idx == last {
                            return None;
                        }
                        if written == 16 {
                            return None;
                        }
                        buf[written..written + 2].copy_from_slice(&group.to_be_bytes());
                        written += 2;
                        group = 0;
                        group_digits = 0;
                    }
                    last_colon = Some(idx);
                }
                b'.' => {
                    // the bytes since the last colon are the start of a
                    // dotted-quad covering the rest of the text
                    if written > 12 || pre_parsed.is_some() {
                        return None;
                    }
                    let v4_start = last_colon.map_or(0, |colon| colon + 1);
                    let ipv4 = Ipv4Address::parse_ascii(&text[v4_start..])?;
                    buf[written..written + 4].copy_from_slice(&ipv4.octets());
                    written += 4;
                    group = 0;
                    group_digits = 0;
                    embedded = true;
                    break;
                }
                _ => {
                    let digit = hex_digit(byte)?;
                    if group_digits == 4 {
                        return None;
                    }
                    group = (group << 4) | u16::from(digit);
                    group_digits += 1;
                }
            }
        }

        if group_digits > 0 {
            if written > 14 {
                return None;
            }
            buf[written..written + 2].copy_from_slice(&group.to_be_bytes());
            written += 2;
        }

        if let Some(ipv4) = pre_parsed {
            if written > 12 {
                return None;
            }
            buf[written..written + 4].copy_from_slice(&ipv4.octets());
            written += 4;
            embedded = true;
        }

        if let Some(before) = compress_at {
            // the `::` must stand for at least two groups
            if written > 12 {
                return None;
            }
            let after = written - before;
            buf.copy_within(before..written, 16 - after);
            buf[before..16 - after].fill(0);
        } else if written != 16 {
            return None;
        }

        Some((Self::from_octets(buf), embedded))
    }

    /// Decodes the first 16 bytes of a big-endian buffer.
    ///
    /// Returns `None` if fewer than 16 bytes are available.
    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        let octets: [u8; 16] = bytes.get(..16)?.try_into().ok()?;
        Some(Self::from_octets(octets))
    }

    /// Decodes a truncated big-endian buffer of 0 to 16 leading bytes,
    /// zero-filling the remainder.
    pub fn from_leading_bytes(bytes: &[u8]) -> Option<Self> {
        if bytes.len() > 16 {
            return None;
        }
        let mut octets = [0u8; 16];
        octets[..bytes.len()].copy_from_slice(bytes);
        Some(Self::from_octets(octets))
    }

    /// Writes the 16-byte big-endian form into the start of `buf`.
    ///
    /// Returns `false` without writing anything if `buf` is too short.
    pub fn encode(self, buf: &mut [u8]) -> bool {
        if buf.len() < 16 {
            return false;
        }
        buf[..16].copy_from_slice(&self.octets());
        true
    }

    /// Whether this is the loopback address `::1`.
    pub fn is_loopback(self) -> bool {
        Cidr::<Self>::loopback().contains(self)
    }

    /// Whether this is a multicast address: membership in `ff00::/8`.
    pub fn is_multicast(self) -> bool {
        Cidr::<Self>::multicast().contains(self)
    }

    /// Whether this is a link-local unicast address: membership in
    /// `fe80::/10`.
    pub fn is_link_local_unicast(self) -> bool {
        Cidr::<Self>::link_local_unicast().contains(self)
    }

    /// Widens an IPv4 address into the IPv4-mapped space `::ffff:0:0/96`.
    pub const fn from_ipv4(ipv4: Ipv4Address) -> Self {
        Self::new(0x0000_0000_0000_0000_0000_FFFF_0000_0000 | ipv4.value() as u128)
    }

    /// Writes the canonical bracketed form into `buf`, returning the number
    /// of bytes written.
    fn write_text(self, buf: &mut [u8; MAX_TEXT_LEN]) -> usize {
        if self.addr == 0 {
            buf[..4].copy_from_slice(b"[::]");
            return 4;
        }

        let segments = self.segments();

        // longest run of two or more zero groups; ties go to the leftmost
        let mut run: Option<(usize, usize)> = None;
        let mut run_start: Option<usize> = None;
        for idx in 0..=8 {
            if idx < 8 && segments[idx] == 0 {
                if run_start.is_none() {
                    run_start = Some(idx);
                }
            } else if let Some(start) = run_start.take() {
                let end = idx - 1;
                if end > start {
                    let longer = match run {
                        Some((best_start, best_end)) => end - start > best_end - best_start,
                        None => true,
                    };
                    if longer {
                        run = Some((start, end));
                    }
                }
            }
        }

        let mut len = 0;
        buf[len] = b'[';
        len += 1;

        let mut idx = 0;
        while idx < 8 {
            if let Some((start, end)) = run {
                if idx == start {
                    if idx == 0 {
                        buf[len] = b':';
                        len += 1;
                    }
                    buf[len] = b':';
                    len += 1;
                    idx = end + 1;
                    continue;
                }
            }

            let group = segments[idx];
            let mut wrote = false;
            for shift in [12u32, 8, 4, 0] {
                let nibble = ((group >> shift) & 0xF) as u8;
                if nibble == 0 && !wrote && shift != 0 {
                    continue;
                }
                wrote = true;
                buf[len] = if nibble < 10 {
                    nibble + b'0'
                } else {
                    nibble - 10 + b'a'
                };
                len += 1;
            }

            if idx < 7 {
                buf[len] = b':';
                len += 1;
            }
            idx += 1;
        }

        buf[len] = b']';
        len += 1;
        len
    }
}

impl BitAnd for Ipv6Address {
    type Output = Self;

    fn bitand(self, other: Self) -> Self {
        Self::new(self.addr & other.addr)
    }
}

impl From<u128> for Ipv6Address {
    fn from(addr: u128) -> Self {
        Self::new(addr)
    }
}

impl From<Ipv6Address> for u128 {
    fn from(address: Ipv6Address) -> Self {
        address.value()
    }
}

impl fmt::Display for Ipv6Address {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let mut buf = [0u8; MAX_TEXT_LEN];
        let len = self.write_text(&mut buf);
        // the buffer only ever holds ASCII hex digits, colons and brackets
        f.write_str(std::str::from_utf8(&buf[..len]).map_err(|_| fmt::Error)?)
    }
}

impl fmt::Debug for Ipv6Address {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Ipv6Address({})", self)
    }
}

impl FromStr for Ipv6Address {
    type Err = ParseAddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s.as_bytes()).ok_or_else(|| ParseAddressError::new("IPv6 address"))
    }
}

impl Serialize for Ipv6Address {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::ser::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Ipv6Address {
    fn deserialize<D>(deserializer: D) -> Result<Ipv6Address, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ipv6Address::parse(s.as_bytes())
            .ok_or_else(|| de::Error::custom(format!("invalid IPv6 address: {}", s)))
    }
}

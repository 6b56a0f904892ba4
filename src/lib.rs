//! Byte-level parsing and canonical encoding for IPv4/IPv6 addresses and
//! CIDR prefixes.
//!
//! The crate turns untrusted textual input into compact binary address
//! values and re-encodes those values into a single canonical textual form:
//! - [`Ipv4Address`] - dotted-decimal parsing and encoding over a `u32`
//! - [`Ipv6Address`] - RFC 4291/5952 parsing and canonical compressed
//!   encoding over a `u128`, including IPv4-in-IPv6 embedding
//! - [`IpAddress`] - a closed union over the two address families
//! - [`Cidr`] - a generic prefix/mask pair with O(1) containment testing
//!
//! Every operation is a pure function of its input: no allocation on the
//! parse paths, no shared state, no locks. Malformed input is reported as
//! `None`, never as a panic.
//!
//! ```
//! use ip_cidr_core::{Cidr, IpAddress, Ipv4Address};
//!
//! let cidr = Cidr::<Ipv4Address>::parse(b"192.168.1.1/24").unwrap();
//! assert_eq!(cidr.to_string(), "192.168.1.0/24");
//! assert!(cidr.contains(Ipv4Address::parse(b"192.168.1.200").unwrap()));
//!
//! let ip = IpAddress::parse(b"1.2.3.4").unwrap();
//! assert!(ip.is_ipv4());
//! ```

use std::error::Error;
use std::fmt;

mod cidr;
pub mod decimal;
mod ip;
mod ipv4;
mod ipv6;
pub mod labels;

pub use cidr::{Address, Cidr};
pub use ip::IpAddress;
pub use ipv4::Ipv4Address;
pub use ipv6::Ipv6Address;

/// Error type for the `FromStr` implementations.
///
/// The byte-slice parsers report failure as `None`; this type only exists so
/// that `"...".parse::<Ipv4Address>()` and friends have an error to return.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ParseAddressError {
    kind: &'static str,
}

impl ParseAddressError {
    pub(crate) fn new(kind: &'static str) -> Self {
        Self { kind }
    }
}

impl fmt::Display for ParseAddressError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "invalid {}", self.kind)
    }
}

impl Error for ParseAddressError {}

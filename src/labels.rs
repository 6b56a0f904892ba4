//! Address parsing over pre-tokenized host names.
//!
//! Host-name tokenizers hand out the dot-separated labels of a name as byte
//! ranges into the original text, the separating dots excluded. Literal IP
//! addresses show up in that shape too: a dotted-quad is four decimal
//! labels, a plain IPv6 literal is a single label, and an IPv6 literal with
//! an embedded dotted-quad is an IPv6 head label followed by three decimal
//! labels. The functions here parse addresses straight out of that label
//! stream without re-joining the text.

use std::iter;
use std::ops::Range;

use crate::decimal;
use crate::ip::IpAddress;
use crate::ipv4::Ipv4Address;
use crate::ipv6::Ipv6Address;

/// Parses an IPv4 address from exactly four decimal labels.
///
/// # Examples
/// ```
/// use ip_cidr_core::labels::ipv4_from_labels;
/// use ip_cidr_core::Ipv4Address;
///
/// let text = b"192.168.1.98";
/// let labels = [0..3, 4..7, 8..9, 10..12];
/// assert_eq!(
///     ipv4_from_labels(text, labels),
///     Some(Ipv4Address::from_octets(192, 168, 1, 98))
/// );
/// ```
pub fn ipv4_from_labels<I>(text: &[u8], labels: I) -> Option<Ipv4Address>
where
    I: IntoIterator<Item = Range<usize>>,
{
    if !text.is_ascii() {
        return None;
    }

    let mut labels = labels.into_iter();
    let mut octets = [0u8; 4];
    for octet in &mut octets {
        *octet = decimal::parse_u8(text.get(labels.next()?)?)?;
    }
    if labels.next().is_some() {
        return None;
    }

    Some(Ipv4Address::from_octets(
        octets[0], octets[1], octets[2], octets[3],
    ))
}

/// Parses an IPv6 address from a label stream.
///
/// A single label is a plain IPv6 literal. Four labels are an IPv6 literal
/// ending in an embedded dotted-quad: the first label carries the IPv6 head
/// and the quad's first octet, the remaining three labels carry the other
/// octets. Brackets, if present, wrap the whole literal and so sit on the
/// first and last labels.
pub fn ipv6_from_labels<I>(text: &[u8], labels: I) -> Option<Ipv6Address>
where
    I: IntoIterator<Item = Range<usize>>,
{
    if !text.is_ascii() {
        return None;
    }

    let mut labels = labels.into_iter();
    let first = labels.next()?;
    match labels.next() {
        None => Ipv6Address::parse_ascii(text.get(first)?),
        Some(second) => embedded_ipv6(text, first, iter::once(second).chain(labels)),
    }
}

/// Parses an address of either family from a label stream.
///
/// A single label is IPv6. With more labels, a decimal first label selects
/// the strict four-label dotted-quad shape; anything else is tried as an
/// IPv6 literal with an embedded dotted-quad.
pub fn ip_from_labels<I>(text: &[u8], labels: I) -> Option<IpAddress>
where
    I: IntoIterator<Item = Range<usize>>,
{
    if !text.is_ascii() {
        return None;
    }

    let mut labels = labels.into_iter();
    let first = labels.next()?;
    let second = match labels.next() {
        None => return Ipv6Address::parse_ascii(text.get(first)?).map(IpAddress::V6),
        Some(second) => second,
    };

    let first_slice = text.get(first.clone())?;
    if let Some(octet1) = decimal::parse_u8(first_slice) {
        let octet2 = decimal::parse_u8(text.get(second)?)?;
        let octet3 = decimal::parse_u8(text.get(labels.next()?)?)?;
        let octet4 = decimal::parse_u8(text.get(labels.next()?)?)?;
        if labels.next().is_some() {
            return None;
        }
        return Some(IpAddress::V4(Ipv4Address::from_octets(
            octet1, octet2, octet3, octet4,
        )));
    }

    embedded_ipv6(text, first, iter::once(second).chain(labels)).map(IpAddress::V6)
}

/// The four-label embedded-dotted-quad shape. `first` holds the IPv6 head
/// up to its last colon plus the quad's first octet; `rest` must yield
/// exactly the three remaining octet labels.
fn embedded_ipv6<I>(text: &[u8], first: Range<usize>, mut rest: I) -> Option<Ipv6Address>
where
    I: Iterator<Item = Range<usize>>,
{
    let first_slice = text.get(first.clone())?;
    let colon = first_slice.iter().rposition(|&byte| byte == b':')?;
    let colon_abs = first.start + colon;

    let octet1 = decimal::parse_u8(&first_slice[colon + 1..])?;
    let bracketed = first_slice[0] == b'[';
    let head_start = first.start + usize::from(bracketed);
    if head_start > colon_abs {
        return None;
    }

    let octet2 = decimal::parse_u8(text.get(rest.next()?)?)?;
    let octet3 = decimal::parse_u8(text.get(rest.next()?)?)?;

    let mut last_slice = text.get(rest.next()?)?;
    if bracketed {
        if last_slice.last() != Some(&b']') {
            return None;
        }
        last_slice = &last_slice[..last_slice.len() - 1];
    }
    let octet4 = decimal::parse_u8(last_slice)?;
    if rest.next().is_some() {
        return None;
    }

    // the quad sat right after a `::`; hand the whole compression marker on
    let head = &text[head_start..colon_abs];
    let head: &[u8] = if head == b":" { b"::" } else { head };

    let ipv4 = Ipv4Address::from_octets(octet1, octet2, octet3, octet4);
    Ipv6Address::parse_ascii_with_embedded_ipv4(head, Some(ipv4))
}

#[cfg(test)]
mod tests {
    use super::*;

    // splits like a host-name tokenizer would: ranges between the dots
    fn split(text: &[u8]) -> Vec<Range<usize>> {
        let mut labels = Vec::new();
        let mut start = 0;
        for (idx, &byte) in text.iter().enumerate() {
            if byte == b'.' {
                labels.push(start..idx);
                start = idx + 1;
            }
        }
        labels.push(start..text.len());
        labels
    }

    #[test]
    fn test_ipv4_from_labels() {
        let text = b"192.168.1.98";
        assert_eq!(
            ipv4_from_labels(text, split(text)),
            Some(Ipv4Address::from_octets(192, 168, 1, 98))
        );

        let text = b"0.0.0.0";
        assert_eq!(
            ipv4_from_labels(text, split(text)),
            Some(Ipv4Address::from_octets(0, 0, 0, 0))
        );
    }

    #[test]
    fn test_ipv4_from_labels_rejects_bad_shapes() {
        let text = b"192.168.1.98";
        // wrong label count
        assert_eq!(ipv4_from_labels(text, [0..3, 4..7, 8..9]), None);
        assert_eq!(
            ipv4_from_labels(text, [0..3, 4..7, 8..9, 10..12, 10..12]),
            None
        );
        // out-of-bounds range
        assert_eq!(ipv4_from_labels(text, [0..3, 4..7, 8..9, 10..99]), None);

        let text = b"192.168.1.256";
        assert_eq!(ipv4_from_labels(text, split(text)), None);

        let text = b"a.b.c.d";
        assert_eq!(ipv4_from_labels(text, split(text)), None);

        let text = "192.168.1.9\u{AD}".as_bytes();
        assert_eq!(ipv4_from_labels(text, [0..3, 4..7, 8..9, 10..13]), None);
    }

    #[test]
    fn test_ipv6_from_single_label() {
        let text = b"2001:db8::1";
        assert_eq!(
            ipv6_from_labels(text, split(text)),
            Some(Ipv6Address::new(0x2001_0DB8_0000_0000_0000_0000_0000_0001))
        );

        let text = b"[::1]";
        assert_eq!(ipv6_from_labels(text, split(text)), Some(Ipv6Address::new(1)));

        let text = b"not-an-address";
        assert_eq!(ipv6_from_labels(text, split(text)), None);
    }

    #[test]
    fn test_ipv6_from_embedded_quad_labels() {
        let text = b"::ffff:1.2.3.4";
        assert_eq!(
            ipv6_from_labels(text, split(text)),
            Some(Ipv6Address::new(0x0000_0000_0000_0000_0000_FFFF_0102_0304))
        );

        let text = b"[::ffff:1.2.3.4]";
        assert_eq!(
            ipv6_from_labels(text, split(text)),
            Some(Ipv6Address::new(0x0000_0000_0000_0000_0000_FFFF_0102_0304))
        );

        let text = b"0:0:0:0:0:ffff:1.2.3.4";
        assert_eq!(
            ipv6_from_labels(text, split(text)),
            Some(Ipv6Address::new(0x0000_0000_0000_0000_0000_FFFF_0102_0304))
        );

        // quad directly after the compression marker
        let text = b"::1.2.3.4";
        assert_eq!(
            ipv6_from_labels(text, split(text)),
            Some(Ipv6Address::new(0x0000_0000_0000_0000_0000_0000_0102_0304))
        );

        let text = b"[::1.2.3.4]";
        assert_eq!(
            ipv6_from_labels(text, split(text)),
            Some(Ipv6Address::new(0x0000_0000_0000_0000_0000_0000_0102_0304))
        );
    }

    #[test]
    fn test_ipv6_from_labels_rejects_bad_shapes() {
        // outside the mapped/compatible spaces
        let text = b"1:2:3:4:5:6:1.2.3.4";
        assert_eq!(ipv6_from_labels(text, split(text)), None);

        // no colon in the first label
        let text = b"1.2.3.4";
        assert_eq!(ipv6_from_labels(text, split(text)), None);

        // octet past 255
        let text = b"::ffff:1.2.3.256";
        assert_eq!(ipv6_from_labels(text, split(text)), None);

        // too many quad labels
        let text = b"::ffff:1.2.3.4.5";
        assert_eq!(ipv6_from_labels(text, split(text)), None);

        // opening bracket without its partner on the last label
        let text = b"[::ffff:1.2.3.4";
        assert_eq!(ipv6_from_labels(text, split(text)), None);
    }

    #[test]
    fn test_ip_from_labels() {
        let text = b"1.2.3.4";
        assert_eq!(
            ip_from_labels(text, split(text)),
            Some(IpAddress::V4(Ipv4Address::from_octets(1, 2, 3, 4)))
        );

        let text = b"2001:db8::1";
        assert_eq!(
            ip_from_labels(text, split(text)),
            Some(IpAddress::V6(Ipv6Address::new(
                0x2001_0DB8_0000_0000_0000_0000_0000_0001
            )))
        );

        let text = b"::ffff:1.2.3.4";
        assert_eq!(
            ip_from_labels(text, split(text)),
            Some(IpAddress::V6(Ipv6Address::new(
                0x0000_0000_0000_0000_0000_FFFF_0102_0304
            )))
        );
    }

    #[test]
    fn test_ip_from_labels_rejects_bad_shapes() {
        // a decimal first label commits to the dotted-quad shape
        let text = b"1.2";
        assert_eq!(ip_from_labels(text, split(text)), None);
        let text = b"1.2.x.4";
        assert_eq!(ip_from_labels(text, split(text)), None);
        let text = b"300.1.2.3";
        assert_eq!(ip_from_labels(text, split(text)), None);

        let text = b"host.example.com";
        assert_eq!(ip_from_labels(text, split(text)), None);

        let text = b"";
        assert_eq!(ip_from_labels(text, iter::empty()), None);
    }
}

//! Shortest-form ASCII decimal codec for byte values.
//!
//! Shared by the IPv4 parser/encoder and by CIDR prefix-length parsing.

/// Maps an ASCII digit byte to its value, or `None` for anything else.
#[inline]
pub(crate) fn ascii_digit(byte: u8) -> Option<u8> {
    match byte {
        b'0'..=b'9' => Some(byte - b'0'),
        _ => None,
    }
}

/// Reads a span of 1-3 ASCII digits like `"127"` as a `u8`.
///
/// Returns `None` if the span is empty, longer than 3 bytes, contains a
/// non-digit, or encodes a value greater than 255. No sign is accepted.
///
/// # Examples
/// ```
/// use ip_cidr_core::decimal::parse_u8;
/// assert_eq!(parse_u8(b"255"), Some(255));
/// assert_eq!(parse_u8(b"256"), None);
/// ```
#[inline]
pub fn parse_u8(text: &[u8]) -> Option<u8> {
    if text.is_empty() || text.len() > 3 {
        return None;
    }

    let last = text.len() - 1;
    let mut value = ascii_digit(text[last])?;

    if text.len() > 1 {
        // units + 10 * tens is at most 99, no overflow possible yet
        value += 10 * ascii_digit(text[last - 1])?;

        if text.len() == 3 {
            let hundreds = ascii_digit(text[0])?.checked_mul(100)?;
            value = value.checked_add(hundreds)?;
        }
    }

    Some(value)
}

/// Emits the shortest decimal ASCII form of `value`, most significant digit
/// first, one byte per callback invocation. No leading zeros; `0` emits a
/// single `b'0'`.
#[inline]
pub fn write_u8(value: u8, emit: &mut impl FnMut(u8)) {
    let units = value % 10;
    let tens = (value / 10) % 10;
    let hundreds = value / 100;

    let mut all_zeros_so_far = true;

    if hundreds != 0 {
        all_zeros_so_far = false;
        emit(hundreds + b'0');
    }
    if !(tens == 0 && all_zeros_so_far) {
        emit(tens + b'0');
    }
    emit(units + b'0');
}

//! Parsing of bit position text such as `"3"` or `"3-5"`.

use super::parameter::MAX_FIRST_BIT;

/// Parse a bit position entry into `(first_bit, bit_count)`.
///
/// Accepts a single bit (`"3"` gives `(3, 1)`) or an inclusive range whose
/// endpoints may come in either order (`"5-3"` equals `"3-5"`, `(3, 3)`).
/// The bit count is clamped to `max_bits`. Returns `None` for anything
/// else, including a `max_bits` of zero and ranges starting above
/// [`MAX_FIRST_BIT`].
pub fn parse_bit_range(text: &str, max_bits: u32) -> Option<(u32, u32)> {
    let text = text.trim();
    if max_bits == 0 || text.is_empty() {
        return None;
    }

    let (first, count) = match text.split_once('-') {
        None => (parse_bit(text)?, 1),
        Some((a, b)) => {
            let a = parse_bit(a)?;
            let b = parse_bit(b)?;
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            (lo, (hi - lo).saturating_add(1))
        }
    };
    if first > MAX_FIRST_BIT {
        return None;
    }

    Some((first, count.min(max_bits)))
}

fn parse_bit(s: &str) -> Option<u32> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}

/// Text shown for a bit range: `"3"` for one bit, `"3-5"` otherwise.
pub fn bit_range_text(first_bit: u32, bit_count: u32) -> String {
    if bit_count <= 1 {
        format!("{first_bit}")
    } else {
        format!("{}-{}", first_bit, first_bit.saturating_add(bit_count - 1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_bit() {
        assert_eq!(parse_bit_range("3", 4), Some((3, 1)));
        assert_eq!(parse_bit_range(" 0 ", 4), Some((0, 1)));
    }

    #[test]
    fn ranges_are_order_independent() {
        assert_eq!(parse_bit_range("3-5", 4), Some((3, 3)));
        assert_eq!(parse_bit_range("5-3", 4), Some((3, 3)));
        assert_eq!(parse_bit_range("7-7", 4), Some((7, 1)));
    }

    #[test]
    fn count_is_clamped() {
        assert_eq!(parse_bit_range("0-15", 4), Some((0, 4)));
        assert_eq!(parse_bit_range("2-9", 8), Some((2, 8)));
    }

    #[test]
    fn garbage_is_rejected() {
        assert_eq!(parse_bit_range("", 4), None);
        assert_eq!(parse_bit_range("a", 4), None);
        assert_eq!(parse_bit_range("-3", 4), None);
        assert_eq!(parse_bit_range("1-2-3", 4), None);
        assert_eq!(parse_bit_range("+1", 4), None);
        assert_eq!(parse_bit_range("1", 0), None);
    }

    #[test]
    fn extreme_ranges_do_not_overflow() {
        assert_eq!(parse_bit_range("0-4294967295", 4), Some((0, 4)));
        assert_eq!(parse_bit_range("4294967295-0", 16), Some((0, 16)));
        assert_eq!(parse_bit_range("4294967295", 4), None);
        assert_eq!(parse_bit_range("256", 4), None);
        assert_eq!(parse_bit_range("255", 4), Some((255, 1)));
        assert_eq!(parse_bit_range("99999999999", 4), None);
        assert_eq!(bit_range_text(u32::MAX, 4), "4294967295-4294967295");
    }

    #[test]
    fn text() {
        assert_eq!(bit_range_text(3, 1), "3");
        assert_eq!(bit_range_text(3, 3), "3-5");
    }
}

//! Lenient line-item count coercion.
//!
//! # Responsibility
//! - Turn user-entered count text or numbers into a non-negative count.
//!
//! # Invariants
//! - Coercion never fails: unparseable or negative input becomes `0`.
//! - Text is read by its leading integer, so `"12 pcs"` counts as 12 and
//!   `"3.9"` as 3.

/// Non-negative line-item count.
pub type Count = u32;

/// Values accepted wherever a line-item count is edited.
pub trait LenientCount {
    /// Coerces `self` into a count, degrading invalid input to `0`.
    fn to_count(&self) -> Count;
}

impl LenientCount for str {
    fn to_count(&self) -> Count {
        parse_int_prefix(self).map_or(0, clamp_to_count)
    }
}

impl LenientCount for &str {
    fn to_count(&self) -> Count {
        (**self).to_count()
    }
}

impl LenientCount for String {
    fn to_count(&self) -> Count {
        self.as_str().to_count()
    }
}

impl LenientCount for f64 {
    fn to_count(&self) -> Count {
        if !self.is_finite() || *self <= 0.0 {
            return 0;
        }
        let truncated = self.trunc();
        if truncated >= f64::from(Count::MAX) {
            Count::MAX
        } else {
            truncated as Count
        }
    }
}

impl LenientCount for i64 {
    fn to_count(&self) -> Count {
        clamp_to_count(*self)
    }
}

impl LenientCount for i32 {
    fn to_count(&self) -> Count {
        clamp_to_count(i64::from(*self))
    }
}

impl LenientCount for u32 {
    fn to_count(&self) -> Count {
        *self
    }
}

impl LenientCount for usize {
    fn to_count(&self) -> Count {
        Count::try_from(*self).unwrap_or(Count::MAX)
    }
}

/// Reads the leading base-10 integer of `text`.
///
/// Leading whitespace and one sign character are accepted; anything after the
/// first non-digit is ignored. Returns `None` when no digit follows. Values
/// beyond the `i64` range saturate.
pub(crate) fn parse_int_prefix(text: &str) -> Option<i64> {
    let trimmed = text.trim_start();
    let (negative, digits) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    let digit_len = digits.bytes().take_while(u8::is_ascii_digit).count();
    if digit_len == 0 {
        return None;
    }

    let magnitude = digits[..digit_len].bytes().fold(0_i64, |acc, digit| {
        acc.saturating_mul(10)
            .saturating_add(i64::from(digit - b'0'))
    });
    Some(if negative { -magnitude } else { magnitude })
}

fn clamp_to_count(value: i64) -> Count {
    if value <= 0 {
        0
    } else {
        Count::try_from(value).unwrap_or(Count::MAX)
    }
}

#[cfg(test)]
mod tests {
    use super::{parse_int_prefix, LenientCount};

    #[test]
    fn parse_int_prefix_reads_leading_digits() {
        assert_eq!(parse_int_prefix("42"), Some(42));
        assert_eq!(parse_int_prefix("  7 items"), Some(7));
        assert_eq!(parse_int_prefix("3.9"), Some(3));
        assert_eq!(parse_int_prefix("-5"), Some(-5));
        assert_eq!(parse_int_prefix("+8"), Some(8));
    }

    #[test]
    fn parse_int_prefix_rejects_non_numeric_text() {
        assert_eq!(parse_int_prefix(""), None);
        assert_eq!(parse_int_prefix("abc"), None);
        assert_eq!(parse_int_prefix("-"), None);
        assert_eq!(parse_int_prefix("x12"), None);
    }

    #[test]
    fn malformed_text_coerces_to_zero() {
        assert_eq!("".to_count(), 0);
        assert_eq!("ten".to_count(), 0);
        assert_eq!("-3".to_count(), 0);
        assert_eq!(String::from("12abc").to_count(), 12);
    }

    #[test]
    fn numbers_are_truncated_and_clamped() {
        assert_eq!(4.8_f64.to_count(), 4);
        assert_eq!((-1.5_f64).to_count(), 0);
        assert_eq!(f64::NAN.to_count(), 0);
        assert_eq!(f64::INFINITY.to_count(), 0);
        assert_eq!((-9_i64).to_count(), 0);
        assert_eq!(i64::MAX.to_count(), u32::MAX);
        assert_eq!("99999999999999999999".to_count(), u32::MAX);
    }
}

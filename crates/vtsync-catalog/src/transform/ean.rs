//! EAN/GTIN clean-up.
//!
//! Barcodes pass through a spreadsheet on the supplier side, which turns
//! `8432560000007` into `8,43256E+12`. The mantissa is expanded with decimal
//! arithmetic and rounded to the nearest integer; precision already lost in
//! the export cannot be recovered.

use std::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};

/// Repair a raw supplier EAN. Returns `None` when nothing numeric remains.
#[must_use]
pub fn repair_ean(raw: &str) -> Option<String> {
    let compact: String = raw.chars().filter(|c| !c.is_whitespace()).collect();
    if compact.is_empty() {
        return None;
    }
    let normalized = compact.replace(',', ".");

    let numeric = if normalized.contains(['e', 'E']) {
        match Decimal::from_scientific(&normalized) {
            Ok(value) => round_to_integer(value),
            Err(e) => {
                tracing::warn!(ean = raw, error = %e, "could not expand scientific-notation EAN");
                return None;
            }
        }
    } else if is_plain_decimal(&normalized) {
        Decimal::from_str(&normalized).map_or(normalized, round_to_integer)
    } else {
        normalized
    };

    let digits: String = numeric.chars().filter(char::is_ascii_digit).collect();
    if digits.is_empty() {
        None
    } else {
        Some(digits)
    }
}

fn round_to_integer(value: Decimal) -> String {
    value
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .trunc()
        .to_string()
}

/// `123.0`, `123.45`: digits with a single dot.
fn is_plain_decimal(s: &str) -> bool {
    s.matches('.').count() == 1
        && s.chars().all(|c| c.is_ascii_digit() || c == '.')
        && !s.starts_with('.')
        && !s.ends_with('.')
}

/// Check the GS1 check digit of an 8, 12, 13 or 14 digit code.
#[must_use]
pub fn is_valid_gtin(code: &str) -> bool {
    if !matches!(code.len(), 8 | 12 | 13 | 14) || !code.bytes().all(|b| b.is_ascii_digit()) {
        return false;
    }
    let digits: Vec<u32> = code.bytes().map(|b| u32::from(b - b'0')).collect();
    let Some((check, body)) = digits.split_last() else {
        return false;
    };
    let sum: u32 = body
        .iter()
        .rev()
        .enumerate()
        .map(|(i, d)| if i % 2 == 0 { d * 3 } else { *d })
        .sum();
    (10 - sum % 10) % 10 == *check
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_ean_passes_through() {
        assert_eq!(repair_ean("6941264088885").as_deref(), Some("6941264088885"));
    }

    #[test]
    fn scientific_notation_with_dot_is_expanded() {
        assert_eq!(repair_ean("8.43256E+12").as_deref(), Some("8432560000000"));
    }

    #[test]
    fn scientific_notation_with_comma_and_lowercase_e() {
        assert_eq!(repair_ean("6,94126408889e12").as_deref(), Some("6941264088890"));
    }

    #[test]
    fn scientific_notation_rounds_to_nearest_integer() {
        assert_eq!(repair_ean("1.2345678E+3").as_deref(), Some("1235"));
    }

    #[test]
    fn unexpandable_scientific_notation_is_none() {
        assert_eq!(repair_ean("1E+30"), None);
        assert_eq!(repair_ean("9.9E+28"), None);
        assert_eq!(repair_ean("8.4E+1x"), None);
    }

    #[test]
    fn trailing_decimal_zero_is_removed() {
        assert_eq!(repair_ean("6941264088885.0").as_deref(), Some("6941264088885"));
    }

    #[test]
    fn whitespace_and_separators_are_stripped() {
        assert_eq!(repair_ean(" 694 1264-088885 ").as_deref(), Some("6941264088885"));
    }

    #[test]
    fn blank_or_non_numeric_is_none() {
        assert_eq!(repair_ean(""), None);
        assert_eq!(repair_ean("   "), None);
        assert_eq!(repair_ean("N/A"), None);
    }

    #[test]
    fn gtin_check_digit_validation() {
        assert!(is_valid_gtin("6941264088882"));
        assert!(is_valid_gtin("4006381333931"));
        assert!(is_valid_gtin("96385074"));
        assert!(!is_valid_gtin("6941264088885"));
        assert!(!is_valid_gtin("12345"));
        assert!(!is_valid_gtin("69412640888a5"));
    }
}

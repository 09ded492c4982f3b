//! Amount parsing and VAT.

use std::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;

/// Portuguese standard VAT rate applied to net supplier prices.
pub const VAT_MULTIPLIER: Decimal = dec!(1.23);

/// Parse a supplier amount such as `1234.5`, `1234,5`, `1.234,56`,
/// `1,234.56` or `€ 12,00`. Blank input is `Ok(None)`.
///
/// # Errors
///
/// Returns the cleaned string when it is not a number.
pub fn parse_amount(raw: &str) -> Result<Option<Decimal>, String> {
    let cleaned: String = raw
        .chars()
        .filter(|c| !c.is_whitespace() && !matches!(c, '€' | '$' | '\u{a0}'))
        .collect();
    if cleaned.is_empty() {
        return Ok(None);
    }

    let last_dot = cleaned.rfind('.');
    let last_comma = cleaned.rfind(',');
    let canonical = match (last_dot, last_comma) {
        (Some(dot), Some(comma)) if comma > dot => cleaned.replace('.', "").replace(',', "."),
        (Some(_), Some(_)) => cleaned.replace(',', ""),
        (None, Some(_)) if cleaned.matches(',').count() == 1 => cleaned.replace(',', "."),
        (None, Some(_)) => cleaned.replace(',', ""),
        (Some(_), None) if cleaned.matches('.').count() > 1 => cleaned.replace('.', ""),
        _ => cleaned,
    };

    Decimal::from_str(&canonical).map(Some).map_err(|_| canonical)
}

/// Net price to VAT-inclusive price, rounded half away from zero to cents.
/// `None` when the product overflows `Decimal`.
#[must_use]
pub fn price_with_vat(net: Decimal) -> Option<Decimal> {
    net.checked_mul(VAT_MULTIPLIER)
        .map(|gross| gross.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero))
}

//! Amount normalization for provider invoice fields.
//!
//! Provider documents render amounts with thousands separators, currency
//! suffixes ("1,234.50 SAR"), and stray layout characters. Normalization
//! keeps digits and dots only, then parses the remainder as a decimal.

use rust_decimal::Decimal;
use std::str::FromStr;

use crate::error::AmountError;

/// Strip every character outside `[0-9.]` from a raw amount token.
pub fn clean_amount(raw: &str) -> String {
    raw.chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect()
}

/// Parse a raw amount token into a decimal.
///
/// Fails with [`AmountError::Empty`] when nothing survives cleaning and
/// [`AmountError::Malformed`] when the cleaned token is not a decimal
/// (e.g. more than one dot). Callers treat both as skip-and-warn.
pub fn parse_amount(raw: &str) -> Result<Decimal, AmountError> {
    let cleaned = clean_amount(raw);
    if cleaned.is_empty() {
        return Err(AmountError::Empty(raw.to_string()));
    }
    Decimal::from_str(&cleaned).map_err(|_| AmountError::Malformed(raw.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_plain_decimal() {
        assert_eq!(parse_amount("138.00"), Ok(Decimal::from_str("138.00").unwrap()));
    }

    #[test]
    fn test_thousands_separator_and_currency() {
        assert_eq!(
            parse_amount("1,234.50 SAR"),
            Ok(Decimal::from_str("1234.50").unwrap())
        );
    }

    #[test]
    fn test_currency_prefix() {
        assert_eq!(parse_amount("SAR 99.95"), Ok(Decimal::from_str("99.95").unwrap()));
    }

    #[test]
    fn test_integer_amount() {
        assert_eq!(parse_amount("250"), Ok(Decimal::from_str("250").unwrap()));
    }

    #[test]
    fn test_empty_after_clean() {
        assert_eq!(parse_amount("N/A"), Err(AmountError::Empty("N/A".to_string())));
        assert_eq!(parse_amount(""), Err(AmountError::Empty(String::new())));
        assert_eq!(parse_amount("--"), Err(AmountError::Empty("--".to_string())));
    }

    #[test]
    fn test_multiple_dots_is_malformed() {
        assert_eq!(
            parse_amount("1.2.3"),
            Err(AmountError::Malformed("1.2.3".to_string()))
        );
    }

    #[test]
    fn test_clean_keeps_digits_and_dot_only() {
        assert_eq!(clean_amount("  1,234.50 SAR\t"), "1234.50");
        assert_eq!(clean_amount("١٢٣"), "");
    }
}

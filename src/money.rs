//! Chilean peso formatting
//!
//! Amounts are shown as whole pesos with `.` thousands separators,
//! e.g. `$1.234.567`, rounding half away from zero.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

/// Round to whole pesos
pub fn round_pesos(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
}

/// `$1.234`, `-$500`
pub fn format_clp(amount: Decimal) -> String {
    let rounded = round_pesos(amount);
    let grouped = group_thousands(rounded.abs());
    if rounded.is_sign_negative() && !rounded.is_zero() {
        format!("-${}", grouped)
    } else {
        format!("${}", grouped)
    }
}

/// Whole-peso amount with separators and no currency sign
pub fn format_number(amount: Decimal) -> String {
    let rounded = round_pesos(amount);
    let grouped = group_thousands(rounded.abs());
    if rounded.is_sign_negative() && !rounded.is_zero() {
        format!("-{}", grouped)
    } else {
        grouped
    }
}

/// Parse a user-typed amount; accepts `1990`, `1990.5`, `1990,5`
pub fn parse_amount(input: &str) -> Option<Decimal> {
    let cleaned = input.trim().replace(',', ".");
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse().ok()
}

fn group_thousands(whole: Decimal) -> String {
    let digits = match whole.trunc().to_u128() {
        Some(n) => n.to_string(),
        None => whole.trunc().to_string(),
    };
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push('.');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn d(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_format_clp() {
        assert_eq!(format_clp(d("0")), "$0");
        assert_eq!(format_clp(d("990")), "$990");
        assert_eq!(format_clp(d("1234")), "$1.234");
        assert_eq!(format_clp(d("1234567.00")), "$1.234.567");
        assert_eq!(format_clp(d("-500")), "-$500");
    }

    #[test]
    fn test_rounding_half_away_from_zero() {
        assert_eq!(format_clp(d("1990.5")), "$1.991");
        assert_eq!(format_clp(d("1990.49")), "$1.990");
        assert_eq!(format_clp(d("-0.4")), "$0");
        assert_eq!(format_number(d("15000")), "15.000");
    }

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount(" 1990 "), Some(d("1990")));
        assert_eq!(parse_amount("12,5"), Some(d("12.5")));
        assert_eq!(parse_amount(""), None);
        assert_eq!(parse_amount("abc"), None);
    }
}

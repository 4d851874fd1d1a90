//! Money amounts and their text forms.
//!
//! CRITICAL: Never use floating-point for money calculations.
//! Amounts are whole currency units; anything fractional goes through
//! `rust_decimal::Decimal`.

use std::str::FromStr;

use rust_decimal::prelude::*;

/// A whole number of currency units.
pub type Amount = i64;

/// Currency marker that may trail an amount ("10,000원").
const CURRENCY_MARKER: char = '원';

/// Myriad marker: the value before it counts in units of 10,000.
const MYRIAD_MARKER: char = '만';

const MYRIAD: i64 = 10_000;

/// Parses free-form amount text into a non-negative amount.
///
/// Recognised forms:
/// - plain digits: `"10000"`
/// - comma or space grouped digits: `"10,000"`, `"10 000"`
/// - myriad notation, where the part before `만` is multiplied by 10,000
///   and trailing digits are added: `"10만"` is 100,000, `"3만500"` is 30,500
///
/// Anything unparseable yields 0.
///
/// # Example
///
/// ```
/// use dutch_shared::types::parse_amount;
///
/// assert_eq!(parse_amount("3만500"), 30_500);
/// assert_eq!(parse_amount("10,000원"), 10_000);
/// assert_eq!(parse_amount("lunch"), 0);
/// ```
#[must_use]
pub fn parse_amount(text: &str) -> Amount {
    let cleaned: String = text
        .trim()
        .chars()
        .filter(|c| *c != CURRENCY_MARKER && *c != ',' && !c.is_whitespace())
        .collect();

    if cleaned.is_empty() {
        return 0;
    }

    if cleaned.chars().all(|c| c.is_ascii_digit()) {
        return cleaned.parse().unwrap_or(0);
    }

    if cleaned.contains(MYRIAD_MARKER) {
        return parse_myriad(&cleaned).unwrap_or(0);
    }

    let digits: String = cleaned.chars().filter(char::is_ascii_digit).collect();
    digits.parse().unwrap_or(0)
}

/// Parses `<a>만<b>`; only the first two segments count.
fn parse_myriad(text: &str) -> Option<Amount> {
    let mut parts = text.split(MYRIAD_MARKER);
    let head = parse_segment(parts.next().unwrap_or_default())?;
    let tail = parse_segment(parts.next().unwrap_or_default())?;

    let value = head.checked_mul(Decimal::from(MYRIAD))?.checked_add(tail)?;
    value
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_i64()
}

/// An empty segment counts as zero; otherwise it must be an unsigned number.
fn parse_segment(segment: &str) -> Option<Decimal> {
    if segment.is_empty() {
        return Some(Decimal::ZERO);
    }
    if !segment.chars().all(|c| c.is_ascii_digit() || c == '.') {
        return None;
    }
    Decimal::from_str(segment).ok()
}

/// Renders an amount with comma-grouped thousands ("-1,234,500").
#[must_use]
pub fn format_amount(amount: Amount) -> String {
    let digits = amount.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);

    if amount < 0 {
        grouped.push('-');
    }
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    grouped
}

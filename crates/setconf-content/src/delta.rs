//! Decimal increment and decrement of values

use std::str::FromStr;

use bigdecimal::BigDecimal;
use tracing::debug;

/// Direction of a `+=` / `-=` adjustment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Sign {
    Plus,
    Minus,
}

/// Add `delta` to (or subtract it from) `current`.
///
/// Both operands are parsed as arbitrary precision decimals, so large
/// integers and long fractions come out exact. Trailing fractional zeros
/// are stripped from the result. If either operand is not a plain
/// decimal number the result is `delta` itself. Exponent notation such as
/// `1e9` is not accepted, so the result never grows past the operands.
pub fn apply_delta(current: &[u8], delta: &[u8], sign: Sign) -> Vec<u8> {
    let (Some(a), Some(b)) = (parse_decimal(current), parse_decimal(delta)) else {
        debug!(
            current = %String::from_utf8_lossy(current),
            delta = %String::from_utf8_lossy(delta),
            "not a number, using delta as value"
        );
        return delta.to_vec();
    };

    let result = match sign {
        Sign::Plus => a + b,
        Sign::Minus => a - b,
    };
    strip_trailing_zeros(&result.to_plain_string()).as_bytes().to_vec()
}

fn parse_decimal(text: &[u8]) -> Option<BigDecimal> {
    let text = std::str::from_utf8(text).ok()?.trim();
    if !is_plain_decimal(text) {
        return None;
    }
    BigDecimal::from_str(text).ok()
}

/// `[+-]digits[.digits]`, where either side of the point may be empty.
fn is_plain_decimal(text: &str) -> bool {
    let unsigned = text.strip_prefix(['+', '-']).unwrap_or(text);
    let (int, frac) = unsigned.split_once('.').unwrap_or((unsigned, ""));
    !(int.is_empty() && frac.is_empty())
        && int.bytes().chain(frac.bytes()).all(|b| b.is_ascii_digit())
}

fn strip_trailing_zeros(s: &str) -> &str {
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.')
    } else {
        s
    }
}

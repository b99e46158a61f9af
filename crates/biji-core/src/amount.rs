//! Decimal amount parsing and formatting with a fixed 8-decimal scale.
//!
//! `"0.0006"` parses to 60 000 satoshis; 60 000 satoshis formats back to
//! `"0.0006"`. Trailing fractional zeros are trimmed when formatting.

use crate::constants::{AMOUNT_DECIMALS, COIN, MAX_MONEY};
use crate::error::AmountError;

/// Parse a decimal BTC amount into satoshis.
///
/// Accepts an optional fractional part of at most 8 digits. Signs, exponents
/// and thousands separators are rejected.
pub fn parse_amount(s: &str) -> Result<u64, AmountError> {
    let s = s.trim();
    let (int_part, frac_part) = match s.split_once('.') {
        Some((i, f)) => (i, f),
        None => (s, ""),
    };
    if int_part.is_empty() && frac_part.is_empty() {
        return Err(AmountError::Empty);
    }
    if let Some(c) = int_part
        .chars()
        .chain(frac_part.chars())
        .find(|c| !c.is_ascii_digit())
    {
        return Err(AmountError::InvalidCharacter(c));
    }
    if frac_part.len() > AMOUNT_DECIMALS {
        return Err(AmountError::TooManyDecimals(frac_part.len()));
    }

    let mut whole: u64 = 0;
    for d in int_part.bytes() {
        whole = whole
            .checked_mul(10)
            .and_then(|w| w.checked_add((d - b'0') as u64))
            .ok_or(AmountError::Overflow)?;
    }
    let mut frac: u64 = 0;
    for i in 0..AMOUNT_DECIMALS {
        let digit = frac_part.as_bytes().get(i).map_or(0, |d| (d - b'0') as u64);
        frac = frac * 10 + digit;
    }

    let value = whole
        .checked_mul(COIN)
        .and_then(|w| w.checked_add(frac))
        .ok_or(AmountError::Overflow)?;
    if value > MAX_MONEY {
        return Err(AmountError::ExceedsMaxMoney(value));
    }
    Ok(value)
}

/// Format satoshis as a decimal BTC amount.
pub fn format_amount(value: u64) -> String {
    let whole = value / COIN;
    let frac = value % COIN;
    if frac == 0 {
        return whole.to_string();
    }
    let frac = format!("{frac:0width$}", width = AMOUNT_DECIMALS);
    format!("{whole}.{}", frac.trim_end_matches('0'))
}

use crate::errors::{AirdropError, Result};

/// Raw units making up `tokens` whole tokens of a mint with `decimals` places.
///
/// Formula: raw_amount = tokens * 10^decimals
///
/// # Errors
/// Returns `AmountOverflow` if the result does not fit in a u64
/// (any `decimals` above 19 for a single token).
pub fn raw_amount(tokens: u64, decimals: u8) -> Result<u64> {
    10_u64
        .checked_pow(decimals as u32)
        .and_then(|scale| scale.checked_mul(tokens))
        .ok_or(AirdropError::AmountOverflow { decimals })
}

/// Raw units of exactly one whole token.
pub fn one_token(decimals: u8) -> Result<u64> {
    raw_amount(1, decimals)
}

/// Formats a raw amount as a decimal string with trailing zeros trimmed.
///
/// Falls back to the raw amount when `10^decimals` does not fit in a u128.
pub fn format_token_amount(raw: u64, decimals: u8) -> String {
    let Some(scale) = 10_u128.checked_pow(decimals as u32).filter(|_| decimals > 0) else {
        return raw.to_string();
    };
    let int_part = raw as u128 / scale;
    let frac_part = raw as u128 % scale;

    if frac_part == 0 {
        return int_part.to_string();
    }
    let mut frac = format!("{:0width$}", frac_part, width = decimals as usize);
    while frac.ends_with('0') {
        frac.pop();
    }

    format!("{}.{}", int_part, frac)
}

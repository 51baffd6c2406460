//! Conversion between human-readable decimal amounts and base units.
//!
//! All arithmetic is integer scaling so amounts round-trip exactly.

use crate::error::WasmSuiError;

/// Largest decimal count whose scale factor fits in a `u64`
pub const MAX_DECIMALS: u8 = 19;

fn scale(decimals: u8) -> Result<u64, WasmSuiError> {
    10u64.checked_pow(decimals as u32).ok_or_else(|| {
        WasmSuiError::InvalidAmount(format!(
            "decimals must be at most {}, got {}",
            MAX_DECIMALS, decimals
        ))
    })
}

/// Parse a decimal string (e.g. `"12.5"`) into base units.
///
/// Fractional digits beyond `decimals` are truncated toward zero.
pub fn parse_units(amount: &str, decimals: u8) -> Result<u64, WasmSuiError> {
    let scale = scale(decimals)?;
    let trimmed = amount.trim();
    let invalid = || WasmSuiError::InvalidAmount(format!("'{}' is not a decimal amount", amount));

    let (whole, fraction) = match trimmed.split_once('.') {
        Some((w, f)) => (w, f),
        None => (trimmed, ""),
    };
    if whole.is_empty() && fraction.is_empty() {
        return Err(invalid());
    }
    if !whole.bytes().all(|b| b.is_ascii_digit()) || !fraction.bytes().all(|b| b.is_ascii_digit())
    {
        return Err(invalid());
    }

    let overflow = || WasmSuiError::InvalidAmount(format!("'{}' overflows u64 base units", amount));

    let whole_value: u64 = if whole.is_empty() {
        0
    } else {
        whole.parse().map_err(|_| overflow())?
    };

    let kept = &fraction[..fraction.len().min(decimals as usize)];
    let mut fraction_value: u64 = 0;
    for digit in kept.bytes() {
        fraction_value = fraction_value * 10 + u64::from(digit - b'0');
    }
    fraction_value *= 10u64.pow((decimals as usize - kept.len()) as u32);

    whole_value
        .checked_mul(scale)
        .and_then(|v| v.checked_add(fraction_value))
        .ok_or_else(overflow)
}

/// Format base units as a decimal string with trailing zeros trimmed.
pub fn format_units(value: u64, decimals: u8) -> Result<String, WasmSuiError> {
    let scale = scale(decimals)?;
    let whole = value / scale;
    let fraction = value % scale;
    if fraction == 0 {
        return Ok(whole.to_string());
    }
    let digits = format!("{:0>width$}", fraction, width = decimals as usize);
    Ok(format!("{}.{}", whole, digits.trim_end_matches('0')))
}

/// Format base units with exactly `places` fractional digits, rounding half up.
///
/// `places` is bounded by `MAX_DECIMALS` like `decimals`.
pub fn format_units_fixed(value: u64, decimals: u8, places: u8) -> Result<String, WasmSuiError> {
    let unit = scale(decimals)? as u128;
    let place_scale = scale(places)
        .map_err(|_| {
            WasmSuiError::InvalidAmount(format!(
                "display places must be at most {}, got {}",
                MAX_DECIMALS, places
            ))
        })? as u128;
    // (value * 10^places + unit/2) / unit, in u128
    let scaled = (value as u128)
        .checked_mul(place_scale)
        .and_then(|v| v.checked_add(unit / 2))
        .ok_or_else(|| {
            WasmSuiError::InvalidAmount(format!("{} overflows at {} places", value, places))
        })?
        / unit;
    let whole = scaled / place_scale;
    if places == 0 {
        return Ok(whole.to_string());
    }
    let fraction = scaled % place_scale;
    Ok(format!(
        "{}.{:0>width$}",
        whole,
        fraction,
        width = places as usize
    ))
}

/// Pre-flight check that an amount is positive and covered by the balance.
pub fn check_amount(amount: u64, balance: u64) -> Result<(), WasmSuiError> {
    if amount == 0 {
        return Err(WasmSuiError::InvalidAmount(
            "amount must be greater than zero".to_string(),
        ));
    }
    if amount > balance {
        return Err(WasmSuiError::InsufficientFunds {
            required: amount,
            available: balance,
        });
    }
    Ok(())
}

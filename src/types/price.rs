//! Fixed-point price and quantity conversions.
//!
//! All prices and sizes inside the engine are `u64` values scaled by 10^8.
//! Clients speak decimal numbers (the JSON boundary carries plain floats),
//! so conversion happens exactly once, at the edge, through `rust_decimal`.
//!
//! ```
//! use exchange_core::types::price::{f64_to_fixed, from_fixed, to_fixed};
//!
//! assert_eq!(to_fixed("10000"), Some(1_000_000_000_000));
//! assert_eq!(f64_to_fixed(0.5), Some(50_000_000));
//! assert_eq!(from_fixed(1_000_000_000_000), "10000.00000000");
//! ```

use rust_decimal::prelude::*;
use rust_decimal::Decimal;

/// Scaling factor for fixed-point arithmetic: 10^8
pub const SCALE: u64 = 100_000_000;

/// Convert a decimal string to fixed-point
///
/// Returns `None` if parsing fails or the value is negative or out of range.
pub fn to_fixed(s: &str) -> Option<u64> {
    let decimal = Decimal::from_str(s).ok()?;
    decimal_to_fixed(decimal)
}

/// Convert a `Decimal` to fixed-point, rounding to 8 places
///
/// Returns `None` if the value is negative or out of range.
pub fn decimal_to_fixed(d: Decimal) -> Option<u64> {
    if d.is_sign_negative() {
        return None;
    }

    let scaled = d.checked_mul(Decimal::from(SCALE))?;
    scaled.round_dp(0).to_u64()
}

/// Convert a float from the request boundary to fixed-point
///
/// Returns `None` for negative, NaN, infinite or out-of-range input.
pub fn f64_to_fixed(value: f64) -> Option<u64> {
    if !value.is_finite() {
        return None;
    }
    decimal_to_fixed(Decimal::from_f64(value)?)
}

/// Convert fixed-point to a `Decimal`
pub fn fixed_to_decimal(value: u64) -> Decimal {
    Decimal::from(value) / Decimal::from(SCALE)
}

/// Convert fixed-point to a float for the response boundary
pub fn fixed_to_f64(value: u64) -> f64 {
    fixed_to_decimal(value).to_f64().unwrap_or_default()
}

/// Convert fixed-point to a string with 8 decimal places
pub fn from_fixed(value: u64) -> String {
    format!("{:.8}", fixed_to_decimal(value))
}

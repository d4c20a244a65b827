//! Numeric helpers centralizing range clamps and safe casts.

use num_traits::cast::cast;

/// Restrict `value` to the inclusive range `[min, max]`.
///
/// Every design bound in offer generation goes through this helper so the
/// limits read the same way at each call site. Values that compare neither
/// below nor above the bounds (NaN) are returned unchanged.
#[must_use]
pub fn clamp_range<T>(value: T, min: T, max: T) -> T
where
    T: PartialOrd + Copy,
{
    debug_assert!(min <= max, "clamp_range called with min > max");
    if value < min {
        min
    } else if value > max {
        max
    } else {
        value
    }
}

/// Floor a f64 and clamp it to the i32 range, returning 0 for NaN values.
#[must_use]
pub fn floor_f64_to_i32(value: f64) -> i32 {
    if value.is_nan() {
        return 0;
    }
    let min = cast::<i32, f64>(i32::MIN).unwrap_or(f64::MIN);
    let max = cast::<i32, f64>(i32::MAX).unwrap_or(f64::MAX);
    let clamped = value.clamp(min, max).floor();
    cast::<f64, i32>(clamped).unwrap_or(0)
}

/// Round a f64 to `places` decimal digits, halves rounding away from zero.
#[must_use]
pub fn round_to_places(value: f64, places: u32) -> f64 {
    let Ok(exp) = i32::try_from(places) else {
        return value;
    };
    let factor = 10f64.powi(exp);
    (value * factor).round() / factor
}

/// Map the top 53 bits of a u64 onto `[0, 1)` with uniform spacing.
#[must_use]
pub fn unit_interval_from_bits(bits: u64) -> f64 {
    const SCALE: f64 = 1.0 / (1u64 << 53) as f64;
    let mantissa = bits >> 11;
    cast::<u64, f64>(mantissa).unwrap_or(0.0) * SCALE
}

/// Convert a zero-based index into a draw-friendly f64 without `as` casts.
#[must_use]
pub fn usize_to_f64(value: usize) -> f64 {
    cast::<usize, f64>(value).unwrap_or(0.0)
}

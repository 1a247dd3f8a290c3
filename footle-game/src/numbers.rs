//! Numeric conversion helpers centralizing safe numeric casts.

use num_traits::cast::cast;

/// Clamp a f64 into `[0, 1]` and downcast, returning 0.0 for NaN.
#[must_use]
pub fn clamp_unit_f32(value: f64) -> f32 {
    if value.is_nan() {
        return 0.0;
    }
    cast::<f64, f32>(value.clamp(0.0, 1.0)).unwrap_or(0.0)
}

/// Saturating `usize` to `u32` conversion.
#[must_use]
pub fn usize_to_u32(value: usize) -> u32 {
    cast::<usize, u32>(value).unwrap_or(u32::MAX)
}

/// Rounded whole percentage of `part` over `whole`, 0 when `whole` is 0.
#[must_use]
pub fn percent_of(part: usize, whole: usize) -> u8 {
    if whole == 0 {
        return 0;
    }
    let part = cast::<usize, f64>(part.min(whole)).unwrap_or(0.0);
    let whole = cast::<usize, f64>(whole).unwrap_or(1.0);
    cast::<f64, u8>((part * 100.0 / whole).round()).unwrap_or(100)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unit_clamp_handles_bounds_and_nan() {
        assert!((clamp_unit_f32(1.7) - 1.0).abs() < f32::EPSILON);
        assert!(clamp_unit_f32(-0.2).abs() < f32::EPSILON);
        assert!(clamp_unit_f32(f64::NAN).abs() < f32::EPSILON);
    }

    #[test]
    fn percentages_round_to_nearest() {
        assert_eq!(percent_of(0, 3), 0);
        assert_eq!(percent_of(1, 3), 33);
        assert_eq!(percent_of(2, 3), 67);
        assert_eq!(percent_of(3, 3), 100);
        assert_eq!(percent_of(5, 3), 100);
        assert_eq!(percent_of(1, 0), 0);
    }

    #[test]
    fn usize_conversion_saturates() {
        assert_eq!(usize_to_u32(7), 7);
    }
}

//! Interpolation primitives used by the percentile engine.

pub mod linear;
pub mod spline;

pub use linear::interp_clamped;
pub use spline::CubicSpline;

/// Round to one decimal place. Halves of a tenth go to the even tenth
/// (`11.25 -> 11.2`, `0.75 -> 0.8`).
#[inline]
pub fn round_tenth(v: f64) -> f64 {
    (v * 10.0).round_ties_even() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rounds_to_one_decimal() {
        assert_eq!(round_tenth(49.96), 50.0);
        assert_eq!(round_tenth(12.34), 12.3);
        assert_eq!(round_tenth(2.5), 2.5);
    }

    #[test]
    fn halves_round_to_even_tenth() {
        assert_eq!(round_tenth(0.25), 0.2);
        assert_eq!(round_tenth(11.25), 11.2);
        assert_eq!(round_tenth(0.75), 0.8);
    }
}

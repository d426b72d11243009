/// Piecewise-linear interpolation of `x` over the points `(xp[i], fp[i])`.
///
/// `xp` must be non-decreasing. Values outside `[xp[0], xp[n-1]]` clamp to
/// the boundary value of `fp`; nothing is extrapolated.
pub fn interp_clamped(x: f64, xp: &[f64], fp: &[f64]) -> f64 {
    debug_assert_eq!(xp.len(), fp.len());
    debug_assert!(!xp.is_empty());
    let n = xp.len();

    if x <= xp[0] {
        return fp[0];
    }
    if x >= xp[n - 1] {
        return fp[n - 1];
    }

    // xp[j - 1] <= x < xp[j], so the interval has positive width.
    let j = xp.partition_point(|&v| v <= x);
    let (x0, x1) = (xp[j - 1], xp[j]);
    let t = (x - x0) / (x1 - x0);
    fp[j - 1] + t * (fp[j] - fp[j - 1])
}

//! Age sub-sampling of raw monthly reference rows.
//!
//! Rows up to 5 years are kept every 6 months and keyed by years rounded to
//! one decimal. Older rows are kept every 12 months and keyed by whole years.

use crate::interp::round_tenth;

/// Age in years at or below which the half-year grid applies.
pub const HALF_YEAR_GRID_LIMIT: f64 = 5.0;

/// Sampled age key in years for a row at `months`, or `None` if the row is
/// not on the sampling grid.
pub fn sampled_age(months: f64) -> Option<f64> {
    let years = months / 12.0;
    if years <= HALF_YEAR_GRID_LIMIT {
        (months % 6.0 == 0.0).then(|| round_tenth(years))
    } else {
        (months % 12.0 == 0.0).then(|| years.floor())
    }
}

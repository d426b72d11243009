use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::row::ReferenceRow;
use super::sampling::sampled_age;
use crate::error::{GrowthError, Result};
use crate::interp::spline::MIN_POINTS;
use crate::percentile::RANK_COUNT;

/// Sparse age-keyed reference table for one population group.
///
/// Ages are in years and strictly increasing. Immutable once built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferenceTable {
    ages: Vec<f64>,
    heights: Vec<[f64; RANK_COUNT]>,
    skipped: usize,
}

impl ReferenceTable {
    /// Sub-sample raw rows onto the age grid and build the table.
    ///
    /// A later row with the same sampled age replaces an earlier one.
    pub fn from_rows<I>(rows: I) -> Result<Self>
    where
        I: IntoIterator<Item = ReferenceRow>,
    {
        // Keyed by tenths of a year so the map orders and dedups exactly.
        let mut by_age: BTreeMap<i64, (f64, [f64; RANK_COUNT])> = BTreeMap::new();
        let mut off_grid = 0usize;
        for row in rows {
            match sampled_age(row.months) {
                Some(age) => {
                    by_age.insert((age * 10.0).round() as i64, (age, row.heights));
                }
                None => off_grid += 1,
            }
        }

        if by_age.len() < MIN_POINTS {
            return Err(GrowthError::InsufficientData { got: by_age.len(), min: MIN_POINTS });
        }

        let (ages, heights): (Vec<f64>, Vec<[f64; RANK_COUNT]>) = by_age.into_values().unzip();
        tracing::debug!(rows = ages.len(), off_grid, "sampled reference rows");
        Ok(Self { ages, heights, skipped: 0 })
    }

    pub(crate) fn with_skipped(mut self, skipped: usize) -> Self {
        self.skipped = skipped;
        self
    }

    pub fn len(&self) -> usize {
        self.ages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ages.is_empty()
    }

    /// Sampled ages in years, ascending.
    pub fn ages(&self) -> &[f64] {
        &self.ages
    }

    /// Number of raw rows the builder dropped because they did not parse.
    pub fn skipped_rows(&self) -> usize {
        self.skipped
    }

    /// Heights of one rank across all sampled ages, aligned with [`Self::ages`].
    pub fn column(&self, rank_index: usize) -> Vec<f64> {
        self.heights.iter().map(|h| h[rank_index]).collect()
    }

    /// The 15 heights stored for exactly `age` years, if sampled.
    pub fn heights_at(&self, age: f64) -> Option<&[f64; RANK_COUNT]> {
        self.ages
            .iter()
            .position(|&a| (a - age).abs() < 1e-9)
            .map(|i| &self.heights[i])
    }

    pub fn iter(&self) -> impl Iterator<Item = (f64, &[f64; RANK_COUNT])> + '_ {
        self.ages.iter().copied().zip(self.heights.iter())
    }
}

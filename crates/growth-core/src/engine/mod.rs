//! Percentile Engine.
//!
//! Holds one cubic curve per percentile rank and group. A forward query
//! evaluates the 15 curves at the child's age, which gives the local height
//! distribution, and linearly interpolates the measured height against it.
//! The engine is immutable after construction and safe to share across
//! threads.

mod curves;
mod result;

pub use result::{PercentileRecord, PercentileResult};

use crate::error::{GrowthError, Result};
use crate::interp::{interp_clamped, round_tenth};
use crate::percentile::{GenderSelector, Group, MAX_RANK, MIN_RANK, RANKS, RANK_COUNT};
use crate::reference::ReferenceTable;
use curves::GroupCurves;

#[derive(Debug, Clone)]
pub struct PercentileEngine {
    boys: GroupCurves,
    girls: GroupCurves,
}

/// Build the engine from the boys and girls reference tables.
pub fn build_engine(boys: &ReferenceTable, girls: &ReferenceTable) -> Result<PercentileEngine> {
    PercentileEngine::new(boys, girls)
}

impl PercentileEngine {
    pub fn new(boys: &ReferenceTable, girls: &ReferenceTable) -> Result<Self> {
        let engine = Self { boys: GroupCurves::build(boys)?, girls: GroupCurves::build(girls)? };
        tracing::debug!(boys = boys.len(), girls = girls.len(), "built percentile curves");
        Ok(engine)
    }

    fn curves(&self, group: Group) -> &GroupCurves {
        match group {
            Group::Boys => &self.boys,
            Group::Girls => &self.girls,
        }
    }

    /// First and last sampled age in years for `group`. Queries outside this
    /// span are answered by extrapolating the curves and are less reliable.
    pub fn age_span(&self, group: Group) -> (f64, f64) {
        self.curves(group).age_span()
    }

    /// Heights at `age` for each rank of [`RANKS`], in rank order.
    pub fn heights_at(&self, age: f64, group: Group) -> Result<[f64; RANK_COUNT]> {
        check_measure("age", age)?;
        Ok(self.curves(group).heights_at(age))
    }

    /// `(rank, height)` pairs at `age`, sorted by height.
    pub fn distribution_at(&self, age: f64, group: Group) -> Result<[(f64, f64); RANK_COUNT]> {
        check_measure("age", age)?;
        Ok(self.curves(group).distribution_at(age))
    }

    /// Percentile of `height` cm at `age` years for the selected group(s),
    /// rounded to one decimal and within `[0.1, 99.9]`.
    pub fn percentile_of(
        &self,
        age: f64,
        height: f64,
        gender: GenderSelector,
    ) -> Result<PercentileResult> {
        check_measure("age", age)?;
        check_measure("height", height)?;

        let result = match gender {
            GenderSelector::Boys => self.single(Group::Boys, age, height),
            GenderSelector::Girls => self.single(Group::Girls, age, height),
            GenderSelector::Both => {
                let boys = self.raw_percentile(Group::Boys, age, height);
                let girls = self.raw_percentile(Group::Girls, age, height);
                PercentileResult::Both {
                    boys: round_tenth(boys),
                    girls: round_tenth(girls),
                    average: round_tenth((boys + girls) / 2.0),
                }
            }
        };
        Ok(result)
    }

    /// Height in cm at `percentile` for `age` years, interpolating linearly
    /// between neighbouring rank curves.
    pub fn height_at(&self, age: f64, percentile: f64, group: Group) -> Result<f64> {
        check_measure("age", age)?;
        if !percentile.is_finite() || !(MIN_RANK..=MAX_RANK).contains(&percentile) {
            return Err(GrowthError::InvalidArgument(format!(
                "percentile {percentile} outside [{MIN_RANK}, {MAX_RANK}]"
            )));
        }
        let heights = self.curves(group).heights_at(age);
        Ok(interp_clamped(percentile, &RANKS, &heights))
    }

    /// Forward query over many `(age, height)` points. Runs on the rayon
    /// pool with the `threading` feature; results keep input order.
    pub fn percentiles_of_batch(
        &self,
        points: &[(f64, f64)],
        gender: GenderSelector,
    ) -> Vec<Result<PercentileResult>> {
        #[cfg(feature = "threading")]
        let results: Vec<Result<PercentileResult>> = {
            use rayon::prelude::*;
            points
                .par_iter()
                .map(|&(age, height)| self.percentile_of(age, height, gender))
                .collect()
        };
        #[cfg(not(feature = "threading"))]
        let results: Vec<Result<PercentileResult>> = points
            .iter()
            .map(|&(age, height)| self.percentile_of(age, height, gender))
            .collect();
        results
    }

    fn single(&self, group: Group, age: f64, height: f64) -> PercentileResult {
        let percentile = round_tenth(self.raw_percentile(group, age, height));
        PercentileResult::Single { group, percentile }
    }

    fn raw_percentile(&self, group: Group, age: f64, height: f64) -> f64 {
        let pairs = self.curves(group).distribution_at(age);
        let ranks = pairs.map(|(rank, _)| rank);
        let heights = pairs.map(|(_, h)| h);
        interp_clamped(height, &heights, &ranks)
    }
}

fn check_measure(name: &str, value: f64) -> Result<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(GrowthError::InvalidArgument(format!(
            "{name} must be a finite non-negative number, got {value}"
        )))
    }
}

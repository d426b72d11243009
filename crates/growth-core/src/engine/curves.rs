use crate::error::Result;
use crate::interp::CubicSpline;
use crate::percentile::{RANKS, RANK_COUNT};
use crate::reference::ReferenceTable;

/// One cubic curve per percentile rank for a single group.
#[derive(Debug, Clone)]
pub(crate) struct GroupCurves {
    curves: Vec<CubicSpline>,
}

impl GroupCurves {
    pub(crate) fn build(table: &ReferenceTable) -> Result<Self> {
        let ages = table.ages().to_vec();
        let curves = (0..RANK_COUNT)
            .map(|rank| CubicSpline::new(ages.clone(), table.column(rank)))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { curves })
    }

    /// Heights at `age` for each rank, in rank order.
    pub(crate) fn heights_at(&self, age: f64) -> [f64; RANK_COUNT] {
        let mut out = [0f64; RANK_COUNT];
        for (slot, curve) in out.iter_mut().zip(&self.curves) {
            *slot = curve.evaluate(age);
        }
        out
    }

    /// `(rank, height)` pairs at `age`, sorted by height ascending.
    pub(crate) fn distribution_at(&self, age: f64) -> [(f64, f64); RANK_COUNT] {
        let heights = self.heights_at(age);
        let mut pairs = [(0f64, 0f64); RANK_COUNT];
        for (i, pair) in pairs.iter_mut().enumerate() {
            *pair = (RANKS[i], heights[i]);
        }
        pairs.sort_by(|a, b| a.1.total_cmp(&b.1).then(a.0.total_cmp(&b.0)));
        pairs
    }

    /// Sampled age span of the underlying table.
    pub(crate) fn age_span(&self) -> (f64, f64) {
        let knots = self.curves[0].knots();
        (knots[0], knots[knots.len() - 1])
    }
}

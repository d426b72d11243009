//! Not-a-knot cubic spline through tabulated points.
//!
//! The spline is C² at every knot and additionally C³ at the second and the
//! second-to-last knot, so a cubic polynomial is reproduced exactly. Outside
//! the sampled range the end-segment cubic is continued.
//!
//! Second derivatives `M_i` at the knots solve
//!
//! ```text
//!   h[i-1]·M[i-1] + 2(h[i-1] + h[i])·M[i] + h[i]·M[i+1] = 6(d[i] - d[i-1])   (interior)
//!   h[1]·(M[1] - M[0])   = h[0]·(M[2] - M[1])                               (not-a-knot, left)
//!   h[n-2]·(M[n-2] - M[n-3]) = h[n-3]·(M[n-1] - M[n-2])                     (not-a-knot, right)
//! ```
//!
//! with `h[i] = x[i+1] - x[i]` and `d[i] = (y[i+1] - y[i]) / h[i]`.

use crate::error::{GrowthError, Result};

/// Fewest knots a not-a-knot cubic spline is defined for.
pub const MIN_POINTS: usize = 4;

#[derive(Debug, Clone, PartialEq)]
pub struct CubicSpline {
    xs: Vec<f64>,
    ys: Vec<f64>,
    /// Second derivative at each knot.
    m: Vec<f64>,
}

impl CubicSpline {
    /// Fit a spline through `(xs[i], ys[i])`.
    ///
    /// Fails with `MalformedTable` when lengths differ, values are not
    /// finite, or `xs` is not strictly increasing, and with
    /// `InsufficientData` for fewer than [`MIN_POINTS`] knots.
    pub fn new(xs: Vec<f64>, ys: Vec<f64>) -> Result<Self> {
        if xs.len() != ys.len() {
            return Err(GrowthError::MalformedTable(format!(
                "{} ages but {} heights",
                xs.len(),
                ys.len()
            )));
        }
        if xs.len() < MIN_POINTS {
            return Err(GrowthError::InsufficientData { got: xs.len(), min: MIN_POINTS });
        }
        if xs.iter().chain(ys.iter()).any(|v| !v.is_finite()) {
            return Err(GrowthError::MalformedTable("non-finite sample value".into()));
        }
        if let Some(i) = (1..xs.len()).find(|&i| xs[i] <= xs[i - 1]) {
            return Err(GrowthError::MalformedTable(format!(
                "ages not strictly increasing at index {i} ({} after {})",
                xs[i],
                xs[i - 1]
            )));
        }

        let m = second_derivatives(&xs, &ys)?;
        Ok(Self { xs, ys, m })
    }

    pub fn knots(&self) -> &[f64] {
        &self.xs
    }

    /// Evaluate at `x`; extrapolates with the nearest end segment.
    pub fn evaluate(&self, x: f64) -> f64 {
        let n = self.xs.len();
        let i = self.xs.partition_point(|&v| v <= x).saturating_sub(1).min(n - 2);

        let (x0, x1) = (self.xs[i], self.xs[i + 1]);
        let (y0, y1) = (self.ys[i], self.ys[i + 1]);
        let (m0, m1) = (self.m[i], self.m[i + 1]);
        let h = x1 - x0;
        let a = x1 - x;
        let b = x - x0;

        (m0 * a * a * a + m1 * b * b * b) / (6.0 * h)
            + (y0 / h - m0 * h / 6.0) * a
            + (y1 / h - m1 * h / 6.0) * b
    }
}

fn second_derivatives(xs: &[f64], ys: &[f64]) -> Result<Vec<f64>> {
    let n = xs.len();
    let h: Vec<f64> = xs.windows(2).map(|w| w[1] - w[0]).collect();
    let d: Vec<f64> = (0..n - 1).map(|i| (ys[i + 1] - ys[i]) / h[i]).collect();

    let mut a = vec![vec![0f64; n]; n];
    let mut rhs = vec![0f64; n];

    a[0][0] = -h[1];
    a[0][1] = h[0] + h[1];
    a[0][2] = -h[0];

    for i in 1..n - 1 {
        a[i][i - 1] = h[i - 1];
        a[i][i] = 2.0 * (h[i - 1] + h[i]);
        a[i][i + 1] = h[i];
        rhs[i] = 6.0 * (d[i] - d[i - 1]);
    }

    a[n - 1][n - 3] = -h[n - 2];
    a[n - 1][n - 2] = h[n - 3] + h[n - 2];
    a[n - 1][n - 1] = -h[n - 3];

    solve(a, rhs).ok_or_else(|| {
        GrowthError::MalformedTable("spline system is singular for these ages".into())
    })
}

/// Gaussian elimination with partial pivoting. The system is at most a few
/// dozen rows, one per sampled age.
fn solve(mut a: Vec<Vec<f64>>, mut b: Vec<f64>) -> Option<Vec<f64>> {
    let n = b.len();
    for col in 0..n {
        let pivot = (col..n).max_by(|&r, &s| a[r][col].abs().total_cmp(&a[s][col].abs()))?;
        if a[pivot][col].abs() < 1e-300 {
            return None;
        }
        a.swap(col, pivot);
        b.swap(col, pivot);

        for row in col + 1..n {
            let factor = a[row][col] / a[col][col];
            if factor == 0.0 {
                continue;
            }
            for k in col..n {
                a[row][k] -= factor * a[col][k];
            }
            b[row] -= factor * b[col];
        }
    }

    let mut x = vec![0f64; n];
    for row in (0..n).rev() {
        let tail: f64 = (row + 1..n).map(|k| a[row][k] * x[k]).sum();
        x[row] = (b[row] - tail) / a[row][row];
    }
    Some(x)
}

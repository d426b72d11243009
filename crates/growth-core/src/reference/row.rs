use serde::{Deserialize, Serialize};

use crate::error::{GrowthError, Result};
use crate::percentile::RANK_COUNT;

/// Number of fields in one reference row: the age plus one height per rank.
pub const FIELD_COUNT: usize = RANK_COUNT + 1;

/// One raw reference row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferenceRow {
    /// Age in months, non-negative.
    pub months: f64,
    /// Heights in cm at each rank of [`crate::RANKS`], non-decreasing.
    pub heights: [f64; RANK_COUNT],
}

impl ReferenceRow {
    /// Build a row from already-numeric values, enforcing the row invariants.
    pub fn new(months: f64, heights: [f64; RANK_COUNT]) -> std::result::Result<Self, String> {
        if !months.is_finite() || months < 0.0 {
            return Err(format!("age {months} months is not a non-negative number"));
        }
        if let Some(h) = heights.iter().find(|h| !h.is_finite() || **h < 0.0) {
            return Err(format!("height {h} is not a non-negative number"));
        }
        if let Some(i) = (1..RANK_COUNT).find(|&i| heights[i] < heights[i - 1]) {
            return Err(format!(
                "heights decrease with rank at column {} ({} < {})",
                i + 1,
                heights[i],
                heights[i - 1]
            ));
        }
        Ok(Self { months, heights })
    }

    /// Parse one delimited line. `line` is the 1-based line number used in
    /// the error.
    ///
    /// Decimal commas are accepted, and a trailing delimiter is tolerated.
    pub fn parse(text: &str, delimiter: char, line: usize) -> Result<Self> {
        let fail = |reason: String| GrowthError::Parse { line, reason };

        let mut fields: Vec<&str> = text.trim().split(delimiter).map(str::trim).collect();
        while fields.len() > FIELD_COUNT && fields.last().is_some_and(|f| f.is_empty()) {
            fields.pop();
        }
        if fields.len() != FIELD_COUNT {
            return Err(fail(format!(
                "expected {FIELD_COUNT} fields, found {}",
                fields.len()
            )));
        }

        let mut values = [0f64; FIELD_COUNT];
        for (slot, field) in values.iter_mut().zip(&fields) {
            *slot = parse_decimal(field)
                .ok_or_else(|| fail(format!("field {field:?} is not a number")))?;
        }

        let mut heights = [0f64; RANK_COUNT];
        heights.copy_from_slice(&values[1..]);
        Self::new(values[0], heights).map_err(fail)
    }
}

/// Parse a number that may use a comma as its decimal mark.
pub(crate) fn parse_decimal(field: &str) -> Option<f64> {
    let normalized = field.trim().trim_matches('"').replace(',', ".");
    normalized.parse::<f64>().ok()
}

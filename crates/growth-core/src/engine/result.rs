use serde::{Deserialize, Serialize};

use crate::percentile::Group;

/// Answer to a forward query.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(into = "PercentileRecord")]
pub enum PercentileResult {
    Single { group: Group, percentile: f64 },
    Both { boys: f64, girls: f64, average: f64 },
}

impl PercentileResult {
    pub fn boys(&self) -> Option<f64> {
        match *self {
            PercentileResult::Single { group: Group::Boys, percentile } => Some(percentile),
            PercentileResult::Single { .. } => None,
            PercentileResult::Both { boys, .. } => Some(boys),
        }
    }

    pub fn girls(&self) -> Option<f64> {
        match *self {
            PercentileResult::Single { group: Group::Girls, percentile } => Some(percentile),
            PercentileResult::Single { .. } => None,
            PercentileResult::Both { girls, .. } => Some(girls),
        }
    }

    pub fn get(&self, group: Group) -> Option<f64> {
        match group {
            Group::Boys => self.boys(),
            Group::Girls => self.girls(),
        }
    }

    /// Mean of both groups, or the single group's value.
    pub fn average(&self) -> f64 {
        match *self {
            PercentileResult::Single { percentile, .. } => percentile,
            PercentileResult::Both { average, .. } => average,
        }
    }
}

/// Flat record form: one field per group (`None` when not requested).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PercentileRecord {
    pub boys: Option<f64>,
    pub girls: Option<f64>,
    pub average: f64,
}

impl From<PercentileResult> for PercentileRecord {
    fn from(result: PercentileResult) -> Self {
        Self { boys: result.boys(), girls: result.girls(), average: result.average() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_group_record_has_null_other_group() {
        let result = PercentileResult::Single { group: Group::Boys, percentile: 50.0 };
        let json = serde_json::to_value(result).unwrap();
        assert_eq!(json, serde_json::json!({ "boys": 50.0, "girls": null, "average": 50.0 }));
    }

    #[test]
    fn both_record_carries_all_fields() {
        let result = PercentileResult::Both { boys: 40.0, girls: 60.2, average: 50.1 };
        assert_eq!(result.get(Group::Girls), Some(60.2));
        let record = PercentileRecord::from(result);
        assert_eq!(record, PercentileRecord { boys: Some(40.0), girls: Some(60.2), average: 50.1 });
    }
}

//! Fixed percentile-rank catalogue and population group selectors.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::GrowthError;

pub const RANK_COUNT: usize = 15;

/// Percentile ranks of the reference curves, lowest first.
pub const RANKS: [f64; RANK_COUNT] = [
    0.1, 1.0, 3.0, 5.0, 10.0, 15.0, 25.0, 50.0, 75.0, 85.0, 90.0, 95.0, 97.0, 99.0, 99.9,
];

/// Column labels used by reference files, aligned with [`RANKS`].
pub const RANK_LABELS: [&str; RANK_COUNT] = [
    "P01", "P1", "P3", "P5", "P10", "P15", "P25", "P50", "P75", "P85", "P90", "P95", "P97",
    "P99", "P999",
];

pub const MIN_RANK: f64 = RANKS[0];
pub const MAX_RANK: f64 = RANKS[RANK_COUNT - 1];

/// A reference population group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Group {
    Boys,
    Girls,
}

impl Group {
    pub const ALL: [Group; 2] = [Group::Boys, Group::Girls];

    pub fn as_str(self) -> &'static str {
        match self {
            Group::Boys => "boys",
            Group::Girls => "girls",
        }
    }
}

impl fmt::Display for Group {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Group {
    type Err = GrowthError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match GenderSelector::from_str(s)? {
            GenderSelector::Boys => Ok(Group::Boys),
            GenderSelector::Girls => Ok(Group::Girls),
            GenderSelector::Both => Err(GrowthError::InvalidArgument(
                "expected a single group (boys or girls), got both".into(),
            )),
        }
    }
}

/// Which group(s) a forward query is answered for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GenderSelector {
    Boys,
    Girls,
    #[default]
    Both,
}

impl GenderSelector {
    /// Groups covered by this selector, boys first.
    pub fn groups(self) -> &'static [Group] {
        match self {
            GenderSelector::Boys => &[Group::Boys],
            GenderSelector::Girls => &[Group::Girls],
            GenderSelector::Both => &Group::ALL,
        }
    }
}

impl From<Group> for GenderSelector {
    fn from(group: Group) -> Self {
        match group {
            Group::Boys => GenderSelector::Boys,
            Group::Girls => GenderSelector::Girls,
        }
    }
}

impl fmt::Display for GenderSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            GenderSelector::Boys => "boys",
            GenderSelector::Girls => "girls",
            GenderSelector::Both => "both",
        })
    }
}

impl FromStr for GenderSelector {
    type Err = GrowthError;

    /// Accepts `boys`/`male`, `girls`/`female` and `both`, ignoring case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "boys" | "male" => Ok(GenderSelector::Boys),
            "girls" | "female" => Ok(GenderSelector::Girls),
            "both" => Ok(GenderSelector::Both),
            other => Err(GrowthError::InvalidArgument(format!(
                "unknown gender selector {other:?} (expected boys, girls or both)"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ranks_are_strictly_increasing() {
        assert!(RANKS.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(RANK_LABELS[7], "P50");
        assert_eq!(RANKS[7], 50.0);
    }

    #[test]
    fn selector_accepts_aliases() {
        assert_eq!("male".parse::<GenderSelector>().unwrap(), GenderSelector::Boys);
        assert_eq!("Girls".parse::<GenderSelector>().unwrap(), GenderSelector::Girls);
        assert_eq!(" BOTH ".parse::<GenderSelector>().unwrap(), GenderSelector::Both);
        assert_eq!("female".parse::<Group>().unwrap(), Group::Girls);
    }

    #[test]
    fn unknown_selector_is_invalid_argument() {
        let err = "other".parse::<GenderSelector>().unwrap_err();
        assert!(matches!(err, GrowthError::InvalidArgument(_)));
        assert!(matches!("both".parse::<Group>(), Err(GrowthError::InvalidArgument(_))));
    }

    #[test]
    fn both_covers_two_groups() {
        assert_eq!(GenderSelector::Both.groups(), &[Group::Boys, Group::Girls]);
        assert_eq!(GenderSelector::from(Group::Girls).groups(), &[Group::Girls]);
    }
}

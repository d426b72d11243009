//! Height-for-age percentile ranking against a population reference standard.
//!
//! A [`ReferenceTable`] is built once per population group from the raw
//! reference file, a [`PercentileEngine`] is built once from the two tables,
//! and every query afterwards is a pure function of the engine and its input.

pub mod dataset;
pub mod engine;
pub mod error;
pub mod interp;
pub mod percentile;
pub mod reference;

pub use dataset::{age_on, Measurement, MeasurementSeries};
pub use engine::{build_engine, PercentileEngine, PercentileResult};
pub use error::{GrowthError, Result};
pub use percentile::{GenderSelector, Group, RANKS, RANK_COUNT, RANK_LABELS};
pub use reference::{ReferenceRow, ReferenceTable, TableBuilder, TableFormat};

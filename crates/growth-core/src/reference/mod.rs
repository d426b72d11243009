//! Reference Table Builder.
//!
//! Turns a raw per-group reference file (age in months plus 15 percentile
//! heights per row) into a sparse, age-keyed [`ReferenceTable`].

mod builder;
mod row;
mod sampling;
mod table;

pub use builder::{TableBuilder, TableFormat};
pub use row::ReferenceRow;
pub(crate) use row::parse_decimal;
pub use sampling::sampled_age;
pub use table::ReferenceTable;

use thiserror::Error;

/// Errors produced while building reference tables or answering queries.
#[derive(Error, Debug)]
pub enum GrowthError {
    /// A reference row could not be read. The builder recovers from this by
    /// skipping the row.
    #[error("line {line}: {reason}")]
    Parse { line: usize, reason: String },

    /// Too few sampled rows survive to fit a cubic curve.
    #[error("insufficient reference data: {got} sampled rows, need at least {min}")]
    InsufficientData { got: usize, min: usize },

    /// Curve sample points are not strictly increasing in age.
    #[error("malformed reference table: {0}")]
    MalformedTable(String),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Measurement file is missing required structure.
    #[error("dataset error: {0}")]
    Dataset(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, GrowthError>;

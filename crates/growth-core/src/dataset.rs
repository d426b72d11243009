//! Measurement series files: a child's (age, height) history.
//!
//! ```text
//! Birthdate;14.03.2019      <- optional
//! Age;Height
//! 1.5;82.3
//! 2,0;86,9                  <- decimal commas accepted
//! ```
//!
//! Columns other than Age and Height are carried through untouched, and the
//! header order is kept when the series is written back.

use std::fmt;
use std::fs;
use std::path::Path;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{GrowthError, Result};
use crate::reference::parse_decimal;

pub const BIRTHDATE_FORMAT: &str = "%d.%m.%Y";
const BIRTHDATE_TAG: &str = "Birthdate";
const SEPARATOR: char = ';';

/// Days per year used to convert elapsed days to an age.
const DAYS_PER_YEAR: f64 = 365.25;

const AGE_COLUMN: &str = "Age";
const HEIGHT_COLUMN: &str = "Height";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Measurement {
    /// Age in years.
    pub age: f64,
    /// Height in cm.
    pub height: f64,
    /// Raw text of the non Age/Height fields, in file order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub extra: Vec<String>,
}

impl Measurement {
    pub fn new(age: f64, height: f64) -> Self {
        Self { age, height, extra: Vec::new() }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MeasurementSeries {
    pub birthdate: Option<NaiveDate>,
    /// Header columns in file order; empty means `Age;Height`.
    #[serde(default)]
    pub columns: Vec<String>,
    pub measurements: Vec<Measurement>,
}

fn is_column(name: &str, column: &str) -> bool {
    name.trim().eq_ignore_ascii_case(column)
}

/// Age in years on `date` for a child born on `birthdate`.
pub fn age_on(birthdate: NaiveDate, date: NaiveDate) -> f64 {
    (date - birthdate).num_days() as f64 / DAYS_PER_YEAR
}

/// Parse a `DD.MM.YYYY` date.
pub fn parse_birthdate(text: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(text.trim(), BIRTHDATE_FORMAT).map_err(|e| {
        GrowthError::InvalidArgument(format!("birthdate {text:?} is not DD.MM.YYYY: {e}"))
    })
}

impl MeasurementSeries {
    pub fn new(birthdate: Option<NaiveDate>) -> Self {
        Self { birthdate, columns: Vec::new(), measurements: Vec::new() }
    }

    pub fn parse(text: &str) -> Result<Self> {
        let mut lines = text.lines().map(|l| l.trim_start_matches('\u{feff}')).peekable();

        let mut birthdate = None;
        if let Some(&first) = lines.peek() {
            if first.trim().starts_with(BIRTHDATE_TAG) {
                birthdate = first
                    .split(SEPARATOR)
                    .nth(1)
                    .and_then(|d| parse_birthdate(d).ok());
                if birthdate.is_none() {
                    tracing::debug!(line = %first, "ignoring unreadable birthdate");
                }
                lines.next();
            }
        }

        let header = lines
            .by_ref()
            .find(|l| !l.trim().is_empty())
            .ok_or_else(|| GrowthError::Dataset("missing Age;Height header".into()))?;
        let columns: Vec<String> = header.split(SEPARATOR).map(str::to_owned).collect();
        let find = |name: &str| columns.iter().position(|c| is_column(c, name));
        let (age_col, height_col) = match (find(AGE_COLUMN), find(HEIGHT_COLUMN)) {
            (Some(a), Some(h)) => (a, h),
            _ => {
                return Err(GrowthError::Dataset(format!(
                    "header must contain Age and Height columns, found: {}",
                    columns.join(", ")
                )))
            }
        };

        let mut series = Self::new(birthdate);
        for line in lines.filter(|l| !l.trim().is_empty()) {
            let fields: Vec<&str> = line.split(SEPARATOR).collect();
            let value = |col: usize| {
                fields.get(col).and_then(|f| parse_decimal(f)).filter(|v| v.is_finite())
            };
            let (Some(age), Some(height)) = (value(age_col), value(height_col)) else {
                tracing::debug!(%line, "dropping measurement row");
                continue;
            };
            // Short rows are padded so every header column has a field.
            let width = fields.len().max(columns.len());
            let extra = (0..width)
                .filter(|&col| col != age_col && col != height_col)
                .map(|col| fields.get(col).copied().unwrap_or_default().to_owned())
                .collect();
            series.measurements.push(Measurement { age, height, extra });
        }
        series.columns = columns;
        Ok(series)
    }

    pub fn read(path: impl AsRef<Path>) -> Result<Self> {
        Self::parse(&fs::read_to_string(path)?)
    }

    pub fn write(&self, path: impl AsRef<Path>) -> Result<()> {
        fs::write(path, self.to_string())?;
        Ok(())
    }

    /// Append a measurement taken on `date`, deriving the age from the
    /// birthdate.
    pub fn push_measured_on(&mut self, date: NaiveDate, height: f64) -> Result<Measurement> {
        let birthdate = self
            .birthdate
            .ok_or_else(|| GrowthError::Dataset("birthdate is not set".into()))?;
        if !height.is_finite() || height < 0.0 {
            return Err(GrowthError::InvalidArgument(format!("invalid height {height}")));
        }
        let age = age_on(birthdate, date);
        if age < 0.0 {
            return Err(GrowthError::InvalidArgument(format!(
                "measurement date {date} precedes birthdate {birthdate}"
            )));
        }
        let blanks = self.columns.iter().filter(|c| {
            !is_column(c, AGE_COLUMN) && !is_column(c, HEIGHT_COLUMN)
        });
        let m = Measurement { age, height, extra: blanks.map(|_| String::new()).collect() };
        self.measurements.push(m.clone());
        Ok(m)
    }

    /// Current age in years, if the birthdate is known.
    pub fn age_on(&self, date: NaiveDate) -> Option<f64> {
        self.birthdate.map(|b| age_on(b, date))
    }

    pub fn points(&self) -> Vec<(f64, f64)> {
        self.measurements.iter().map(|m| (m.age, m.height)).collect()
    }
}

impl fmt::Display for MeasurementSeries {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(date) = self.birthdate {
            writeln!(f, "{BIRTHDATE_TAG}{SEPARATOR}{}", date.format(BIRTHDATE_FORMAT))?;
        }
        let default_columns = [AGE_COLUMN.to_owned(), HEIGHT_COLUMN.to_owned()];
        let columns =
            if self.columns.is_empty() { &default_columns[..] } else { &self.columns[..] };
        let sep = SEPARATOR.to_string();
        writeln!(f, "{}", columns.join(sep.as_str()))?;

        let age_col = columns.iter().position(|c| is_column(c, AGE_COLUMN));
        let height_col = columns.iter().position(|c| is_column(c, HEIGHT_COLUMN));
        for m in &self.measurements {
            let mut extra = m.extra.iter();
            let mut fields: Vec<String> = (0..columns.len())
                .map(|col| match col {
                    c if Some(c) == age_col => m.age.to_string(),
                    c if Some(c) == height_col => m.height.to_string(),
                    _ => extra.next().cloned().unwrap_or_default(),
                })
                .collect();
            fields.extend(extra.cloned());
            writeln!(f, "{}", fields.join(sep.as_str()))?;
        }
        Ok(())
    }
}

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::row::ReferenceRow;
use super::table::ReferenceTable;
use crate::error::{GrowthError, Result};

/// Layout of a raw reference file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableFormat {
    /// Field separator.
    pub delimiter: char,
    /// Leading lines to skip before data rows (column labels).
    pub header_lines: usize,
}

impl Default for TableFormat {
    fn default() -> Self {
        Self { delimiter: ';', header_lines: 1 }
    }
}

/// Reads raw reference files into [`ReferenceTable`]s.
///
/// Rows that fail to parse are skipped and counted; blank lines are ignored.
#[derive(Debug, Clone, Default)]
pub struct TableBuilder {
    format: TableFormat,
}

impl TableBuilder {
    pub fn new(format: TableFormat) -> Self {
        Self { format }
    }

    pub fn format(&self) -> &TableFormat {
        &self.format
    }

    pub fn parse_str(&self, text: &str) -> Result<ReferenceTable> {
        self.read(text.as_bytes())
    }

    pub fn open(&self, path: impl AsRef<Path>) -> Result<ReferenceTable> {
        let path = path.as_ref();
        let file = File::open(path)?;
        tracing::debug!(path = %path.display(), "reading reference table");
        self.read(BufReader::new(file))
    }

    pub fn read<R: BufRead>(&self, reader: R) -> Result<ReferenceTable> {
        let mut rows = Vec::new();
        let mut skipped = 0usize;

        // Raw byte lines: header lines are never decoded, and a data line that
        // is not UTF-8 is a row parse failure like any other.
        for (idx, bytes) in reader.split(b'\n').enumerate() {
            let bytes = bytes?;
            if idx < self.format.header_lines {
                continue;
            }
            let raw = bytes.strip_suffix(b"\r").unwrap_or(&bytes[..]);
            let parsed = std::str::from_utf8(raw)
                .map_err(|e| GrowthError::Parse {
                    line: idx + 1,
                    reason: format!("not UTF-8: {e}"),
                })
                .and_then(|text| {
                    if text.trim().is_empty() {
                        Ok(None)
                    } else {
                        ReferenceRow::parse(text, self.format.delimiter, idx + 1).map(Some)
                    }
                });
            match parsed {
                Ok(None) => {}
                Ok(Some(row)) => rows.push(row),
                Err(GrowthError::Parse { line, reason }) => {
                    tracing::debug!(line, %reason, "skipping reference row");
                    skipped += 1;
                }
                Err(e) => return Err(e),
            }
        }

        let parsed = rows.len();
        let table = ReferenceTable::from_rows(rows)?.with_skipped(skipped);
        tracing::debug!(parsed, skipped, sampled = table.len(), "built reference table");
        Ok(table)
    }
}

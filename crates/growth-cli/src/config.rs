//! Reference-file settings: optional JSON config file, overridden by flags.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use growth_core::TableFormat;
use serde::Deserialize;

/// Contents of a `--config` JSON file.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub boys: Option<PathBuf>,
    pub girls: Option<PathBuf>,
    pub format: TableFormat,
}

/// Values given on the command line; each one wins over the file.
#[derive(Debug, Default)]
pub struct Overrides {
    pub boys: Option<PathBuf>,
    pub girls: Option<PathBuf>,
    pub delimiter: Option<char>,
    pub header_lines: Option<usize>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub boys: PathBuf,
    pub girls: PathBuf,
    pub format: TableFormat,
}

impl FileConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        Self::parse(&text).with_context(|| format!("parsing config {}", path.display()))
    }

    pub fn parse(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn merge(self, overrides: Overrides) -> Result<Settings> {
        let mut format = self.format;
        if let Some(d) = overrides.delimiter {
            format.delimiter = d;
        }
        if let Some(n) = overrides.header_lines {
            format.header_lines = n;
        }

        let (Some(boys), Some(girls)) = (overrides.boys.or(self.boys), overrides.girls.or(self.girls))
        else {
            bail!("both --boys and --girls reference files are required (flag or config file)");
        };
        Ok(Settings { boys, girls, format })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_values_fill_in_missing_flags() {
        let file = FileConfig::parse(
            r#"{ "boys": "ref/boys.csv", "girls": "ref/girls.csv", "format": { "delimiter": "," } }"#,
        )
        .unwrap();
        let settings = file
            .merge(Overrides { girls: Some("other.csv".into()), ..Default::default() })
            .unwrap();
        assert_eq!(settings.boys, PathBuf::from("ref/boys.csv"));
        assert_eq!(settings.girls, PathBuf::from("other.csv"));
        assert_eq!(settings.format, TableFormat { delimiter: ',', header_lines: 1 });
    }

    #[test]
    fn flags_override_format() {
        let settings = FileConfig::default()
            .merge(Overrides {
                boys: Some("b.csv".into()),
                girls: Some("g.csv".into()),
                delimiter: Some('\t'),
                header_lines: Some(2),
            })
            .unwrap();
        assert_eq!(settings.format, TableFormat { delimiter: '\t', header_lines: 2 });
    }

    #[test]
    fn missing_reference_path_is_an_error() {
        let err = FileConfig::default()
            .merge(Overrides { boys: Some("b.csv".into()), ..Default::default() })
            .unwrap_err();
        assert!(err.to_string().contains("--girls"));
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(FileConfig::parse(r#"{ "boyz": "x.csv" }"#).is_err());
    }
}

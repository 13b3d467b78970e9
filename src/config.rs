// src/config.rs

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::{collections::BTreeMap, fs, path::{Path, PathBuf}};

/// Cell values treated as missing on load, in addition to the empty string.
pub const DEFAULT_MISSING_MARKERS: &[&str] = &[
    "NA", "N/A", "n/a", "NaN", "nan", "-NaN", "-nan", "NULL", "null", "None", "<NA>", "#N/A",
    "#NA",
];

/// Run configuration. Every field has a default, so an empty YAML document
/// (or no file at all) gives the stock behaviour.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct ReportConfig {
    /// Alternate header → canonical header, applied before validation.
    pub column_aliases: BTreeMap<String, String>,
    /// Field delimiter of the input file. Must be a single ASCII character.
    pub delimiter: char,
    pub missing_markers: Vec<String>,
    pub output_dir: PathBuf,
    pub summary_file: String,
    pub workbook_file: String,
    pub insights_file: String,
}

impl Default for ReportConfig {
    fn default() -> Self {
        let column_aliases = [("Total_Sales", "Sales"), ("Order_Date", "Date")]
            .into_iter()
            .map(|(from, to)| (from.to_string(), to.to_string()))
            .collect();

        Self {
            column_aliases,
            delimiter: ',',
            missing_markers: DEFAULT_MISSING_MARKERS.iter().map(|s| s.to_string()).collect(),
            output_dir: PathBuf::from("."),
            summary_file: "Sales_Summary_Report.csv".into(),
            workbook_file: "Sales_Report.xlsx".into(),
            insights_file: "Sales_Insights.txt".into(),
        }
    }
}

impl ReportConfig {
    /// Parse a YAML config file; missing keys fall back to defaults.
    pub fn from_yaml_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        Self::from_yaml_str(&text).with_context(|| format!("parsing config {}", path.display()))
    }

    pub fn from_yaml_str(text: &str) -> Result<Self> {
        // serde_yaml rejects an empty document, treat it as "all defaults"
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        let cfg: Self = serde_yaml::from_str(text)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<()> {
        self.delimiter_byte()?;
        for name in [&self.summary_file, &self.workbook_file, &self.insights_file] {
            if name.trim().is_empty() {
                bail!("output file names must not be empty");
            }
        }
        for (from, to) in &self.column_aliases {
            if from.trim().is_empty() || to.trim().is_empty() {
                bail!("column alias {from:?} -> {to:?} has an empty side");
            }
        }
        Ok(())
    }

    pub fn delimiter_byte(&self) -> Result<u8> {
        if !self.delimiter.is_ascii() || self.delimiter == '"' || self.delimiter == '\n' {
            bail!("unsupported delimiter {:?}", self.delimiter);
        }
        Ok(self.delimiter as u8)
    }

    pub fn is_missing(&self, cell: &str) -> bool {
        cell.is_empty() || self.missing_markers.iter().any(|m| m == cell)
    }

    pub fn summary_path(&self) -> PathBuf {
        self.output_dir.join(&self.summary_file)
    }

    pub fn workbook_path(&self) -> PathBuf {
        self.output_dir.join(&self.workbook_file)
    }

    pub fn insights_path(&self) -> PathBuf {
        self.output_dir.join(&self.insights_file)
    }
}

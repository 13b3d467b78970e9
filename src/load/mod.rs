// src/load/mod.rs
pub mod raw_table;
pub mod utils;

pub use raw_table::RawTable;

use anyhow::anyhow;
use csv::ReaderBuilder;
use std::path::Path;
use tracing::{debug, info};

use crate::config::ReportConfig;
use crate::error::PipelineError;
use utils::normalize_headers;

/// Read a delimited file with a header row into a `RawTable`.
///
/// - header names are trimmed (and de-duplicated)
/// - cells are kept verbatim; a cell that is blank or a configured marker
///   once trimmed becomes `None`
/// - short rows are padded with `None`, long rows fail the load
///
/// Any failure is a `PipelineError::Load`; no partial table is returned.
#[tracing::instrument(level = "info", skip(path, config), fields(path = %path.as_ref().display()))]
pub fn load_table<P: AsRef<Path>>(path: P, config: &ReportConfig) -> Result<RawTable, PipelineError> {
    let path = path.as_ref();
    read_table(path, config).map_err(|e| PipelineError::load(path, e))
}

fn read_table(path: &Path, config: &ReportConfig) -> anyhow::Result<RawTable> {
    // 1) Open with a flexible reader so short rows can be padded below
    let delimiter = config.delimiter_byte()?;
    let mut rdr = ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .flexible(true)
        .from_path(path)?;

    // 2) Header row
    let header_record = rdr.headers()?.clone();
    if header_record.is_empty() || header_record.iter().all(|h| h.trim().is_empty()) {
        return Err(anyhow!("no columns to parse from file"));
    }
    let headers = normalize_headers(header_record.iter());
    info!(columns = ?headers, "available columns");

    // 3) Data rows
    let width = headers.len();
    let mut rows = Vec::new();
    for result in rdr.records() {
        // csv errors carry their own record/line position
        let record = result?;
        if record.len() > width {
            let line = record.position().map(|p| p.line()).unwrap_or_default();
            return Err(anyhow!(
                "expected {} fields in line {}, saw {}",
                width,
                line,
                record.len()
            ));
        }

        let mut row: Vec<Option<String>> = record
            .iter()
            .map(|cell| {
                if config.is_missing(cell.trim()) {
                    None
                } else {
                    Some(cell.to_string())
                }
            })
            .collect();
        row.resize(width, None);
        rows.push(row);
    }

    debug!(rows = rows.len(), "parsed data rows");
    Ok(RawTable { headers, rows })
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_tmp(content: &str) -> Result<NamedTempFile> {
        let mut tmp = NamedTempFile::new()?;
        tmp.write_all(content.as_bytes())?;
        Ok(tmp)
    }

    #[test]
    fn loads_headers_and_rows() -> Result<()> {
        let tmp = write_tmp(
            " Sales , Date,Product,Region\n100,2024-01-01,A,East\n 50 ,2024-01-02,B,\n",
        )?;
        let table = load_table(tmp.path(), &ReportConfig::default())?;

        assert_eq!(table.headers, vec!["Sales", "Date", "Product", "Region"]);
        assert_eq!(table.num_rows(), 2);
        assert_eq!(table.rows[1][0].as_deref(), Some(" 50 "));
        assert_eq!(table.rows[1][3], None);
        Ok(())
    }

    #[test]
    fn marks_missing_markers_and_pads_short_rows() -> Result<()> {
        let tmp = write_tmp("Sales,Date,Product,Region\nN/A,2024-01-01,A\n")?;
        let table = load_table(tmp.path(), &ReportConfig::default())?;

        assert_eq!(table.rows[0], vec![None, Some("2024-01-01".to_string()), Some("A".to_string()), None]);
        Ok(())
    }

    #[test]
    fn cells_are_kept_verbatim() -> Result<()> {
        let tmp = write_tmp(
            "Sales,Date,Product,Region,Note\n1,2024-01-01, A ,East,\"\"\"quoted\"\"\"\n2,2024-01-01,A,East,  padded  \n3,2024-01-01,A,East,  N/A \n",
        )?;
        let table = load_table(tmp.path(), &ReportConfig::default())?;

        assert_eq!(table.rows[0][2].as_deref(), Some(" A "));
        assert_eq!(table.rows[0][4].as_deref(), Some("\"quoted\""));
        assert_eq!(table.rows[1][4].as_deref(), Some("  padded  "));
        assert_eq!(table.rows[2][4], None);
        Ok(())
    }

    #[test]
    fn custom_delimiter() -> Result<()> {
        let tmp = write_tmp("Sales;Date;Product;Region\n1,5;2024-01-01;A;East\n")?;
        let cfg = ReportConfig {
            delimiter: ';',
            ..ReportConfig::default()
        };
        let table = load_table(tmp.path(), &cfg)?;
        assert_eq!(table.rows[0][0].as_deref(), Some("1,5"));
        Ok(())
    }

    #[test]
    fn header_only_file_is_empty_table() -> Result<()> {
        let tmp = write_tmp("Sales,Date,Product,Region\n")?;
        let table = load_table(tmp.path(), &ReportConfig::default())?;
        assert_eq!(table.num_columns(), 4);
        assert_eq!(table.num_rows(), 0);
        Ok(())
    }

    #[test]
    fn missing_file_is_load_error() {
        let err = load_table("/definitely/not/here.csv", &ReportConfig::default()).unwrap_err();
        assert!(matches!(err, PipelineError::Load { .. }));
    }

    #[test]
    fn empty_file_is_load_error() -> Result<()> {
        let tmp = write_tmp("")?;
        let err = load_table(tmp.path(), &ReportConfig::default()).unwrap_err();
        assert!(matches!(err, PipelineError::Load { .. }));
        assert!(err.to_string().contains("no columns"));
        Ok(())
    }

    #[test]
    fn overlong_row_is_load_error() -> Result<()> {
        let tmp = write_tmp("Sales,Date,Product,Region\n1,2024-01-01,A,East,extra\n")?;
        let err = load_table(tmp.path(), &ReportConfig::default()).unwrap_err();
        assert!(err.to_string().contains("expected 4 fields in line 2"));
        Ok(())
    }

    #[test]
    fn invalid_utf8_is_load_error() -> Result<()> {
        let mut tmp = NamedTempFile::new()?;
        tmp.write_all(b"Sales,Date,Product,Region\n1,2024-01-01,\xff\xfe,East\n")?;
        let err = load_table(tmp.path(), &ReportConfig::default()).unwrap_err();
        assert!(matches!(err, PipelineError::Load { .. }));
        Ok(())
    }
}

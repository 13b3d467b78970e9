// src/clean/mod.rs
pub mod convert;
pub mod date_parser;
pub mod schema;

use anyhow::{Context, Result};
use arrow::{
    array::{Array, ArrayRef, BooleanArray, StringArray},
    compute::filter_record_batch,
    record_batch::RecordBatch,
};
use std::sync::Arc;
use tracing::{info, warn};

use crate::config::ReportConfig;
use crate::error::PipelineError;
use crate::load::RawTable;
use crate::table::SalesTable;
use schema::{build_arrow_schema, build_text_schema, missing_columns, resolve_aliases};

/// Row counts from one cleaning pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CleanReport {
    pub rows_in: usize,
    /// Rows with a missing cell in any column.
    pub dropped_incomplete: usize,
    /// Rows whose Sales or Date did not coerce.
    pub dropped_uncoercible: usize,
}

impl CleanReport {
    pub fn rows_out(&self) -> usize {
        self.rows_in - self.dropped_incomplete - self.dropped_uncoercible
    }
}

/// Turn a loaded table into a typed `SalesTable`.
///
/// 1) rename alias headers
/// 2) require Sales, Date, Product and Region (else `PipelineError::Schema`)
/// 3) drop rows with any missing cell
/// 4) coerce Sales to f64 and Date to a calendar date
/// 5) drop rows where coercion failed
#[tracing::instrument(level = "info", skip_all, fields(rows = raw.num_rows()))]
pub fn clean_table(
    raw: RawTable,
    config: &ReportConfig,
) -> Result<(SalesTable, CleanReport), PipelineError> {
    let RawTable { headers, rows } = raw;

    // 1) aliases
    let headers = resolve_aliases(&headers, &config.column_aliases);

    // 2) required columns
    let missing = missing_columns(&headers);
    if !missing.is_empty() {
        warn!(missing = ?missing, available = ?headers, "required columns missing");
        return Err(PipelineError::Schema {
            missing,
            found: headers,
        });
    }

    let rows_in = rows.len();

    // 3) any-missing-value rows
    let complete: Vec<Vec<Option<String>>> = rows
        .into_iter()
        .filter(|row| row.iter().all(Option::is_some))
        .collect();
    let dropped_incomplete = rows_in - complete.len();

    // 4) + 5) coercion, then a second drop pass
    let batch = build_typed_batch(&headers, complete).context("coercing column types")?;
    let before = batch.num_rows();
    let batch = drop_uncoercible(batch, &headers).context("dropping uncoercible rows")?;

    let report = CleanReport {
        rows_in,
        dropped_incomplete,
        dropped_uncoercible: before - batch.num_rows(),
    };
    if report.dropped_uncoercible > 0 {
        warn!(
            dropped = report.dropped_uncoercible,
            "rows dropped: Sales not numeric or Date not a calendar date"
        );
    }
    info!(
        rows_in = report.rows_in,
        dropped_incomplete = report.dropped_incomplete,
        dropped_uncoercible = report.dropped_uncoercible,
        rows_out = report.rows_out(),
        "data cleaning done"
    );

    Ok((SalesTable::new(batch), report))
}

/// Build a Utf8 batch from the rows, then convert to the final types.
fn build_typed_batch(headers: &[String], rows: Vec<Vec<Option<String>>>) -> Result<RecordBatch> {
    let mut columns: Vec<Vec<Option<String>>> =
        vec![Vec::with_capacity(rows.len()); headers.len()];
    for row in rows {
        for (col, cell) in columns.iter_mut().zip(row) {
            col.push(cell);
        }
    }

    let arrays: Vec<ArrayRef> = columns
        .into_iter()
        .map(|values| Arc::new(StringArray::from(values)) as ArrayRef)
        .collect();
    let text = RecordBatch::try_new(build_text_schema(headers), arrays)
        .context("building text batch")?;

    convert::convert_to_final_types(&text, &build_arrow_schema(headers, true))
}

/// Keep rows with no nulls left after coercion and tighten the schema to
/// non-nullable.
fn drop_uncoercible(batch: RecordBatch, headers: &[String]) -> Result<RecordBatch> {
    let keep: BooleanArray = (0..batch.num_rows())
        .map(|row| Some(batch.columns().iter().all(|c| c.is_valid(row))))
        .collect();
    let filtered = filter_record_batch(&batch, &keep).context("filtering rows")?;

    RecordBatch::try_new(
        build_arrow_schema(headers, false),
        filtered.columns().to_vec(),
    )
    .context("applying cleaned schema")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(headers: &[&str], rows: &[&[Option<&str>]]) -> RawTable {
        RawTable {
            headers: headers.iter().map(|s| s.to_string()).collect(),
            rows: rows
                .iter()
                .map(|r| r.iter().map(|c| c.map(str::to_string)).collect())
                .collect(),
        }
    }

    #[test]
    fn drops_bad_sales_row() -> Result<()> {
        let table = raw(
            &["Sales", "Date", "Product", "Region"],
            &[
                &[Some("100"), Some("2024-01-01"), Some("A"), Some("East")],
                &[Some("50"), Some("2024-01-02"), Some("B"), Some("East")],
                &[Some("bad"), Some("2024-01-03"), Some("C"), Some("West")],
            ],
        );
        let (cleaned, report) = clean_table(table, &ReportConfig::default())?;

        assert_eq!(cleaned.num_rows(), 2);
        assert_eq!(report.dropped_uncoercible, 1);
        assert_eq!(report.rows_out(), 2);
        let sales = cleaned.sales().expect("Sales column");
        assert_eq!(sales.values().to_vec(), vec![100.0, 50.0]);
        assert_eq!(sales.null_count(), 0);
        Ok(())
    }

    #[test]
    fn drops_bad_date_row() -> Result<()> {
        let table = raw(
            &["Sales", "Date", "Product", "Region"],
            &[
                &[Some("1"), Some("2024-13-01"), Some("A"), Some("East")],
                &[Some("2"), Some("2024-01-02"), Some("B"), Some("East")],
            ],
        );
        let (cleaned, report) = clean_table(table, &ReportConfig::default())?;
        assert_eq!(cleaned.num_rows(), 1);
        assert_eq!(report.dropped_uncoercible, 1);
        assert_eq!(
            cleaned.date_at(0),
            chrono::NaiveDate::from_ymd_opt(2024, 1, 2)
        );
        Ok(())
    }

    #[test]
    fn missing_passthrough_value_drops_row() -> Result<()> {
        let table = raw(
            &["Sales", "Date", "Product", "Region", "Note"],
            &[
                &[Some("1"), Some("2024-01-01"), Some("A"), Some("East"), None],
                &[Some("2"), Some("2024-01-02"), Some("B"), Some("East"), Some("ok")],
            ],
        );
        let (cleaned, report) = clean_table(table, &ReportConfig::default())?;
        assert_eq!(cleaned.num_rows(), 1);
        assert_eq!(report.dropped_incomplete, 1);
        let notes = cleaned.text_column("Note").expect("passthrough column kept");
        assert_eq!(notes.value(0), "ok");
        Ok(())
    }

    #[test]
    fn aliased_headers_are_accepted() -> Result<()> {
        let table = raw(
            &["Total_Sales", "Order_Date", "Product", "Region"],
            &[&[Some("10"), Some("2024-01-01"), Some("A"), Some("East")]],
        );
        let (cleaned, _) = clean_table(table, &ReportConfig::default())?;
        assert_eq!(cleaned.column_names(), vec!["Sales", "Date", "Product", "Region"]);
        Ok(())
    }

    #[test]
    fn missing_region_is_schema_error() {
        let table = raw(
            &["Sales", "Date", "Product"],
            &[&[Some("10"), Some("2024-01-01"), Some("A")]],
        );
        match clean_table(table, &ReportConfig::default()) {
            Err(PipelineError::Schema { missing, found }) => {
                assert_eq!(missing, vec!["Region"]);
                assert_eq!(found, vec!["Sales", "Date", "Product"]);
            }
            other => panic!("expected schema error, got {other:?}"),
        }
    }

    #[test]
    fn all_rows_failing_gives_empty_table() -> Result<()> {
        let table = raw(
            &["Sales", "Date", "Product", "Region"],
            &[&[Some("x"), Some("2024-01-01"), Some("A"), Some("East")]],
        );
        let (cleaned, report) = clean_table(table, &ReportConfig::default())?;
        assert!(cleaned.is_empty());
        assert_eq!(report.rows_out(), 0);
        assert_eq!(cleaned.column_names().len(), 4);
        Ok(())
    }
}

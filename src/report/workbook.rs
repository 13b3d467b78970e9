// src/report/workbook.rs

use anyhow::{Context, Result};
use arrow::{
    array::{Array, Float64Array, StringArray},
    datatypes::DataType,
};
use chrono::{Datelike, NaiveDate};
use rust_xlsxwriter::{Chart, ChartType, ExcelDateTime, Format, Workbook, Worksheet};
use std::path::Path;

use crate::analyze::{InsightValue, Insights, Metric};
use crate::report::summary::{METRIC_HEADER, VALUE_HEADER};
use crate::table::SalesTable;

pub const RAW_DATA_SHEET: &str = "Raw Data";
pub const SUMMARY_SHEET: &str = "Summary";
pub const CHART_TITLE: &str = "Sales Insights";

const DATE_FORMAT: &str = "yyyy-mm-dd";

#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Text(String),
    Number(f64),
    Date(NaiveDate),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Sheet {
    pub name: String,
    /// Row 0 is the header row.
    pub rows: Vec<Vec<Cell>>,
}

/// A bar chart over one column of a sheet. Rows and columns are 1-based, as
/// a spreadsheet user would read them.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartSpec {
    pub sheet: String,
    pub title: String,
    pub value_column: u16,
    /// Header cell, used as the series title.
    pub title_row: u32,
    pub last_row: u32,
    pub anchor_row: u32,
    pub anchor_column: u16,
}

impl ChartSpec {
    /// Anchor in A1 notation, e.g. `E2`.
    pub fn anchor_a1(&self) -> String {
        format!("{}{}", column_letters(self.anchor_column), self.anchor_row)
    }
}

/// Everything the workbook file will contain, independent of any writer.
#[derive(Debug, Clone, PartialEq)]
pub struct WorkbookDocument {
    pub sheets: Vec<Sheet>,
    pub chart: ChartSpec,
}

impl WorkbookDocument {
    pub fn sheet(&self, name: &str) -> Option<&Sheet> {
        self.sheets.iter().find(|s| s.name == name)
    }
}

/// 1-based column number → letters (1 → A, 27 → AA).
fn column_letters(mut col: u16) -> String {
    let mut letters = Vec::new();
    while col > 0 {
        let rem = (col - 1) % 26;
        letters.push(char::from(b'A' + rem as u8));
        col = (col - 1) / 26;
    }
    letters.iter().rev().collect()
}

fn cell_at(table: &SalesTable, arr: &dyn Array, ty: &DataType, row: usize) -> Cell {
    let cell = match ty {
        DataType::Float64 => arr
            .as_any()
            .downcast_ref::<Float64Array>()
            .map(|a| Cell::Number(a.value(row))),
        DataType::Date32 => table.date_at(row).map(Cell::Date),
        _ => arr
            .as_any()
            .downcast_ref::<StringArray>()
            .map(|a| Cell::Text(a.value(row).to_string())),
    };
    cell.unwrap_or_else(|| Cell::Text(String::new()))
}

fn raw_data_sheet(table: &SalesTable) -> Sheet {
    let batch = table.batch();
    let schema = batch.schema();

    let mut rows = Vec::with_capacity(batch.num_rows() + 1);
    rows.push(
        schema
            .fields()
            .iter()
            .map(|f| Cell::Text(f.name().clone()))
            .collect(),
    );

    for row in 0..batch.num_rows() {
        let cells = batch
            .columns()
            .iter()
            .zip(schema.fields())
            .map(|(arr, fld)| cell_at(table, arr.as_ref(), fld.data_type(), row))
            .collect();
        rows.push(cells);
    }

    Sheet {
        name: RAW_DATA_SHEET.to_string(),
        rows,
    }
}

fn summary_sheet(insights: &Insights) -> Sheet {
    let mut rows = vec![vec![
        Cell::Text(METRIC_HEADER.to_string()),
        Cell::Text(VALUE_HEADER.to_string()),
    ]];
    for metric in Metric::ALL {
        let value = match insights.value(metric) {
            InsightValue::Amount(v) => Cell::Number(v),
            InsightValue::Label(s) => Cell::Text(s.to_string()),
        };
        rows.push(vec![Cell::Text(metric.as_str().to_string()), value]);
    }
    Sheet {
        name: SUMMARY_SHEET.to_string(),
        rows,
    }
}

/// Describe the report workbook: the cleaned table, the summary and a bar
/// chart over the summary values. Pure; nothing is written.
pub fn build_workbook(table: &SalesTable, insights: &Insights) -> WorkbookDocument {
    let summary = summary_sheet(insights);
    let chart = ChartSpec {
        sheet: summary.name.clone(),
        title: CHART_TITLE.to_string(),
        value_column: 2,
        title_row: 1,
        last_row: summary.rows.len() as u32,
        anchor_row: 2,
        anchor_column: 5,
    };

    WorkbookDocument {
        sheets: vec![raw_data_sheet(table), summary],
        chart,
    }
}

fn write_sheet(worksheet: &mut Worksheet, sheet: &Sheet, date_format: &Format) -> Result<()> {
    worksheet.set_name(&sheet.name)?;
    for (r, row) in sheet.rows.iter().enumerate() {
        let r = u32::try_from(r).context("too many rows for a worksheet")?;
        for (c, cell) in row.iter().enumerate() {
            let c = u16::try_from(c).context("too many columns for a worksheet")?;
            match cell {
                Cell::Text(s) => {
                    worksheet.write_string(r, c, s)?;
                }
                Cell::Number(v) => {
                    worksheet.write_number(r, c, *v)?;
                }
                Cell::Date(d) => match excel_date(*d) {
                    Some(dt) => {
                        worksheet.write_datetime_with_format(r, c, &dt, date_format)?;
                    }
                    // outside the range Excel can hold as a date
                    None => {
                        worksheet.write_string(r, c, d.format("%Y-%m-%d").to_string())?;
                    }
                },
            }
        }
    }
    Ok(())
}

fn excel_date(d: NaiveDate) -> Option<ExcelDateTime> {
    let year = u16::try_from(d.year()).ok()?;
    ExcelDateTime::from_ymd(year, d.month() as u8, d.day() as u8).ok()
}

fn chart_for(layout: &ChartSpec) -> Chart {
    // layout is 1-based, the writer is 0-based
    let col = layout.value_column - 1;
    let mut chart = Chart::new(ChartType::Column);
    chart
        .add_series()
        .set_name((layout.sheet.as_str(), layout.title_row - 1, col))
        .set_values((layout.sheet.as_str(), layout.title_row, col, layout.last_row - 1, col));
    chart.title().set_name(&layout.title);
    chart
}

/// Serialize a `WorkbookDocument` to an .xlsx file, replacing any existing file.
pub fn write_workbook(doc: &WorkbookDocument, path: &Path) -> Result<()> {
    let mut workbook = Workbook::new();
    let date_format = Format::new().set_num_format(DATE_FORMAT);

    for sheet in &doc.sheets {
        let worksheet = workbook.add_worksheet();
        write_sheet(worksheet, sheet, &date_format)
            .with_context(|| format!("writing sheet {:?}", sheet.name))?;
        if sheet.name == doc.chart.sheet {
            worksheet.insert_chart(
                doc.chart.anchor_row - 1,
                doc.chart.anchor_column - 1,
                &chart_for(&doc.chart),
            )?;
        }
    }

    workbook
        .save(path)
        .with_context(|| format!("saving workbook {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clean::clean_table;
    use crate::config::ReportConfig;
    use crate::load::RawTable;

    fn cleaned() -> Result<SalesTable> {
        let raw = RawTable {
            headers: ["Sales", "Date", "Product", "Region", "Rep"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            rows: vec![
                ["100", "2024-01-01", "A", "East", "Kim"],
                ["50", "2024-01-02", "B", "East", "Lee"],
            ]
            .into_iter()
            .map(|r| r.iter().map(|c| Some(c.to_string())).collect())
            .collect(),
        };
        Ok(clean_table(raw, &ReportConfig::default())?.0)
    }

    fn insights() -> Insights {
        Insights {
            total_sales: 150.0,
            best_selling_product: Some("A".into()),
            worst_selling_product: Some("B".into()),
            top_region: Some("East".into()),
        }
    }

    #[test]
    fn column_letters_roll_over() {
        assert_eq!(column_letters(1), "A");
        assert_eq!(column_letters(5), "E");
        assert_eq!(column_letters(26), "Z");
        assert_eq!(column_letters(27), "AA");
    }

    #[test]
    fn document_layout() -> Result<()> {
        let doc = build_workbook(&cleaned()?, &insights());

        let names: Vec<&str> = doc.sheets.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec![RAW_DATA_SHEET, SUMMARY_SHEET]);

        let chart = &doc.chart;
        assert_eq!(chart.sheet, SUMMARY_SHEET);
        assert_eq!(chart.title, "Sales Insights");
        assert_eq!(chart.value_column, 2);
        assert_eq!((chart.title_row, chart.last_row), (1, 5));
        assert_eq!(chart.anchor_a1(), "E2");
        Ok(())
    }

    #[test]
    fn raw_data_sheet_is_verbatim_table() -> Result<()> {
        let doc = build_workbook(&cleaned()?, &insights());
        let raw = doc.sheet(RAW_DATA_SHEET).expect("raw data sheet");

        assert_eq!(raw.rows.len(), 3);
        assert_eq!(
            raw.rows[0],
            ["Sales", "Date", "Product", "Region", "Rep"]
                .iter()
                .map(|s| Cell::Text(s.to_string()))
                .collect::<Vec<_>>()
        );
        assert_eq!(
            raw.rows[2],
            vec![
                Cell::Number(50.0),
                Cell::Date(NaiveDate::from_ymd_opt(2024, 1, 2).expect("valid date")),
                Cell::Text("B".into()),
                Cell::Text("East".into()),
                Cell::Text("Lee".into()),
            ]
        );
        Ok(())
    }

    #[test]
    fn summary_sheet_values() -> Result<()> {
        let doc = build_workbook(&cleaned()?, &insights());
        let summary = doc.sheet(SUMMARY_SHEET).expect("summary sheet");

        assert_eq!(summary.rows.len(), 5);
        assert_eq!(summary.rows[1], vec![Cell::Text("Total Sales".into()), Cell::Number(150.0)]);
        assert_eq!(summary.rows[4], vec![Cell::Text("Top Region".into()), Cell::Text("East".into())]);
        Ok(())
    }

    #[test]
    fn writes_xlsx_file() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("Sales_Report.xlsx");
        write_workbook(&build_workbook(&cleaned()?, &insights()), &path)?;

        let bytes = std::fs::read(&path)?;
        // xlsx is a zip container
        assert_eq!(&bytes[..2], b"PK");
        Ok(())
    }
}

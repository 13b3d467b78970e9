// src/table.rs

use arrow::{
    array::{Array, Date32Array, Float64Array, StringArray},
    record_batch::RecordBatch,
};
use chrono::NaiveDate;

use crate::clean::{date_parser, schema};

/// The cleaned sales table.
///
/// Wraps a `RecordBatch` whose `Sales` column is Float64, `Date` is Date32 and
/// every other column is Utf8, none of them holding nulls. Only the cleaner
/// constructs it.
#[derive(Debug, Clone)]
pub struct SalesTable {
    batch: RecordBatch,
}

impl SalesTable {
    pub(crate) fn new(batch: RecordBatch) -> Self {
        Self { batch }
    }

    pub fn batch(&self) -> &RecordBatch {
        &self.batch
    }

    pub fn num_rows(&self) -> usize {
        self.batch.num_rows()
    }

    pub fn is_empty(&self) -> bool {
        self.batch.num_rows() == 0
    }

    pub fn column_names(&self) -> Vec<String> {
        self.batch
            .schema()
            .fields()
            .iter()
            .map(|f| f.name().clone())
            .collect()
    }

    pub fn sales(&self) -> Option<&Float64Array> {
        self.batch
            .column_by_name(schema::SALES)?
            .as_any()
            .downcast_ref::<Float64Array>()
    }

    pub fn dates(&self) -> Option<&Date32Array> {
        self.batch
            .column_by_name(schema::DATE)?
            .as_any()
            .downcast_ref::<Date32Array>()
    }

    /// A text column by name; None if absent or not text.
    pub fn text_column(&self, name: &str) -> Option<&StringArray> {
        self.batch
            .column_by_name(name)?
            .as_any()
            .downcast_ref::<StringArray>()
    }

    pub fn date_at(&self, row: usize) -> Option<NaiveDate> {
        let dates = self.dates()?;
        if row >= dates.len() || dates.is_null(row) {
            return None;
        }
        date_parser::from_epoch_days(dates.value(row))
    }
}

use crate::clean::date_parser;
use crate::load::utils::clean_str;
use anyhow::{Context, Result};
use arrow::{
    array::{Array, ArrayRef, Date32Builder, Float64Builder, StringArray},
    datatypes::{DataType, SchemaRef},
    record_batch::RecordBatch,
};
use std::sync::Arc;

/// Parse a sales amount. Non-numeric or non-finite input is a coercion failure.
pub fn parse_amount(s: &str) -> Option<f64> {
    clean_str(s).parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Convert text columns into the types of `schema`.
///
/// Cells that fail to coerce become null; the caller decides what to do
/// with those rows.
pub fn convert_to_final_types(batch: &RecordBatch, schema: &SchemaRef) -> Result<RecordBatch> {
    let mut out = Vec::with_capacity(batch.num_columns());

    for (arr, fld) in batch.columns().iter().zip(schema.fields()) {
        match (arr.as_any().downcast_ref::<StringArray>(), fld.data_type()) {
            // Date → Date32
            (Some(sarr), DataType::Date32) => {
                let mut b = Date32Builder::with_capacity(sarr.len());
                for opt in sarr.iter() {
                    let d = opt
                        .and_then(date_parser::parse_calendar_date)
                        .map(date_parser::to_epoch_days);
                    b.append_option(d);
                }
                out.push(Arc::new(b.finish()) as ArrayRef);
            }

            // Numeric → f64
            (Some(sarr), DataType::Float64) => {
                let mut b = Float64Builder::with_capacity(sarr.len());
                for opt in sarr.iter() {
                    b.append_option(opt.and_then(parse_amount));
                }
                out.push(Arc::new(b.finish()) as ArrayRef);
            }

            // Everything else
            _ => out.push(arr.clone()),
        }
    }

    RecordBatch::try_new(schema.clone(), out).context("building typed batch")
}

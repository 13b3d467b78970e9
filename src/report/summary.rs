use anyhow::{Context, Result};
use csv::WriterBuilder;
use std::{fs, io::Write, path::Path};

use crate::analyze::Insights;

pub const METRIC_HEADER: &str = "Metric";
pub const VALUE_HEADER: &str = "Value";

/// Write the Metric/Value table as comma-separated text with a header row.
pub fn write_summary_csv<W: Write>(insights: &Insights, out: W) -> Result<()> {
    let mut wtr = WriterBuilder::new().has_headers(false).from_writer(out);
    wtr.write_record([METRIC_HEADER, VALUE_HEADER])?;
    for (metric, value) in insights.rows() {
        wtr.write_record([metric, value.as_str()])?;
    }
    wtr.flush().context("flushing summary CSV")?;
    Ok(())
}

pub fn write_summary_csv_file(insights: &Insights, path: &Path) -> Result<()> {
    let file = fs::File::create(path).with_context(|| format!("creating {}", path.display()))?;
    write_summary_csv(insights, file)
}

/// One `"<Metric>: <Value>"` line per insight, each newline-terminated.
pub fn render_digest(insights: &Insights) -> String {
    insights
        .rows()
        .into_iter()
        .map(|(metric, value)| format!("{metric}: {value}\n"))
        .collect()
}

pub fn write_digest_file(insights: &Insights, path: &Path) -> Result<()> {
    fs::write(path, render_digest(insights)).with_context(|| format!("writing {}", path.display()))
}

// src/pipeline.rs

use std::{path::Path, time::Instant};
use tracing::info;

use crate::analyze::{analyze, Insights};
use crate::clean::{clean_table, CleanReport};
use crate::config::ReportConfig;
use crate::error::PipelineError;
use crate::load::load_table;
use crate::report::{generate_reports, ReportOutcome};

/// Result of a run that got past cleaning.
#[derive(Debug)]
pub struct RunSummary {
    pub clean: CleanReport,
    pub insights: Insights,
    pub outcome: ReportOutcome,
}

/// A finished stage, handed to the observer of `run_with`.
#[derive(Debug)]
pub enum Stage<'a> {
    Loaded { columns: &'a [String], rows: usize },
    Cleaned(&'a CleanReport),
    Analyzed(&'a Insights),
    Reported(&'a ReportOutcome),
}

/// Load → clean → analyze → report, each stage gated on the previous one.
///
/// Load and schema failures stop the run before anything is written.
/// Artifact write failures are collected in `RunSummary::outcome`.
pub fn run<P: AsRef<Path>>(input: P, config: &ReportConfig) -> Result<RunSummary, PipelineError> {
    run_with(input, config, |_| {})
}

/// Same as [`run`], calling `on_stage` as soon as each stage completes.
#[tracing::instrument(level = "info", skip_all, fields(input = %input.as_ref().display()))]
pub fn run_with<P, F>(input: P, config: &ReportConfig, mut on_stage: F) -> Result<RunSummary, PipelineError>
where
    P: AsRef<Path>,
    F: FnMut(Stage<'_>),
{
    let start = Instant::now();

    // ─── 1) load ─────────────────────────────────────────────────────
    let raw = load_table(input.as_ref(), config)?;
    info!(rows = raw.num_rows(), columns = raw.num_columns(), "data loaded");
    on_stage(Stage::Loaded {
        columns: &raw.headers,
        rows: raw.num_rows(),
    });

    // ─── 2) clean ────────────────────────────────────────────────────
    let (table, clean) = clean_table(raw, config)?;
    on_stage(Stage::Cleaned(&clean));

    // ─── 3) analyze ──────────────────────────────────────────────────
    let insights = analyze(&table);
    on_stage(Stage::Analyzed(&insights));

    // ─── 4) report ───────────────────────────────────────────────────
    let outcome = generate_reports(&table, &insights, config);
    on_stage(Stage::Reported(&outcome));

    info!(
        written = outcome.written.len(),
        failed = outcome.failures.len(),
        elapsed = ?start.elapsed(),
        "run finished"
    );
    Ok(RunSummary {
        clean,
        insights,
        outcome,
    })
}

// src/report/mod.rs
pub mod summary;
pub mod workbook;

use std::path::PathBuf;
use tracing::{error, info};

use crate::analyze::Insights;
use crate::config::ReportConfig;
use crate::error::{Artifact, PipelineError};
use crate::table::SalesTable;

/// What `generate_reports` managed to write.
#[derive(Debug, Default)]
pub struct ReportOutcome {
    pub written: Vec<(Artifact, PathBuf)>,
    /// One `PipelineError::Write` per artifact that failed.
    pub failures: Vec<PipelineError>,
}

impl ReportOutcome {
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn path_of(&self, artifact: Artifact) -> Option<&PathBuf> {
        self.written
            .iter()
            .find(|(a, _)| *a == artifact)
            .map(|(_, p)| p)
    }
}

/// Write the summary CSV, the workbook and the text digest into
/// `config.output_dir`, overwriting existing files.
///
/// Artifacts are independent: a failure is recorded in the outcome and the
/// remaining artifacts are still written.
#[tracing::instrument(level = "info", skip_all, fields(dir = %config.output_dir.display()))]
pub fn generate_reports(
    table: &SalesTable,
    insights: &Insights,
    config: &ReportConfig,
) -> ReportOutcome {
    let mut outcome = ReportOutcome::default();

    for artifact in Artifact::ALL {
        let (path, result) = match artifact {
            Artifact::SummaryCsv => {
                let path = config.summary_path();
                let res = summary::write_summary_csv_file(insights, &path);
                (path, res)
            }
            Artifact::Workbook => {
                let path = config.workbook_path();
                let doc = workbook::build_workbook(table, insights);
                let res = workbook::write_workbook(&doc, &path);
                (path, res)
            }
            Artifact::InsightsText => {
                let path = config.insights_path();
                let res = summary::write_digest_file(insights, &path);
                (path, res)
            }
        };

        match result {
            Ok(()) => {
                info!(artifact = %artifact, path = %path.display(), "report generated");
                outcome.written.push((artifact, path));
            }
            Err(e) => {
                error!(artifact = %artifact, path = %path.display(), "report failed: {:#}", e);
                outcome.failures.push(PipelineError::write(artifact, path, e));
            }
        }
    }

    outcome
}

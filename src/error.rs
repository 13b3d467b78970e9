// src/error.rs

use std::{fmt, path::PathBuf};

/// Boxed cause carried by the load and write variants.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// The three output artifacts of a run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Artifact {
    SummaryCsv,
    Workbook,
    InsightsText,
}

impl Artifact {
    pub const ALL: [Artifact; 3] = [
        Artifact::SummaryCsv,
        Artifact::Workbook,
        Artifact::InsightsText,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Artifact::SummaryCsv => "summary CSV",
            Artifact::Workbook => "Excel workbook",
            Artifact::InsightsText => "insights text",
        }
    }
}

impl fmt::Display for Artifact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors raised by the pipeline stages.
///
/// `Load` and `Schema` end the run. `Write` is reported per artifact and the
/// remaining artifacts are still attempted. `Other` covers failures inside a
/// stage that no input should trigger.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("error loading data from {}: {source}", .path.display())]
    Load {
        path: PathBuf,
        #[source]
        source: BoxError,
    },

    #[error("missing columns: {missing:?}; available columns: {found:?}")]
    Schema {
        missing: Vec<String>,
        found: Vec<String>,
    },

    #[error("failed to write {artifact} to {}: {source}", .path.display())]
    Write {
        artifact: Artifact,
        path: PathBuf,
        #[source]
        source: BoxError,
    },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl PipelineError {
    pub fn load(path: impl Into<PathBuf>, err: impl Into<anyhow::Error>) -> Self {
        let err: anyhow::Error = err.into();
        PipelineError::Load {
            path: path.into(),
            source: err.into(),
        }
    }

    pub fn write(
        artifact: Artifact,
        path: impl Into<PathBuf>,
        err: impl Into<anyhow::Error>,
    ) -> Self {
        let err: anyhow::Error = err.into();
        PipelineError::Write {
            artifact,
            path: path.into(),
            source: err.into(),
        }
    }

    /// True for the kinds that abort the run.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, PipelineError::Write { .. })
    }
}

//! Sales report pipeline: load a delimited sales file, clean it into a typed
//! table, compute a fixed set of insights and write them out as a summary
//! CSV, an Excel workbook with a chart and a plain-text digest.

pub mod analyze;
pub mod clean;
pub mod config;
pub mod error;
pub mod load;
pub mod pipeline;
pub mod report;
pub mod table;

pub use analyze::{Insights, DATA_UNAVAILABLE};
pub use config::ReportConfig;
pub use error::{Artifact, PipelineError};
pub use pipeline::{run, RunSummary};
pub use table::SalesTable;

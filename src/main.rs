use anyhow::{bail, Context, Result};
use clap::Parser;
use salesreport::{
    pipeline::{self, Stage},
    Artifact, ReportConfig,
};
use std::{
    io::{self, BufRead, Write},
    path::PathBuf,
};
use tracing::{error, info};
use tracing_subscriber::{fmt, EnvFilter};

/// Clean a sales dataset and write summary reports.
#[derive(Parser, Debug)]
#[command(name = "sales-report", version)]
struct Cli {
    /// Sales dataset (delimited text with a header row). Prompted for when omitted.
    input: Option<PathBuf>,

    /// YAML file overriding aliases, delimiter, missing markers or output names.
    #[arg(long, env = "SALES_REPORT_CONFIG")]
    config: Option<PathBuf>,

    /// Directory for the report files (default: current directory).
    #[arg(long)]
    output_dir: Option<PathBuf>,
}

fn prompt_for_path() -> Result<PathBuf> {
    print!("Enter the path to your sales dataset: ");
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin()
        .lock()
        .read_line(&mut line)
        .context("reading dataset path from stdin")?;
    Ok(PathBuf::from(line.trim()))
}

fn print_stage(stage: Stage<'_>) {
    match stage {
        Stage::Loaded { columns, rows } => {
            println!("✔ Data loaded successfully ({rows} rows)");
            println!("   Available columns: {columns:?}");
        }
        Stage::Cleaned(clean) => println!(
            "✔ Data cleaned: {} of {} rows kept ({} incomplete, {} unparsable dropped)",
            clean.rows_out(),
            clean.rows_in,
            clean.dropped_incomplete,
            clean.dropped_uncoercible,
        ),
        Stage::Analyzed(insights) => {
            println!("✔ Key insights:");
            for (metric, value) in insights.rows() {
                println!("   {metric}: {value}");
            }
        }
        Stage::Reported(outcome) => {
            for (artifact, path) in &outcome.written {
                println!("✔ {artifact} generated: {}", path.display());
            }
        }
    }
}

fn main() -> Result<()> {
    // ─── 1) init logging ─────────────────────────────────────────────
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder()
        .with_env_filter(env)
        .with_writer(io::stderr)
        .init();

    // ─── 2) config ───────────────────────────────────────────────────
    let cli = Cli::parse();
    let mut config = match &cli.config {
        Some(path) => ReportConfig::from_yaml_file(path)?,
        None => ReportConfig::default(),
    };
    if let Some(dir) = cli.output_dir {
        config.output_dir = dir;
    }
    config.validate()?;
    info!(?config, "configuration");

    // ─── 3) input path ───────────────────────────────────────────────
    let input = match cli.input {
        Some(p) => p,
        None => prompt_for_path()?,
    };
    if !input.exists() {
        bail!("File not found! Please enter a valid path.");
    }

    // ─── 4) run the pipeline ─────────────────────────────────────────
    let summary = pipeline::run_with(&input, &config, print_stage)?;

    for failure in &summary.outcome.failures {
        error!("{failure}");
    }

    if !summary.outcome.is_complete() {
        bail!(
            "{} of {} reports could not be written",
            summary.outcome.failures.len(),
            Artifact::ALL.len()
        );
    }
    println!("→ Sales data analysis completed successfully");
    Ok(())
}

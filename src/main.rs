use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;

use timeseries_preproc::data::filter::select_curves;
use timeseries_preproc::data::loader::load_file;
use timeseries_preproc::data::writer::{write_annotations_csv, write_batch_csv};
use timeseries_preproc::{JobRecord, JobStatus, PreprocessingConfig};

/// Smooth, arc-normalize and annotate peaks in a table of time series.
#[derive(Parser, Debug)]
#[command(name = "timeseries-preproc")]
#[command(version, about)]
struct Cli {
    /// Input table (.csv, .json or .parquet); one column per curve.
    input: PathBuf,

    /// JSON config file; flags below override its values.
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Moving-average window length.
    #[arg(long)]
    window: Option<usize>,

    /// Use a trailing window instead of a centered one.
    #[arg(long)]
    trailing: bool,

    /// Enable or disable arc-length normalization.
    #[arg(long, value_name = "BOOL")]
    arc_normalization: Option<bool>,

    /// Minimum index distance between peaks.
    #[arg(long)]
    min_peak_distance: Option<usize>,

    /// Minimum peak height relative to the curve's range.
    #[arg(long)]
    min_rel_height: Option<f64>,

    /// Column to drop before processing.
    #[arg(long)]
    time_index_column: Option<String>,

    /// Only process these curves (comma separated).
    #[arg(long, value_delimiter = ',')]
    curves: Vec<String>,

    /// Write normalized.csv and annotations.csv here.
    #[arg(short, long, value_name = "DIR")]
    output_dir: Option<PathBuf>,

    /// Rows of each table included in the printed summary.
    #[arg(long, default_value_t = 5)]
    head: usize,
}

impl Cli {
    fn build_config(&self) -> Result<PreprocessingConfig> {
        let base = match &self.config {
            Some(path) => PreprocessingConfig::from_json_file(path)?,
            None => PreprocessingConfig::default(),
        };

        let mut builder = base.to_builder();
        if let Some(w) = self.window {
            builder = builder.smoothing_window(w);
        }
        if self.trailing {
            builder = builder.smoothing_center(false);
        }
        if let Some(enabled) = self.arc_normalization {
            builder = builder.arc_normalization(enabled);
        }
        if let Some(d) = self.min_peak_distance {
            builder = builder.min_peak_distance(d);
        }
        if let Some(h) = self.min_rel_height {
            builder = builder.min_rel_height(h);
        }
        if let Some(col) = &self.time_index_column {
            builder = builder.time_index_column(Some(col.clone()));
        }
        Ok(builder.build()?)
    }
}

fn main() -> ExitCode {
    env_logger::init();

    match try_main() {
        Ok(JobStatus::Success) => ExitCode::SUCCESS,
        Ok(_) => ExitCode::FAILURE,
        Err(e) => {
            log::error!("{e:#}");
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn try_main() -> Result<JobStatus> {
    let cli = Cli::parse();
    let config = cli.build_config()?;

    let mut batch = load_file(&cli.input, config.time_index_column())
        .with_context(|| format!("loading {}", cli.input.display()))?;
    if !cli.curves.is_empty() {
        let names: Vec<&str> = cli.curves.iter().map(String::as_str).collect();
        batch = select_curves(&batch, &names)?;
    }

    let mut job = JobRecord::new();
    let status = job.execute(&batch, &config);

    let summary = serde_json::to_string_pretty(&job.summary(cli.head)?)
        .context("serializing job summary")?;
    println!("{summary}");

    if let (Some(dir), Some(output)) = (&cli.output_dir, &job.output) {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("creating output directory {}", dir.display()))?;
        write_batch_csv(&output.normalized, &dir.join("normalized.csv"))?;
        write_annotations_csv(&output.annotations, &dir.join("annotations.csv"))?;
        log::info!("results written to {}", dir.display());
    }

    Ok(status)
}


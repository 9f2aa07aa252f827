//! The report job as an explicit object.
//!
//! A [`Pipeline`] owns its inputs, output location and worker pool size. It
//! is built once, run once, and leaves nothing behind but the output files:
//!
//! ```text
//! cases    ─ parse ─ group by uf ─ emit per record ─ sum per key ──────────┐
//!                                                                          ├─ co-group ─ filter ─ flatten ─ write
//! rainfall ─ parse ─ key + clamp ─ sum per key ─ round(1) ─────────────────┘
//! ```

use crate::aggregate::{aggregate_cases, aggregate_rainfall, KeyedTotals};
use crate::config::Settings;
use crate::error::{PipelineError, Result};
use crate::join::{join_and_filter, JoinOutput};
use crate::loader::read_records;
use crate::output::write_report;
use crate::types::{CaseRecord, OutputRow, RainfallRecord, RunSummary};
use chrono::Utc;
use log::info;
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Everything a finished run produced.
#[derive(Debug)]
pub struct PipelineRun {
    pub rows: Vec<OutputRow>,
    pub summary: RunSummary,
}

/// Intermediate counts from the in-memory part of the job.
#[derive(Debug)]
pub struct Processed {
    pub case_keys: usize,
    pub rainfall_keys: usize,
    pub joined: JoinOutput,
}

/// Aggregate both datasets and join them. The two branches run concurrently
/// on the current pool.
pub fn process(cases: Vec<CaseRecord>, rainfall: Vec<RainfallRecord>) -> Result<Processed> {
    let (case_totals, rainfall_totals): (Result<KeyedTotals>, Result<KeyedTotals>) =
        rayon::join(|| aggregate_cases(cases), || aggregate_rainfall(&rainfall));
    let case_totals = case_totals?;
    let rainfall_totals = rainfall_totals?;
    let case_keys = case_totals.len();
    let rainfall_keys = rainfall_totals.len();
    info!(
        "Aggregated {} case keys and {} rainfall keys",
        case_keys, rainfall_keys
    );

    let joined = join_and_filter(rainfall_totals, case_totals)?;
    Ok(Processed {
        case_keys,
        rainfall_keys,
        joined,
    })
}

#[derive(Debug, Clone)]
pub struct Pipeline {
    cases: PathBuf,
    rainfall: PathBuf,
    output: PathBuf,
    suffix: String,
    num_shards: usize,
    skip_header_lines: usize,
    threads: Option<usize>,
}

#[derive(Debug, Default)]
pub struct PipelineBuilder {
    cases: Option<PathBuf>,
    rainfall: Option<PathBuf>,
    output: Option<PathBuf>,
    suffix: Option<String>,
    num_shards: Option<usize>,
    skip_header_lines: Option<usize>,
    threads: Option<usize>,
}

impl PipelineBuilder {
    pub fn cases(mut self, path: impl Into<PathBuf>) -> Self {
        self.cases = Some(path.into());
        self
    }

    pub fn rainfall(mut self, path: impl Into<PathBuf>) -> Self {
        self.rainfall = Some(path.into());
        self
    }

    pub fn output(mut self, base: impl Into<PathBuf>) -> Self {
        self.output = Some(base.into());
        self
    }

    pub fn suffix(mut self, suffix: impl Into<String>) -> Self {
        self.suffix = Some(suffix.into());
        self
    }

    pub fn num_shards(mut self, n: usize) -> Self {
        self.num_shards = Some(n);
        self
    }

    pub fn skip_header_lines(mut self, n: usize) -> Self {
        self.skip_header_lines = Some(n);
        self
    }

    pub fn threads(mut self, n: Option<usize>) -> Self {
        self.threads = n;
        self
    }

    pub fn build(self) -> Result<Pipeline> {
        let cases = self
            .cases
            .ok_or_else(|| PipelineError::Config("no case dataset given".to_string()))?;
        let rainfall = self
            .rainfall
            .ok_or_else(|| PipelineError::Config("no rainfall dataset given".to_string()))?;
        let num_shards = self.num_shards.unwrap_or(1);
        if num_shards == 0 {
            return Err(PipelineError::Config(
                "num_shards must be at least 1".to_string(),
            ));
        }
        if self.threads == Some(0) {
            return Err(PipelineError::Config(
                "threads must be at least 1".to_string(),
            ));
        }
        Ok(Pipeline {
            cases,
            rainfall,
            output: self.output.unwrap_or_else(|| PathBuf::from("resultado")),
            suffix: self.suffix.unwrap_or_else(|| ".csv".to_string()),
            num_shards,
            skip_header_lines: self.skip_header_lines.unwrap_or(1),
            threads: self.threads,
        })
    }
}

impl Pipeline {
    pub fn builder() -> PipelineBuilder {
        PipelineBuilder::default()
    }

    pub fn from_settings(settings: &Settings) -> Result<Self> {
        Self::builder()
            .cases(&settings.cases)
            .rainfall(&settings.rainfall)
            .output(&settings.output)
            .suffix(settings.suffix.as_str())
            .num_shards(settings.num_shards as usize)
            .skip_header_lines(settings.skip_header_lines)
            .threads(settings.threads)
            .build()
    }

    pub fn output_base(&self) -> &Path {
        &self.output
    }

    /// Run the whole job on a worker pool owned by this call.
    pub fn run(&self) -> Result<PipelineRun> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.threads.unwrap_or(0))
            .build()?;
        info!("Running pipeline on {} threads", pool.current_num_threads());
        pool.install(|| self.execute())
    }

    fn execute(&self) -> Result<PipelineRun> {
        let start = Instant::now();
        let skip = self.skip_header_lines;

        info!("Reading cases from {}", self.cases.display());
        info!("Reading rainfall from {}", self.rainfall.display());
        let (cases, rainfall) = rayon::join(
            || read_records::<CaseRecord>(&self.cases, skip),
            || read_records::<RainfallRecord>(&self.rainfall, skip),
        );
        let cases = cases?;
        let rainfall = rainfall?;
        let case_records = cases.len();
        let rainfall_records = rainfall.len();
        info!(
            "Parsed {} case records and {} rainfall records",
            case_records, rainfall_records
        );

        let processed = process(cases, rainfall)?;
        let joined = processed.joined;
        info!(
            "Joined {} region-months ({} case-only and {} rainfall-only keys dropped)",
            joined.rows.len(),
            joined.case_only,
            joined.rainfall_only
        );
        for row in &joined.rows {
            log::trace!("{}", row.to_line());
        }

        let files = write_report(&self.output, &self.suffix, self.num_shards, &joined.rows)?;
        info!(
            "Wrote {} shard(s) for {} in {:?}",
            files.len(),
            self.output.display(),
            start.elapsed()
        );

        let summary = RunSummary {
            generated_at: Utc::now(),
            case_records,
            rainfall_records,
            case_keys: processed.case_keys,
            rainfall_keys: processed.rainfall_keys,
            joined_rows: joined.rows.len(),
            dropped_case_only: joined.case_only,
            dropped_rainfall_only: joined.rainfall_only,
            output_files: files.iter().map(|p| p.display().to_string()).collect(),
        };
        Ok(PipelineRun {
            rows: joined.rows,
            summary,
        })
    }
}

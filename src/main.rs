// Entry point: merge monthly dengue cases with monthly rainfall per region.
//
// The binary runs the whole report once:
// - reads both datasets and builds the pipeline from the CLI settings,
// - writes the sharded `;`-delimited report,
// - prints a short summary and a Markdown preview of the first rows,
// - optionally writes a JSON run summary.
mod aggregate;
mod config;
mod dataflow;
mod error;
mod join;
mod keys;
mod loader;
mod output;
mod pipeline;
mod types;
mod util;

use anyhow::Context;
use clap::Parser;
use config::Settings;
use pipeline::Pipeline;

fn main() -> anyhow::Result<()> {
    let settings = Settings::parse();

    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(settings.log_level.as_str()),
    )
    .init();

    log::info!("dengue-rain-report v{} starting", env!("CARGO_PKG_VERSION"));

    let pipeline = Pipeline::from_settings(&settings)?;
    let run = pipeline
        .run()
        .with_context(|| format!("report {} was not produced", pipeline.output_base().display()))?;
    let summary = &run.summary;

    println!(
        "Processed {} case records and {} rainfall records.",
        util::format_int(summary.case_records),
        util::format_int(summary.rainfall_records)
    );
    println!(
        "{} region-months reported; {} case-only and {} rainfall-only months skipped.\n",
        util::format_int(summary.joined_rows),
        util::format_int(summary.dropped_case_only),
        util::format_int(summary.dropped_rainfall_only)
    );
    output::preview_table_rows(&run.rows, settings.preview_rows);
    for file in &summary.output_files {
        println!("(Full table exported to {})", file);
    }

    if let Some(path) = &settings.summary {
        output::write_json(path, summary)
            .with_context(|| format!("failed to write summary {}", path.display()))?;
        println!("Summary written to {}", path.display());
    }

    Ok(())
}

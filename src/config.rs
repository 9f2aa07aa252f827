use clap::Parser;
use std::path::PathBuf;

/// Monthly dengue cases and rainfall per region, merged into one report
#[derive(Parser, Debug, Clone)]
#[command(name = "dengue-rain-report", version)]
pub struct Settings {
    /// Case reports (`|`-delimited, 9 columns)
    #[arg(long, env = "REPORT_CASES", default_value = "sample_casos_dengue.txt")]
    pub cases: PathBuf,

    /// Rainfall readings (`,`-delimited: date,mm,region)
    #[arg(long, env = "REPORT_RAINFALL", default_value = "sample_chuvas.csv")]
    pub rainfall: PathBuf,

    /// Output base name; shards are written as `<base>-NNNNN-of-NNNNN<suffix>`
    #[arg(long, default_value = "resultado")]
    pub output: PathBuf,

    /// Output file suffix
    #[arg(long, default_value = ".csv")]
    pub suffix: String,

    /// Number of output shards
    #[arg(long, default_value = "1", value_parser = clap::value_parser!(u32).range(1..))]
    pub num_shards: u32,

    /// Header lines to skip at the top of each input
    #[arg(long, default_value = "1")]
    pub skip_header_lines: usize,

    /// Write a JSON run summary to this path
    #[arg(long)]
    pub summary: Option<PathBuf>,

    /// Rows shown in the console preview
    #[arg(long, default_value = "5")]
    pub preview_rows: usize,

    /// Worker threads (defaults to the number of CPUs)
    #[arg(long)]
    pub threads: Option<usize>,

    /// Log filter, overridden by RUST_LOG
    #[arg(long, default_value = "info")]
    pub log_level: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let s = Settings::try_parse_from(["dengue-rain-report"]).unwrap();
        assert_eq!(s.output, PathBuf::from("resultado"));
        assert_eq!(s.suffix, ".csv");
        assert_eq!(s.num_shards, 1);
        assert_eq!(s.skip_header_lines, 1);
        assert!(s.summary.is_none());
        assert!(s.threads.is_none());
    }

    #[test]
    fn test_overrides() {
        let s = Settings::try_parse_from([
            "dengue-rain-report",
            "--cases",
            "c.txt",
            "--rainfall",
            "r.csv",
            "--num-shards",
            "4",
            "--threads",
            "2",
        ])
        .unwrap();
        assert_eq!(s.cases, PathBuf::from("c.txt"));
        assert_eq!(s.rainfall, PathBuf::from("r.csv"));
        assert_eq!(s.num_shards, 4);
        assert_eq!(s.threads, Some(2));
    }

    #[test]
    fn test_zero_shards_rejected() {
        assert!(Settings::try_parse_from(["dengue-rain-report", "--num-shards", "0"]).is_err());
    }
}

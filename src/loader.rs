use crate::error::{PipelineError, Result};
use crate::types::{CaseRecord, Dataset, RainfallRecord};
use rayon::prelude::*;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Column order of the case dataset.
pub const CASE_COLUMNS: [&str; 9] = [
    "id",
    "data_iniSE",
    "casos",
    "ibge_code",
    "cidade",
    "uf",
    "cep",
    "latitude",
    "longitude",
];

/// Column order of the rainfall dataset.
pub const RAINFALL_COLUMNS: [&str; 3] = ["date", "mm", "region"];

/// A record type that can be built from one delimited text line.
pub trait FromLine: Sized {
    const DATASET: Dataset;
    const COLUMNS: &'static [&'static str];

    fn from_fields(fields: Vec<&str>, line: usize) -> Self;

    /// Split `text` on the dataset delimiter and build the record. Splitting
    /// is purely syntactic: no trimming, no quoting. A field count other than
    /// `COLUMNS.len()` is fatal.
    fn parse_line(text: &str, line: usize) -> Result<Self> {
        let fields: Vec<&str> = text.split(Self::DATASET.delimiter()).collect();
        if fields.len() != Self::COLUMNS.len() {
            return Err(PipelineError::FieldCount {
                dataset: Self::DATASET,
                line,
                expected: Self::COLUMNS.len(),
                found: fields.len(),
            });
        }
        Ok(Self::from_fields(fields, line))
    }
}

impl FromLine for CaseRecord {
    const DATASET: Dataset = Dataset::Cases;
    const COLUMNS: &'static [&'static str] = &CASE_COLUMNS;

    fn from_fields(fields: Vec<&str>, line: usize) -> Self {
        let mut it = fields.into_iter().map(str::to_string);
        let mut next = || it.next().unwrap_or_default();
        CaseRecord {
            line,
            id: next(),
            data_ini_se: next(),
            casos: next(),
            ibge_code: next(),
            cidade: next(),
            uf: next(),
            cep: next(),
            latitude: next(),
            longitude: next(),
        }
    }
}

impl FromLine for RainfallRecord {
    const DATASET: Dataset = Dataset::Rainfall;
    const COLUMNS: &'static [&'static str] = &RAINFALL_COLUMNS;

    fn from_fields(fields: Vec<&str>, line: usize) -> Self {
        let mut it = fields.into_iter().map(str::to_string);
        let mut next = || it.next().unwrap_or_default();
        RainfallRecord {
            line,
            date: next(),
            mm: next(),
            region: next(),
        }
    }
}

/// Read every line of `path`, skip the first `skip_header_lines`, and parse
/// the rest into `T`. Lines are parsed in parallel; the returned records keep
/// file order. Any malformed line aborts the whole read.
pub fn read_records<T>(path: &Path, skip_header_lines: usize) -> Result<Vec<T>>
where
    T: FromLine + Send,
{
    let file = File::open(path).map_err(|source| PipelineError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;
    let lines = BufReader::new(file)
        .lines()
        .collect::<std::io::Result<Vec<String>>>()
        .map_err(|source| PipelineError::FileRead {
            path: path.to_path_buf(),
            source,
        })?;

    log::debug!(
        "{}: {} lines in {}",
        T::DATASET,
        lines.len(),
        path.display()
    );

    lines
        .par_iter()
        .enumerate()
        .skip(skip_header_lines)
        .map(|(idx, text)| T::parse_line(text, idx + 1))
        .collect()
}

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;
use tabled::Tabled;

use crate::keys::CompositeKey;

/// Which input a record, key or error belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dataset {
    Cases,
    Rainfall,
}

impl Dataset {
    pub fn delimiter(self) -> char {
        match self {
            Dataset::Cases => '|',
            Dataset::Rainfall => ',',
        }
    }
}

impl fmt::Display for Dataset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Dataset::Cases => write!(f, "cases"),
            Dataset::Rainfall => write!(f, "rainfall"),
        }
    }
}

/// One line of the case dataset. Values are kept as raw text; cleaning
/// happens during aggregation.
#[derive(Debug, Clone, PartialEq)]
pub struct CaseRecord {
    /// 1-based line number in the source file.
    pub line: usize,
    pub id: String,
    pub data_ini_se: String,
    pub casos: String,
    pub ibge_code: String,
    pub cidade: String,
    pub uf: String,
    pub cep: String,
    pub latitude: String,
    pub longitude: String,
}

/// One line of the rainfall dataset: `date,mm,region`.
#[derive(Debug, Clone, PartialEq)]
pub struct RainfallRecord {
    pub line: usize,
    pub date: String,
    pub mm: String,
    pub region: String,
}

/// Both sides' aggregates for one composite key.
#[derive(Debug, Clone, PartialEq)]
pub struct JoinedRecord {
    pub key: CompositeKey,
    pub rainfall: Vec<f64>,
    pub cases: Vec<f64>,
}

/// A report line, already rendered to text.
#[derive(Debug, Clone, PartialEq, Serialize, Tabled)]
pub struct OutputRow {
    #[serde(rename = "UF")]
    #[tabled(rename = "UF")]
    pub region: String,
    #[serde(rename = "ANO")]
    #[tabled(rename = "ANO")]
    pub year: String,
    #[serde(rename = "MES")]
    #[tabled(rename = "MES")]
    pub month: String,
    #[serde(rename = "CHUVA")]
    #[tabled(rename = "CHUVA")]
    pub rainfall: String,
    #[serde(rename = "DENGUE")]
    #[tabled(rename = "DENGUE")]
    pub cases: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub generated_at: DateTime<Utc>,
    pub case_records: usize,
    pub rainfall_records: usize,
    pub case_keys: usize,
    pub rainfall_keys: usize,
    pub joined_rows: usize,
    pub dropped_case_only: usize,
    pub dropped_rainfall_only: usize,
    pub output_files: Vec<String>,
}

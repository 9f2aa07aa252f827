use crate::error::Result;
use crate::types::OutputRow;
use csv::{QuoteStyle, WriterBuilder};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tabled::{settings::Style, Table};

pub const HEADER: [&str; 5] = ["UF", "ANO", "MES", "CHUVA", "DENGUE"];
pub const DELIMITER: u8 = b';';

impl OutputRow {
    /// The row as one `;`-joined line, without terminator.
    pub fn to_line(&self) -> String {
        [
            self.region.as_str(),
            self.year.as_str(),
            self.month.as_str(),
            self.rainfall.as_str(),
            self.cases.as_str(),
        ]
        .join(";")
    }
}

/// `{base}-{index:05}-of-{count:05}{suffix}`, e.g. `resultado-00000-of-00001.csv`.
pub fn shard_path(base: &Path, index: usize, count: usize, suffix: &str) -> PathBuf {
    let mut name = base.as_os_str().to_os_string();
    name.push(format!("-{:05}-of-{:05}{}", index, count, suffix));
    PathBuf::from(name)
}

fn write_shard(path: &Path, rows: &[&OutputRow]) -> Result<()> {
    let mut wtr = WriterBuilder::new()
        .delimiter(DELIMITER)
        .quote_style(QuoteStyle::Never)
        .has_headers(false)
        .from_path(path)?;
    wtr.write_record(HEADER)?;
    for r in rows {
        wtr.serialize(r)?;
    }
    wtr.flush()?;
    Ok(())
}

/// Write `rows` over `num_shards` files, round-robin. Every shard starts with
/// the header, even when it receives no rows.
pub fn write_report(
    base: &Path,
    suffix: &str,
    num_shards: usize,
    rows: &[OutputRow],
) -> Result<Vec<PathBuf>> {
    let num_shards = num_shards.max(1);
    let mut shards: Vec<Vec<&OutputRow>> = vec![Vec::new(); num_shards];
    for (i, row) in rows.iter().enumerate() {
        shards[i % num_shards].push(row);
    }

    let mut paths = Vec::with_capacity(num_shards);
    for (index, shard) in shards.iter().enumerate() {
        let path = shard_path(base, index, num_shards, suffix);
        write_shard(&path, shard)?;
        log::debug!("wrote {} rows to {}", shard.len(), path.display());
        paths.push(path);
    }
    Ok(paths)
}

pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let s = serde_json::to_string_pretty(value)?;
    std::fs::write(path, s)?;
    Ok(())
}

pub fn preview_table_rows(rows: &[OutputRow], max_rows: usize) {
    let slice: Vec<OutputRow> = rows.iter().take(max_rows).cloned().collect();
    if slice.is_empty() {
        println!("(no rows)\n");
        return;
    }
    let table_str = Table::new(slice).with(Style::markdown()).to_string();
    println!("{}\n", table_str);
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn row(region: &str, year: &str, month: &str, rain: &str, cases: &str) -> OutputRow {
        OutputRow {
            region: region.to_string(),
            year: year.to_string(),
            month: month.to_string(),
            rainfall: rain.to_string(),
            cases: cases.to_string(),
        }
    }

    #[test]
    fn test_to_line() {
        let r = row("CE", "2015", "11", "0.4", "21.0");
        assert_eq!(r.to_line(), "CE;2015;11;0.4;21.0");
    }

    #[test]
    fn test_shard_path() {
        let p = shard_path(Path::new("out/resultado"), 0, 1, ".csv");
        assert_eq!(p, PathBuf::from("out/resultado-00000-of-00001.csv"));
        let p = shard_path(Path::new("resultado"), 2, 12, ".txt");
        assert_eq!(p, PathBuf::from("resultado-00002-of-00012.txt"));
    }

    #[test]
    fn test_write_report_single_shard() {
        let dir = TempDir::new().unwrap();
        let base = dir.path().join("resultado");
        let rows = vec![
            row("CE", "2015", "11", "0.4", "21.0"),
            row("RS", "2016", "01", "10.0", "5.0"),
        ];
        let paths = write_report(&base, ".csv", 1, &rows).unwrap();
        assert_eq!(paths.len(), 1);
        let contents = std::fs::read_to_string(&paths[0]).unwrap();
        assert_eq!(
            contents,
            "UF;ANO;MES;CHUVA;DENGUE\nCE;2015;11;0.4;21.0\nRS;2016;01;10.0;5.0\n"
        );
    }

    #[test]
    fn test_write_report_header_on_every_shard() {
        let dir = TempDir::new().unwrap();
        let base = dir.path().join("resultado");
        let rows = vec![row("CE", "2015", "11", "0.4", "21.0")];
        let paths = write_report(&base, ".csv", 3, &rows).unwrap();
        assert_eq!(paths.len(), 3);
        let first = std::fs::read_to_string(&paths[0]).unwrap();
        assert_eq!(first, "UF;ANO;MES;CHUVA;DENGUE\nCE;2015;11;0.4;21.0\n");
        for p in &paths[1..] {
            assert_eq!(std::fs::read_to_string(p).unwrap(), "UF;ANO;MES;CHUVA;DENGUE\n");
        }
    }

    #[test]
    fn test_write_report_empty() {
        let dir = TempDir::new().unwrap();
        let base = dir.path().join("vazio");
        let paths = write_report(&base, ".csv", 1, &[]).unwrap();
        assert_eq!(std::fs::read_to_string(&paths[0]).unwrap(), "UF;ANO;MES;CHUVA;DENGUE\n");
    }
}

use crate::aggregate::KeyedTotals;
use crate::dataflow::co_group_by_key;
use crate::error::{PipelineError, Result};
use crate::types::{Dataset, JoinedRecord, OutputRow};
use crate::util::format_float;
use rayon::prelude::*;

/// Outcome of joining the two aggregated sides.
#[derive(Debug, Default)]
pub struct JoinOutput {
    /// Complete rows, ordered by key.
    pub rows: Vec<OutputRow>,
    /// Keys that only had case totals.
    pub case_only: usize,
    /// Keys that only had rainfall totals.
    pub rainfall_only: usize,
}

/// Full outer grouping of rainfall and case totals by composite key.
pub fn co_group(rainfall: KeyedTotals, cases: KeyedTotals) -> Vec<JoinedRecord> {
    co_group_by_key(rainfall, cases)
        .into_iter()
        .map(|(key, group)| JoinedRecord {
            key,
            rainfall: group.left,
            cases: group.right,
        })
        .collect()
}

/// Both sides contributed at least one value. An explicit `0.0` counts.
pub fn is_complete(rec: &JoinedRecord) -> bool {
    !rec.rainfall.is_empty() && !rec.cases.is_empty()
}

fn single(values: &[f64], key: &str, side: Dataset) -> Result<f64> {
    match values {
        [value] => Ok(*value),
        _ => Err(PipelineError::DuplicateKey {
            key: key.to_string(),
            side,
            count: values.len(),
        }),
    }
}

/// Turn a complete joined record into `(region, year, month, rainfall, cases)`.
pub fn flatten(rec: &JoinedRecord) -> Result<OutputRow> {
    let key = rec.key.to_string();
    let rainfall = single(&rec.rainfall, &key, Dataset::Rainfall)?;
    let cases = single(&rec.cases, &key, Dataset::Cases)?;
    let (year, month) = rec.key.year_month()?;
    Ok(OutputRow {
        region: rec.key.region.clone(),
        year: year.to_string(),
        month: month.to_string(),
        rainfall: format_float(rainfall),
        cases: format_float(cases),
    })
}

/// Co-group, drop keys missing from either side, and flatten the rest.
pub fn join_and_filter(rainfall: KeyedTotals, cases: KeyedTotals) -> Result<JoinOutput> {
    let joined = co_group(rainfall, cases);

    let mut out = JoinOutput::default();
    for rec in joined.iter().filter(|r| !is_complete(r)) {
        if rec.cases.is_empty() {
            out.rainfall_only += 1;
        } else {
            out.case_only += 1;
        }
        log::debug!("dropping incomplete key {}", rec.key);
    }

    out.rows = joined
        .par_iter()
        .filter(|r| is_complete(r))
        .map(flatten)
        .collect::<Result<Vec<_>>>()?;
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keys::CompositeKey;

    fn totals(entries: &[(&str, &str, f64)]) -> KeyedTotals {
        entries
            .iter()
            .map(|(region, period, v)| (CompositeKey::new(*region, *period), *v))
            .collect()
    }

    #[test]
    fn test_join_keeps_keys_on_both_sides() {
        let rain = totals(&[("RS", "2016-01", 10.0), ("SP", "2016-03", 4.5)]);
        let cases = totals(&[("RS", "2016-01", 5.0), ("CE", "2015-11", 21.0)]);
        let out = join_and_filter(rain, cases).unwrap();
        assert_eq!(
            out.rows,
            vec![OutputRow {
                region: "RS".to_string(),
                year: "2016".to_string(),
                month: "01".to_string(),
                rainfall: "10.0".to_string(),
                cases: "5.0".to_string(),
            }]
        );
        assert_eq!(out.rainfall_only, 1);
        assert_eq!(out.case_only, 1);
    }

    #[test]
    fn test_rainfall_only_key_dropped() {
        let rain = totals(&[("SP", "2016-03", 12.3)]);
        let out = join_and_filter(rain, KeyedTotals::new()).unwrap();
        assert!(out.rows.is_empty());
        assert_eq!(out.rainfall_only, 1);
    }

    #[test]
    fn test_zero_values_still_count_as_present() {
        let rain = totals(&[("RS", "2016-01", 0.0)]);
        let cases = totals(&[("RS", "2016-01", 0.0)]);
        let out = join_and_filter(rain, cases).unwrap();
        assert_eq!(out.rows.len(), 1);
        assert_eq!(out.rows[0].rainfall, "0.0");
        assert_eq!(out.rows[0].cases, "0.0");
    }

    #[test]
    fn test_rows_ordered_by_key() {
        let rain = totals(&[("SP", "2016-01", 1.0), ("CE", "2016-02", 2.0), ("CE", "2016-01", 3.0)]);
        let cases = totals(&[("SP", "2016-01", 1.0), ("CE", "2016-02", 2.0), ("CE", "2016-01", 3.0)]);
        let out = join_and_filter(rain, cases).unwrap();
        let lines: Vec<String> = out.rows.iter().map(|r| format!("{}-{}-{}", r.region, r.year, r.month)).collect();
        assert_eq!(lines, vec!["CE-2016-01", "CE-2016-02", "SP-2016-01"]);
    }

    #[test]
    fn test_flatten_rejects_duplicate_values() {
        let rec = JoinedRecord {
            key: CompositeKey::new("RS", "2016-01"),
            rainfall: vec![1.0, 2.0],
            cases: vec![3.0],
        };
        let err = flatten(&rec).unwrap_err();
        assert!(matches!(err, PipelineError::DuplicateKey { count: 2, side: Dataset::Rainfall, .. }));
    }

    #[test]
    fn test_flatten_rejects_key_without_month() {
        let rain = totals(&[("RS", "2016", 1.0)]);
        let cases = totals(&[("RS", "2016", 2.0)]);
        let err = join_and_filter(rain, cases).unwrap_err();
        assert!(matches!(err, PipelineError::MalformedKey(ref k) if k == "RS-2016"));
    }

    #[test]
    fn test_co_group_lists() {
        let rain = totals(&[("RS", "2016-01", 1.0)]);
        let cases = totals(&[("RS", "2016-02", 2.0)]);
        let joined = co_group(rain, cases);
        assert_eq!(joined.len(), 2);
        assert_eq!(joined[0].rainfall, vec![1.0]);
        assert!(joined[0].cases.is_empty());
        assert!(!is_complete(&joined[0]));
        assert!(joined[1].rainfall.is_empty());
        assert_eq!(joined[1].cases, vec![2.0]);
    }
}

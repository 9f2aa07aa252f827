use crate::dataflow::{combine_per_key, group_by_key};
use crate::error::{PipelineError, Result};
use crate::keys::{period_of, CompositeKey};
use crate::types::{CaseRecord, Dataset, RainfallRecord};
use crate::util::{clean_case_count, clean_rainfall, round_to};
use rayon::prelude::*;
use std::collections::HashMap;

/// Monthly totals keyed by region and period.
pub type KeyedTotals = HashMap<CompositeKey, f64>;

/// Emit one `(key, cleaned count)` per record of a region group.
///
/// Nothing is summed here; the iterator is lazy and is consumed by the
/// per-key combine that follows.
fn case_values(
    uf: String,
    records: Vec<CaseRecord>,
) -> impl Iterator<Item = Result<(CompositeKey, f64)>> {
    records.into_iter().map(move |rec| {
        let key = CompositeKey::new(uf.clone(), period_of(&rec.data_ini_se));
        let cases = clean_case_count(&rec.casos).ok_or_else(|| PipelineError::InvalidNumber {
            dataset: Dataset::Cases,
            line: rec.line,
            field: "casos",
            value: rec.casos.clone(),
        })?;
        Ok((key, cases))
    })
}

/// Total dengue cases per region-month.
///
/// Records are first grouped by `uf`, then each group is expanded into one
/// value per record and the values are summed per key. A case count without
/// any digit contributes `0.0`.
pub fn aggregate_cases(records: Vec<CaseRecord>) -> Result<KeyedTotals> {
    let by_region = group_by_key(records.into_par_iter().map(|rec| (rec.uf.clone(), rec)));
    log::debug!("cases grouped into {} regions", by_region.len());

    let values = by_region
        .into_par_iter()
        .flat_map_iter(|(uf, recs)| case_values(uf, recs))
        .collect::<Result<Vec<_>>>()?;

    Ok(combine_per_key(values, 0.0, |a, b| a + b))
}

/// Total rainfall in mm per region-month, rounded to one decimal after
/// summing. Negative readings contribute `0.0`.
pub fn aggregate_rainfall(records: &[RainfallRecord]) -> Result<KeyedTotals> {
    let values = records
        .par_iter()
        .map(|rec| {
            let key = CompositeKey::from_date(&rec.region, &rec.date);
            let mm = clean_rainfall(&rec.mm).ok_or_else(|| PipelineError::InvalidNumber {
                dataset: Dataset::Rainfall,
                line: rec.line,
                field: "mm",
                value: rec.mm.clone(),
            })?;
            Ok((key, mm))
        })
        .collect::<Result<Vec<_>>>()?;

    let totals = combine_per_key(values, 0.0, |a, b| a + b);
    Ok(totals
        .into_iter()
        .map(|(key, mm)| (key, round_to(mm, 1)))
        .collect())
}

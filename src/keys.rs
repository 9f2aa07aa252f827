// Key derivation shared by both input pipelines.
//
// Records are bucketed by region and calendar month. The month ("period")
// is taken textually from the date column, so `2016-01-15` becomes
// `2016-01`; the date itself is never parsed or validated.
use std::fmt;

use crate::error::{PipelineError, Result};

/// Region + `YYYY-MM` bucket. Renders as `"{region}-{period}"`, the join key
/// both datasets agree on.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CompositeKey {
    pub region: String,
    pub period: String,
}

impl CompositeKey {
    pub fn new(region: impl Into<String>, period: impl Into<String>) -> Self {
        Self {
            region: region.into(),
            period: period.into(),
        }
    }

    /// Build the key straight from a raw date, as the rainfall side does.
    pub fn from_date(region: &str, date: &str) -> Self {
        Self::new(region, period_of(date))
    }

    /// Split the period back into `(year, month)`.
    ///
    /// A key built from a date with fewer than two `-` components has no
    /// month and cannot be reported.
    pub fn year_month(&self) -> Result<(&str, &str)> {
        match self.period.split_once('-') {
            Some((year, month)) if !month.contains('-') => Ok((year, month)),
            _ => Err(PipelineError::MalformedKey(self.to_string())),
        }
    }
}

impl fmt::Display for CompositeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.region, self.period)
    }
}

/// First two `-`-separated components of a date, rejoined with `-`.
pub fn period_of(date: &str) -> String {
    date.splitn(3, '-').take(2).collect::<Vec<_>>().join("-")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_period_of_full_date() {
        assert_eq!(period_of("2016-01-15"), "2016-01");
    }

    #[test]
    fn test_period_of_ignores_time_suffix() {
        assert_eq!(period_of("2015-11-02-extra"), "2015-11");
    }

    #[test]
    fn test_period_of_short_date_is_not_validated() {
        assert_eq!(period_of("2016"), "2016");
        assert_eq!(period_of(""), "");
    }

    #[test]
    fn test_composite_key_display() {
        let key = CompositeKey::from_date("RS", "2014-12-28");
        assert_eq!(key.to_string(), "RS-2014-12");
    }

    #[test]
    fn test_year_month_split() {
        let key = CompositeKey::new("CE", "2015-11");
        assert_eq!(key.year_month().unwrap(), ("2015", "11"));
    }

    #[test]
    fn test_year_month_malformed_period() {
        let key = CompositeKey::from_date("CE", "2015");
        let err = key.year_month().unwrap_err();
        assert_eq!(err.to_string(), "Malformed composite key: CE-2015");
    }

    #[test]
    fn test_keys_are_case_sensitive() {
        assert_ne!(CompositeKey::new("rs", "2016-01"), CompositeKey::new("RS", "2016-01"));
    }
}

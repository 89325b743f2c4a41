//! Region + date filter over a record set.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::Serialize;

use crate::dates::{normalize_date, normalize_toml_date};
use crate::error::TimberError;
use crate::model::LogRecord;

/// Validated filter configuration: a set of region names and one calendar day.
///
/// Region membership is exact string equality. An empty region set selects
/// nothing, and a record with an empty region is never selected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Selection {
    pub regions: BTreeSet<String>,
    pub date: NaiveDate,
}

impl Selection {
    pub fn new<I, S>(regions: I, date: NaiveDate) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            regions: regions.into_iter().map(Into::into).collect(),
            date,
        }
    }

    /// Build from textual input (CLI flags). The date may carry a time of day.
    pub fn parse<I, S>(regions: I, date: &str) -> Result<Self, TimberError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Ok(Self::new(regions, normalize_date(date)?))
    }

    /// Build from loosely typed config values.
    ///
    /// Every region element must be a string (`InvalidRegion` otherwise) and
    /// the date must normalize to a calendar day (`InvalidDate` otherwise).
    pub fn from_toml(regions: &[toml::Value], date: &toml::Value) -> Result<Self, TimberError> {
        let mut names = BTreeSet::new();
        for (index, value) in regions.iter().enumerate() {
            match value {
                toml::Value::String(s) => {
                    names.insert(s.clone());
                }
                other => {
                    return Err(TimberError::InvalidRegion {
                        index,
                        value: other.to_string(),
                    })
                }
            }
        }
        let date = normalize_toml_date(date)?;
        Ok(Self { regions: names, date })
    }

    pub fn matches(&self, record: &LogRecord) -> bool {
        !record.region.is_empty()
            && record.date == self.date
            && self.regions.contains(&record.region)
    }
}

/// Keep records whose region is selected and whose date equals the selected
/// day. Input order is preserved.
pub fn filter_records<'a, I>(records: I, selection: &Selection) -> Vec<&'a LogRecord>
where
    I: IntoIterator<Item = &'a LogRecord>,
{
    if selection.regions.is_empty() {
        return Vec::new();
    }
    records.into_iter().filter(|r| selection.matches(r)).collect()
}

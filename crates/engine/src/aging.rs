//! Camp aging: how long at-camp logs have been waiting, and which are overdue.
//!
//! Only records classified at camp are aged. A record is overdue when its age
//! is strictly greater than the threshold (7 days by default). Ages are whole
//! calendar days between the record date and the reference day; records dated
//! after the reference get a negative age and are never overdue.

use chrono::{NaiveDate, NaiveDateTime};

use crate::camp::is_at_camp;
use crate::model::{AgedRecord, AgingReport, LogRecord};

pub const DEFAULT_OVERDUE_AFTER_DAYS: i64 = 7;

/// Whole days between `date` and the reference day. Time of day is ignored.
pub fn days_at_camp(date: NaiveDate, reference_now: NaiveDateTime) -> i64 {
    (reference_now.date() - date).num_days()
}

/// Age every at-camp record against `reference_now`, then pick the overdue ones.
///
/// `overdue` is a filter over `aged` (same order, same values).
pub fn analyze_aging<'a, I>(records: I, reference_now: NaiveDateTime, threshold_days: i64) -> AgingReport<'a>
where
    I: IntoIterator<Item = &'a LogRecord>,
{
    let aged: Vec<AgedRecord<'a>> = records
        .into_iter()
        .filter(|r| is_at_camp(r))
        .map(|record| AgedRecord {
            record,
            days_at_camp: days_at_camp(record.date, reference_now),
        })
        .collect();

    let overdue = aged
        .iter()
        .filter(|a| a.days_at_camp > threshold_days)
        .copied()
        .collect();

    AgingReport {
        threshold_days,
        aged,
        overdue,
    }
}

impl AgingReport<'_> {
    pub fn has_overdue(&self) -> bool {
        !self.overdue.is_empty()
    }

    /// Oldest at-camp age, if anything is at camp.
    pub fn max_days_at_camp(&self) -> Option<i64> {
        self.aged.iter().map(|a| a.days_at_camp).max()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::fixtures::record;
    use chrono::NaiveTime;

    fn now(date: &str) -> NaiveDateTime {
        NaiveDate::parse_from_str(date, "%Y-%m-%d")
            .unwrap()
            .and_time(NaiveTime::from_hms_opt(14, 30, 0).unwrap())
    }

    #[test]
    fn nine_days_at_camp_is_overdue_mill_is_excluded() {
        let rows = [
            record("LOG100", "Meranti", 1.0, "Kapit", "2025-07-27", "Camp Site A"),
            record("LOG101", "Meranti", 1.0, "Kapit", "2025-08-02", "Mill B"),
        ];
        let report = analyze_aging(rows.iter(), now("2025-08-05"), DEFAULT_OVERDUE_AFTER_DAYS);

        assert_eq!(report.aged.len(), 1);
        assert_eq!(report.aged[0].record.log_id, "LOG100");
        assert_eq!(report.aged[0].days_at_camp, 9);
        assert_eq!(report.overdue.len(), 1);
        assert_eq!(report.overdue[0].record.log_id, "LOG100");
    }

    #[test]
    fn exactly_threshold_is_not_overdue() {
        let rows = [
            record("A", "Meranti", 1.0, "Kapit", "2025-07-29", "Camp"),
            record("B", "Meranti", 1.0, "Kapit", "2025-07-28", "Camp"),
        ];
        let report = analyze_aging(rows.iter(), now("2025-08-05"), 7);
        assert_eq!(report.aged[0].days_at_camp, 7);
        assert_eq!(report.aged[1].days_at_camp, 8);
        let ids: Vec<_> = report.overdue.iter().map(|a| a.record.log_id.as_str()).collect();
        assert_eq!(ids, vec!["B"]);
    }

    #[test]
    fn future_dates_pass_through_negative() {
        let rows = [record("A", "Meranti", 1.0, "Kapit", "2025-08-10", "Camp")];
        let report = analyze_aging(rows.iter(), now("2025-08-05"), 7);
        assert_eq!(report.aged[0].days_at_camp, -5);
        assert!(!report.has_overdue());
    }

    #[test]
    fn time_of_day_does_not_shift_age() {
        let date = NaiveDate::from_ymd_opt(2025, 7, 27).unwrap();
        let early = NaiveDate::from_ymd_opt(2025, 8, 5).unwrap().and_time(NaiveTime::MIN);
        let late = NaiveDate::from_ymd_opt(2025, 8, 5)
            .unwrap()
            .and_time(NaiveTime::from_hms_opt(23, 59, 59).unwrap());
        assert_eq!(days_at_camp(date, early), 9);
        assert_eq!(days_at_camp(date, late), 9);
    }

    #[test]
    fn no_camp_records_is_empty_not_error() {
        let rows = [record("A", "Meranti", 1.0, "Kapit", "2025-07-01", "Mill")];
        let report = analyze_aging(rows.iter(), now("2025-08-05"), 7);
        assert!(report.aged.is_empty());
        assert!(report.overdue.is_empty());
        assert_eq!(report.max_days_at_camp(), None);
    }

    #[test]
    fn custom_threshold() {
        let rows = [record("A", "Meranti", 1.0, "Kapit", "2025-08-02", "Camp")];
        let report = analyze_aging(rows.iter(), now("2025-08-05"), 2);
        assert_eq!(report.overdue.len(), 1);
        assert_eq!(report.threshold_days, 2);
        assert_eq!(report.max_days_at_camp(), Some(3));
    }
}

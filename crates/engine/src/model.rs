use std::collections::HashSet;

use chrono::NaiveDate;
use serde::Serialize;

use crate::error::TimberError;

// ---------------------------------------------------------------------------
// Input
// ---------------------------------------------------------------------------

/// One shipment unit, as loaded from the log table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LogRecord {
    pub log_id: String,
    pub species: String,
    pub volume_m3: f64,
    pub region: String,
    pub license_no: String,
    pub truck_id: String,
    pub date: NaiveDate,
    pub destination: String,
    pub latitude: f64,
    pub longitude: f64,
}

/// Validated, immutable collection of log records.
///
/// Construction is the only place record invariants are checked: unique
/// `log_id`, finite non-negative volume, finite coordinates. Everything
/// downstream borrows the records and trusts them.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct RecordSet {
    records: Vec<LogRecord>,
}

impl RecordSet {
    pub fn new(records: Vec<LogRecord>) -> Result<Self, TimberError> {
        let mut seen: HashSet<&str> = HashSet::with_capacity(records.len());
        for r in &records {
            if !seen.insert(r.log_id.as_str()) {
                return Err(TimberError::DuplicateLogId(r.log_id.clone()));
            }
            if !r.volume_m3.is_finite() || r.volume_m3 < 0.0 {
                return Err(TimberError::NegativeVolume {
                    log_id: r.log_id.clone(),
                    value: r.volume_m3,
                });
            }
            for (column, value) in [("latitude", r.latitude), ("longitude", r.longitude)] {
                if !value.is_finite() {
                    return Err(TimberError::CoordinateParse {
                        log_id: r.log_id.clone(),
                        column: column.into(),
                        value: value.to_string(),
                    });
                }
            }
        }
        Ok(Self { records })
    }

    pub fn records(&self) -> &[LogRecord] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, LogRecord> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Distinct non-empty regions in first-seen order (the default region selection).
    pub fn regions(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.records
            .iter()
            .map(|r| r.region.as_str())
            .filter(|region| !region.is_empty() && seen.insert(*region))
            .collect()
    }
}

impl<'a> IntoIterator for &'a RecordSet {
    type Item = &'a LogRecord;
    type IntoIter = std::slice::Iter<'a, LogRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

// ---------------------------------------------------------------------------
// Aggregation
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpeciesVolume {
    pub species: String,
    pub volume_m3: f64,
    pub log_count: usize,
}

/// Per-region camp inventory. `logs_remaining_at_camp` is zero-filled for
/// regions with no at-camp record, unlike species volumes which omit empty
/// groups.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CampBalance {
    pub region: String,
    pub at_camp: usize,
    pub departed: usize,
    pub logs_remaining_at_camp: usize,
}

/// Aggregate key = (license_no, truck_id).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LicenseTruckKey {
    pub license_no: String,
    pub truck_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LicenseTruckGroup {
    pub license_no: String,
    pub truck_id: String,
    pub log_count: usize,
    pub volume_m3: f64,
    pub log_ids: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Kpis {
    pub total_volume_m3: f64,
    pub total_logs: usize,
}

impl Kpis {
    /// Total volume rendered with two decimals, e.g. `3.50`.
    pub fn volume_display(&self) -> String {
        format!("{:.2}", self.total_volume_m3)
    }
}

// ---------------------------------------------------------------------------
// Aging
// ---------------------------------------------------------------------------

/// An at-camp record annotated with how long it has been waiting.
/// Negative `days_at_camp` means the record is dated after the reference.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AgedRecord<'a> {
    #[serde(flatten)]
    pub record: &'a LogRecord,
    pub days_at_camp: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct AgingReport<'a> {
    pub threshold_days: i64,
    pub aged: Vec<AgedRecord<'a>>,
    pub overdue: Vec<AgedRecord<'a>>,
}

// ---------------------------------------------------------------------------
// Routes
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteEdge {
    pub log_id: String,
    pub region: String,
    pub from_lat: f64,
    pub from_lon: f64,
    pub to_lat: f64,
    pub to_lon: f64,
}

impl RouteEdge {
    /// Origin and destination coincide (region had no known origin).
    pub fn is_degenerate(&self) -> bool {
        self.from_lat == self.to_lat && self.from_lon == self.to_lon
    }
}

// ---------------------------------------------------------------------------
// Summary + Output
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActivityPoint {
    pub log_id: String,
    pub lat: f64,
    pub lon: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct TimberMeta {
    pub config_name: String,
    pub engine_version: String,
    pub run_at: String,
    pub reference_now: String,
    pub selected_regions: Vec<String>,
    pub selected_date: NaiveDate,
}

#[derive(Debug, Clone, Serialize)]
pub struct TimberReport<'a> {
    pub meta: TimberMeta,
    pub filtered: Vec<&'a LogRecord>,
    pub kpis: Kpis,
    pub species_volume: Vec<SpeciesVolume>,
    pub license_truck: Vec<LicenseTruckGroup>,
    pub camp_balance: Vec<CampBalance>,
    pub aging: AgingReport<'a>,
    pub routes: Vec<RouteEdge>,
    pub activity_points: Vec<ActivityPoint>,
}

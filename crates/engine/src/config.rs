use std::collections::HashSet;

use chrono::NaiveDateTime;
use serde::Deserialize;

use crate::aging::DEFAULT_OVERDUE_AFTER_DAYS;
use crate::dates::normalize_toml_timestamp;
use crate::error::TimberError;
use crate::filter::Selection;
use crate::routes::{RegionOrigin, RegionTable};

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct TimberConfig {
    pub name: String,
    pub file: String,
    #[serde(default)]
    pub columns: ColumnMapping,
    pub filter: FilterConfig,
    #[serde(default)]
    pub aging: AgingConfig,
    /// Replaces the built-in region table when present. Order is significant.
    #[serde(default)]
    pub region_origins: Option<Vec<RegionOrigin>>,
}

// ---------------------------------------------------------------------------
// Column mapping
// ---------------------------------------------------------------------------

/// Header names in the input table. Defaults match the dashboard export.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ColumnMapping {
    pub log_id: String,
    pub species: String,
    pub volume_m3: String,
    pub region: String,
    pub license_no: String,
    pub truck_id: String,
    pub date: String,
    pub destination: String,
    pub latitude: String,
    pub longitude: String,
}

impl Default for ColumnMapping {
    fn default() -> Self {
        Self {
            log_id: "Log_ID".into(),
            species: "Species".into(),
            volume_m3: "Volume_m3".into(),
            region: "Region".into(),
            license_no: "License_No".into(),
            truck_id: "Truck_ID".into(),
            date: "Date".into(),
            destination: "Destination".into(),
            latitude: "Latitude".into(),
            longitude: "Longitude".into(),
        }
    }
}

// ---------------------------------------------------------------------------
// Filter + Aging
// ---------------------------------------------------------------------------

/// Raw filter values. Kept loosely typed so that bad elements surface as
/// `InvalidRegion` / `InvalidDate` instead of a generic parse error.
#[derive(Debug, Clone, Deserialize)]
pub struct FilterConfig {
    pub regions: Vec<toml::Value>,
    pub date: toml::Value,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AgingConfig {
    #[serde(default)]
    pub reference_now: Option<toml::Value>,
    #[serde(default = "default_overdue_after_days")]
    pub overdue_after_days: i64,
}

fn default_overdue_after_days() -> i64 {
    DEFAULT_OVERDUE_AFTER_DAYS
}

impl Default for AgingConfig {
    fn default() -> Self {
        Self {
            reference_now: None,
            overdue_after_days: DEFAULT_OVERDUE_AFTER_DAYS,
        }
    }
}

// ---------------------------------------------------------------------------
// Parse + Validate
// ---------------------------------------------------------------------------

impl TimberConfig {
    pub fn from_toml(input: &str) -> Result<Self, TimberError> {
        let config: TimberConfig =
            toml::from_str(input).map_err(|e| TimberError::ConfigParse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), TimberError> {
        if self.name.trim().is_empty() {
            return Err(TimberError::ConfigValidation("name must not be empty".into()));
        }
        if self.file.trim().is_empty() {
            return Err(TimberError::ConfigValidation("file must not be empty".into()));
        }
        if self.aging.overdue_after_days < 0 {
            return Err(TimberError::ConfigValidation(format!(
                "aging.overdue_after_days must be >= 0, got {}",
                self.aging.overdue_after_days
            )));
        }

        // Surfaces InvalidRegion / InvalidDate at load time.
        self.selection()?;
        self.reference_now()?;

        if let Some(ref origins) = self.region_origins {
            let mut seen = HashSet::new();
            for origin in origins {
                let key = origin.key.trim().to_lowercase();
                if key.is_empty() {
                    return Err(TimberError::ConfigValidation(
                        "region_origins: key must not be empty".into(),
                    ));
                }
                if !seen.insert(key) {
                    return Err(TimberError::ConfigValidation(format!(
                        "region_origins: duplicate key '{}'",
                        origin.key
                    )));
                }
                if !origin.latitude.is_finite() || !origin.longitude.is_finite() {
                    return Err(TimberError::ConfigValidation(format!(
                        "region_origins: '{}' has a non-finite coordinate",
                        origin.key
                    )));
                }
            }
        }

        Ok(())
    }

    pub fn selection(&self) -> Result<Selection, TimberError> {
        Selection::from_toml(&self.filter.regions, &self.filter.date)
    }

    /// Configured aging reference, if any. Callers supply "now" otherwise.
    pub fn reference_now(&self) -> Result<Option<NaiveDateTime>, TimberError> {
        self.aging
            .reference_now
            .as_ref()
            .map(normalize_toml_timestamp)
            .transpose()
    }

    pub fn region_table(&self) -> RegionTable {
        match self.region_origins {
            Some(ref origins) => RegionTable::new(origins.clone()),
            None => RegionTable::default(),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

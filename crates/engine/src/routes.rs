//! Simulated transport routes for logs that have left camp.

use serde::{Deserialize, Serialize};

use crate::camp::is_at_camp;
use crate::model::{LogRecord, RouteEdge};

/// One known region and its simulated camp origin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionOrigin {
    pub key: String,
    pub latitude: f64,
    pub longitude: f64,
}

/// Ordered region → origin lookup.
///
/// A region string resolves to the first entry whose key occurs in it,
/// compared case-insensitively. Order is the tie-break when a region names
/// several known places ("Sibu-Kapit road" resolves to kapit with the
/// built-in table).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegionTable {
    entries: Vec<RegionOrigin>,
}

const BUILTIN_ORIGINS: &[(&str, f64, f64)] = &[
    ("kapit", 2.0167, 112.9333),
    ("sibu", 2.2873, 111.8305),
    ("bintulu", 3.1739, 113.0428),
    ("miri", 4.3995, 113.9914),
    ("kuching", 1.5535, 110.3593),
];

impl Default for RegionTable {
    fn default() -> Self {
        Self::new(
            BUILTIN_ORIGINS
                .iter()
                .map(|&(key, latitude, longitude)| RegionOrigin {
                    key: key.to_string(),
                    latitude,
                    longitude,
                })
                .collect(),
        )
    }
}

impl RegionTable {
    /// Keys are lowercased once here so lookups only lowercase the region.
    pub fn new(entries: Vec<RegionOrigin>) -> Self {
        let entries = entries
            .into_iter()
            .map(|e| RegionOrigin {
                key: e.key.to_lowercase(),
                ..e
            })
            .collect();
        Self { entries }
    }

    pub fn entries(&self) -> &[RegionOrigin] {
        &self.entries
    }

    pub fn resolve(&self, region: &str) -> Option<&RegionOrigin> {
        let region = region.to_lowercase();
        self.entries
            .iter()
            .find(|e| !e.key.is_empty() && region.contains(&e.key))
    }
}

/// Build one route edge per record that is no longer at camp, in input order.
///
/// Regions with no known origin produce a zero-length edge at the record's
/// own coordinate.
pub fn resolve_routes<'a, I>(records: I, table: &RegionTable) -> Vec<RouteEdge>
where
    I: IntoIterator<Item = &'a LogRecord>,
{
    records
        .into_iter()
        .filter(|r| !is_at_camp(r))
        .map(|r| {
            let (from_lat, from_lon) = match table.resolve(&r.region) {
                Some(origin) => (origin.latitude, origin.longitude),
                None => {
                    tracing::debug!(log_id = %r.log_id, region = %r.region, "no known origin, zero-length route");
                    (r.latitude, r.longitude)
                }
            };
            RouteEdge {
                log_id: r.log_id.clone(),
                region: r.region.clone(),
                from_lat,
                from_lon,
                to_lat: r.latitude,
                to_lon: r.longitude,
            }
        })
        .collect()
}

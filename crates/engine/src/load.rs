//! CSV → `RecordSet`. Kept apart from the derivation modules, which never
//! touch text.

use crate::config::ColumnMapping;
use crate::dates::normalize_date;
use crate::error::TimberError;
use crate::model::{LogRecord, RecordSet};

/// Load CSV text into a validated record set using the given column mapping.
///
/// A missing header is reported once, before any row is read.
pub fn load_csv_records(csv_data: &str, columns: &ColumnMapping) -> Result<RecordSet, TimberError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(csv_data.as_bytes());

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| TimberError::Io(e.to_string()))?
        .iter()
        .map(|h| h.to_string())
        .collect();

    let idx = |name: &str| -> Result<usize, TimberError> {
        headers
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| TimberError::MissingColumn { column: name.into() })
    };

    let log_id_idx = idx(&columns.log_id)?;
    let species_idx = idx(&columns.species)?;
    let volume_idx = idx(&columns.volume_m3)?;
    let region_idx = idx(&columns.region)?;
    let license_idx = idx(&columns.license_no)?;
    let truck_idx = idx(&columns.truck_id)?;
    let date_idx = idx(&columns.date)?;
    let destination_idx = idx(&columns.destination)?;
    let latitude_idx = idx(&columns.latitude)?;
    let longitude_idx = idx(&columns.longitude)?;

    let mut rows = Vec::new();

    for record in reader.records() {
        let record = record.map_err(|e| TimberError::Io(e.to_string()))?;
        let cell = |i: usize| record.get(i).unwrap_or("");

        let log_id = cell(log_id_idx).to_string();

        let volume_str = cell(volume_idx);
        let volume_m3: f64 = volume_str.parse().map_err(|_| TimberError::VolumeParse {
            log_id: log_id.clone(),
            value: volume_str.into(),
        })?;

        let coord = |i: usize, column: &str| -> Result<f64, TimberError> {
            let raw = cell(i);
            raw.parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
                .ok_or_else(|| TimberError::CoordinateParse {
                    log_id: log_id.clone(),
                    column: column.into(),
                    value: raw.into(),
                })
        };
        let latitude = coord(latitude_idx, &columns.latitude)?;
        let longitude = coord(longitude_idx, &columns.longitude)?;

        rows.push(LogRecord {
            species: cell(species_idx).to_string(),
            volume_m3,
            region: cell(region_idx).to_string(),
            license_no: cell(license_idx).to_string(),
            truck_id: cell(truck_idx).to_string(),
            date: normalize_date(cell(date_idx))?,
            destination: cell(destination_idx).to_string(),
            latitude,
            longitude,
            log_id,
        });
    }

    tracing::debug!(rows = rows.len(), "loaded log records");
    RecordSet::new(rows)
}

use chrono::NaiveDateTime;

use crate::aggregate::{camp_balance, group_by_license_truck, kpis, volume_by_species};
use crate::aging::analyze_aging;
use crate::config::TimberConfig;
use crate::error::TimberError;
use crate::filter::filter_records;
use crate::model::{ActivityPoint, RecordSet, TimberMeta, TimberReport};
use crate::routes::resolve_routes;

/// Run every derivation over a loaded record set.
///
/// Species volume, license/truck groups and KPIs describe the filtered view.
/// Camp balance, aging and routes describe the whole record set.
pub fn run<'a>(
    config: &TimberConfig,
    records: &'a RecordSet,
    reference_now: NaiveDateTime,
) -> Result<TimberReport<'a>, TimberError> {
    let selection = config.selection()?;
    let table = config.region_table();

    let filtered = filter_records(records, &selection);
    tracing::debug!(total = records.len(), kept = filtered.len(), "filtered records");

    let kpis = kpis(filtered.iter().copied());
    let species_volume = volume_by_species(filtered.iter().copied());
    let license_truck = group_by_license_truck(filtered.iter().copied());
    tracing::debug!(
        species = species_volume.len(),
        license_truck_groups = license_truck.len(),
        "aggregated filtered view"
    );

    let camp_balance = camp_balance(records);
    let aging = analyze_aging(records, reference_now, config.aging.overdue_after_days);
    tracing::debug!(aged = aging.aged.len(), overdue = aging.overdue.len(), "aged camp records");

    let routes = resolve_routes(records, &table);
    let degenerate = routes.iter().filter(|r| r.is_degenerate()).count();
    if degenerate > 0 {
        tracing::warn!(degenerate, "routes with no known region origin");
    }

    let activity_points = filtered
        .iter()
        .map(|r| ActivityPoint {
            log_id: r.log_id.clone(),
            lat: r.latitude,
            lon: r.longitude,
        })
        .collect();

    tracing::info!(
        config = %config.name,
        logs = kpis.total_logs,
        volume_m3 = %kpis.volume_display(),
        overdue = aging.overdue.len(),
        routes = routes.len(),
        "timber report built"
    );

    Ok(TimberReport {
        meta: TimberMeta {
            config_name: config.name.clone(),
            engine_version: env!("CARGO_PKG_VERSION").to_string(),
            run_at: chrono::Utc::now().to_rfc3339(),
            reference_now: reference_now.format("%Y-%m-%dT%H:%M:%S").to_string(),
            selected_regions: selection.regions.iter().cloned().collect(),
            selected_date: selection.date,
        },
        filtered,
        kpis,
        species_volume,
        license_truck,
        camp_balance,
        aging,
        routes,
        activity_points,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::load::load_csv_records;
    use chrono::NaiveDate;

    const CSV: &str = "\
Log_ID,Species,Volume_m3,Region,License_No,Truck_ID,Date,Destination,Latitude,Longitude
LOG001,Meranti,3.5,Kapit,LIC-1001,TRK-01,2025-07-27,Mill A,2.0200,112.9400
LOG002,Keruing,5.2,Sibu,LIC-1002,TRK-02,2025-07-28,Camp Site B,2.3000,111.8200
LOG003,Merbau,2.9,Bintulu,LIC-1001,TRK-01,2025-07-27,Mill B,3.1900,113.0500
LOG004,Tapang,4.1,Kuching,LIC-1003,TRK-03,2025-07-28,Mill C,1.5600,110.3500
";

    const CONFIG: &str = r#"
name = "Integration Test"
file = "logs.csv"

[filter]
regions = ["Kapit", "Sibu"]
date = "2025-07-27"
"#;

    fn reference() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 8, 6)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap()
    }

    #[test]
    fn integration_sample() {
        let config = TimberConfig::from_toml(CONFIG).unwrap();
        let records = load_csv_records(CSV, &config.columns).unwrap();
        let report = run(&config, &records, reference()).unwrap();

        assert_eq!(report.filtered.len(), 1);
        assert_eq!(report.filtered[0].log_id, "LOG001");
        assert_eq!(report.kpis.total_logs, 1);
        assert_eq!(report.kpis.volume_display(), "3.50");
        assert_eq!(report.species_volume.len(), 1);
        assert_eq!(report.species_volume[0].species, "Meranti");
        assert_eq!(report.license_truck.len(), 1);
        assert_eq!(report.activity_points.len(), 1);

        // Unfiltered derivations
        assert_eq!(report.camp_balance.len(), 4);
        assert_eq!(report.aging.aged.len(), 1);
        assert_eq!(report.aging.aged[0].record.log_id, "LOG002");
        assert_eq!(report.aging.aged[0].days_at_camp, 9);
        assert_eq!(report.aging.overdue.len(), 1);
        assert_eq!(report.routes.len(), 3);

        assert_eq!(report.meta.selected_regions, vec!["Kapit", "Sibu"]);
        assert_eq!(report.meta.reference_now, "2025-08-06T09:00:00");
    }

    #[test]
    fn empty_selection_is_valid_report() {
        let config = TimberConfig::from_toml(
            r#"
name = "Nothing selected"
file = "logs.csv"
[filter]
regions = []
date = "2025-07-27"
"#,
        )
        .unwrap();
        let records = load_csv_records(CSV, &config.columns).unwrap();
        let report = run(&config, &records, reference()).unwrap();
        assert!(report.filtered.is_empty());
        assert!(report.species_volume.is_empty());
        assert_eq!(report.kpis.volume_display(), "0.00");
        // Unfiltered views are unaffected
        assert_eq!(report.camp_balance.len(), 4);
    }

    #[test]
    fn report_serializes() {
        let config = TimberConfig::from_toml(CONFIG).unwrap();
        let records = load_csv_records(CSV, &config.columns).unwrap();
        let report = run(&config, &records, reference()).unwrap();
        let json = serde_json::to_value(&report).unwrap();

        assert_eq!(json["kpis"]["total_logs"], 1);
        assert_eq!(json["filtered"][0]["log_id"], "LOG001");
        assert_eq!(json["aging"]["overdue"][0]["log_id"], "LOG002");
        assert_eq!(json["aging"]["overdue"][0]["days_at_camp"], 9);
        assert_eq!(json["camp_balance"][0]["region"], "Bintulu");
        assert_eq!(json["meta"]["selected_date"], "2025-07-27");
    }
}

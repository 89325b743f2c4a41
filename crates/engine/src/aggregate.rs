use std::collections::BTreeMap;

use crate::camp::is_at_camp;
use crate::model::{CampBalance, Kpis, LicenseTruckGroup, LicenseTruckKey, LogRecord, SpeciesVolume};

/// Group records by species and sum volumes. Species with no records never
/// appear in the output.
pub fn volume_by_species<'a, I>(records: I) -> Vec<SpeciesVolume>
where
    I: IntoIterator<Item = &'a LogRecord>,
{
    let mut groups: BTreeMap<&str, (f64, usize)> = BTreeMap::new();

    for r in records {
        let entry = groups.entry(r.species.as_str()).or_insert((0.0, 0));
        entry.0 += r.volume_m3;
        entry.1 += 1;
    }

    groups
        .into_iter()
        .map(|(species, (volume_m3, log_count))| SpeciesVolume {
            species: species.to_string(),
            volume_m3,
            log_count,
        })
        .collect()
}

/// Count records per (region, at-camp) and report what remains at camp.
///
/// Every observed region gets a row; `logs_remaining_at_camp` is 0 when the
/// region has no at-camp record.
pub fn camp_balance<'a, I>(records: I) -> Vec<CampBalance>
where
    I: IntoIterator<Item = &'a LogRecord>,
{
    let mut groups: BTreeMap<(&str, bool), usize> = BTreeMap::new();
    for r in records {
        *groups.entry((r.region.as_str(), is_at_camp(r))).or_insert(0) += 1;
    }

    let mut by_region: BTreeMap<&str, (usize, usize)> = BTreeMap::new();
    for ((region, at_camp), count) in groups {
        let entry = by_region.entry(region).or_insert((0, 0));
        if at_camp {
            entry.0 = count;
        } else {
            entry.1 = count;
        }
    }

    by_region
        .into_iter()
        .map(|(region, (at_camp, departed))| CampBalance {
            region: region.to_string(),
            at_camp,
            departed,
            logs_remaining_at_camp: at_camp,
        })
        .collect()
}

/// Group records by (license_no, truck_id), ordered by key.
pub fn group_by_license_truck<'a, I>(records: I) -> Vec<LicenseTruckGroup>
where
    I: IntoIterator<Item = &'a LogRecord>,
{
    let mut groups: BTreeMap<LicenseTruckKey, (usize, f64, Vec<String>)> = BTreeMap::new();

    for r in records {
        let key = LicenseTruckKey {
            license_no: r.license_no.clone(),
            truck_id: r.truck_id.clone(),
        };
        let entry = groups.entry(key).or_insert_with(|| (0, 0.0, Vec::new()));
        entry.0 += 1;
        entry.1 += r.volume_m3;
        entry.2.push(r.log_id.clone());
    }

    groups
        .into_iter()
        .map(|(key, (log_count, volume_m3, log_ids))| LicenseTruckGroup {
            license_no: key.license_no,
            truck_id: key.truck_id,
            log_count,
            volume_m3,
            log_ids,
        })
        .collect()
}

/// Total volume and record count. An empty input yields zeros.
pub fn kpis<'a, I>(records: I) -> Kpis
where
    I: IntoIterator<Item = &'a LogRecord>,
{
    records.into_iter().fold(
        Kpis {
            total_volume_m3: 0.0,
            total_logs: 0,
        },
        |mut k, r| {
            k.total_volume_m3 += r.volume_m3;
            k.total_logs += 1;
            k
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::{filter_records, Selection};
    use crate::model::fixtures::{record, sample};
    use chrono::NaiveDate;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn species_volume_over_sample() {
        let set = sample();
        let groups = volume_by_species(&set);
        let got: Vec<(&str, f64)> = groups.iter().map(|g| (g.species.as_str(), g.volume_m3)).collect();
        // BTreeMap ordering: alphabetical
        assert_eq!(
            got,
            vec![("Keruing", 5.2), ("Meranti", 3.5), ("Merbau", 2.9), ("Tapang", 4.1)]
        );
    }

    #[test]
    fn species_sums_and_omits_absent() {
        let rows = [
            record("A", "Meranti", 1.25, "Kapit", "2025-07-27", "Mill"),
            record("B", "Meranti", 2.5, "Sibu", "2025-07-27", "Mill"),
            record("C", "Tapang", 0.75, "Sibu", "2025-07-27", "Mill"),
        ];
        let groups = volume_by_species(rows.iter());
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].species, "Meranti");
        assert!(approx(groups[0].volume_m3, 3.75));
        assert_eq!(groups[0].log_count, 2);
        assert!(!groups.iter().any(|g| g.species == "Keruing"));

        let total: f64 = groups.iter().map(|g| g.volume_m3).sum();
        assert!(approx(total, 4.5));
    }

    #[test]
    fn species_empty_input() {
        assert!(volume_by_species(std::iter::empty::<&LogRecord>()).is_empty());
    }

    #[test]
    fn camp_balance_zero_fills_regions_without_camp_logs() {
        let set = sample();
        let balance = camp_balance(&set);
        assert_eq!(balance.len(), 4);

        let kapit = balance.iter().find(|b| b.region == "Kapit").unwrap();
        assert_eq!(kapit.logs_remaining_at_camp, 0);
        assert_eq!(kapit.departed, 1);

        let sibu = balance.iter().find(|b| b.region == "Sibu").unwrap();
        assert_eq!(sibu.logs_remaining_at_camp, 1);
        assert_eq!(sibu.departed, 0);
    }

    #[test]
    fn camp_balance_counts_mixed_region() {
        let rows = [
            record("A", "Meranti", 1.0, "Kapit", "2025-07-27", "Camp 1"),
            record("B", "Meranti", 1.0, "Kapit", "2025-07-27", "camp 2"),
            record("C", "Meranti", 1.0, "Kapit", "2025-07-27", "Mill A"),
        ];
        let balance = camp_balance(rows.iter());
        assert_eq!(
            balance,
            vec![CampBalance {
                region: "Kapit".into(),
                at_camp: 2,
                departed: 1,
                logs_remaining_at_camp: 2,
            }]
        );
    }

    #[test]
    fn license_truck_groups_by_key() {
        let set = sample();
        let groups = group_by_license_truck(&set);
        assert_eq!(groups.len(), 3);
        assert_eq!(groups[0].license_no, "LIC-1001");
        assert_eq!(groups[0].truck_id, "TRK-01");
        assert_eq!(groups[0].log_count, 2);
        assert_eq!(groups[0].log_ids, vec!["LOG001", "LOG003"]);
        assert!(approx(groups[0].volume_m3, 6.4));
    }

    #[test]
    fn license_truck_is_deterministic() {
        let set = sample();
        assert_eq!(group_by_license_truck(&set), group_by_license_truck(&set));
    }

    #[test]
    fn kpis_over_filtered_sample() {
        let set = sample();
        let sel = Selection::new(["Kapit", "Sibu"], NaiveDate::from_ymd_opt(2025, 7, 27).unwrap());
        let filtered = filter_records(&set, &sel);
        let k = kpis(filtered.iter().copied());
        assert_eq!(k.total_logs, 1);
        assert_eq!(k.volume_display(), "3.50");
    }

    #[test]
    fn kpis_empty_is_zero() {
        let k = kpis(std::iter::empty::<&LogRecord>());
        assert_eq!(k.total_logs, 0);
        assert_eq!(k.total_volume_m3, 0.0);
    }
}

//! `timberline run | validate | summary`: config-driven and ad-hoc reports.

use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;
use serde::Serialize;
use timberline_engine::aggregate::{kpis, volume_by_species};
use timberline_engine::config::ColumnMapping;
use timberline_engine::dates::{normalize_date, normalize_timestamp};
use timberline_engine::filter::filter_records;
use timberline_engine::load::load_csv_records;
use timberline_engine::model::{Kpis, SpeciesVolume};
use timberline_engine::{RecordSet, Selection, TimberConfig, TimberError, TimberReport};

use crate::exit_codes::{timber_exit_code, ErrorOutput, Stage, EXIT_OVERDUE, EXIT_ERROR};
use crate::CliError;

fn timber_err(err: &TimberError, stage: Stage) -> CliError {
    let cli = CliError::new(timber_exit_code(err, stage), err.to_string());
    match err {
        TimberError::MissingColumn { .. } if stage == Stage::Load => {
            cli.with_hint("map header names in the [columns] table of the config")
        }
        _ => cli,
    }
}

/// In `--json` mode the error also goes to stdout as a structured object.
fn fail(err: TimberError, stage: Stage, json_output: bool) -> CliError {
    if json_output {
        let out = ErrorOutput::from_timber_error(&err, stage);
        if let Ok(s) = serde_json::to_string_pretty(&out) {
            println!("{s}");
        }
    }
    timber_err(&err, stage)
}

fn read_file(path: &Path) -> Result<String, CliError> {
    std::fs::read_to_string(path)
        .map_err(|e| CliError::usage(format!("cannot read {}: {e}", path.display())))
}

fn load_config(path: &Path, json_output: bool) -> Result<TimberConfig, CliError> {
    let config_str = read_file(path)?;
    TimberConfig::from_toml(&config_str).map_err(|e| fail(e, Stage::Config, json_output))
}

/// Aging reference: `--now`, then `aging.reference_now`, then local now.
fn resolve_reference_now(
    now_arg: Option<&str>,
    config: &TimberConfig,
) -> Result<NaiveDateTime, CliError> {
    if let Some(raw) = now_arg {
        return normalize_timestamp(raw)
            .map_err(|e| CliError::usage(format!("--now: {e}")));
    }
    match config.reference_now() {
        Ok(Some(ts)) => Ok(ts),
        Ok(None) => Ok(chrono::Local::now().naive_local()),
        Err(e) => Err(timber_err(&e, Stage::Config)),
    }
}

// ============================================================================
// run
// ============================================================================

pub fn cmd_run(
    config_path: PathBuf,
    json_output: bool,
    output_file: Option<PathBuf>,
    now: Option<String>,
    fail_on_overdue: bool,
) -> Result<(), CliError> {
    let config = load_config(&config_path, json_output)?;

    // Resolve data path relative to config file's directory
    let base_dir = config_path.parent().unwrap_or_else(|| Path::new("."));
    let csv_path = base_dir.join(&config.file);
    let csv_data = read_file(&csv_path)?;
    let records = load_csv_records(&csv_data, &config.columns)
        .map_err(|e| fail(e, Stage::Load, json_output))?;

    let reference_now = resolve_reference_now(now.as_deref(), &config)?;
    tracing::debug!(%reference_now, csv = %csv_path.display(), "running report");

    let report = timberline_engine::run(&config, &records, reference_now)
        .map_err(|e| fail(e, Stage::Config, json_output))?;

    let json_str = serde_json::to_string_pretty(&report)
        .map_err(|e| CliError::new(EXIT_ERROR, format!("JSON serialization error: {e}")))?;

    if let Some(ref path) = output_file {
        std::fs::write(path, &json_str)
            .map_err(|e| CliError::usage(format!("cannot write output: {e}")))?;
        eprintln!("wrote {}", path.display());
    }

    if json_output {
        println!("{json_str}");
    }

    print_run_summary(&report);

    if fail_on_overdue && report.aging.has_overdue() {
        return Err(CliError::new(
            EXIT_OVERDUE,
            format!("{} overdue log(s) at camp", report.aging.overdue.len()),
        ));
    }

    Ok(())
}

/// Human summary to stderr.
fn print_run_summary(report: &TimberReport<'_>) {
    let meta = &report.meta;
    let regions = if meta.selected_regions.is_empty() {
        "no regions".to_string()
    } else {
        meta.selected_regions.join(", ")
    };
    eprintln!(
        "{}: {} logs on {} in {} — {} m³",
        meta.config_name,
        report.kpis.total_logs,
        meta.selected_date,
        regions,
        report.kpis.volume_display(),
    );

    for s in &report.species_volume {
        eprintln!("  {:<12} {:>10.2} m³  ({} logs)", s.species, s.volume_m3, s.log_count);
    }

    let remaining: usize = report.camp_balance.iter().map(|b| b.logs_remaining_at_camp).sum();
    eprintln!(
        "camp: {} remaining across {} regions, {} overdue (> {} days)",
        remaining,
        report.camp_balance.len(),
        report.aging.overdue.len(),
        report.aging.threshold_days,
    );
    for o in &report.aging.overdue {
        eprintln!("  {} {} — {} days at camp", o.record.log_id, o.record.destination, o.days_at_camp);
    }

    let degenerate = report.routes.iter().filter(|r| r.is_degenerate()).count();
    eprintln!("routes: {} ({} without known origin)", report.routes.len(), degenerate);
}

// ============================================================================
// validate
// ============================================================================

pub fn cmd_validate(config_path: PathBuf) -> Result<(), CliError> {
    let config = load_config(&config_path, false)?;
    let selection = config.selection().map_err(|e| timber_err(&e, Stage::Config))?;

    eprintln!(
        "valid: \"{}\" — {} region(s) on {}, overdue after {} days, {} region origins",
        config.name,
        selection.regions.len(),
        selection.date,
        config.aging.overdue_after_days,
        config.region_table().entries().len(),
    );
    Ok(())
}

// ============================================================================
// summary
// ============================================================================

#[derive(Debug, Serialize)]
struct SummaryOutput<'a> {
    selection: &'a Selection,
    kpis: Kpis,
    species_volume: Vec<SpeciesVolume>,
}

pub fn cmd_summary(
    csv_path: PathBuf,
    regions: Vec<String>,
    date: Option<String>,
    json_output: bool,
) -> Result<(), CliError> {
    let csv_data = read_file(&csv_path)?;
    let records = load_csv_records(&csv_data, &ColumnMapping::default())
        .map_err(|e| fail(e, Stage::Load, json_output))?;

    let selection = summary_selection(&records, regions, date.as_deref())?;
    let filtered = filter_records(&records, &selection);

    let out = SummaryOutput {
        selection: &selection,
        kpis: kpis(filtered.iter().copied()),
        species_volume: volume_by_species(filtered.iter().copied()),
    };

    if json_output {
        let s = serde_json::to_string_pretty(&out)
            .map_err(|e| CliError::new(EXIT_ERROR, format!("JSON serialization error: {e}")))?;
        println!("{s}");
    } else {
        println!("Total Volume (m³): {}", out.kpis.volume_display());
        println!("Total Logs Tracked: {}", out.kpis.total_logs);
        for s in &out.species_volume {
            println!("{}\t{:.2}", s.species, s.volume_m3);
        }
    }
    Ok(())
}

/// Defaults mirror the dashboard: every region in the file, today's date.
fn summary_selection(
    records: &RecordSet,
    regions: Vec<String>,
    date: Option<&str>,
) -> Result<Selection, CliError> {
    let date = match date {
        Some(raw) => normalize_date(raw).map_err(|e| CliError::usage(format!("--date: {e}")))?,
        None => chrono::Local::now().date_naive(),
    };
    let regions = if regions.is_empty() {
        records.regions().into_iter().map(String::from).collect()
    } else {
        regions
    };
    Ok(Selection::new(regions, date))
}

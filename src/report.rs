use log::{debug, info, warn};

use attendance_matrix::*;
use snafu::{prelude::*, Snafu};

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::json;
use serde_json::Map as JSMap;
use serde_json::Value as JSValue;
use text_diff::print_diff;

use crate::args::Args;
use crate::report::config_reader::*;

pub mod config_reader;
mod io_common;
mod io_csv;
mod io_excel;
mod io_export;

#[derive(Debug, Snafu)]
pub enum ReportError {
    #[snafu(display("Error opening file {path}"))]
    OpeningExcel {
        source: calamine::XlsxError,
        path: String,
    },
    #[snafu(display("No worksheet in file {path}"))]
    EmptyExcel { path: String },
    #[snafu(display("Error opening file {path}"))]
    CsvOpen { source: csv::Error, path: String },
    #[snafu(display("Error reading line {lineno} of file {path}"))]
    CsvLineParse {
        source: csv::Error,
        path: String,
        lineno: u64,
    },
    #[snafu(display("Error writing file {path}"))]
    CsvWrite { source: csv::Error, path: String },
    #[snafu(display("Error writing file {path}"))]
    WritingFile {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error reading directory {path}"))]
    ReadingDirectory {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error opening file {path}"))]
    OpeningJson {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error parsing JSON"))]
    ParsingJson { source: serde_json::Error },

    #[snafu(display("Cannot read a member id from {content} at line {lineno} of file {path}"))]
    InvalidMemberId {
        path: String,
        lineno: u64,
        content: String,
    },
    #[snafu(display(
        "The following meetings are not on the list for {year}: {names}. Available meetings: {available}"
    ))]
    UnknownMeetings {
        year: String,
        names: String,
        available: String,
    },
    #[snafu(display("Difference detected between calculated summary and reference summary"))]
    ReferenceMismatch {},

    #[snafu(display("{source}"))]
    Attendance { source: AttendanceError },

    #[snafu(whatever, display("{message}"))]
    Whatever {
        message: String,
        #[snafu(source(from(Box<dyn std::error::Error>, Some)))]
        source: Option<Box<dyn std::error::Error>>,
    },
}

pub type ReportResult<T> = Result<T, ReportError>;

// The roster formats that can be read.
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
enum Provider {
    Csv,
    Excel,
}

fn provider_for(path: &Path) -> Option<Provider> {
    match path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .as_deref()
    {
        Some("csv") => Some(Provider::Csv),
        Some("xlsx") => Some(Provider::Excel),
        _ => None,
    }
}

fn read_roster_ids(
    path: &str,
    provider: Provider,
    config: &ReportConfig,
) -> ReportResult<Option<Vec<MemberId>>> {
    let id_columns = config.id_columns();
    match provider {
        Provider::Csv => io_csv::read_csv_roster(path, &id_columns),
        Provider::Excel => io_excel::read_excel_roster(path, &id_columns),
    }
}

/// Reads all the rosters of the data directory.
///
/// Files are visited in name order. Files that are not rosters (other extensions,
/// no label, no id column) are skipped with a warning.
pub fn load_rosters(data_dir: &str, config: &ReportConfig) -> ReportResult<RosterStore> {
    let mut paths: Vec<PathBuf> = Vec::new();
    for entry in fs::read_dir(data_dir).context(ReadingDirectorySnafu { path: data_dir })? {
        let entry = entry.context(ReadingDirectorySnafu { path: data_dir })?;
        paths.push(entry.path());
    }
    paths.sort();

    let marker = config.member_roster_marker();
    let mut store = RosterStore::new();
    for p in paths.iter() {
        if !p.is_file() {
            continue;
        }
        let path = p.display().to_string();
        let provider = match provider_for(p) {
            Some(x) => x,
            None => {
                debug!("load_rosters: skipping {:?}", path);
                continue;
            }
        };
        let title = io_common::roster_title(&path);
        let is_member_roster = io_common::is_member_roster(&path, &marker);
        let label = match EventLabel::parse(&title) {
            Ok(l) => l,
            Err(e) => match io_common::bare_year_label(&title, &marker) {
                Some(l) if is_member_roster => l,
                _ => {
                    warn!("Skipping file {}: {}", path, e);
                    continue;
                }
            },
        };
        info!("Attempting to read roster file {:?}", path);
        let ids = match read_roster_ids(&path, provider, config)? {
            Some(ids) => ids,
            None => {
                warn!(
                    "Skipping file {}: none of the id columns {:?} found",
                    path,
                    config.id_columns()
                );
                continue;
            }
        };
        debug!("load_rosters: {}: {} ids", label, ids.len());
        if is_member_roster {
            store
                .add_member_roster(label, ids)
                .context(AttendanceSnafu {})?;
        } else {
            store.add_event(label, ids).context(AttendanceSnafu {})?;
        }
    }
    info!(
        "Loaded {} member rosters and {} meetings, years {:?}",
        store.member_rosters().len(),
        store.events().len(),
        store.years()
    );
    Ok(store)
}

/// Interprets a meeting selection for a year: `ALL` or comma-separated names, in any case.
///
/// Returns the selected labels in the order given (duplicates removed) and whether all
/// the meetings were requested.
fn select_meetings(
    input: &str,
    year: &str,
    available: &[EventLabel],
) -> ReportResult<(Vec<EventLabel>, bool)> {
    if input.trim().to_uppercase() == "ALL" {
        return Ok((available.to_vec(), true));
    }
    let mut selected: Vec<EventLabel> = Vec::new();
    let mut invalid: Vec<String> = Vec::new();
    for name in input.split(',') {
        let name = name.trim().to_uppercase();
        if name.is_empty() {
            continue;
        }
        match available.iter().find(|l| l.name.to_uppercase() == name) {
            Some(l) if !selected.contains(l) => selected.push(l.clone()),
            Some(_) => {}
            None => invalid.push(name),
        }
    }
    if !invalid.is_empty() {
        let names: Vec<String> = available.iter().map(|l| l.name.clone()).collect();
        return UnknownMeetingsSnafu {
            year,
            names: invalid.join(", "),
            available: names.join(" "),
        }
        .fail();
    }
    if selected.is_empty() {
        whatever!("No meeting selected in {:?}", input)
    }
    Ok((selected, false))
}

fn labels_to_json(labels: &[EventLabel]) -> Vec<JSValue> {
    labels.iter().map(|l| json!(l.to_string())).collect()
}

fn overlap_to_json(report: &OverlapReport) -> JSValue {
    let mut counts: JSMap<String, JSValue> = JSMap::new();
    for (i, label) in report.matrix.labels.iter().enumerate() {
        let mut row: JSMap<String, JSValue> = JSMap::new();
        for (j, other) in report.matrix.labels.iter().enumerate() {
            row.insert(other.to_string(), json!(report.matrix.get(i, j)));
        }
        counts.insert(label.to_string(), JSValue::Object(row));
    }
    let missing: Vec<String> = report
        .warnings
        .iter()
        .map(|w| w.label.to_string())
        .collect();
    json!({
        "counts": counts,
        "edges": io_export::edges_to_json(&report.matrix.edges()),
        "missing": missing,
    })
}

fn build_summary_js(
    year: &str,
    selected: &[EventLabel],
    excluded: &[EventLabel],
    result: &QueryResult,
    overlap: Option<&OverlapReport>,
) -> JSValue {
    json!({
        "year": year,
        "meetings": labels_to_json(selected),
        "excluded": labels_to_json(excluded),
        "results": {
            "count": result.count,
            "members": result.table.members(),
        },
        "overlap": overlap.map(overlap_to_json),
    })
}

fn output_path(output_dir: &str, file_name: &str) -> String {
    let p: PathBuf = [output_dir, file_name].iter().collect();
    p.as_path().display().to_string()
}

pub fn run_report(args: &Args) -> ReportResult<()> {
    let config = match &args.config {
        Some(p) => read_config(p)?,
        None => ReportConfig::default(),
    };
    info!("config: {:?}", config);

    let data_dir = args
        .data
        .clone()
        .or_else(|| config.data_directory.clone())
        .unwrap_or_else(|| DEFAULT_DATA_DIRECTORY.to_string());
    let output_dir = args
        .output_directory
        .clone()
        .or_else(|| config.output_directory.clone())
        .unwrap_or_else(|| ".".to_string());

    let store = load_rosters(&data_dir, &config)?;

    let year = args.year.trim();
    let scope = store.resolve_year(year).context(AttendanceSnafu {})?;
    let available: Vec<EventLabel> = scope.events.keys().cloned().collect();

    let (selected, all_selected) = select_meetings(
        args.meetings.as_deref().unwrap_or("ALL"),
        year,
        &available,
    )?;
    let excluded: Vec<EventLabel> = match &args.exclude {
        Some(x) => select_meetings(x, year, &available)?.0,
        None => vec![],
    };
    println!(
        "Selected meetings: {}",
        selected
            .iter()
            .map(|l| l.to_string())
            .collect::<Vec<String>>()
            .join(", ")
    );

    let table = build_attendance(&scope.members, &scope.events);
    let attendance_path = output_path(&output_dir, &format!("{}_attendance.csv", year));
    io_export::write_attendance_csv(&attendance_path, &table)?;
    println!("Attendance data saved to {}", attendance_path);

    let exclusion = if excluded.is_empty() {
        None
    } else {
        Some(excluded.as_slice())
    };
    let result = query_attendance(&table, &selected, exclusion).context(AttendanceSnafu {})?;
    println!(
        "{} members participated in all the selected meetings",
        result.count
    );

    if result.count > 0 {
        let file_name = args
            .query_output
            .clone()
            .unwrap_or_else(|| format!("{}_selected_attendance.csv", year));
        let query_path = output_path(&output_dir, &file_name);
        io_export::write_attendance_csv(&query_path, &result.table)?;
        println!("Results saved to {}", query_path);
    }

    let overlap = if all_selected || args.overlap {
        let report = compute_overlap(&table, &selected);

        let table_path = output_path(&output_dir, &format!("{}_overlap_table.csv", year));
        io_export::write_percentage_csv(&table_path, &report.matrix.percentages())?;
        println!("Overlap table data saved to {}", table_path);

        let edges_path = output_path(&output_dir, &format!("{}_overlap_edges.json", year));
        io_export::write_json(
            &edges_path,
            &io_export::edges_to_json(&report.matrix.edges()),
        )?;
        println!("Overlap edges saved to {}", edges_path);

        let multi_path = output_path(&output_dir, &format!("{}_attendance_overlap.csv", year));
        io_export::write_attendance_csv(&multi_path, &table.attending_at_least(2))?;
        println!("Overlap attendance data saved to {}", multi_path);
        Some(report)
    } else {
        None
    };

    let result_js = build_summary_js(year, &selected, &excluded, &result, overlap.as_ref());
    let pretty_js_stats = serde_json::to_string_pretty(&result_js).context(ParsingJsonSnafu {})?;
    match args.out.as_deref() {
        Some("stdout") => println!("{}", pretty_js_stats),
        Some(p) if !p.is_empty() => {
            fs::write(p, &pretty_js_stats).context(WritingFileSnafu { path: p })?;
            info!("Summary written to {}", p);
        }
        _ => {}
    }

    // The reference summary, if provided for comparison
    if let Some(summary_p) = &args.reference {
        let summary_ref = read_summary(summary_p)?;
        debug!("summary: {:?}", summary_ref);
        let pretty_js_summary_ref =
            serde_json::to_string_pretty(&summary_ref).context(ParsingJsonSnafu {})?;
        if pretty_js_summary_ref != pretty_js_stats {
            warn!("Found differences with the reference string");
            print_diff(
                pretty_js_summary_ref.as_str(),
                pretty_js_stats.as_ref(),
                "\n",
            );
            return ReferenceMismatchSnafu {}.fail();
        }
    }

    Ok(())
}

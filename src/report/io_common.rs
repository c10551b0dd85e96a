use std::path::Path;

use crate::report::*;

pub fn simplify_file_name(path: &str) -> String {
    Path::new(path)
        .file_name()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| path.to_string())
}

/// The label part of a roster file name.
///
/// Exports are named either after the label itself (`2024 ANNUAL.xlsx`) or with an
/// export date in front of it (`Registrations-2025 2024 ANNUAL.xlsx`): in this case,
/// what follows the last `-20` and the two digits of the export year is kept.
pub fn roster_title(path: &str) -> String {
    let stem = Path::new(path)
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default();
    let title = match stem.rfind("-20") {
        Some(idx) => stem[idx + 3..].chars().skip(2).collect::<String>(),
        None => stem,
    };
    title.trim().to_string()
}

/// Member rosters are told apart from meeting rosters by their file name.
pub fn is_member_roster(path: &str, marker: &str) -> bool {
    simplify_file_name(path)
        .to_lowercase()
        .contains(&marker.to_lowercase())
}

/// The label of a member roster named only by its year (`ANS Members-2025 2024.csv`).
///
/// The name of the label is the marker in upper case, for example `2024 MEMBER`.
pub fn bare_year_label(title: &str, marker: &str) -> Option<EventLabel> {
    let year = title.trim();
    if year.len() == 4 && year.chars().all(|c| c.is_ascii_digit()) {
        Some(EventLabel::new(year, &marker.trim().to_uppercase()))
    } else {
        None
    }
}

/// The index of the first header that is one of the id columns, trying the id
/// columns in order.
pub fn find_id_column(header: &[String], id_columns: &[String]) -> Option<usize> {
    id_columns
        .iter()
        .find_map(|name| header.iter().position(|h| h.trim() == name.trim()))
}

/// Reads a member id written as text. Empty cells have no id.
///
/// Spreadsheet tools often write ids as decimals (`12345.0`): those are accepted
/// as long as they are whole numbers.
pub fn parse_id_str(s: &str, path: &str, lineno: u64) -> ReportResult<Option<MemberId>> {
    let s = s.trim();
    if s.is_empty() {
        return Ok(None);
    }
    if let Ok(x) = s.parse::<MemberId>() {
        return Ok(Some(x));
    }
    match s.parse::<f64>() {
        Ok(f) => parse_id_float(f, path, lineno),
        Err(_) => InvalidMemberIdSnafu {
            path,
            lineno,
            content: s,
        }
        .fail(),
    }
}

pub fn parse_id_float(f: f64, path: &str, lineno: u64) -> ReportResult<Option<MemberId>> {
    if f.is_finite() && f >= 0.0 && f.fract() == 0.0 && f < 18446744073709551616.0 {
        Ok(Some(f as MemberId))
    } else {
        InvalidMemberIdSnafu {
            path,
            lineno,
            content: f.to_string(),
        }
        .fail()
    }
}

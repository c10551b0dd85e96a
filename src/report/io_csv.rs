// Primitives for reading CSV rosters.

use crate::report::{
    io_common::{find_id_column, parse_id_str},
    *,
};

/// Reads the member ids of a CSV roster. The first line is the header.
///
/// Returns `None` if none of the id columns is in the header.
pub fn read_csv_roster(path: &str, id_columns: &[String]) -> ReportResult<Option<Vec<MemberId>>> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)
        .context(CsvOpenSnafu { path })?;

    let header: Vec<String> = rdr
        .headers()
        .context(CsvLineParseSnafu { path, lineno: 1u64 })?
        .iter()
        .map(|s| s.to_string())
        .collect();
    debug!("read_csv_roster: header: {:?}", header);
    let id_idx = match find_id_column(&header, id_columns) {
        Some(x) => x,
        None => return Ok(None),
    };

    let mut res: Vec<MemberId> = Vec::new();
    for (idx, line_r) in rdr.records().enumerate() {
        // The header is line 1.
        let lineno = (idx + 2) as u64;
        let line = line_r.context(CsvLineParseSnafu { path, lineno })?;
        // Short lines have an empty id.
        let cell = line.get(id_idx).unwrap_or("");
        if let Some(mid) = parse_id_str(cell, path, lineno)? {
            res.push(mid);
        } else {
            debug!("read_csv_roster: {}: no id at line {}", path, lineno);
        }
    }
    Ok(Some(res))
}

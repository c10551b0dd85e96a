// Writers for the reports.

use crate::report::*;

fn bool_cell(b: bool) -> &'static str {
    if b {
        "True"
    } else {
        "False"
    }
}

/// Writes an attendance table: one row per member, one column per meeting.
pub fn write_attendance_csv(path: &str, table: &AttendanceTable) -> ReportResult<()> {
    let mut wtr = csv::Writer::from_path(path).context(CsvWriteSnafu { path })?;
    let mut header: Vec<String> = vec!["Member ID".to_string()];
    header.extend(table.labels().iter().map(|l| l.to_string()));
    wtr.write_record(&header).context(CsvWriteSnafu { path })?;
    for (mid, cells) in table.rows() {
        let mut record: Vec<String> = vec![mid.to_string()];
        record.extend(cells.iter().map(|b| bool_cell(*b).to_string()));
        wtr.write_record(&record).context(CsvWriteSnafu { path })?;
    }
    wtr.flush().context(WritingFileSnafu { path })?;
    debug!(
        "write_attendance_csv: {}: {} rows",
        path,
        table.num_rows()
    );
    Ok(())
}

/// Writes the overlap percentages, with the meeting labels as first row and column.
pub fn write_percentage_csv(path: &str, pct: &PercentageTable) -> ReportResult<()> {
    let mut wtr = csv::Writer::from_path(path).context(CsvWriteSnafu { path })?;
    let mut header: Vec<String> = vec!["".to_string()];
    header.extend(pct.labels.iter().map(|l| l.to_string()));
    wtr.write_record(&header).context(CsvWriteSnafu { path })?;
    for (label, row) in pct.labels.iter().zip(pct.values.iter()) {
        let mut record: Vec<String> = vec![label.to_string()];
        record.extend(row.iter().map(|v| v.to_string()));
        wtr.write_record(&record).context(CsvWriteSnafu { path })?;
    }
    wtr.flush().context(WritingFileSnafu { path })?;
    Ok(())
}

/// The edges of the relationship diagram, as a list of JSON objects.
pub fn edges_to_json(edges: &[OverlapEdge]) -> JSValue {
    let l: Vec<JSValue> = edges
        .iter()
        .map(|e| {
            json!({
                "source": e.source.to_string(),
                "target": e.target.to_string(),
                "value": e.value,
            })
        })
        .collect();
    JSValue::Array(l)
}

pub fn write_json(path: &str, js: &JSValue) -> ReportResult<()> {
    let pretty = serde_json::to_string_pretty(js).context(ParsingJsonSnafu {})?;
    fs::write(path, pretty).context(WritingFileSnafu { path })?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn tmp_path(name: &str) -> String {
        let p: PathBuf = [
            std::env::temp_dir(),
            PathBuf::from(format!("meeting-attendance-{}-{}", std::process::id(), name)),
        ]
        .iter()
        .collect();
        p.display().to_string()
    }

    #[test]
    fn attendance_csv() {
        let mut events = BTreeMap::new();
        events.insert(EventLabel::new("2024", "A"), vec![1, 2]);
        events.insert(EventLabel::new("2024", "B"), vec![2, 3]);
        let table = build_attendance(&[1, 2, 3], &events);
        let path = tmp_path("attendance.csv");
        write_attendance_csv(&path, &table).unwrap();
        let contents = fs::read_to_string(&path).unwrap();
        assert_eq!(
            contents,
            "Member ID,2024 A,2024 B\n1,True,False\n2,True,True\n3,False,True\n"
        );
    }

    #[test]
    fn percentage_csv() {
        let pct = PercentageTable {
            labels: vec![EventLabel::new("2024", "A"), EventLabel::new("2024", "B")],
            values: vec![vec![100.0, 50.0], vec![100.0, 100.0]],
        };
        let path = tmp_path("percentages.csv");
        write_percentage_csv(&path, &pct).unwrap();
        let contents = fs::read_to_string(&path).unwrap();
        assert_eq!(
            contents,
            ",2024 A,2024 B\n2024 A,100,50\n2024 B,100,100\n"
        );
    }
}

use calamine::{open_workbook, DataType, Reader, Xlsx};
use snafu::OptionExt;

use crate::report::{
    io_common::{find_id_column, parse_id_float, parse_id_str},
    *,
};

/// Reads the member ids of an Excel roster.
///
/// The registration exports put the list in the last worksheet. The first row is
/// the header. Returns `None` if none of the id columns is in the header.
pub fn read_excel_roster(
    path: &str,
    id_columns: &[String],
) -> ReportResult<Option<Vec<MemberId>>> {
    let mut workbook: Xlsx<_> = open_workbook(path).context(OpeningExcelSnafu { path })?;
    let sheet_name: String = workbook
        .sheet_names()
        .last()
        .cloned()
        .context(EmptyExcelSnafu { path })?;
    debug!("read_excel_roster: {}: worksheet {:?}", path, sheet_name);
    let wrange = workbook
        .worksheet_range(&sheet_name)
        .context(EmptyExcelSnafu { path })?
        .context(OpeningExcelSnafu { path })?;

    let mut iter = wrange.rows();
    let header: Vec<String> = match iter.next() {
        Some(row) => row.iter().map(header_cell).collect(),
        // An empty worksheet has no id column.
        None => return Ok(None),
    };
    debug!("read_excel_roster: header: {:?}", header);
    let id_idx = match find_id_column(&header, id_columns) {
        Some(x) => x,
        None => return Ok(None),
    };

    let mut res: Vec<MemberId> = Vec::new();
    for (idx, row) in iter.enumerate() {
        let lineno = (idx + 2) as u64;
        // Short rows have an empty id.
        let id = match row.get(id_idx) {
            Some(cell) => read_id_calamine(cell, path, lineno)?,
            None => None,
        };
        if let Some(mid) = id {
            res.push(mid);
        }
    }
    Ok(Some(res))
}

fn header_cell(cell: &DataType) -> String {
    match cell {
        DataType::String(s) => s.trim().to_string(),
        DataType::Int(i) => i.to_string(),
        DataType::Float(f) => f.to_string(),
        DataType::Empty => "".to_string(),
        x => format!("{:?}", x),
    }
}

fn read_id_calamine(cell: &DataType, path: &str, lineno: u64) -> ReportResult<Option<MemberId>> {
    match cell {
        DataType::Int(i) if *i >= 0 => Ok(Some(*i as MemberId)),
        DataType::Float(f) => parse_id_float(*f, path, lineno),
        DataType::String(s) => parse_id_str(s, path, lineno),
        DataType::Empty => Ok(None),
        _ => InvalidMemberIdSnafu {
            path,
            lineno,
            content: format!("{:?}", cell),
        }
        .fail(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn id_cells() {
        assert_eq!(
            read_id_calamine(&DataType::Int(42), "f", 2).unwrap(),
            Some(42)
        );
        assert_eq!(
            read_id_calamine(&DataType::Float(42.0), "f", 2).unwrap(),
            Some(42)
        );
        assert_eq!(
            read_id_calamine(&DataType::String(" 42".to_string()), "f", 2).unwrap(),
            Some(42)
        );
        assert_eq!(read_id_calamine(&DataType::Empty, "f", 2).unwrap(), None);
        assert!(read_id_calamine(&DataType::Int(-1), "f", 2).is_err());
        assert!(read_id_calamine(&DataType::Bool(true), "f", 2).is_err());
    }

    #[test]
    fn header_cells() {
        assert_eq!(
            header_cell(&DataType::String(" Record Number ".to_string())),
            "Record Number"
        );
        assert_eq!(header_cell(&DataType::Empty), "");
    }
}

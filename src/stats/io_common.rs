use std::collections::HashSet;

use crate::stats::*;

/// Given the header of a file (names of each of the columns), finds the position of a column.
pub fn get_col_index(col_name: &str, header: &[String], path: &str) -> ReportResult<usize> {
    header
        .iter()
        .position(|h| h == col_name)
        .context(MissingColumnSnafu {
            column: col_name,
            path,
        })
}

/// The header labels, without the byte order mark that some exports leave in the first cell.
pub fn clean_label(s: &str) -> String {
    s.trim_start_matches('\u{feff}').trim().to_string()
}

/// The text of a cell that is used as a label (meeting name, month, header).
pub fn cell_to_label(cell: Option<&ParsedCell>) -> String {
    match cell {
        Some(ParsedCell::Text(s)) => s.clone(),
        Some(ParsedCell::Number(f)) if f.is_finite() && f.fract() == 0.0 => {
            format!("{}", *f as i64)
        }
        Some(ParsedCell::Number(f)) => f.to_string(),
        Some(ParsedCell::Date(d)) => d.clone(),
        Some(ParsedCell::Other(s)) => s.clone(),
        Some(ParsedCell::Empty) | None => "".to_string(),
    }
}

/// The content of a role cell.
pub fn cell_to_value(cell: Option<&ParsedCell>) -> CellValue {
    match cell {
        Some(ParsedCell::Text(s)) if s.is_empty() => CellValue::Missing,
        Some(ParsedCell::Text(s)) => CellValue::Text(s.clone()),
        Some(ParsedCell::Empty) | None => CellValue::Missing,
        Some(ParsedCell::Number(f)) => CellValue::Malformed(f.to_string()),
        Some(ParsedCell::Date(d)) => CellValue::Malformed(d.clone()),
        Some(ParsedCell::Other(s)) => CellValue::Malformed(s.clone()),
    }
}

/// Assigns the columns of a table: the meeting column, the month column, and every other
/// column that is not ignored is a role.
pub fn table_to_rows(
    table: &ParsedTable,
    src: &InputSource,
    path: &str,
) -> ReportResult<Vec<RawRow>> {
    let meeting_idx = get_col_index(src.meeting_column(), &table.header, path)?;
    let month_idx = get_col_index(src.month_column(), &table.header, path)?;
    let ignored: HashSet<&str> = src
        .ignored_columns
        .as_deref()
        .unwrap_or_default()
        .iter()
        .map(|s| s.as_str())
        .collect();

    let role_cols: Vec<(usize, &String)> = table
        .header
        .iter()
        .enumerate()
        .filter(|(idx, label)| {
            *idx != meeting_idx && *idx != month_idx && !ignored.contains(label.as_str())
        })
        .collect();
    debug!("table_to_rows: {:?}: role columns {:?}", path, role_cols);

    let mut res: Vec<RawRow> = Vec::new();
    for (lineno, cells) in table.rows.iter() {
        let row = RawRow {
            meeting_name: cell_to_label(cells.get(meeting_idx)),
            month: cell_to_label(cells.get(month_idx)),
            cells: role_cols
                .iter()
                .map(|(idx, label)| ((*label).clone(), cell_to_value(cells.get(*idx))))
                .collect(),
        };
        debug!("table_to_rows: line {:?}: {:?}", lineno, row);
        res.push(row);
    }
    Ok(res)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn source() -> InputSource {
        InputSource {
            provider: "csv".to_string(),
            file_path: "roster.csv".to_string(),
            excel_worksheet_name: None,
            meeting_column: None,
            month_column: None,
            ignored_columns: Some(vec!["備註".to_string()]),
        }
    }

    fn text(s: &str) -> ParsedCell {
        ParsedCell::Text(s.to_string())
    }

    #[test]
    fn columns_are_assigned() {
        let table = ParsedTable {
            header: vec!["月份", "MD", "聚會名稱", "備註", "Keys"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            rows: vec![(
                2,
                vec![
                    ParsedCell::Number(202401.0),
                    text("Alice"),
                    text("QQ"),
                    text("moved"),
                    ParsedCell::Number(3.5),
                ],
            )],
        };
        let rows = table_to_rows(&table, &source(), "roster.csv").unwrap();
        assert_eq!(
            rows,
            vec![RawRow {
                meeting_name: "QQ".to_string(),
                month: "202401".to_string(),
                cells: vec![
                    ("MD".to_string(), CellValue::Text("Alice".to_string())),
                    ("Keys".to_string(), CellValue::Malformed("3.5".to_string())),
                ],
            }]
        );
    }

    #[test]
    fn short_rows_are_missing_cells() {
        let table = ParsedTable {
            header: vec!["聚會名稱", "月份", "MD", "Keys"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            rows: vec![(2, vec![text("QQ"), ParsedCell::Date("2024-03".to_string()), text("")])],
        };
        let rows = table_to_rows(&table, &source(), "roster.csv").unwrap();
        assert_eq!(rows[0].month, "2024-03");
        assert_eq!(rows[0].cells[0].1, CellValue::Missing);
        assert_eq!(rows[0].cells[1].1, CellValue::Missing);
    }

    #[test]
    fn missing_month_column() {
        let table = ParsedTable {
            header: vec!["聚會名稱".to_string(), "MD".to_string()],
            rows: vec![],
        };
        let res = table_to_rows(&table, &source(), "roster.csv");
        match res {
            Err(ReportError::MissingColumn { column, .. }) => assert_eq!(column, "月份"),
            x => panic!("unexpected result {:?}", x),
        }
    }

    #[test]
    fn labels() {
        assert_eq!(clean_label("\u{feff}聚會名稱 "), "聚會名稱");
        assert_eq!(cell_to_label(Some(&ParsedCell::Number(2.5))), "2.5");
        assert_eq!(cell_to_label(None), "");
    }
}

use calamine::DataType;

use crate::stats::{
    io_common::{cell_to_label, clean_label},
    *,
};

pub fn read_excel_table(path: &str, worksheet_name: Option<&str>) -> ReportResult<ParsedTable> {
    let wrange = get_range(path, worksheet_name)?;

    let mut iter = wrange.rows();
    let header: Vec<String> = match iter.next() {
        Some(cells) => cells
            .iter()
            .map(|c| clean_label(&cell_to_label(Some(&read_cell(c)))))
            .collect(),
        None => Vec::new(),
    };
    debug!("read_excel_table: header: {:?}", header);

    let mut rows: Vec<(usize, Vec<ParsedCell>)> = Vec::new();
    for (idx, row) in iter.enumerate() {
        // The header is the first line.
        let lineno = idx + 2;
        let cells: Vec<ParsedCell> = row.iter().map(read_cell).collect();
        debug!("read_excel_table: lineno: {:?} row: {:?}", lineno, &cells);
        rows.push((lineno, cells));
    }
    Ok(ParsedTable { header, rows })
}

fn read_cell(cell: &DataType) -> ParsedCell {
    match cell {
        DataType::String(s) if s.trim().is_empty() => ParsedCell::Empty,
        DataType::String(s) => ParsedCell::Text(s.clone()),
        DataType::Empty => ParsedCell::Empty,
        DataType::Float(f) => ParsedCell::Number(*f),
        DataType::Int(i) => ParsedCell::Number(*i as f64),
        DataType::DateTime(_) => match cell.as_date() {
            Some(d) => ParsedCell::Date(d.format("%Y-%m").to_string()),
            None => ParsedCell::Other(format!("{:?}", cell)),
        },
        _ => ParsedCell::Other(format!("{:?}", cell)),
    }
}

fn get_range(path: &str, worksheet_name_o: Option<&str>) -> ReportResult<calamine::Range<DataType>> {
    debug!(
        "read_excel_table: path: {:?} worksheet: {:?}",
        &path, &worksheet_name_o
    );
    let mut workbook: Xlsx<_> = open_workbook(path).context(OpeningExcelSnafu { path })?;

    // A worksheet name was provided, use it.
    if let Some(worksheet_name) = worksheet_name_o {
        let wrange = workbook
            .worksheet_range(worksheet_name)
            .context(EmptyExcelSnafu { path })?
            .context(OpeningExcelSnafu { path })?;
        Ok(wrange)
    } else {
        let all_worksheets = workbook.worksheets();
        match all_worksheets.as_slice() {
            [] => EmptyExcelSnafu { path }.fail(),
            [(worksheet_name, wrange)] => {
                debug!(
                    "read_excel_table: path: {:?} worksheet: {:?}",
                    &path, &worksheet_name
                );
                Ok(wrange.clone())
            }
            _ => AmbiguousWorksheetSnafu { path }.fail(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cells() {
        assert_eq!(
            read_cell(&DataType::String("Alice/Bob".to_string())),
            ParsedCell::Text("Alice/Bob".to_string())
        );
        assert_eq!(read_cell(&DataType::String("  ".to_string())), ParsedCell::Empty);
        assert_eq!(read_cell(&DataType::Empty), ParsedCell::Empty);
        assert_eq!(read_cell(&DataType::Int(3)), ParsedCell::Number(3.0));
        assert!(matches!(read_cell(&DataType::Bool(true)), ParsedCell::Other(_)));
    }

    #[test]
    fn date_cells_are_months() {
        // 45306 is 2024-01-15 in the 1900 date system.
        assert_eq!(
            read_cell(&DataType::DateTime(45306.0)),
            ParsedCell::Date("2024-01".to_string())
        );
    }

    #[test]
    fn missing_workbook() {
        let res = read_excel_table("/nonexistent/worshipstats.xlsx", None);
        assert!(matches!(res, Err(ReportError::OpeningExcel { .. })));
    }
}

// Primitives for reading CSV files.

use crate::stats::{io_common::clean_label, *};

pub fn read_csv_table(path: &str) -> ReportResult<ParsedTable> {
    let rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)
        .context(CsvOpenSnafu { path })?;

    let mut header: Option<Vec<String>> = None;
    let mut rows: Vec<(usize, Vec<ParsedCell>)> = Vec::new();
    for (idx, line_r) in rdr.into_records().enumerate() {
        // The index starts at 1 to respect most conventions in the excel world
        let lineno = idx + 1;
        let line = line_r.context(CsvLineParseSnafu { path, lineno })?;
        if header.is_none() {
            header = Some(line.iter().map(clean_label).collect());
            continue;
        }
        let cells: Vec<ParsedCell> = line
            .iter()
            .map(|s| {
                if s.trim().is_empty() {
                    ParsedCell::Empty
                } else {
                    ParsedCell::Text(s.to_string())
                }
            })
            .collect();
        debug!("read_csv_table: lineno: {:?} row: {:?}", lineno, &cells);
        rows.push((lineno, cells));
    }

    Ok(ParsedTable {
        header: header.unwrap_or_default(),
        rows,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;

    fn temp_path(name: &str) -> String {
        let mut p = env::temp_dir();
        p.push(format!("worshipstats_{}_{}", std::process::id(), name));
        p.display().to_string()
    }

    #[test]
    fn reads_header_and_rows() {
        let path = temp_path("reads_header_and_rows.csv");
        fs::write(
            &path,
            "\u{feff}聚會名稱,月份,MD,Vocal\n三民早堂 早上飽,2024-01,Alice,Bob / Carol\n禱告會,2024-01,,\n",
        )
        .unwrap();

        let table = read_csv_table(&path).unwrap();
        fs::remove_file(&path).unwrap();

        assert_eq!(table.header, vec!["聚會名稱", "月份", "MD", "Vocal"]);
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.rows[0].0, 2);
        assert_eq!(table.rows[0].1[3], ParsedCell::Text("Bob / Carol".to_string()));
        assert_eq!(table.rows[1].1[2], ParsedCell::Empty);
    }

    #[test]
    fn flexible_rows() {
        let path = temp_path("flexible_rows.csv");
        fs::write(&path, "聚會名稱,月份,MD,Keys\nQQ,2024-02,Dan\n").unwrap();

        let table = read_csv_table(&path).unwrap();
        fs::remove_file(&path).unwrap();

        assert_eq!(table.rows[0].1.len(), 3);
    }

    #[test]
    fn missing_file() {
        let res = read_csv_table("/nonexistent/worshipstats.csv");
        assert!(matches!(res, Err(ReportError::CsvOpen { .. })));
    }
}

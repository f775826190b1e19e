use log::{debug, info, warn};

use attendance_stats::*;
use snafu::{prelude::*, Snafu};

use std::fs;
use std::path::{Path, PathBuf};

use calamine::{open_workbook, Reader, Xlsx};

use serde::{Deserialize, Serialize};
use serde_json::json;
use serde_json::Map as JSMap;
use serde_json::Value as JSValue;
use text_diff::print_diff;

use crate::args::Args;
use crate::stats::config_reader::*;

mod config_reader;
mod io_common;
mod io_csv;
mod io_xlsx;
mod output;

#[derive(Debug, Snafu)]
pub enum ReportError {
    #[snafu(display("Error opening file {path}"))]
    OpeningExcel {
        source: calamine::XlsxError,
        path: String,
    },
    #[snafu(display("No worksheet found in {path}"))]
    EmptyExcel { path: String },
    #[snafu(display("Several worksheets in {path}, the worksheet name must be provided"))]
    AmbiguousWorksheet { path: String },
    #[snafu(display("Cannot find the column {column:?} in the header of {path}"))]
    MissingColumn { column: String, path: String },
    #[snafu(display("Error opening file {path}"))]
    CsvOpen { source: csv::Error, path: String },
    #[snafu(display("Error parsing line {lineno} of {path}"))]
    CsvLineParse {
        source: csv::Error,
        path: String,
        lineno: usize,
    },
    #[snafu(display("Error writing file {path}"))]
    CsvWrite { source: csv::Error, path: String },
    #[snafu(display("Error reading file {path}"))]
    OpeningJson {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error in JSON content"))]
    ParsingJson { source: serde_json::Error },
    #[snafu(display("Cannot read a number from {content}"))]
    ParsingJsonNumber { content: String },
    #[snafu(display("Error writing {path}"))]
    WritingOutput {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Cannot find the directory of the configuration file"))]
    MissingParentDir {},
    #[snafu(display("Invalid rules: {source}"))]
    InvalidRules { source: StatsErrors },

    #[snafu(whatever, display("{message}"))]
    Whatever {
        message: String,
        #[snafu(source(from(Box<dyn std::error::Error>, Some)))]
        source: Option<Box<dyn std::error::Error>>,
    },
}

pub type ReportResult<T> = Result<T, ReportError>;

/// A cell, as parsed by the readers.
/// This is before deciding which column is the meeting, the month or a role.
#[derive(PartialEq, Debug, Clone)]
pub enum ParsedCell {
    Text(String),
    Empty,
    Number(f64),
    /// A date cell, already rendered as a month (YYYY-MM).
    Date(String),
    /// Anything else the reader does not understand.
    Other(String),
}

/// A table, as parsed by the readers.
#[derive(PartialEq, Debug, Clone)]
pub struct ParsedTable {
    pub header: Vec<String>,
    /// The line number in the source (starting at 1, the header included) and the cells.
    pub rows: Vec<(usize, Vec<ParsedCell>)>,
}

fn read_attendance_data(root_path: &Path, src: &InputSource) -> ReportResult<Vec<RawRow>> {
    let p: PathBuf = root_path.join(&src.file_path);
    let path = p.as_path().display().to_string();
    info!("Attempting to read attendance file {:?}", path);
    let table = match src.provider.as_str() {
        "xlsx" => io_xlsx::read_excel_table(&path, src.excel_worksheet_name.as_deref())?,
        "csv" => io_csv::read_csv_table(&path)?,
        x => whatever!("Provider not implemented {:?}", x),
    };
    debug!(
        "read_attendance_data: {:?}: header {:?}, {:?} rows",
        path,
        table.header,
        table.rows.len()
    );
    io_common::table_to_rows(&table, src, &path)
}

// Command line flags take precedence over the configuration file.
fn resolve_config(args: &Args) -> ReportResult<(StatsConfig, PathBuf)> {
    let (mut config, mut root) = match (&args.config, &args.input) {
        (Some(config_path), _) => {
            let config = read_config(config_path)?;
            let root = Path::new(config_path)
                .parent()
                .context(MissingParentDirSnafu {})?
                .to_path_buf();
            (config, root)
        }
        (None, Some(_)) => (StatsConfig::default(), PathBuf::new()),
        (None, None) => whatever!("Either --config or --input must be provided"),
    };

    if let Some(input) = &args.input {
        let provider = match &args.input_type {
            Some(t) => t.clone(),
            None => guess_provider(input)?,
        };
        config.input_sources = vec![InputSource {
            provider,
            file_path: input.clone(),
            excel_worksheet_name: args.excel_worksheet_name.clone(),
            meeting_column: args.meeting_column.clone(),
            month_column: args.month_column.clone(),
            ignored_columns: None,
        }];
        // The input path is relative to the working directory.
        root = PathBuf::new();
    }
    Ok((config, root))
}

fn guess_provider(path: &str) -> ReportResult<String> {
    let ext = Path::new(path)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase());
    match ext.as_deref() {
        Some("xlsx") | Some("xlsm") => Ok("xlsx".to_string()),
        Some("csv") => Ok("csv".to_string()),
        x => whatever!(
            "Cannot guess the input type from the extension {:?}, use --input-type",
            x
        ),
    }
}

pub fn run_report(args: &Args) -> ReportResult<()> {
    let (config, root) = resolve_config(args)?;
    info!("config: {:?}", config);
    run_stats(&config, &root, args.out.clone(), args.reference.clone())?;
    Ok(())
}

/// Reads all the sources, computes the statistics and writes the outputs.
///
/// Returns the JSON summary.
pub fn run_stats(
    config: &StatsConfig,
    root: &Path,
    out: Option<String>,
    reference_path: Option<String>,
) -> ReportResult<JSValue> {
    // Validate the rules:
    let rules = validate_rules(&config.rules)?;

    if config.input_sources.is_empty() {
        whatever!("no input sources detected");
    }

    let mut data: Vec<RawRow> = Vec::new();
    for src in config.input_sources.iter() {
        let mut file_data = read_attendance_data(root, src)?;
        data.append(&mut file_data);
    }
    info!("Read {:?} meetings", data.len());

    let mut result = run_attendance_stats(&data, &rules).context(InvalidRulesSnafu {})?;
    if result.skipped_cells > 0 {
        warn!(
            "{} cells could not be read as lists of names and were skipped",
            result.skipped_cells
        );
    }

    let settings = config.output_settings.clone().unwrap_or_default();
    if settings.rank_by_score.unwrap_or(true) {
        rank_summaries(&mut result.summaries);
    }

    if let Some(dir) = &settings.output_directory {
        output::write_tables(&root.join(dir), &settings.report_name, &result)?;
    }

    // Assemble the final json
    let result_js = output::build_summary_js(&settings, &rules, &result);
    let pretty_js_stats = serde_json::to_string_pretty(&result_js).context(ParsingJsonSnafu {})?;

    match out.as_deref() {
        Some("stdout") => println!("{}", pretty_js_stats),
        Some(path) => {
            fs::write(path, &pretty_js_stats).context(WritingOutputSnafu { path })?;
            info!("Summary written to {:?}", path);
        }
        None => {}
    }

    // The reference summary, if provided for comparison
    if let Some(summary_p) = reference_path {
        let summary_ref = read_summary(&summary_p)?;
        let pretty_js_summary_ref =
            serde_json::to_string_pretty(&summary_ref).context(ParsingJsonSnafu {})?;
        if pretty_js_summary_ref != pretty_js_stats {
            warn!("Found differences with the reference summary {:?}", summary_p);
            print_diff(
                pretty_js_summary_ref.as_str(),
                pretty_js_stats.as_ref(),
                "\n",
            );
            whatever!("Difference detected between calculated summary and reference summary")
        }
        info!("The summary matches the reference {:?}", summary_p);
    }

    Ok(result_js)
}

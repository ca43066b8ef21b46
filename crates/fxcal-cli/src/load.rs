//! File loading for the pipeline's tabular inputs.
//!
//! Three sources: raw row dumps (JSON lines from the page-scraping
//! collaborator), keyed calendar exports (CSV with sparsely-rendered
//! Date/Time columns), and price bar exports (CSV, sometimes written as
//! UTF-16 with a BOM by the trading terminal).

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{NaiveDateTime, TimeZone, Utc};
use fxcal_core::{PriceBar, RawRow};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::CliError;

/// Time format of the price export's `time` column.
pub const PRICE_TIME_FORMAT: &str = "%Y.%m.%d %H:%M";

/// One row of a keyed calendar export.
///
/// `Date` and `Time` are only present on the first row of each visual
/// group; [`forward_fill`] recovers the rest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewsRow {
    pub event_id: String,
    #[serde(rename = "Date")]
    pub date: String,
    #[serde(rename = "Time")]
    pub time: String,
    #[serde(rename = "Currency")]
    pub currency: String,
    #[serde(rename = "Impact")]
    pub impact: String,
    #[serde(rename = "Event", alias = "Description")]
    pub event: String,
    #[serde(rename = "Actual", default)]
    pub actual: String,
    #[serde(rename = "Forecast", default)]
    pub forecast: String,
    #[serde(rename = "Previous", default)]
    pub previous: String,
    #[serde(default)]
    pub raw_criteria: String,
    #[serde(default)]
    pub criteria: i8,
}

/// Read a raw row dump: one JSON array of cell strings per line.
pub fn read_raw_rows(path: &Path) -> Result<Vec<RawRow>, CliError> {
    let text = read_text(path)?;
    text.lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| serde_json::from_str::<RawRow>(line).map_err(CliError::from))
        .collect()
}

/// Read a keyed calendar export.
pub fn read_news_rows(path: &Path) -> Result<Vec<NewsRow>, CliError> {
    let text = read_text(path)?;
    let mut reader = csv::Reader::from_reader(text.as_bytes());
    let mut rows = Vec::new();
    for result in reader.deserialize::<NewsRow>() {
        rows.push(result?);
    }
    Ok(rows)
}

/// Carry the last-seen `Date`/`Time` forward over empty cells.
pub fn forward_fill(rows: &mut [NewsRow]) {
    let mut date = String::new();
    let mut time = String::new();
    for row in rows {
        if row.date.trim().is_empty() {
            row.date = date.clone();
        } else {
            date = row.date.clone();
        }
        if row.time.trim().is_empty() {
            row.time = time.clone();
        } else {
            time = row.time.clone();
        }
    }
}

/// Read a price bar export, sorted or not.
///
/// The delimiter is sniffed from the header line (the terminal writes
/// either comma- or tab-separated files). Rows that fail to parse are
/// skipped with a warning; the table is broker output, not a contract.
pub fn read_price_bars(path: &Path) -> Result<Vec<PriceBar>, CliError> {
    #[derive(Debug, Deserialize)]
    struct PriceCsvRow {
        #[serde(rename = "time", alias = "Time", alias = "DateTime")]
        time: String,
        #[serde(alias = "Open")]
        open: f64,
        #[serde(alias = "High")]
        high: f64,
        #[serde(alias = "Low")]
        low: f64,
        #[serde(alias = "Close")]
        close: f64,
    }

    let text = read_text(path)?;
    let delimiter = if text.lines().next().is_some_and(|line| line.contains('\t')) {
        b'\t'
    } else {
        b','
    };
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .from_reader(text.as_bytes());

    let mut bars = Vec::new();
    for result in reader.deserialize::<PriceCsvRow>() {
        let row = match result {
            Ok(row) => row,
            Err(error) => {
                warn!(%error, "skipping unreadable price row");
                continue;
            }
        };
        let Ok(naive) = NaiveDateTime::parse_from_str(&row.time, PRICE_TIME_FORMAT) else {
            warn!(time = %row.time, "skipping price row with unparsable time");
            continue;
        };
        match PriceBar::new(
            Utc.from_utc_datetime(&naive),
            row.open,
            row.high,
            row.low,
            row.close,
        ) {
            Ok(bar) => bars.push(bar),
            Err(error) => warn!(%error, time = %row.time, "skipping invalid price bar"),
        }
    }
    Ok(bars)
}

/// Collect news CSVs under a year-structured directory.
///
/// Returns `(path, year)` pairs, sorted by path. The year comes from the
/// file's parent directory name (`<dir>/<year>/<file>.csv`), falling back
/// to `fallback_year` when the parent is not a number.
pub fn collect_news_files(
    dir: &Path,
    fallback_year: Option<i32>,
) -> Result<Vec<(PathBuf, i32)>, CliError> {
    let mut paths = Vec::new();
    walk_csv_files(dir, &mut paths)?;
    paths.sort();

    let mut files = Vec::with_capacity(paths.len());
    for path in paths {
        let year_from_dir = path
            .parent()
            .and_then(|parent| parent.file_name())
            .and_then(|name| name.to_str())
            .and_then(|name| name.parse::<i32>().ok());
        let Some(year) = year_from_dir.or(fallback_year) else {
            return Err(CliError::Input(format!(
                "cannot determine year for '{}': no year directory and no --year given",
                path.display()
            )));
        };
        files.push((path, year));
    }
    Ok(files)
}

fn walk_csv_files(dir: &Path, out: &mut Vec<PathBuf>) -> Result<(), CliError> {
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_dir() {
            walk_csv_files(&path, out)?;
        } else if path.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("csv")) {
            out.push(path);
        }
    }
    Ok(())
}

/// Read a file as text, transparently decoding UTF-16 exports.
pub fn read_text(path: &Path) -> Result<String, CliError> {
    let bytes = fs::read(path)?;
    match bytes.as_slice() {
        [0xFF, 0xFE, rest @ ..] => decode_utf16(rest, u16::from_le_bytes, path),
        [0xFE, 0xFF, rest @ ..] => decode_utf16(rest, u16::from_be_bytes, path),
        _ => String::from_utf8(bytes)
            .map_err(|_| CliError::Input(format!("'{}' is not valid UTF-8", path.display()))),
    }
}

fn decode_utf16(
    bytes: &[u8],
    from_bytes: fn([u8; 2]) -> u16,
    path: &Path,
) -> Result<String, CliError> {
    if bytes.len() % 2 != 0 {
        return Err(CliError::Input(format!(
            "'{}' has a truncated UTF-16 payload",
            path.display()
        )));
    }
    let units: Vec<u16> = bytes
        .chunks_exact(2)
        .map(|pair| from_bytes([pair[0], pair[1]]))
        .collect();
    String::from_utf16(&units)
        .map_err(|_| CliError::Input(format!("'{}' is not valid UTF-16", path.display())))
}

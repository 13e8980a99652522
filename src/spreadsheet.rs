//! Hospital roster import from spreadsheet workbooks.
//!
//! Expects a header row with `ID`, `Nombre` (or `Name`) and `WKT`
//! columns; header lookup is case- and whitespace-insensitive. Rows that
//! fail to yield an id or a coordinate are skipped and reported
//! per record, never fatal to the whole import.

use std::path::Path;

use calamine::{open_workbook_auto, Data, Reader};
use tracing::warn;

use crate::wkt;

/// One routable hospital record from the roster.
#[derive(Debug, Clone, PartialEq)]
pub struct Hospital {
    pub id: String,
    pub name: String,
    pub lat: f64,
    pub lon: f64,
}

/// Import outcome: parsed hospitals plus the rows that were skipped.
#[derive(Debug, Clone)]
pub struct RosterImport {
    pub hospitals: Vec<Hospital>,
    pub skipped: Vec<SkippedRow>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SkippedRow {
    /// Zero-based row index within the sheet.
    pub row: usize,
    pub reason: SkipReason,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SkipReason {
    BlankId,
    MalformedCoordinate(String),
}

#[derive(Debug)]
pub enum SpreadsheetError {
    Workbook(calamine::Error),
    NoSheet,
    MissingColumn(&'static str),
}

impl From<calamine::Error> for SpreadsheetError {
    fn from(err: calamine::Error) -> Self {
        SpreadsheetError::Workbook(err)
    }
}

impl std::fmt::Display for SpreadsheetError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SpreadsheetError::Workbook(err) => write!(f, "workbook error: {}", err),
            SpreadsheetError::NoSheet => write!(f, "workbook has no usable sheet"),
            SpreadsheetError::MissingColumn(name) => write!(f, "missing column: {}", name),
        }
    }
}

impl std::error::Error for SpreadsheetError {}

/// Reads hospital records from the first sheet of a workbook.
pub fn read_hospitals(path: impl AsRef<Path>) -> Result<RosterImport, SpreadsheetError> {
    let mut workbook = open_workbook_auto(path)?;
    let sheet = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or(SpreadsheetError::NoSheet)?;
    let range = workbook.worksheet_range(&sheet)?;
    import_rows(range.rows())
}

/// Imports a header row followed by data rows.
fn import_rows<'rows, I>(rows: I) -> Result<RosterImport, SpreadsheetError>
where
    I: Iterator<Item = &'rows [Data]>,
{
    let mut rows = rows.enumerate();
    let (_, header) = rows.next().ok_or(SpreadsheetError::NoSheet)?;

    let id_col = find_column(header, &["id"]).ok_or(SpreadsheetError::MissingColumn("ID"))?;
    let name_col =
        find_column(header, &["nombre", "name"]).ok_or(SpreadsheetError::MissingColumn("Nombre"))?;
    let wkt_col = find_column(header, &["wkt"]).ok_or(SpreadsheetError::MissingColumn("WKT"))?;

    let mut hospitals = Vec::new();
    let mut skipped = Vec::new();

    for (row_index, row) in rows {
        let id = cell_to_string(row.get(id_col));
        if id.is_empty() {
            skipped.push(SkippedRow { row: row_index, reason: SkipReason::BlankId });
            continue;
        }

        let wkt_text = cell_to_string(row.get(wkt_col));
        let (lat, lon) = match wkt::parse_point(&wkt_text) {
            Ok(pair) => pair,
            Err(err) => {
                warn!(row = row_index, %id, "skipping row with malformed coordinate");
                skipped.push(SkippedRow {
                    row: row_index,
                    reason: SkipReason::MalformedCoordinate(err.text),
                });
                continue;
            }
        };

        hospitals.push(Hospital {
            id,
            name: cell_to_string(row.get(name_col)),
            lat,
            lon,
        });
    }

    Ok(RosterImport { hospitals, skipped })
}

/// Finds a column whose normalized header matches one of `names`.
fn find_column(header: &[Data], names: &[&str]) -> Option<usize> {
    header.iter().position(|cell| {
        let normalized = normalize_header(&cell_to_string(Some(cell)));
        names.contains(&normalized.as_str())
    })
}

/// Lowercases and strips whitespace so `" Nombre "` matches `nombre`.
fn normalize_header(text: &str) -> String {
    text.to_lowercase().chars().filter(|c| !c.is_whitespace()).collect()
}

fn cell_to_string(cell: Option<&Data>) -> String {
    match cell {
        Some(Data::String(s)) => s.trim().to_string(),
        Some(Data::Float(f)) => {
            if (f.floor() - f).abs() < f64::EPSILON {
                format!("{}", *f as i64)
            } else {
                format!("{}", f)
            }
        }
        Some(Data::Int(i)) => i.to_string(),
        Some(Data::Bool(b)) => b.to_string(),
        Some(Data::DateTime(dt)) => dt.to_string(),
        Some(Data::DateTimeIso(s)) | Some(Data::DurationIso(s)) => s.clone(),
        Some(Data::Error(_)) | Some(Data::Empty) | None => String::new(),
    }
}

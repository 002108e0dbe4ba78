use chrono::{NaiveDate, NaiveDateTime};
use csv::StringRecord;
use serde::Serialize;

use super::loader::{LoadError, RawTable};
use super::model::{
    year_month_key, ColumnKind, NumericColumn, NumericField, Record, RecordTable, Season,
};

pub const DATE_COLUMN: &str = "dteday";
pub const SEASON_COLUMN: &str = "season";
pub const TOTAL_COLUMN: &str = "cnt";
pub const CASUAL_COLUMN: &str = "casual";
pub const REGISTERED_COLUMN: &str = "registered";
pub const YEAR_MONTH_COLUMN: &str = "year_month";

const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y"];
const DATETIME_FORMATS: [&str; 3] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y/%m/%d %H:%M:%S"];

// ---------------------------------------------------------------------------
// Per-row outcome
// ---------------------------------------------------------------------------

/// Why a row was excluded from the cleaned table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum DropReason {
    /// The date cell could not be parsed.
    InvalidDate(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DroppedRow {
    /// 1-based data line (the header is line 0).
    pub line: usize,
    pub reason: DropReason,
}

/// Result of cleaning one raw row.
#[derive(Debug, Clone, PartialEq)]
pub enum CleanOutcome {
    Clean(Record),
    Dropped(DroppedRow),
}

/// The cleaned table together with the rows that did not survive.
#[derive(Debug, Clone)]
pub struct CleanReport {
    pub table: RecordTable,
    pub dropped: Vec<DroppedRow>,
}

impl CleanReport {
    /// Rows whose season label fell outside the lookup and were coded 0.
    pub fn unknown_season_rows(&self) -> usize {
        self.table
            .records
            .iter()
            .filter(|r| r.season == Season::Unknown)
            .count()
    }

    /// Rows kept with at least one blank or unparseable rental count.
    pub fn missing_count_rows(&self) -> usize {
        self.table
            .records
            .iter()
            .filter(|r| r.total.is_none() || r.casual.is_none() || r.registered.is_none())
            .count()
    }
}

// ---------------------------------------------------------------------------
// Cell parsers
// ---------------------------------------------------------------------------

/// Parse a date cell. Datetime cells are truncated to their date.
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
                .map(|dt| dt.date())
        })
}

fn parse_count(s: &str) -> Option<u32> {
    let s = s.trim();
    if let Ok(n) = s.parse::<u32>() {
        return Some(n);
    }
    // Counts written by float-typed exporters, e.g. "985.0".
    let f = s.parse::<f64>().ok()?;
    (f >= 0.0 && f.fract() == 0.0 && f <= f64::from(u32::MAX)).then_some(f as u32)
}

fn parse_number(s: &str) -> f64 {
    s.trim().parse::<f64>().unwrap_or(f64::NAN)
}

// ---------------------------------------------------------------------------
// Schema detection
// ---------------------------------------------------------------------------

struct Layout {
    date: usize,
    season: usize,
    total: usize,
    casual: usize,
    registered: usize,
    year_month: Option<usize>,
    /// Raw column index of every extra numeric column, aligned with
    /// `Record::extras`.
    extras: Vec<usize>,
    columns: Vec<NumericColumn>,
}

/// A free column counts as numeric when it has at least one non-empty cell
/// and every non-empty cell parses as a number; it is an integer column when
/// every such cell is an integer.
fn detect_kind(raw: &RawTable, idx: usize) -> Option<ColumnKind> {
    let mut kind = ColumnKind::Integer;
    let mut seen = false;
    for row in &raw.rows {
        let cell = row.get(idx).unwrap_or("").trim();
        if cell.is_empty() {
            continue;
        }
        seen = true;
        if cell.parse::<i64>().is_ok() {
            continue;
        }
        if cell.parse::<f64>().is_ok() {
            kind = ColumnKind::Float;
            continue;
        }
        return None;
    }
    seen.then_some(kind)
}

fn layout(raw: &RawTable) -> Result<Layout, LoadError> {
    let date = raw.require(DATE_COLUMN)?;
    let season = raw.require(SEASON_COLUMN)?;
    let total = raw.require(TOTAL_COLUMN)?;
    let casual = raw.require(CASUAL_COLUMN)?;
    let registered = raw.require(REGISTERED_COLUMN)?;
    let year_month = raw.column(YEAR_MONTH_COLUMN);

    let mut extras = Vec::new();
    let mut columns = Vec::new();

    for (idx, name) in raw.headers.iter().enumerate() {
        let (kind, field) = if idx == season {
            (ColumnKind::Integer, NumericField::Season)
        } else if idx == total {
            (ColumnKind::Integer, NumericField::Total)
        } else if idx == casual {
            (ColumnKind::Integer, NumericField::Casual)
        } else if idx == registered {
            (ColumnKind::Integer, NumericField::Registered)
        } else if idx == date || Some(idx) == year_month {
            continue;
        } else {
            let Some(kind) = detect_kind(raw, idx) else {
                continue;
            };
            extras.push(idx);
            (kind, NumericField::Extra(extras.len() - 1))
        };
        columns.push(NumericColumn {
            name: name.clone(),
            kind,
            field,
        });
    }

    Ok(Layout {
        date,
        season,
        total,
        casual,
        registered,
        year_month,
        extras,
        columns,
    })
}

// ---------------------------------------------------------------------------
// Cleaning
// ---------------------------------------------------------------------------

fn clean_row(layout: &Layout, row: &StringRecord, line: usize) -> CleanOutcome {
    let cell = |idx: usize| row.get(idx).unwrap_or("");

    let date_text = cell(layout.date);
    let Some(date) = parse_date(date_text) else {
        return CleanOutcome::Dropped(DroppedRow {
            line,
            reason: DropReason::InvalidDate(date_text.to_string()),
        });
    };

    let total = parse_count(cell(layout.total));
    let casual = parse_count(cell(layout.casual));
    let registered = parse_count(cell(layout.registered));
    if total.is_none() || casual.is_none() || registered.is_none() {
        log::debug!("Line {line}: keeping row with a missing rental count");
    }

    let year_month = match layout.year_month {
        Some(idx) => cell(idx).to_string(),
        None => year_month_key(date),
    };

    CleanOutcome::Clean(Record {
        date,
        season: Season::from_label(cell(layout.season)),
        total,
        casual,
        registered,
        year_month,
        extras: layout.extras.iter().map(|&idx| parse_number(cell(idx))).collect(),
    })
}

/// Clean a raw table: parse dates, code seasons, derive the year-month key.
///
/// Rows with an unparseable date are dropped and reported in
/// [`CleanReport::dropped`]. A blank or unparseable rental count only marks
/// that count as missing, and unknown season labels are kept with code 0.
pub fn clean(raw: &RawTable) -> Result<CleanReport, LoadError> {
    let layout = layout(raw)?;

    let mut records = Vec::with_capacity(raw.rows.len());
    let mut dropped = Vec::new();

    for (i, row) in raw.rows.iter().enumerate() {
        match clean_row(&layout, row, i + 1) {
            CleanOutcome::Clean(record) => records.push(record),
            CleanOutcome::Dropped(d) => {
                log::debug!("Dropping line {}: {:?}", d.line, d.reason);
                dropped.push(d);
            }
        }
    }

    if !dropped.is_empty() {
        log::warn!("Dropped {} of {} rows during cleaning", dropped.len(), raw.rows.len());
    }

    Ok(CleanReport {
        table: RecordTable {
            records,
            numeric_columns: layout.columns,
        },
        dropped,
    })
}

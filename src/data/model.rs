use std::fmt;

use chrono::{Datelike, NaiveDate};
use serde::Serialize;

// ---------------------------------------------------------------------------
// Season – categorical label stored as a small integer code
// ---------------------------------------------------------------------------

/// Season of a record. The discriminants are the codes used throughout the
/// dashboard; `Unknown` (0) absorbs every label outside the fixed lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Season {
    Unknown = 0,
    Spring = 1,
    Summer = 2,
    Fall = 3,
    Winter = 4,
}

impl Season {
    /// Map a textual season label to its code.
    ///
    /// Only the four exact labels are recognised. Anything else, including
    /// already-numeric codes such as `"3"` and empty cells, becomes
    /// [`Season::Unknown`].
    pub fn from_label(label: &str) -> Self {
        match label {
            "Spring" => Season::Spring,
            "Summer" => Season::Summer,
            "Fall" => Season::Fall,
            "Winter" => Season::Winter,
            _ => Season::Unknown,
        }
    }

    pub fn code(self) -> u8 {
        self as u8
    }

    pub fn name(self) -> &'static str {
        match self {
            Season::Unknown => "Unknown",
            Season::Spring => "Spring",
            Season::Summer => "Summer",
            Season::Fall => "Fall",
            Season::Winter => "Winter",
        }
    }
}

impl fmt::Display for Season {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name(), self.code())
    }
}

// ---------------------------------------------------------------------------
// Numeric schema – which columns take part in correlation analysis
// ---------------------------------------------------------------------------

/// Storage kind of a numeric column, mirroring the int/float split of the
/// source CSV.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ColumnKind {
    Integer,
    Float,
}

/// Where the value of a numeric column lives inside a [`Record`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumericField {
    Season,
    Total,
    Casual,
    Registered,
    /// Index into [`Record::extras`].
    Extra(usize),
}

/// One numeric column of the cleaned table, in CSV header order.
#[derive(Debug, Clone)]
pub struct NumericColumn {
    pub name: String,
    pub kind: ColumnKind,
    pub field: NumericField,
}

// ---------------------------------------------------------------------------
// Record – one cleaned row
// ---------------------------------------------------------------------------

/// A single cleaned row of the bike-sharing dataset.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub date: NaiveDate,
    pub season: Season,
    /// Total rentals (`cnt`). Counts are `None` when the cell is blank or
    /// not a non-negative integer; the row itself is kept.
    pub total: Option<u32>,
    pub casual: Option<u32>,
    pub registered: Option<u32>,
    /// `YYYY-MM` grouping key.
    pub year_month: String,
    /// Extra numeric covariates, aligned with the `Extra` columns of the
    /// table schema. Missing cells are `NaN`.
    pub extras: Vec<f64>,
}

impl Record {
    pub fn year(&self) -> i32 {
        self.date.year()
    }

    /// Read a numeric column of this row.
    pub fn value(&self, field: NumericField) -> f64 {
        match field {
            NumericField::Season => f64::from(self.season.code()),
            NumericField::Total => count_value(self.total),
            NumericField::Casual => count_value(self.casual),
            NumericField::Registered => count_value(self.registered),
            NumericField::Extra(i) => self.extras.get(i).copied().unwrap_or(f64::NAN),
        }
    }
}

fn count_value(count: Option<u32>) -> f64 {
    count.map_or(f64::NAN, f64::from)
}

/// Render a date as its `YYYY-MM` key.
pub fn year_month_key(date: NaiveDate) -> String {
    date.format("%Y-%m").to_string()
}

// ---------------------------------------------------------------------------
// RecordTable – the cleaned dataset
// ---------------------------------------------------------------------------

/// The cleaned dataset: rows in file order plus the numeric schema.
#[derive(Debug, Clone)]
pub struct RecordTable {
    pub records: Vec<Record>,
    /// Numeric columns in CSV header order (includes `season`, `cnt`,
    /// `casual` and `registered`).
    pub numeric_columns: Vec<NumericColumn>,
}

impl RecordTable {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn column_names(&self) -> Vec<String> {
        self.numeric_columns.iter().map(|c| c.name.clone()).collect()
    }

    /// Rows whose date falls in `year`, in table order.
    pub fn rows_in_year(&self, year: i32) -> Vec<&Record> {
        self.records.iter().filter(|r| r.year() == year).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recognised_labels_map_to_fixed_codes() {
        assert_eq!(Season::from_label("Spring").code(), 1);
        assert_eq!(Season::from_label("Summer").code(), 2);
        assert_eq!(Season::from_label("Fall").code(), 3);
        assert_eq!(Season::from_label("Winter").code(), 4);
    }

    #[test]
    fn everything_else_maps_to_unknown() {
        for label in ["", "1", "3", "4", "fall", "Autumn", " Spring", "NaN"] {
            assert_eq!(Season::from_label(label), Season::Unknown, "{label:?}");
        }
        assert_eq!(Season::Unknown.code(), 0);
        assert_eq!(Season::Unknown.name(), "Unknown");
    }

    #[test]
    fn year_month_key_is_zero_padded() {
        let d = NaiveDate::from_ymd_opt(2012, 3, 7).unwrap();
        assert_eq!(year_month_key(d), "2012-03");
    }

    #[test]
    fn record_value_reads_typed_and_extra_fields() {
        let r = Record {
            date: NaiveDate::from_ymd_opt(2011, 1, 1).unwrap(),
            season: Season::Winter,
            total: Some(10),
            casual: None,
            registered: Some(7),
            year_month: "2011-01".into(),
            extras: vec![0.5],
        };
        assert_eq!(r.value(NumericField::Season), 4.0);
        assert_eq!(r.value(NumericField::Total), 10.0);
        assert!(r.value(NumericField::Casual).is_nan());
        assert_eq!(r.value(NumericField::Registered), 7.0);
        assert_eq!(r.value(NumericField::Extra(0)), 0.5);
        assert!(r.value(NumericField::Extra(9)).is_nan());
    }
}

use std::collections::BTreeMap;

use serde::Serialize;

use super::stats::{mean, pearson};
use crate::data::cleaner::TOTAL_COLUMN;
use crate::data::model::{year_month_key, RecordTable};

pub const ANALYSIS_YEAR: i32 = 2012;
pub const TOP_N: usize = 3;

// ---------------------------------------------------------------------------
// Correlation matrix (heatmap)
// ---------------------------------------------------------------------------

/// Square Pearson correlation matrix over named columns.
#[derive(Debug, Clone, Serialize)]
pub struct CorrelationMatrix {
    pub columns: Vec<String>,
    /// Row-major; `values[i][j]` is `corr(columns[i], columns[j])`.
    pub values: Vec<Vec<f64>>,
}

impl CorrelationMatrix {
    /// Correlate every pair of the given column series.
    pub fn from_series(columns: Vec<String>, series: &[Vec<f64>]) -> Self {
        let n = series.len();
        let mut values = vec![vec![f64::NAN; n]; n];
        for i in 0..n {
            for j in i..n {
                let r = pearson(&series[i], &series[j]);
                values[i][j] = r;
                values[j][i] = r;
            }
        }
        CorrelationMatrix { columns, values }
    }

    pub fn get(&self, row: &str, col: &str) -> Option<f64> {
        let i = self.columns.iter().position(|c| c == row)?;
        let j = self.columns.iter().position(|c| c == col)?;
        Some(self.values[i][j])
    }

    /// Cell annotation with two decimals; undefined cells are blank.
    pub fn annotation(&self, i: usize, j: usize) -> String {
        match self.values.get(i).and_then(|row| row.get(j)) {
            Some(v) if v.is_finite() => format!("{v:.2}"),
            _ => String::new(),
        }
    }
}

/// Correlation over every numeric column of the full cleaned table.
pub fn correlation_heatmap(table: &RecordTable) -> CorrelationMatrix {
    let series: Vec<Vec<f64>> = table
        .numeric_columns
        .iter()
        .map(|c| table.records.iter().map(|r| r.value(c.field)).collect())
        .collect();
    CorrelationMatrix::from_series(table.column_names(), &series)
}

// ---------------------------------------------------------------------------
// Top correlations with monthly rentals
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CorrelationEntry {
    pub column: String,
    /// Signed Pearson coefficient.
    pub correlation: f64,
}

impl CorrelationEntry {
    pub fn magnitude(&self) -> f64 {
        self.correlation.abs()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct TopCorrelations {
    pub year: i32,
    /// Number of monthly groups the correlation was computed over.
    pub months: usize,
    /// Strongest first.
    pub entries: Vec<CorrelationEntry>,
}

impl TopCorrelations {
    /// Entries weakest first, the order the bar chart draws them in.
    pub fn ascending(&self) -> Vec<&CorrelationEntry> {
        self.entries.iter().rev().collect()
    }
}

/// Monthly means of every numeric column over `year`, keyed by month.
fn monthly_means(table: &RecordTable, year: i32) -> BTreeMap<String, Vec<f64>> {
    let mut groups: BTreeMap<String, Vec<Vec<f64>>> = BTreeMap::new();
    for record in table.rows_in_year(year) {
        let values = groups
            .entry(year_month_key(record.date))
            .or_insert_with(|| vec![Vec::new(); table.numeric_columns.len()]);
        for (slot, column) in values.iter_mut().zip(&table.numeric_columns) {
            slot.push(record.value(column.field));
        }
    }
    groups
        .into_iter()
        .map(|(month, columns)| (month, columns.iter().map(|c| mean(c)).collect()))
        .collect()
}

/// Columns most correlated with mean monthly rentals in `year`.
///
/// The year is regrouped by calendar month, each numeric column is averaged
/// per month, and every column is correlated with the monthly mean of
/// `cnt`. `cnt` itself and undefined correlations are excluded; the rest
/// are ranked by absolute value and cut to `n`.
pub fn top_correlations(table: &RecordTable, year: i32, n: usize) -> TopCorrelations {
    let means = monthly_means(table, year);
    let columns = table.column_names();

    let series: Vec<Vec<f64>> = (0..columns.len())
        .map(|i| means.values().map(|row| row[i]).collect())
        .collect();

    let mut entries: Vec<CorrelationEntry> = match columns.iter().position(|c| c == TOTAL_COLUMN) {
        Some(target) => columns
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != target)
            .map(|(i, name)| CorrelationEntry {
                column: name.clone(),
                correlation: pearson(&series[i], &series[target]),
            })
            .filter(|e| e.correlation.is_finite())
            .collect(),
        None => Vec::new(),
    };

    entries.sort_by(|a, b| b.magnitude().total_cmp(&a.magnitude()));
    entries.truncate(n);

    TopCorrelations {
        year,
        months: means.len(),
        entries,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{ColumnKind, NumericColumn, NumericField, Record, Season};
    use chrono::NaiveDate;

    fn column(name: &str, field: NumericField) -> NumericColumn {
        NumericColumn {
            name: name.into(),
            kind: ColumnKind::Float,
            field,
        }
    }

    /// One row per month of 2011 and 2012. `temp` tracks rentals, `hum`
    /// runs against them, `noise` is weakly related, `windspeed` is flat.
    fn table() -> RecordTable {
        let noise = [3.0, 1.0, 4.0, 1.0, 5.0, 9.0, 2.0, 6.0, 5.0, 3.0, 5.0, 8.0];
        let mut records = Vec::new();
        for year in [2011, 2012] {
            for m in 1..=12u32 {
                let total = 100 * m + if year == 2012 { 50 } else { 0 };
                records.push(Record {
                    date: NaiveDate::from_ymd_opt(year, m, 10).unwrap(),
                    season: Season::Spring,
                    total: Some(total),
                    casual: Some(total / 4),
                    registered: Some(total - total / 4),
                    year_month: format!("{year}-{m:02}"),
                    extras: vec![
                        f64::from(m) * 2.0,
                        100.0 - f64::from(m) * 1.5 + noise[m as usize - 1] * 0.1,
                        noise[m as usize - 1],
                        0.2,
                    ],
                });
            }
        }
        RecordTable {
            records,
            numeric_columns: vec![
                column("season", NumericField::Season),
                column("temp", NumericField::Extra(0)),
                column("hum", NumericField::Extra(1)),
                column("noise", NumericField::Extra(2)),
                column("windspeed", NumericField::Extra(3)),
                column("casual", NumericField::Casual),
                column("registered", NumericField::Registered),
                column("cnt", NumericField::Total),
            ],
        }
    }

    #[test]
    fn heatmap_is_symmetric_with_unit_diagonal() {
        let m = correlation_heatmap(&table());
        assert_eq!(m.columns.len(), 8);
        for i in 0..m.columns.len() {
            for j in 0..m.columns.len() {
                let (a, b) = (m.values[i][j], m.values[j][i]);
                assert!(a == b || (a.is_nan() && b.is_nan()));
            }
        }
        let temp_cnt = m.get("temp", "cnt").unwrap();
        assert!(temp_cnt > 0.9);
        assert_eq!(m.annotation(1, 1), "1.00");
        // Constant columns have no defined correlation.
        assert_eq!(m.annotation(0, 1), "");
    }

    #[test]
    fn top_correlations_exclude_target_and_are_ranked() {
        let top = top_correlations(&table(), ANALYSIS_YEAR, TOP_N);
        assert_eq!(top.months, 12);
        assert_eq!(top.entries.len(), 3);
        assert!(top.entries.iter().all(|e| e.column != "cnt"));
        assert!(top
            .entries
            .windows(2)
            .all(|w| w[0].magnitude() >= w[1].magnitude()));
        assert!(top.entries.iter().all(|e| e.magnitude() > 0.9));
        assert!(top
            .entries
            .iter()
            .all(|e| !["windspeed", "season", "noise"].contains(&e.column.as_str())));
        if let Some(hum) = top.entries.iter().find(|e| e.column == "hum") {
            assert!(hum.correlation < 0.0);
        }
    }

    #[test]
    fn ascending_reverses_ranking() {
        let top = top_correlations(&table(), ANALYSIS_YEAR, TOP_N);
        let asc = top.ascending();
        assert!(asc.windows(2).all(|w| w[0].magnitude() <= w[1].magnitude()));
    }

    #[test]
    fn missing_year_gives_no_entries() {
        let top = top_correlations(&table(), 1999, TOP_N);
        assert_eq!(top.months, 0);
        assert!(top.entries.is_empty());
    }
}

use std::collections::BTreeMap;

use serde::Serialize;

use crate::data::model::RecordTable;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendPoint {
    pub year_month: String,
    pub total: u64,
}

/// Total rentals per year-month over the full table, in key order.
#[derive(Debug, Clone, Serialize)]
pub struct MonthlyTrend {
    pub points: Vec<TrendPoint>,
}

pub fn monthly_trend(table: &RecordTable) -> MonthlyTrend {
    let mut sums: BTreeMap<&str, u64> = BTreeMap::new();
    for r in &table.records {
        // A missing count contributes nothing, but its month still appears.
        *sums.entry(r.year_month.as_str()).or_default() += r.total.map_or(0, u64::from);
    }
    MonthlyTrend {
        points: sums
            .into_iter()
            .map(|(k, total)| TrendPoint {
                year_month: k.to_string(),
                total,
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{year_month_key, Record, Season};
    use chrono::NaiveDate;

    #[test]
    fn sums_per_month_in_key_order() {
        let rows = [
            (2012, 2, 1, 5),
            (2011, 12, 30, 10),
            (2012, 2, 3, 7),
            (2011, 12, 31, 1),
            (2012, 1, 1, 4),
        ];
        let records = rows
            .iter()
            .map(|&(y, m, d, total)| {
                let date = NaiveDate::from_ymd_opt(y, m, d).unwrap();
                Record {
                    date,
                    season: Season::Winter,
                    total: Some(total),
                    casual: Some(0),
                    registered: Some(total),
                    year_month: year_month_key(date),
                    extras: Vec::new(),
                }
            })
            .collect();
        let table = RecordTable {
            records,
            numeric_columns: Vec::new(),
        };

        let trend = monthly_trend(&table);
        let got: Vec<(&str, u64)> = trend
            .points
            .iter()
            .map(|p| (p.year_month.as_str(), p.total))
            .collect();
        assert_eq!(got, vec![("2011-12", 11), ("2012-01", 4), ("2012-02", 12)]);
    }

    #[test]
    fn missing_counts_add_nothing_but_keep_their_month() {
        let record = |d: u32, total: Option<u32>| {
            let date = NaiveDate::from_ymd_opt(2011, 1, d).unwrap();
            Record {
                date,
                season: Season::Spring,
                total,
                casual: None,
                registered: total,
                year_month: year_month_key(date),
                extras: Vec::new(),
            }
        };
        let mut records = vec![record(1, Some(30)), record(2, None), record(3, Some(500))];
        records.push(Record {
            year_month: "2011-02".into(),
            ..record(4, None)
        });
        let table = RecordTable {
            records,
            numeric_columns: Vec::new(),
        };

        let trend = monthly_trend(&table);
        assert_eq!(trend.points.len(), 2);
        assert_eq!(trend.points[0].total, 530);
        assert_eq!(trend.points[1].total, 0);
    }
}

use std::collections::BTreeSet;

use super::model::{Record, RecordTable, Season};

// ---------------------------------------------------------------------------
// Season filter
// ---------------------------------------------------------------------------

/// Read-only, order-preserving subset of a [`RecordTable`].
#[derive(Debug, Clone)]
pub struct SeasonView<'a> {
    pub season: Season,
    pub rows: Vec<&'a Record>,
}

impl SeasonView<'_> {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Distinct season codes present in the table, ascending. These are the
/// choices offered by the sidebar selector.
pub fn season_choices(table: &RecordTable) -> Vec<Season> {
    table
        .records
        .iter()
        .map(|r| r.season)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Rows whose season code equals `season`, in table order.
pub fn filter_by_season(table: &RecordTable, season: Season) -> SeasonView<'_> {
    SeasonView {
        season,
        rows: table.records.iter().filter(|r| r.season == season).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn table(seasons: &[Season]) -> RecordTable {
        let records = seasons
            .iter()
            .enumerate()
            .map(|(i, &season)| Record {
                date: NaiveDate::from_ymd_opt(2011, 1, 1).unwrap() + chrono::Days::new(i as u64),
                season,
                total: Some(i as u32),
                casual: Some(0),
                registered: Some(i as u32),
                year_month: "2011-01".into(),
                extras: Vec::new(),
            })
            .collect();
        RecordTable {
            records,
            numeric_columns: Vec::new(),
        }
    }

    #[test]
    fn keeps_only_matching_rows_in_order() {
        let t = table(&[Season::Fall, Season::Spring, Season::Fall, Season::Winter, Season::Fall]);
        let view = filter_by_season(&t, Season::Fall);
        let totals: Vec<Option<u32>> = view.rows.iter().map(|r| r.total).collect();
        assert_eq!(totals, vec![Some(0), Some(2), Some(4)]);
        assert!(view.rows.iter().all(|r| r.season == Season::Fall));
    }

    #[test]
    fn absent_code_gives_empty_view() {
        let t = table(&[Season::Spring, Season::Summer]);
        let view = filter_by_season(&t, Season::Winter);
        assert!(view.is_empty());
        assert_eq!(t.len(), 2);
    }

    #[test]
    fn choices_are_sorted_and_distinct() {
        let t = table(&[Season::Winter, Season::Unknown, Season::Spring, Season::Winter]);
        assert_eq!(season_choices(&t), vec![Season::Unknown, Season::Spring, Season::Winter]);
    }
}

use std::path::Path;

use serde::Serialize;

use crate::data::cleaner::{clean, DroppedRow};
use crate::data::filter::{filter_by_season, season_choices};
use crate::data::loader::{load_csv, LoadError};
use crate::data::model::Season;
use crate::report::correlation::{
    correlation_heatmap, top_correlations, CorrelationMatrix, TopCorrelations, ANALYSIS_YEAR,
    TOP_N,
};
use crate::report::distribution::{distribution, Distribution};
use crate::report::segmentation::{segmentation, Segmentation, SEGMENT_SEASON, SEGMENT_YEAR};
use crate::report::trend::{monthly_trend, MonthlyTrend};

// ---------------------------------------------------------------------------
// View model
// ---------------------------------------------------------------------------

/// "General visualization" tab.
#[derive(Debug, Clone, Serialize)]
pub struct GeneralTab {
    pub distribution: Distribution,
    pub heatmap: CorrelationMatrix,
}

/// "Analytical questions" tab.
#[derive(Debug, Clone, Serialize)]
pub struct AnalyticsTab {
    pub trend: MonthlyTrend,
    pub top_correlations: TopCorrelations,
    pub segmentation: Segmentation,
}

/// Everything one render of the page shows.
#[derive(Debug, Clone, Serialize)]
pub struct Dashboard {
    /// Season codes present in the data, ascending.
    pub season_choices: Vec<Season>,
    pub selected: Season,
    /// Rows in the selected season.
    pub selected_rows: usize,
    /// Rows surviving cleaning.
    pub total_rows: usize,
    pub dropped: Vec<DroppedRow>,
    /// Kept rows with a blank or unparseable rental count.
    pub missing_count_rows: usize,
    pub unknown_season_rows: usize,
    pub general: GeneralTab,
    pub analytics: AnalyticsTab,
}

// ---------------------------------------------------------------------------
// Pipeline
// ---------------------------------------------------------------------------

/// Run the whole pipeline (load → clean → filter → report) for one
/// interaction.
///
/// Without a `selection` the first season present in the data is shown. A
/// selected season with no rows yields [`Distribution::NoData`]. Only
/// load-time conditions are errors; empty slices become notices inside the
/// returned view.
pub fn render(path: &Path, selection: Option<Season>) -> Result<Dashboard, LoadError> {
    let raw = load_csv(path)?;
    let report = clean(&raw)?;
    let table = &report.table;

    let choices = season_choices(table);
    let Some(&first) = choices.first() else {
        return Err(LoadError::NoValidRows(path.to_path_buf()));
    };
    let selected = selection.unwrap_or(first);

    let view = filter_by_season(table, selected);
    log::info!(
        "Rendering season {selected}: {} of {} rows",
        view.len(),
        table.len()
    );

    Ok(Dashboard {
        selected,
        selected_rows: view.len(),
        total_rows: table.len(),
        missing_count_rows: report.missing_count_rows(),
        unknown_season_rows: report.unknown_season_rows(),
        general: GeneralTab {
            distribution: distribution(&view),
            heatmap: correlation_heatmap(table),
        },
        analytics: AnalyticsTab {
            trend: monthly_trend(table),
            top_correlations: top_correlations(table, ANALYSIS_YEAR, TOP_N),
            segmentation: segmentation(table, SEGMENT_YEAR, SEGMENT_SEASON),
        },
        season_choices: choices,
        dropped: report.dropped,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fmt::Write as _;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const HEADER: &str = "instant,dteday,season,yr,mnth,temp,hum,windspeed,casual,registered,cnt\n";

    fn season_of(month: u32) -> &'static str {
        match month {
            3..=5 => "Spring",
            6..=8 => "Summer",
            9..=11 => "Fall",
            _ => "Winter",
        }
    }

    /// Two years of days 1, 11 and 21 of each month.
    fn sample_csv(include_fall_2012: bool) -> String {
        let mut out = String::from(HEADER);
        let mut instant = 0;
        for year in [2011, 2012] {
            for month in 1..=12u32 {
                let season = season_of(month);
                if year == 2012 && season == "Fall" && !include_fall_2012 {
                    continue;
                }
                for day in [1u32, 11, 21] {
                    instant += 1;
                    let casual = 100 + month * 40 + day * 3 + (instant % 7) * 20;
                    let registered = 1500 + month * 200 + day * 11 + (instant % 5) * 90;
                    let temp = 0.2 + f64::from(month) * 0.04;
                    let hum = 0.8 - f64::from(day) * 0.01;
                    writeln!(
                        out,
                        "{instant},{year}-{month:02}-{day:02},{season},{},{month},{temp:.3},{hum:.3},0.2,{casual},{registered},{}",
                        year - 2011,
                        casual + registered
                    )
                    .unwrap();
                }
            }
        }
        out
    }

    fn write(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn empty_file_renders_nothing() {
        let file = write(HEADER);
        let err = render(file.path(), None).unwrap_err();
        assert!(matches!(err, LoadError::Empty(_)));
    }

    #[test]
    fn all_rows_dropped_is_fatal() {
        let file = write(&format!("{HEADER}1,nope,Spring,0,1,0.1,0.5,0.2,1,1,2\n"));
        let err = render(file.path(), None).unwrap_err();
        assert!(matches!(err, LoadError::NoValidRows(_)));
        assert!(err.to_string().contains("invalid or missing date"), "{err}");
    }

    #[test]
    fn blank_count_keeps_row_in_trend() {
        let file = write(&format!(
            "{HEADER}1,2011-01-01,Winter,0,1,0.1,0.5,0.2,10,20,30\n\
             2,2011-01-02,Winter,0,1,0.1,0.5,0.2,,20,\n\
             3,2011-01-03,Winter,0,1,0.1,0.5,0.2,100,400,500\n"
        ));
        let dash = render(file.path(), None).unwrap();
        assert_eq!(dash.total_rows, 3);
        assert!(dash.dropped.is_empty());
        assert_eq!(dash.missing_count_rows, 1);
        assert_eq!(dash.analytics.trend.points.len(), 1);
        assert_eq!(dash.analytics.trend.points[0].total, 530);
        match &dash.general.distribution {
            Distribution::Histogram { histogram, .. } => {
                assert_eq!(histogram.bins.iter().map(|b| b.count).sum::<usize>(), 2);
            }
            other => panic!("expected histogram, got {other:?}"),
        }
    }

    #[test]
    fn default_selection_is_first_choice() {
        let file = write(&sample_csv(true));
        let dash = render(file.path(), None).unwrap();
        assert_eq!(
            dash.season_choices,
            vec![Season::Spring, Season::Summer, Season::Fall, Season::Winter]
        );
        assert_eq!(dash.selected, Season::Spring);
        assert_eq!(dash.total_rows, 72);
        assert_eq!(dash.selected_rows, 18);
        assert!(dash.dropped.is_empty());
    }

    #[test]
    fn populated_selection_never_shows_no_data() {
        let file = write(&sample_csv(true));
        for season in [Season::Spring, Season::Summer, Season::Fall, Season::Winter] {
            let dash = render(file.path(), Some(season)).unwrap();
            assert_eq!(dash.selected, season);
            assert!(matches!(dash.general.distribution, Distribution::Histogram { .. }));
        }
    }

    #[test]
    fn fall_2012_renders_clusters() {
        let file = write(&sample_csv(true));
        let dash = render(file.path(), Some(Season::Fall)).unwrap();
        match &dash.analytics.segmentation {
            Segmentation::Clusters { points, .. } => {
                assert_eq!(points.len(), 9);
                assert!(points.iter().all(|p| p.date.format("%Y").to_string() == "2012"));
                assert!(points.iter().map(|p| p.cluster).max().unwrap_or(0) < 3);
            }
            other => panic!("expected clusters, got {other:?}"),
        }
        assert_eq!(dash.analytics.trend.points.len(), 24);
        assert!(dash.analytics.top_correlations.entries.len() <= 3);
        assert!(dash
            .analytics
            .top_correlations
            .entries
            .iter()
            .all(|e| e.column != "cnt"));
    }

    #[test]
    fn missing_fall_2012_shows_diagnostics() {
        let file = write(&sample_csv(false));
        let dash = render(file.path(), None).unwrap();
        match &dash.analytics.segmentation {
            Segmentation::Missing { diagnostics, .. } => {
                assert_eq!(diagnostics.len(), 27);
                assert!(diagnostics.iter().all(|d| d.season != Season::Fall));
            }
            other => panic!("expected missing slice, got {other:?}"),
        }
    }

    #[test]
    fn unknown_season_rows_are_selectable() {
        let mut csv = sample_csv(true);
        csv.push_str("999,2012-12-31,Monsoon,1,12,0.3,0.5,0.2,10,20,30\n");
        let file = write(&csv);

        let dash = render(file.path(), Some(Season::Unknown)).unwrap();
        assert_eq!(dash.unknown_season_rows, 1);
        assert_eq!(dash.season_choices[0], Season::Unknown);
        assert_eq!(dash.selected_rows, 1);
    }

    #[test]
    fn absent_season_shows_no_data_and_keeps_heatmap() {
        let only_spring = write(&format!(
            "{HEADER}1,2011-04-01,Spring,0,4,0.3,0.5,0.2,10,20,30\n\
             2,2011-04-02,Spring,0,4,0.4,0.6,0.3,15,25,40\n"
        ));
        let dash = render(only_spring.path(), Some(Season::Winter)).unwrap();
        assert_eq!(dash.season_choices, vec![Season::Spring]);
        assert_eq!(dash.selected, Season::Winter);
        assert_eq!(dash.selected_rows, 0);
        assert!(matches!(
            dash.general.distribution,
            Distribution::NoData { season: Season::Winter }
        ));
        assert!(!dash.general.heatmap.columns.is_empty());
        assert!(!dash.general.heatmap.values.is_empty());
    }

    #[test]
    fn heatmap_uses_full_table() {
        let file = write(&sample_csv(true));
        let spring = render(file.path(), Some(Season::Spring)).unwrap();
        let winter = render(file.path(), Some(Season::Winter)).unwrap();
        assert_eq!(spring.general.heatmap.values.len(), winter.general.heatmap.values.len());
        assert_eq!(
            spring.general.heatmap.annotation(0, 1),
            winter.general.heatmap.annotation(0, 1)
        );
    }
}

use serde::Serialize;

use super::stats::gaussian_kde;
use crate::data::filter::SeasonView;
use crate::data::model::Season;

pub const HISTOGRAM_BINS: usize = 30;
const KDE_POINTS: usize = 200;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistogramBin {
    pub start: f64,
    pub end: f64,
    pub count: usize,
}

impl HistogramBin {
    pub fn center(&self) -> f64 {
        (self.start + self.end) / 2.0
    }

    pub fn width(&self) -> f64 {
        self.end - self.start
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Histogram {
    pub bins: Vec<HistogramBin>,
    /// Density curve scaled to bin counts, as `[x, y]` points. Empty when
    /// the sample has no spread.
    pub density: Vec<[f64; 2]>,
}

/// Rental-count distribution of the selected season.
#[derive(Debug, Clone, Serialize)]
pub enum Distribution {
    NoData { season: Season },
    Histogram { season: Season, histogram: Histogram },
}

/// Equal-width bins over `[min, max]`; the last bin is closed on the right.
/// A constant sample is spread over `[v - 0.5, v + 0.5]`.
pub fn histogram(values: &[f64], bins: usize) -> Vec<HistogramBin> {
    if values.is_empty() || bins == 0 {
        return Vec::new();
    }
    let mut lo = values.iter().copied().fold(f64::INFINITY, f64::min);
    let mut hi = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if (hi - lo).abs() < f64::EPSILON {
        lo -= 0.5;
        hi += 0.5;
    }
    let width = (hi - lo) / bins as f64;

    let mut counts = vec![0usize; bins];
    for &v in values {
        let idx = (((v - lo) / width) as usize).min(bins - 1);
        counts[idx] += 1;
    }

    counts
        .into_iter()
        .enumerate()
        .map(|(i, count)| HistogramBin {
            start: lo + i as f64 * width,
            end: lo + (i + 1) as f64 * width,
            count,
        })
        .collect()
}

/// Histogram of total rentals over `view` with a density overlay.
pub fn distribution(view: &SeasonView<'_>) -> Distribution {
    if view.is_empty() {
        return Distribution::NoData {
            season: view.season,
        };
    }

    // Rows without a usable count are left out, like NaN in a pandas column.
    let values: Vec<f64> = view.rows.iter().filter_map(|r| r.total).map(f64::from).collect();
    if values.is_empty() {
        return Distribution::NoData {
            season: view.season,
        };
    }
    let bins = histogram(&values, HISTOGRAM_BINS);

    let density = match (bins.first(), bins.last()) {
        (Some(first), Some(last)) => {
            let (lo, hi) = (first.start, last.end);
            let step = (hi - lo) / (KDE_POINTS - 1) as f64;
            let grid: Vec<f64> = (0..KDE_POINTS).map(|i| lo + i as f64 * step).collect();
            // Scale the density to the count axis of the histogram.
            let scale = values.len() as f64 * first.width();
            gaussian_kde(&values, &grid)
                .map(|d| {
                    grid.iter()
                        .zip(d)
                        .map(|(&x, y)| [x, y * scale])
                        .collect()
                })
                .unwrap_or_default()
        }
        _ => Vec::new(),
    };

    Distribution::Histogram {
        season: view.season,
        histogram: Histogram { bins, density },
    }
}

use std::collections::HashSet;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use linfa::traits::{Fit, Predict};
use linfa::DatasetBase;
use linfa_clustering::KMeans;
use linfa_nn::distance::L2Dist;
use ndarray::{Array1, Array2};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;

use crate::data::model::{RecordTable, Season};

pub const SEGMENT_YEAR: i32 = 2012;
pub const SEGMENT_SEASON: Season = Season::Fall;
pub const N_CLUSTERS: usize = 3;
pub const KMEANS_SEED: u64 = 42;
const MAX_ITERATIONS: u64 = 300;
const TOLERANCE: f64 = 1e-4;

// ---------------------------------------------------------------------------
// View types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SegmentPoint {
    pub date: NaiveDate,
    pub casual: u32,
    pub registered: u32,
    pub cluster: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClusterSummary {
    pub cluster: usize,
    pub size: usize,
    pub mean_casual: f64,
    pub mean_registered: f64,
}

/// One `(date, season)` pair of the diagnostic listing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiagnosticRow {
    pub date: NaiveDate,
    pub season: Season,
}

#[derive(Debug, Clone, Serialize)]
pub enum Segmentation {
    /// No row matched the year/season slice. Lists every distinct
    /// `(date, season)` of the year so the mismatch can be inspected.
    Missing {
        year: i32,
        season: Season,
        diagnostics: Vec<DiagnosticRow>,
    },
    Clusters {
        year: i32,
        season: Season,
        points: Vec<SegmentPoint>,
        summaries: Vec<ClusterSummary>,
    },
    /// The clustering call itself failed.
    Failed { message: String },
}

// ---------------------------------------------------------------------------
// K-means
// ---------------------------------------------------------------------------

/// Cluster 2-D points into at most `k` groups with a seeded k-means.
///
/// `k` is capped at the number of distinct points; with a single distinct
/// point every row gets label 0.
pub fn kmeans_labels(features: &[[f64; 2]], k: usize, seed: u64) -> Result<Vec<usize>> {
    let distinct: HashSet<[u64; 2]> = features
        .iter()
        .map(|p| [p[0].to_bits(), p[1].to_bits()])
        .collect();
    let k = k.min(distinct.len());
    if k <= 1 {
        return Ok(vec![0; features.len()]);
    }

    let records = Array2::from_shape_vec(
        (features.len(), 2),
        features.iter().flatten().copied().collect(),
    )
    .context("building feature matrix")?;
    let dataset = DatasetBase::from(records.clone());

    let model = KMeans::params_with(k, StdRng::seed_from_u64(seed), L2Dist)
        .max_n_iterations(MAX_ITERATIONS)
        .tolerance(TOLERANCE)
        .fit(&dataset)
        .context("fitting k-means")?;

    let labels: Array1<usize> = model.predict(&records);
    Ok(labels.to_vec())
}

fn summarize(points: &[SegmentPoint]) -> Vec<ClusterSummary> {
    let n = points.iter().map(|p| p.cluster + 1).max().unwrap_or(0);
    (0..n)
        .filter_map(|cluster| {
            let members: Vec<&SegmentPoint> =
                points.iter().filter(|p| p.cluster == cluster).collect();
            if members.is_empty() {
                return None;
            }
            let size = members.len();
            let mean_of = |f: fn(&SegmentPoint) -> u32| {
                members.iter().map(|p| f64::from(f(p))).sum::<f64>() / size as f64
            };
            Some(ClusterSummary {
                cluster,
                size,
                mean_casual: mean_of(|p| p.casual),
                mean_registered: mean_of(|p| p.registered),
            })
        })
        .collect()
}

/// User segmentation of the `year`/`season` slice over (casual, registered).
pub fn segmentation(table: &RecordTable, year: i32, season: Season) -> Segmentation {
    let slice: Vec<_> = table
        .records
        .iter()
        .filter(|r| r.year() == year && r.season == season)
        .collect();

    if slice.is_empty() {
        log::warn!("No rows for {} {year}; skipping segmentation", season.name());
        let mut seen = HashSet::new();
        let diagnostics = table
            .rows_in_year(year)
            .into_iter()
            .filter(|r| seen.insert((r.date, r.season)))
            .map(|r| DiagnosticRow {
                date: r.date,
                season: r.season,
            })
            .collect();
        return Segmentation::Missing {
            year,
            season,
            diagnostics,
        };
    }

    // Rows missing either count cannot be placed in feature space.
    let complete: Vec<(NaiveDate, u32, u32)> = slice
        .iter()
        .filter_map(|r| Some((r.date, r.casual?, r.registered?)))
        .collect();
    if complete.len() < slice.len() {
        log::debug!(
            "Skipping {} rows with missing counts in segmentation",
            slice.len() - complete.len()
        );
    }

    let features: Vec<[f64; 2]> = complete
        .iter()
        .map(|&(_, casual, registered)| [f64::from(casual), f64::from(registered)])
        .collect();

    let labels = match kmeans_labels(&features, N_CLUSTERS, KMEANS_SEED) {
        Ok(labels) => labels,
        Err(e) => {
            log::error!("Segmentation failed: {e:#}");
            return Segmentation::Failed {
                message: format!("{e:#}"),
            };
        }
    };

    let points: Vec<SegmentPoint> = complete
        .into_iter()
        .zip(labels)
        .map(|((date, casual, registered), cluster)| SegmentPoint {
            date,
            casual,
            registered,
            cluster,
        })
        .collect();

    Segmentation::Clusters {
        year,
        season,
        summaries: summarize(&points),
        points,
    }
}

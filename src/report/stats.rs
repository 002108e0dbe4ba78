//! Small numeric helpers shared by the reporting routines.

use std::f64::consts::PI;

/// Arithmetic mean over the non-NaN values, `NaN` when there are none.
pub fn mean(values: &[f64]) -> f64 {
    let (sum, n) = values
        .iter()
        .filter(|v| !v.is_nan())
        .fold((0.0, 0usize), |(s, n), v| (s + v, n + 1));
    if n == 0 {
        f64::NAN
    } else {
        sum / n as f64
    }
}

/// Sample standard deviation (n - 1 denominator).
pub fn std_dev(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return f64::NAN;
    }
    let m = mean(values);
    let var = values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / (values.len() - 1) as f64;
    var.sqrt()
}

/// Pearson correlation over the pairs where both values are present.
///
/// Returns `NaN` for fewer than two complete pairs or when either side is
/// constant.
pub fn pearson(xs: &[f64], ys: &[f64]) -> f64 {
    let pairs: Vec<(f64, f64)> = xs
        .iter()
        .zip(ys)
        .filter(|(x, y)| !x.is_nan() && !y.is_nan())
        .map(|(&x, &y)| (x, y))
        .collect();
    if pairs.len() < 2 {
        return f64::NAN;
    }
    let n = pairs.len() as f64;
    let mx = pairs.iter().map(|p| p.0).sum::<f64>() / n;
    let my = pairs.iter().map(|p| p.1).sum::<f64>() / n;

    let (mut sxy, mut sxx, mut syy) = (0.0, 0.0, 0.0);
    for (x, y) in &pairs {
        let dx = x - mx;
        let dy = y - my;
        sxy += dx * dy;
        sxx += dx * dx;
        syy += dy * dy;
    }
    if sxx <= 0.0 || syy <= 0.0 {
        return f64::NAN;
    }
    (sxy / (sxx * syy).sqrt()).clamp(-1.0, 1.0)
}

/// Gaussian kernel density estimate with Scott's bandwidth, evaluated on
/// `grid`. `None` when the sample is too small or constant.
pub fn gaussian_kde(samples: &[f64], grid: &[f64]) -> Option<Vec<f64>> {
    let sd = std_dev(samples);
    if !sd.is_finite() || sd <= 0.0 {
        return None;
    }
    let n = samples.len() as f64;
    let bw = sd * n.powf(-0.2);
    let norm = 1.0 / (n * bw * (2.0 * PI).sqrt());
    Some(
        grid.iter()
            .map(|&x| {
                norm * samples
                    .iter()
                    .map(|&xi| (-0.5 * ((x - xi) / bw).powi(2)).exp())
                    .sum::<f64>()
            })
            .collect(),
    )
}

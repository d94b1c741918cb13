//! Equal-width binning and Gaussian kernel density estimation.
//!
//! Binning follows the usual convention: `bins` equal-width intervals over
//! `[min, max]`, each half-open except the last, which also includes `max`.
//! A sample with no spread is centred in `[min - 0.5, max + 0.5]`.

/// Bin edges and counts.
#[derive(Debug, Clone, PartialEq)]
pub struct Binned {
    pub edges: Vec<f64>,
    pub counts: Vec<u64>,
}

impl Binned {
    pub fn bin_width(&self) -> f64 {
        match (self.edges.first(), self.edges.last()) {
            (Some(lo), Some(hi)) if !self.counts.is_empty() => (hi - lo) / self.counts.len() as f64,
            _ => 0.0,
        }
    }
}

/// Bin finite `values` into `bins` intervals. `None` for an empty sample or
/// zero bins.
pub fn bin(values: &[f64], bins: usize) -> Option<Binned> {
    if bins == 0 {
        return None;
    }
    let (min, max) = bounds(values)?;
    let (lo, hi) = if min == max {
        (min - 0.5, max + 0.5)
    } else {
        (min, max)
    };

    let width = (hi - lo) / bins as f64;
    let edges: Vec<f64> = (0..=bins)
        .map(|i| if i == bins { hi } else { lo + width * i as f64 })
        .collect();

    let mut counts = vec![0u64; bins];
    for &v in values.iter().filter(|v| v.is_finite()) {
        let idx = (((v - lo) / width).floor() as usize).min(bins - 1);
        counts[idx] += 1;
    }

    Some(Binned { edges, counts })
}

/// Scott's rule bandwidth: `n^(-1/5) * sd`, with the sample standard
/// deviation. `None` when fewer than two values or no spread.
pub fn scott_bandwidth(values: &[f64]) -> Option<f64> {
    let n = values.len();
    if n < 2 {
        return None;
    }
    let mean = values.iter().sum::<f64>() / n as f64;
    let var = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1) as f64;
    let sd = var.sqrt();
    if !(sd.is_finite() && sd > 0.0) {
        return None;
    }
    Some((n as f64).powf(-0.2) * sd)
}

/// Gaussian KDE evaluated on `points` evenly spaced x positions over
/// `[min, max]` of the sample. Returns `(x, density)` pairs; the density
/// integrates to one.
pub fn gaussian_kde(values: &[f64], points: usize) -> Vec<(f64, f64)> {
    let finite: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    let (Some(h), Some((min, max))) = (scott_bandwidth(&finite), bounds(&finite)) else {
        return Vec::new();
    };
    if points < 2 {
        return Vec::new();
    }

    let n = finite.len() as f64;
    let norm = 1.0 / (n * h * (2.0 * std::f64::consts::PI).sqrt());
    let step = (max - min) / (points - 1) as f64;

    (0..points)
        .map(|i| {
            let x = if i == points - 1 { max } else { min + step * i as f64 };
            let sum: f64 = finite
                .iter()
                .map(|xi| {
                    let z = (x - xi) / h;
                    (-0.5 * z * z).exp()
                })
                .sum();
            (x, sum * norm)
        })
        .collect()
}

fn bounds(values: &[f64]) -> Option<(f64, f64)> {
    values
        .iter()
        .copied()
        .filter(|v| v.is_finite())
        .fold(None, |acc, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
}

//! First-order intensity statistics
//!
//! Statistics of the raw ROI intensity distribution. Entropy and
//! Uniformity operate on the discretized gray-level histogram; everything
//! else uses the raw values.

use crate::preprocessing::Discretized;
use crate::roi::RegionOfInterest;

/// Compute the first-order features of a region.
///
/// Returns (feature name, value) pairs in a fixed order.
pub fn firstorder_features(
    roi: &RegionOfInterest,
    disc: &Discretized,
) -> Vec<(&'static str, f64)> {
    let values = &roi.values;
    let n = values.len() as f64;

    let mut sorted = values.clone();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

    let minimum = sorted[0];
    let maximum = sorted[sorted.len() - 1];
    let p10 = percentile(&sorted, 10.0);
    let p25 = percentile(&sorted, 25.0);
    let p75 = percentile(&sorted, 75.0);
    let p90 = percentile(&sorted, 90.0);
    let median = percentile(&sorted, 50.0);

    let mean = values.iter().sum::<f64>() / n;
    let energy: f64 = values.iter().map(|v| v * v).sum();

    let m2 = central_moment(values, mean, 2);
    let m3 = central_moment(values, mean, 3);
    let m4 = central_moment(values, mean, 4);

    let skewness = if m2 > 1e-12 { m3 / m2.powf(1.5) } else { 0.0 };
    let kurtosis = if m2 > 1e-12 { m4 / (m2 * m2) } else { 0.0 };

    let mad = values.iter().map(|v| (v - mean).abs()).sum::<f64>() / n;

    // Robust MAD: deviation within the 10th..90th percentile subset
    let robust: Vec<f64> = values
        .iter()
        .copied()
        .filter(|v| *v >= p10 && *v <= p90)
        .collect();
    let rmad = if robust.is_empty() {
        0.0
    } else {
        let rmean = robust.iter().sum::<f64>() / robust.len() as f64;
        robust.iter().map(|v| (v - rmean).abs()).sum::<f64>() / robust.len() as f64
    };

    // Histogram-based statistics
    let probabilities = disc.probabilities();
    let entropy = -probabilities
        .iter()
        .filter(|p| **p > 0.0)
        .map(|p| p * p.log2())
        .sum::<f64>();
    let uniformity: f64 = probabilities.iter().map(|p| p * p).sum();

    vec![
        ("10Percentile", p10),
        ("90Percentile", p90),
        ("Energy", energy),
        ("Entropy", entropy),
        ("InterquartileRange", p75 - p25),
        ("Kurtosis", kurtosis),
        ("Maximum", maximum),
        ("MeanAbsoluteDeviation", mad),
        ("Mean", mean),
        ("Median", median),
        ("Minimum", minimum),
        ("Range", maximum - minimum),
        ("RobustMeanAbsoluteDeviation", rmad),
        ("RootMeanSquared", (energy / n).sqrt()),
        ("Skewness", skewness),
        ("TotalEnergy", roi.voxel_volume() * energy),
        ("Uniformity", uniformity),
        ("Variance", m2),
    ]
}

fn central_moment(values: &[f64], mean: f64, order: i32) -> f64 {
    values.iter().map(|v| (v - mean).powi(order)).sum::<f64>() / values.len() as f64
}

/// Percentile over pre-sorted values with linear interpolation between ranks
fn percentile(sorted: &[f64], p: f64) -> f64 {
    if sorted.len() == 1 {
        return sorted[0];
    }
    let rank = p / 100.0 * (sorted.len() - 1) as f64;
    let lo = rank.floor() as usize;
    let hi = (lo + 1).min(sorted.len() - 1);
    let frac = rank - lo as f64;
    sorted[lo] + frac * (sorted[hi] - sorted[lo])
}

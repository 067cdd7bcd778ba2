//! Gray-Level Run-Length Matrix (GLRLM) features
//!
//! A run is a maximal sequence of consecutive masked voxels sharing one
//! gray level along a direction. Runs are counted once per direction over
//! the 13 unique 3D directions and accumulated into one matrix indexed
//! (level, run length).

use super::DIRECTIONS_13;
use crate::preprocessing::Discretized;
use crate::roi::RegionOfInterest;
use rayon::prelude::*;

/// Compute the GLRLM features of a region.
///
/// Returns (feature name, value) pairs in a fixed order.
pub fn glrlm_features(roi: &RegionOfInterest, disc: &Discretized) -> Vec<(&'static str, f64)> {
    let n_levels = disc.n_levels;
    let (nx, ny, nz) = roi.mask.dim();
    let max_run = nx.max(ny).max(nz);

    let matrix = build_glrlm(roi, disc, max_run);

    let total_runs: f64 = matrix.iter().sum();
    let n_voxels = roi.voxel_count() as f64;

    let mut sre = 0.0;
    let mut lre = 0.0;
    let mut lglre = 0.0;
    let mut hglre = 0.0;
    let mut run_entropy = 0.0;
    let mut level_sums = vec![0.0f64; n_levels];
    let mut length_sums = vec![0.0f64; max_run];
    let mut mean_level = 0.0;
    let mut mean_length = 0.0;

    for g in 0..n_levels {
        for l in 0..max_run {
            let r = matrix[g * max_run + l];
            if r <= 0.0 {
                continue;
            }
            let level = (g + 1) as f64;
            let length = (l + 1) as f64;
            let p = r / total_runs;

            sre += r / (length * length);
            lre += r * length * length;
            lglre += r / (level * level);
            hglre += r * level * level;
            run_entropy -= p * p.log2();
            level_sums[g] += r;
            length_sums[l] += r;
            mean_level += p * level;
            mean_length += p * length;
        }
    }

    let mut level_variance = 0.0;
    let mut length_variance = 0.0;
    for g in 0..n_levels {
        for l in 0..max_run {
            let r = matrix[g * max_run + l];
            if r <= 0.0 {
                continue;
            }
            let p = r / total_runs;
            level_variance += p * ((g + 1) as f64 - mean_level).powi(2);
            length_variance += p * ((l + 1) as f64 - mean_length).powi(2);
        }
    }

    let gln: f64 = level_sums.iter().map(|s| s * s).sum::<f64>() / total_runs;
    let rln: f64 = length_sums.iter().map(|s| s * s).sum::<f64>() / total_runs;

    vec![
        ("GrayLevelNonUniformity", gln),
        ("GrayLevelNonUniformityNormalized", gln / total_runs),
        ("GrayLevelVariance", level_variance),
        ("HighGrayLevelRunEmphasis", hglre / total_runs),
        ("LongRunEmphasis", lre / total_runs),
        ("LowGrayLevelRunEmphasis", lglre / total_runs),
        ("RunEntropy", run_entropy),
        ("RunLengthNonUniformity", rln),
        ("RunLengthNonUniformityNormalized", rln / total_runs),
        ("RunPercentage", total_runs / (n_voxels * DIRECTIONS_13.len() as f64)),
        ("RunVariance", length_variance),
        ("ShortRunEmphasis", sre / total_runs),
    ]
}

/// Accumulate run counts over all 13 directions into one matrix
fn build_glrlm(roi: &RegionOfInterest, disc: &Discretized, max_run: usize) -> Vec<f64> {
    let n_levels = disc.n_levels;
    let (nx, ny, nz) = roi.mask.dim();

    let in_bounds = |i: isize, j: isize, k: isize| -> bool {
        i >= 0 && j >= 0 && k >= 0 && (i as usize) < nx && (j as usize) < ny && (k as usize) < nz
    };
    let level_at = |i: isize, j: isize, k: isize| -> Option<u32> {
        if in_bounds(i, j, k) && roi.mask[(i as usize, j as usize, k as usize)] {
            Some(disc.levels[(i as usize, j as usize, k as usize)])
        } else {
            None
        }
    };

    DIRECTIONS_13
        .par_iter()
        .map(|&(di, dj, dk)| {
            let mut matrix = vec![0.0f64; n_levels * max_run];
            for i in 0..nx {
                for j in 0..ny {
                    for k in 0..nz {
                        let (ii, jj, kk) = (i as isize, j as isize, k as isize);
                        let level = match level_at(ii, jj, kk) {
                            Some(level) => level,
                            None => continue,
                        };
                        // Only start counting at the head of a run
                        if level_at(ii - di, jj - dj, kk - dk) == Some(level) {
                            continue;
                        }
                        let mut length = 1usize;
                        let (mut ci, mut cj, mut ck) = (ii + di, jj + dj, kk + dk);
                        while level_at(ci, cj, ck) == Some(level) {
                            length += 1;
                            ci += di;
                            cj += dj;
                            ck += dk;
                        }
                        matrix[(level - 1) as usize * max_run + (length - 1)] += 1.0;
                    }
                }
            }
            matrix
        })
        .reduce(
            || vec![0.0f64; n_levels * max_run],
            |mut acc, m| {
                for (a, v) in acc.iter_mut().zip(m.iter()) {
                    *a += v;
                }
                acc
            },
        )
}

//! Gray-Level Co-occurrence Matrix (GLCM) features
//!
//! Counts co-occurrences of gray levels between voxels one step apart
//! along each of the 13 unique 3D directions, symmetrically. Statistics
//! are derived from the normalized matrix; level indices (1..=N) act as
//! the gray values.

use super::DIRECTIONS_13;
use crate::preprocessing::Discretized;
use crate::roi::RegionOfInterest;
use rayon::prelude::*;

/// Compute the GLCM features of a region.
///
/// Returns (feature name, value) pairs in a fixed order.
pub fn glcm_features(roi: &RegionOfInterest, disc: &Discretized) -> Vec<(&'static str, f64)> {
    let n = disc.n_levels;
    let glcm = build_glcm(roi, disc);

    let total: f64 = glcm.iter().sum();
    let p = |i: usize, j: usize| -> f64 {
        if total > 0.0 {
            glcm[i * n + j] / total
        } else {
            0.0
        }
    };

    // Marginal means and standard deviations over level indices
    let mut mu_x = 0.0;
    let mut mu_y = 0.0;
    for i in 0..n {
        for j in 0..n {
            let pij = p(i, j);
            mu_x += (i + 1) as f64 * pij;
            mu_y += (j + 1) as f64 * pij;
        }
    }
    let mut sig_x = 0.0;
    let mut sig_y = 0.0;
    for i in 0..n {
        for j in 0..n {
            let pij = p(i, j);
            sig_x += ((i + 1) as f64 - mu_x).powi(2) * pij;
            sig_y += ((j + 1) as f64 - mu_y).powi(2) * pij;
        }
    }
    sig_x = sig_x.sqrt();
    sig_y = sig_y.sqrt();

    let mut autocorrelation = 0.0;
    let mut joint_energy = 0.0;
    let mut joint_entropy = 0.0;
    let mut contrast = 0.0;
    let mut idm = 0.0;
    let mut inverse_variance = 0.0;
    let mut diff_hist = vec![0.0f64; n];

    for i in 0..n {
        for j in 0..n {
            let pij = p(i, j);
            if pij <= 0.0 {
                continue;
            }
            let gi = (i + 1) as f64;
            let gj = (j + 1) as f64;
            let diff = gi - gj;

            autocorrelation += gi * gj * pij;
            joint_energy += pij * pij;
            joint_entropy -= pij * pij.log2();
            contrast += diff * diff * pij;
            idm += pij / (1.0 + diff * diff);
            if i != j {
                inverse_variance += pij / (diff * diff);
            }
            diff_hist[i.abs_diff(j)] += pij;
        }
    }

    let correlation = if sig_x > 1e-12 && sig_y > 1e-12 {
        (autocorrelation - mu_x * mu_y) / (sig_x * sig_y)
    } else {
        // Flat region: perfectly correlated by convention
        1.0
    };

    let difference_average: f64 = diff_hist
        .iter()
        .enumerate()
        .map(|(k, &pk)| k as f64 * pk)
        .sum();

    vec![
        ("Autocorrelation", autocorrelation),
        ("Contrast", contrast),
        ("Correlation", correlation),
        ("DifferenceAverage", difference_average),
        ("Idm", idm),
        ("InverseVariance", inverse_variance),
        ("JointEnergy", joint_energy),
        ("JointEntropy", joint_entropy),
    ]
}

/// Accumulate the symmetric co-occurrence matrix over all 13 directions
fn build_glcm(roi: &RegionOfInterest, disc: &Discretized) -> Vec<f64> {
    let n = disc.n_levels;
    let (nx, ny, nz) = roi.mask.dim();

    DIRECTIONS_13
        .par_iter()
        .map(|&(di, dj, dk)| {
            let mut matrix = vec![0.0f64; n * n];
            for i in 0..nx {
                for j in 0..ny {
                    for k in 0..nz {
                        if !roi.mask[(i, j, k)] {
                            continue;
                        }
                        let ni = i as isize + di;
                        let nj = j as isize + dj;
                        let nk = k as isize + dk;
                        if ni < 0
                            || nj < 0
                            || nk < 0
                            || ni as usize >= nx
                            || nj as usize >= ny
                            || nk as usize >= nz
                        {
                            continue;
                        }
                        let (ni, nj, nk) = (ni as usize, nj as usize, nk as usize);
                        if !roi.mask[(ni, nj, nk)] {
                            continue;
                        }
                        let a = (disc.levels[(i, j, k)] - 1) as usize;
                        let b = (disc.levels[(ni, nj, nk)] - 1) as usize;
                        matrix[a * n + b] += 1.0;
                        matrix[b * n + a] += 1.0;
                    }
                }
            }
            matrix
        })
        .reduce(
            || vec![0.0f64; n * n],
            |mut acc, m| {
                for (a, v) in acc.iter_mut().zip(m.iter()) {
                    *a += v;
                }
                acc
            },
        )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::preprocessing::{discretize, Discretization};
    use crate::roi::extract_roi;
    use approx::assert_relative_eq;
    use voxelomics_core::Volume;

    fn roi_from_line(values: &[f64]) -> (RegionOfInterest, Discretized) {
        let n = values.len();
        let mut image: Volume<f64> = Volume::new(n, 1, 1);
        let mut mask: Volume<u32> = Volume::new(n, 1, 1);
        for (i, &v) in values.iter().enumerate() {
            image.set(i, 0, 0, v).unwrap();
            mask.set(i, 0, 0, 1).unwrap();
        }
        let roi = extract_roi(&image, &mask, 1).unwrap();
        let disc = discretize(&roi, Discretization::FixedBinWidth(1.0)).unwrap();
        (roi, disc)
    }

    fn value(features: &[(&'static str, f64)], name: &str) -> f64 {
        features.iter().find(|(n, _)| *n == name).unwrap().1
    }

    #[test]
    fn test_two_voxel_pair() {
        // Two voxels with levels 1 and 2: p(1,2) = p(2,1) = 0.5
        let (roi, disc) = roi_from_line(&[0.0, 1.0]);
        assert_eq!(disc.n_levels, 2);

        let features = glcm_features(&roi, &disc);
        assert_relative_eq!(value(&features, "JointEnergy"), 0.5, epsilon = 1e-12);
        assert_relative_eq!(value(&features, "JointEntropy"), 1.0, epsilon = 1e-12);
        assert_relative_eq!(value(&features, "Contrast"), 1.0, epsilon = 1e-12);
        assert_relative_eq!(value(&features, "Correlation"), -1.0, epsilon = 1e-12);
        assert_relative_eq!(value(&features, "Idm"), 0.5, epsilon = 1e-12);
        assert_relative_eq!(value(&features, "InverseVariance"), 1.0, epsilon = 1e-12);
        assert_relative_eq!(value(&features, "DifferenceAverage"), 1.0, epsilon = 1e-12);
        assert_relative_eq!(value(&features, "Autocorrelation"), 2.0, epsilon = 1e-12);
    }

    #[test]
    fn test_flat_region() {
        let (roi, disc) = roi_from_line(&[5.0, 5.0, 5.0, 5.0]);
        assert_eq!(disc.n_levels, 1);

        let features = glcm_features(&roi, &disc);
        assert_relative_eq!(value(&features, "Contrast"), 0.0, epsilon = 1e-12);
        assert_relative_eq!(value(&features, "JointEnergy"), 1.0, epsilon = 1e-12);
        assert_relative_eq!(value(&features, "JointEntropy"), 0.0, epsilon = 1e-12);
        assert_relative_eq!(value(&features, "Correlation"), 1.0, epsilon = 1e-12);
        assert_relative_eq!(value(&features, "Idm"), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_matrix_is_symmetric() {
        let mut image: Volume<f64> = Volume::new(3, 3, 3);
        let mut mask: Volume<u32> = Volume::new(3, 3, 3);
        for i in 0..3 {
            for j in 0..3 {
                for k in 0..3 {
                    image.set(i, j, k, ((i * 9 + j * 3 + k) % 4) as f64).unwrap();
                    mask.set(i, j, k, 1).unwrap();
                }
            }
        }
        let roi = extract_roi(&image, &mask, 1).unwrap();
        let disc = discretize(&roi, Discretization::FixedBinWidth(1.0)).unwrap();

        let n = disc.n_levels;
        let glcm = build_glcm(&roi, &disc);
        for a in 0..n {
            for b in 0..n {
                assert_eq!(glcm[a * n + b], glcm[b * n + a]);
            }
        }
    }
}

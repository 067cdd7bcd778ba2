//! Gray-level discretization
//!
//! Quantizes ROI intensities into integer gray levels prior to histogram
//! and texture-matrix computation. Bins are anchored at the ROI minimum;
//! levels run from 1 to `n_levels` inside the mask, 0 outside.

use crate::roi::RegionOfInterest;
use ndarray::Array3;
use serde::{Deserialize, Serialize};
use voxelomics_core::{Error, Result};

/// Gray-level binning scheme
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Discretization {
    /// Bins of a fixed intensity width (default width 25.0)
    FixedBinWidth(f64),
    /// A fixed number of equally wide bins over the ROI intensity range
    FixedBinCount(usize),
}

impl Default for Discretization {
    fn default() -> Self {
        Discretization::FixedBinWidth(25.0)
    }
}

impl Discretization {
    /// Validate the scheme parameters
    pub fn validate(&self) -> Result<()> {
        match self {
            Discretization::FixedBinWidth(w) => {
                if !w.is_finite() || *w <= 0.0 {
                    return Err(Error::Configuration(format!(
                        "bin width must be positive, got {}",
                        w
                    )));
                }
                Ok(())
            }
            Discretization::FixedBinCount(n) => {
                if *n < 2 {
                    return Err(Error::Configuration(format!(
                        "bin count must be at least 2, got {}",
                        n
                    )));
                }
                Ok(())
            }
        }
    }
}

/// A discretized region: per-voxel gray levels plus the masked levels in
/// scan order.
#[derive(Debug, Clone)]
pub struct Discretized {
    /// Gray level per voxel (1..=n_levels inside the mask, 0 outside)
    pub levels: Array3<u32>,
    /// Gray levels of masked voxels in the same order as `roi.values`
    pub masked: Vec<u32>,
    /// Number of gray levels
    pub n_levels: usize,
}

impl Discretized {
    /// Per-level probabilities over the masked voxels (indexed level - 1)
    pub fn probabilities(&self) -> Vec<f64> {
        let mut counts = vec![0usize; self.n_levels];
        for &level in &self.masked {
            counts[(level - 1) as usize] += 1;
        }
        let total = self.masked.len() as f64;
        counts.iter().map(|&c| c as f64 / total).collect()
    }
}

/// Discretize ROI intensities into gray levels
pub fn discretize(roi: &RegionOfInterest, scheme: Discretization) -> Result<Discretized> {
    scheme.validate()?;

    let min = roi.values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = roi
        .values
        .iter()
        .copied()
        .fold(f64::NEG_INFINITY, f64::max);
    let range = max - min;

    let (width, n_levels) = match scheme {
        Discretization::FixedBinWidth(w) => {
            let n = (range / w).floor() as usize + 1;
            (w, n)
        }
        Discretization::FixedBinCount(n) => {
            if range <= 0.0 {
                // Flat region: a single level regardless of requested count
                (1.0, 1)
            } else {
                (range / n as f64, n)
            }
        }
    };

    let quantize = |v: f64| -> u32 {
        let level = ((v - min) / width).floor() as usize + 1;
        level.min(n_levels) as u32
    };

    let (nx, ny, nz) = roi.mask.dim();
    let mut levels = Array3::zeros((nx, ny, nz));
    for i in 0..nx {
        for j in 0..ny {
            for k in 0..nz {
                if roi.mask[(i, j, k)] {
                    levels[(i, j, k)] = quantize(roi.image[(i, j, k)]);
                }
            }
        }
    }

    let masked: Vec<u32> = roi.values.iter().map(|&v| quantize(v)).collect();

    Ok(Discretized {
        levels,
        masked,
        n_levels,
    })
}

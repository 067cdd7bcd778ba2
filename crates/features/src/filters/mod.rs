//! Image filters producing derived images for feature computation
//!
//! Each filter maps the cropped ROI image to one or more named derived
//! images; feature names are prefixed with the derived image name
//! (`original_...`, `wavelet-LLH_...`).

mod wavelet;

pub use wavelet::haar_subbands;

use ndarray::Array3;
use serde::{Deserialize, Serialize};
use voxelomics_core::Error;

/// Available image filters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ImageFilter {
    /// The unfiltered image
    Original,
    /// Single-level undecimated 3D Haar decomposition (8 sub-bands)
    Wavelet,
}

impl ImageFilter {
    /// Filter name as used in feature identifiers
    pub fn name(&self) -> &'static str {
        match self {
            ImageFilter::Original => "original",
            ImageFilter::Wavelet => "wavelet",
        }
    }

    /// All supported filters
    pub fn all() -> &'static [ImageFilter] {
        &[ImageFilter::Original, ImageFilter::Wavelet]
    }

    /// Produce the named derived images for this filter
    pub fn derived_images(&self, image: &Array3<f64>) -> Vec<(String, Array3<f64>)> {
        match self {
            ImageFilter::Original => vec![("original".to_string(), image.clone())],
            ImageFilter::Wavelet => haar_subbands(image)
                .into_iter()
                .map(|(band, array)| (format!("wavelet-{}", band), array))
                .collect(),
        }
    }
}

impl std::str::FromStr for ImageFilter {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "original" => Ok(ImageFilter::Original),
            "wavelet" => Ok(ImageFilter::Wavelet),
            other => Err(Error::Configuration(format!(
                "unknown image filter: {} (expected original or wavelet)",
                other
            ))),
        }
    }
}

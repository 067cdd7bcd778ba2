//! # Voxelomics Features
//!
//! Radiomic feature computation for voxelomics.
//!
//! Given an image [`Volume`](voxelomics_core::Volume) and a co-registered
//! label mask, [`FeatureExtractor`] computes named quantitative features
//! over the masked region:
//!
//! - **firstorder**: intensity statistics (mean, percentiles, entropy, ...)
//! - **shape**: 3D shape descriptors (volume, surface area, sphericity, ...)
//! - **glcm**: Gray-Level Co-occurrence Matrix statistics
//! - **glrlm**: Gray-Level Run-Length Matrix statistics
//!
//! ## Quick Start
//!
//! ```
//! use voxelomics_core::Volume;
//! use voxelomics_features::FeatureExtractor;
//!
//! let image: Volume<f64> = Volume::filled(10, 10, 10, 100.0);
//! let mut mask: Volume<u32> = Volume::new(10, 10, 10);
//! mask.set(5, 5, 5, 1)?;
//!
//! let extractor = FeatureExtractor::with_defaults();
//! let features = extractor.execute(&image, &mask)?;
//!
//! for (name, value) in &features {
//!     println!("{}: {}", name, value);
//! }
//! # Ok::<(), voxelomics_core::Error>(())
//! ```

pub mod extractor;
pub mod filters;
pub mod firstorder;
pub mod preprocessing;
pub mod result;
pub mod roi;
pub mod shape;
pub mod texture;

pub use extractor::{ExtractionConfig, FeatureClass, FeatureExtractor};
pub use filters::ImageFilter;
pub use result::{FeatureMap, FeatureValue};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::extractor::{ExtractionConfig, FeatureClass, FeatureExtractor};
    pub use crate::filters::ImageFilter;
    pub use crate::preprocessing::Discretization;
    pub use crate::result::{FeatureMap, FeatureValue};
    pub use voxelomics_core::prelude::*;
}

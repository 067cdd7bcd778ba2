//! Image preprocessing applied before feature computation
//!
//! - **normalize**: whole-image z-score normalization
//! - **resample**: grid resampling to a target spacing
//! - **discretize**: gray-level binning for histogram/texture features

mod discretize;
mod normalize;
mod resample;

pub use discretize::{discretize, Discretization, Discretized};
pub use normalize::normalize;
pub use resample::{resample_image, resample_mask};

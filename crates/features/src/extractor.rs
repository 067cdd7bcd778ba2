//! Feature extraction pipeline
//!
//! Validates the image/mask pair, applies preprocessing and image
//! filters, runs the enabled feature classes over the ROI and assembles
//! the named results.

use crate::filters::ImageFilter;
use crate::firstorder::firstorder_features;
use crate::preprocessing::{
    discretize, normalize, resample_image, resample_mask, Discretization,
};
use crate::result::FeatureMap;
use crate::roi::extract_roi;
use crate::shape::shape_features;
use crate::texture::{glcm_features, glrlm_features};
use serde::{Deserialize, Serialize};
use voxelomics_core::{Error, Result, Volume};

/// Radiomic feature classes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FeatureClass {
    /// First-order intensity statistics
    FirstOrder,
    /// 3D shape descriptors
    Shape,
    /// Gray-Level Co-occurrence Matrix statistics
    Glcm,
    /// Gray-Level Run-Length Matrix statistics
    Glrlm,
}

impl FeatureClass {
    /// Class name as used in feature identifiers
    pub fn name(&self) -> &'static str {
        match self {
            FeatureClass::FirstOrder => "firstorder",
            FeatureClass::Shape => "shape",
            FeatureClass::Glcm => "glcm",
            FeatureClass::Glrlm => "glrlm",
        }
    }

    /// All supported classes
    pub fn all() -> &'static [FeatureClass] {
        &[
            FeatureClass::FirstOrder,
            FeatureClass::Shape,
            FeatureClass::Glcm,
            FeatureClass::Glrlm,
        ]
    }
}

impl std::str::FromStr for FeatureClass {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "firstorder" => Ok(FeatureClass::FirstOrder),
            "shape" => Ok(FeatureClass::Shape),
            "glcm" => Ok(FeatureClass::Glcm),
            "glrlm" => Ok(FeatureClass::Glrlm),
            other => Err(Error::Configuration(format!(
                "unknown feature class: {} (expected firstorder, shape, glcm or glrlm)",
                other
            ))),
        }
    }
}

/// Parameters controlling an extraction
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionConfig {
    /// Feature classes to compute
    pub classes: Vec<FeatureClass>,
    /// Image filters to apply (intensity and texture classes run once per
    /// derived image)
    pub filters: Vec<ImageFilter>,
    /// Mask label marking the region of interest
    pub label: u32,
    /// Gray-level binning for histogram and texture features
    pub discretization: Discretization,
    /// Whether to z-score normalize intensities before extraction
    pub normalize: bool,
    /// Scale applied after normalization
    pub normalize_scale: f64,
    /// Resample both volumes to this spacing before extraction
    pub resample_spacing: Option<[f64; 3]>,
    /// Tolerance for the image/mask geometry consistency check
    pub geometry_tolerance: f64,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            classes: FeatureClass::all().to_vec(),
            filters: vec![ImageFilter::Original],
            label: 1,
            discretization: Discretization::default(),
            normalize: false,
            normalize_scale: 1.0,
            resample_spacing: None,
            geometry_tolerance: 1e-6,
        }
    }
}

impl ExtractionConfig {
    /// Validate the configuration, returning an error for invalid settings
    pub fn validate(&self) -> Result<()> {
        if self.classes.is_empty() {
            return Err(Error::Configuration(
                "at least one feature class must be enabled".to_string(),
            ));
        }
        if self.filters.is_empty() {
            return Err(Error::Configuration(
                "at least one image filter must be enabled".to_string(),
            ));
        }
        if self.label == 0 {
            return Err(Error::Configuration(
                "label 0 denotes background and cannot be extracted".to_string(),
            ));
        }
        if !self.geometry_tolerance.is_finite() || self.geometry_tolerance <= 0.0 {
            return Err(Error::Configuration(format!(
                "geometry tolerance must be positive, got {}",
                self.geometry_tolerance
            )));
        }
        self.discretization.validate()?;
        Ok(())
    }

    fn discretization_text(&self) -> String {
        match self.discretization {
            Discretization::FixedBinWidth(w) => format!("fixed bin width {}", w),
            Discretization::FixedBinCount(n) => format!("fixed bin count {}", n),
        }
    }
}

/// Computes radiomic features for one image/mask pair.
///
/// Pure function of its inputs: repeated execution over the same volumes
/// and configuration yields an identical [`FeatureMap`].
#[derive(Debug, Clone)]
pub struct FeatureExtractor {
    config: ExtractionConfig,
}

impl FeatureExtractor {
    /// Create an extractor, validating the configuration
    pub fn new(config: ExtractionConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Create an extractor with default parameters
    pub fn with_defaults() -> Self {
        Self {
            config: ExtractionConfig::default(),
        }
    }

    /// The active configuration
    pub fn config(&self) -> &ExtractionConfig {
        &self.config
    }

    /// Run the extraction over an image and its ROI mask
    pub fn execute(&self, image: &Volume<f64>, mask: &Volume<u32>) -> Result<FeatureMap> {
        self.check_geometry(image, mask)?;

        // Preprocessing
        let normalized;
        let image = if self.config.normalize {
            normalized = normalize(image, self.config.normalize_scale)?;
            &normalized
        } else {
            image
        };

        let resampled;
        let (image, mask) = if let Some(spacing) = self.config.resample_spacing {
            resampled = (
                resample_image(image, spacing)?,
                resample_mask(mask, spacing)?,
            );
            (&resampled.0, &resampled.1)
        } else {
            (image, mask)
        };

        let roi = extract_roi(image, mask, self.config.label)?;

        let mut map = FeatureMap::new();

        // Diagnostics mirror the input metadata ahead of computed features
        let (nx, ny, nz) = image.dims();
        let spacing = image.spacing();
        map.push_text(
            "diagnostics_Versions_Voxelomics",
            env!("CARGO_PKG_VERSION"),
        );
        map.push_text(
            "diagnostics_Image-original_Size",
            format!("({}, {}, {})", nx, ny, nz),
        );
        map.push_text(
            "diagnostics_Image-original_Spacing",
            format!("({}, {}, {})", spacing[0], spacing[1], spacing[2]),
        );
        map.push_number("diagnostics_Mask-original_VoxelNum", roi.voxel_count() as f64);
        map.push_text(
            "diagnostics_Mask-original_BoundingBox",
            format!(
                "({}, {}, {}) to ({}, {}, {})",
                roi.bbox.min[0],
                roi.bbox.min[1],
                roi.bbox.min[2],
                roi.bbox.max[0],
                roi.bbox.max[1],
                roi.bbox.max[2]
            ),
        );
        map.push_number("diagnostics_Configuration_Label", self.config.label as f64);
        map.push_text(
            "diagnostics_Configuration_Discretization",
            self.config.discretization_text(),
        );

        // Shape is geometry-only: computed once, independent of filters
        if self.config.classes.contains(&FeatureClass::Shape) {
            for (name, value) in shape_features(&roi) {
                map.push_number(format!("original_shape_{}", name), value);
            }
        }

        // Intensity and texture classes run per derived image
        for filter in &self.config.filters {
            for (image_name, derived) in filter.derived_images(&roi.image) {
                let derived_roi = roi.with_image(derived)?;
                let disc = discretize(&derived_roi, self.config.discretization)?;

                for class in &self.config.classes {
                    let features = match class {
                        FeatureClass::Shape => continue,
                        FeatureClass::FirstOrder => firstorder_features(&derived_roi, &disc),
                        FeatureClass::Glcm => glcm_features(&derived_roi, &disc),
                        FeatureClass::Glrlm => glrlm_features(&derived_roi, &disc),
                    };
                    for (name, value) in features {
                        map.push_number(
                            format!("{}_{}_{}", image_name, class.name(), name),
                            value,
                        );
                    }
                }
            }
        }

        Ok(map)
    }

    fn check_geometry(&self, image: &Volume<f64>, mask: &Volume<u32>) -> Result<()> {
        if image.dims() != mask.dims() {
            let (inx, iny, inz) = image.dims();
            let (mnx, mny, mnz) = mask.dims();
            return Err(Error::GeometryMismatch(format!(
                "image is {}x{}x{}, mask is {}x{}x{}",
                inx, iny, inz, mnx, mny, mnz
            )));
        }
        if !image
            .geometry()
            .approx_eq(mask.geometry(), self.config.geometry_tolerance)
        {
            return Err(Error::GeometryMismatch(format!(
                "spacing, origin or direction differ beyond tolerance {}",
                self.config.geometry_tolerance
            )));
        }
        Ok(())
    }
}

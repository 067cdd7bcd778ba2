//! Region-of-interest extraction
//!
//! Crops the image and mask to the bounding box of the labeled region and
//! collects the masked intensity values that the feature classes operate on.

use ndarray::Array3;
use voxelomics_core::{Error, Geometry, Result, Volume};

/// Inclusive voxel-index bounding box of a labeled region
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundingBox {
    pub min: [usize; 3],
    pub max: [usize; 3],
}

impl BoundingBox {
    /// Dimensions of the box as (nx, ny, nz)
    pub fn dims(&self) -> (usize, usize, usize) {
        (
            self.max[0] - self.min[0] + 1,
            self.max[1] - self.min[1] + 1,
            self.max[2] - self.min[2] + 1,
        )
    }
}

/// The labeled region of an image: cropped intensities, cropped boolean
/// mask, and the masked values in scan order.
#[derive(Debug, Clone)]
pub struct RegionOfInterest {
    /// Image intensities cropped to the bounding box
    pub image: Array3<f64>,
    /// Membership mask cropped to the bounding box
    pub mask: Array3<bool>,
    /// Intensities of masked voxels in (i, j, k) scan order
    pub values: Vec<f64>,
    /// Bounding box in source volume indices
    pub bbox: BoundingBox,
    /// Geometry of the source image
    pub geometry: Geometry,
}

impl RegionOfInterest {
    /// Number of voxels in the region
    pub fn voxel_count(&self) -> usize {
        self.values.len()
    }

    /// Voxel spacing in mm
    pub fn spacing(&self) -> [f64; 3] {
        self.geometry.spacing
    }

    /// Physical volume of one voxel in mm^3
    pub fn voxel_volume(&self) -> f64 {
        self.geometry.voxel_volume()
    }

    /// The same region over a different (filtered) image of identical
    /// cropped dimensions. Masked values are re-collected.
    pub fn with_image(&self, image: Array3<f64>) -> Result<RegionOfInterest> {
        if image.dim() != self.mask.dim() {
            let (nx, ny, nz) = image.dim();
            return Err(Error::InvalidDimensions { nx, ny, nz });
        }
        let values = collect_masked(&image, &self.mask);
        Ok(RegionOfInterest {
            image,
            mask: self.mask.clone(),
            values,
            bbox: self.bbox,
            geometry: self.geometry,
        })
    }
}

fn collect_masked(image: &Array3<f64>, mask: &Array3<bool>) -> Vec<f64> {
    let (nx, ny, nz) = mask.dim();
    let mut values = Vec::new();
    for i in 0..nx {
        for j in 0..ny {
            for k in 0..nz {
                if mask[(i, j, k)] {
                    values.push(image[(i, j, k)]);
                }
            }
        }
    }
    values
}

/// Extract the region labeled `label` from the mask.
///
/// # Errors
/// `InvalidMask` when no voxel carries the label.
pub fn extract_roi(
    image: &Volume<f64>,
    mask: &Volume<u32>,
    label: u32,
) -> Result<RegionOfInterest> {
    let dims = image.dims();
    if dims != mask.dims() {
        let (inx, iny, inz) = dims;
        let (mnx, mny, mnz) = mask.dims();
        return Err(Error::GeometryMismatch(format!(
            "image is {}x{}x{}, mask is {}x{}x{}",
            inx, iny, inz, mnx, mny, mnz
        )));
    }

    let (nx, ny, nz) = dims;
    let mut min = [usize::MAX; 3];
    let mut max = [0usize; 3];
    let mut count = 0usize;

    for i in 0..nx {
        for j in 0..ny {
            for k in 0..nz {
                if unsafe { mask.get_unchecked(i, j, k) } == label {
                    let idx = [i, j, k];
                    for a in 0..3 {
                        if idx[a] < min[a] {
                            min[a] = idx[a];
                        }
                        if idx[a] > max[a] {
                            max[a] = idx[a];
                        }
                    }
                    count += 1;
                }
            }
        }
    }

    if count == 0 {
        return Err(Error::InvalidMask(format!(
            "mask contains no voxels with label {}",
            label
        )));
    }

    let bbox = BoundingBox { min, max };
    let (bx, by, bz) = bbox.dims();

    let mut cropped_image = Array3::zeros((bx, by, bz));
    let mut cropped_mask = Array3::from_elem((bx, by, bz), false);
    for i in 0..bx {
        for j in 0..by {
            for k in 0..bz {
                let (si, sj, sk) = (min[0] + i, min[1] + j, min[2] + k);
                cropped_image[(i, j, k)] = unsafe { image.get_unchecked(si, sj, sk) };
                cropped_mask[(i, j, k)] = unsafe { mask.get_unchecked(si, sj, sk) } == label;
            }
        }
    }

    let values = collect_masked(&cropped_image, &cropped_mask);

    Ok(RegionOfInterest {
        image: cropped_image,
        mask: cropped_mask,
        values,
        bbox,
        geometry: *image.geometry(),
    })
}

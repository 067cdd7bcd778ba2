//! Main Volume type

use crate::error::{Error, Result};
use crate::volume::{Geometry, VoxelElement};
use ndarray::{Array3, ArrayView3, ArrayViewMut3};

/// A volumetric grid of voxels with spatial metadata.
///
/// `Volume<T>` stores values of type `T` in a 3D grid indexed `(i, j, k)`
/// along the (x, y, z) axes, together with a [`Geometry`] describing
/// origin, spacing and orientation.
///
/// # Type Parameters
///
/// - `T`: The voxel value type, must implement [`VoxelElement`]
///
/// # Example
///
/// ```
/// use voxelomics_core::Volume;
///
/// let mut volume: Volume<f64> = Volume::new(64, 64, 32);
/// volume.set(10, 20, 5, 42.0).unwrap();
/// assert_eq!(volume.get(10, 20, 5).unwrap(), 42.0);
/// ```
#[derive(Debug, Clone)]
pub struct Volume<T: VoxelElement> {
    /// Voxel data indexed (i, j, k)
    data: Array3<T>,
    /// Spatial metadata
    geometry: Geometry,
    /// No-data value
    nodata: Option<T>,
}

impl<T: VoxelElement> Volume<T> {
    /// Create a new volume filled with zeros
    pub fn new(nx: usize, ny: usize, nz: usize) -> Self {
        Self {
            data: Array3::zeros((nx, ny, nz)),
            geometry: Geometry::default(),
            nodata: None,
        }
    }

    /// Create a new volume filled with a specific value
    pub fn filled(nx: usize, ny: usize, nz: usize, value: T) -> Self {
        Self {
            data: Array3::from_elem((nx, ny, nz), value),
            geometry: Geometry::default(),
            nodata: None,
        }
    }

    /// Create a volume from existing data in (i, j, k) order
    pub fn from_vec(data: Vec<T>, nx: usize, ny: usize, nz: usize) -> Result<Self> {
        if data.len() != nx * ny * nz {
            return Err(Error::InvalidDimensions { nx, ny, nz });
        }

        let array = Array3::from_shape_vec((nx, ny, nz), data)
            .map_err(|e| Error::Other(e.to_string()))?;

        Ok(Self {
            data: array,
            geometry: Geometry::default(),
            nodata: None,
        })
    }

    /// Create a volume from an ndarray
    pub fn from_array(data: Array3<T>) -> Self {
        Self {
            data,
            geometry: Geometry::default(),
            nodata: None,
        }
    }

    /// Create a volume with the same geometry but a different element type
    pub fn with_same_meta<U: VoxelElement>(&self, nx: usize, ny: usize, nz: usize) -> Volume<U> {
        Volume {
            data: Array3::zeros((nx, ny, nz)),
            geometry: self.geometry,
            nodata: None,
        }
    }

    /// Create a volume with the same dimensions and geometry, filled with a value
    pub fn like(&self, fill_value: T) -> Self {
        Self {
            data: Array3::from_elem(self.data.dim(), fill_value),
            geometry: self.geometry,
            nodata: self.nodata,
        }
    }

    // Dimensions

    /// Dimensions as (nx, ny, nz)
    pub fn dims(&self) -> (usize, usize, usize) {
        self.data.dim()
    }

    /// Total number of voxels
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the volume is empty
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    // Data access

    /// Get value at (i, j, k)
    pub fn get(&self, i: usize, j: usize, k: usize) -> Result<T> {
        let (nx, ny, nz) = self.dims();
        self.data
            .get((i, j, k))
            .copied()
            .ok_or(Error::IndexOutOfBounds {
                i,
                j,
                k,
                nx,
                ny,
                nz,
            })
    }

    /// Get value at (i, j, k) without bounds checking
    ///
    /// # Safety
    /// Caller must ensure the indices are within `self.dims()`
    pub unsafe fn get_unchecked(&self, i: usize, j: usize, k: usize) -> T {
        unsafe { *self.data.uget((i, j, k)) }
    }

    /// Set value at (i, j, k)
    pub fn set(&mut self, i: usize, j: usize, k: usize, value: T) -> Result<()> {
        let (nx, ny, nz) = self.dims();
        if i >= nx || j >= ny || k >= nz {
            return Err(Error::IndexOutOfBounds {
                i,
                j,
                k,
                nx,
                ny,
                nz,
            });
        }
        self.data[(i, j, k)] = value;
        Ok(())
    }

    /// Get a view of the underlying data
    pub fn view(&self) -> ArrayView3<'_, T> {
        self.data.view()
    }

    /// Get a mutable view of the underlying data
    pub fn view_mut(&mut self) -> ArrayViewMut3<'_, T> {
        self.data.view_mut()
    }

    /// Get a reference to the underlying array
    pub fn data(&self) -> &Array3<T> {
        &self.data
    }

    /// Get a mutable reference to the underlying array
    pub fn data_mut(&mut self) -> &mut Array3<T> {
        &mut self.data
    }

    /// Consume the volume and return the underlying array
    pub fn into_array(self) -> Array3<T> {
        self.data
    }

    // Metadata

    /// Get the geometry
    pub fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    /// Set the geometry
    pub fn set_geometry(&mut self, geometry: Geometry) {
        self.geometry = geometry;
    }

    /// Get the no-data value
    pub fn nodata(&self) -> Option<T> {
        self.nodata
    }

    /// Set the no-data value
    pub fn set_nodata(&mut self, nodata: Option<T>) {
        self.nodata = nodata;
    }

    /// Voxel spacing in mm
    pub fn spacing(&self) -> [f64; 3] {
        self.geometry.spacing
    }

    /// Physical volume of one voxel in mm^3
    pub fn voxel_volume(&self) -> f64 {
        self.geometry.voxel_volume()
    }

    /// World coordinates of the center of voxel (i, j, k)
    pub fn voxel_to_world(&self, i: usize, j: usize, k: usize) -> [f64; 3] {
        self.geometry.voxel_to_world(i, j, k)
    }

    /// Fractional voxel indices of a world coordinate
    pub fn world_to_voxel(&self, x: f64, y: f64, z: f64) -> [f64; 3] {
        self.geometry.world_to_voxel(x, y, z)
    }

    // Value checks

    /// Check if a value is no-data
    pub fn is_nodata(&self, value: T) -> bool {
        value.is_nodata(self.nodata)
    }

    // Statistics

    /// Calculate basic statistics (min, max, mean, count of valid voxels)
    pub fn statistics(&self) -> VolumeStatistics<T> {
        let mut min = None;
        let mut max = None;
        let mut sum: f64 = 0.0;
        let mut count: usize = 0;

        for &value in self.data.iter() {
            if self.is_nodata(value) {
                continue;
            }

            if min.is_none() || value < min.unwrap() {
                min = Some(value);
            }
            if max.is_none() || value > max.unwrap() {
                max = Some(value);
            }

            if let Some(v) = value.to_f64() {
                sum += v;
                count += 1;
            }
        }

        let mean = if count > 0 {
            Some(sum / count as f64)
        } else {
            None
        };

        VolumeStatistics {
            min,
            max,
            mean,
            valid_count: count,
            nodata_count: self.len() - count,
        }
    }
}

/// Basic statistics for a volume
#[derive(Debug, Clone)]
pub struct VolumeStatistics<T> {
    pub min: Option<T>,
    pub max: Option<T>,
    pub mean: Option<f64>,
    pub valid_count: usize,
    pub nodata_count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_volume_creation() {
        let volume: Volume<f64> = Volume::new(10, 20, 30);
        assert_eq!(volume.dims(), (10, 20, 30));
        assert_eq!(volume.len(), 6000);
    }

    #[test]
    fn test_volume_access() {
        let mut volume: Volume<f64> = Volume::new(5, 5, 5);
        volume.set(1, 2, 3, 42.0).unwrap();
        assert_eq!(volume.get(1, 2, 3).unwrap(), 42.0);
        assert!(volume.get(5, 0, 0).is_err());
        assert!(volume.set(0, 0, 5, 1.0).is_err());
    }

    #[test]
    fn test_from_vec_dimension_check() {
        let result: Result<Volume<u32>> = Volume::from_vec(vec![0; 7], 2, 2, 2);
        assert!(result.is_err());
    }

    #[test]
    fn test_volume_statistics() {
        let mut volume: Volume<f64> = Volume::new(4, 4, 4);
        for i in 0..4 {
            for j in 0..4 {
                for k in 0..4 {
                    volume.set(i, j, k, (i + j + k) as f64).unwrap();
                }
            }
        }
        volume.set(0, 0, 0, f64::NAN).unwrap();

        let stats = volume.statistics();
        assert_eq!(stats.valid_count, 63);
        assert_eq!(stats.nodata_count, 1);
        assert_eq!(stats.max, Some(9.0));
        assert_eq!(stats.min, Some(1.0));
    }

    #[test]
    fn test_voxel_volume_from_geometry() {
        let mut volume: Volume<f64> = Volume::new(2, 2, 2);
        volume.set_geometry(Geometry::new([0.0; 3], [2.0, 2.0, 2.5]));
        assert!((volume.voxel_volume() - 10.0).abs() < 1e-12);
    }
}

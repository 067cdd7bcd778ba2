//! NIfTI reading
//!
//! Uses the `nifti` crate to decode `.nii` / `.nii.gz` files into a
//! [`Volume`]. Spatial metadata is taken from the sform matrix when
//! present, falling back to pixdim spacing with an identity orientation.

use crate::error::{Error, Result};
use crate::volume::{Geometry, Volume, VoxelElement};
use ndarray::{Array3, ArrayD, Axis, Ix3};
use nifti::{IntoNdArray, NiftiHeader, NiftiObject, ReaderOptions};
use std::fs::File;
use std::path::Path;

/// Read a NIfTI file into a Volume
///
/// Scaled voxel values (`scl_slope` / `scl_inter`) are applied by the
/// decoder; values are then cast to `T`. Trailing singleton dimensions
/// (e.g. a 4D file with one time point) are collapsed.
pub fn read_nifti<T, P>(path: P) -> Result<Volume<T>>
where
    T: VoxelElement,
    P: AsRef<Path>,
{
    // Access check first so a missing path reports as an I/O error
    // rather than a decode failure.
    File::open(path.as_ref())?;

    let obj = ReaderOptions::new()
        .read_file(path.as_ref())
        .map_err(|e| Error::Format(format!("NIfTI decode error: {}", e)))?;

    let header = obj.header().clone();

    let data = obj
        .into_volume()
        .into_ndarray::<f64>()
        .map_err(|e| Error::Format(format!("Cannot read NIfTI voxel data: {}", e)))?;

    let array = collapse_to_3d(data)?;
    let (nx, ny, nz) = array.dim();

    let mut voxels: Array3<T> = Array3::zeros((nx, ny, nz));
    for (out, &v) in voxels.iter_mut().zip(array.iter()) {
        *out = T::from_f64(v).unwrap_or_else(T::default_nodata);
    }

    let mut volume = Volume::from_array(voxels);
    volume.set_geometry(geometry_from_header(&header));
    Ok(volume)
}

/// Collapse trailing singleton axes and check the result is 3D
fn collapse_to_3d(mut data: ArrayD<f64>) -> Result<ndarray::Array<f64, Ix3>> {
    while data.ndim() > 3 && data.shape()[data.ndim() - 1] == 1 {
        let axis = Axis(data.ndim() - 1);
        data = data.index_axis_move(axis, 0);
    }
    if data.ndim() == 2 {
        data = data.insert_axis(Axis(2));
    }
    if data.ndim() != 3 {
        return Err(Error::Format(format!(
            "Expected a 3D volume, got {} dimensions",
            data.ndim()
        )));
    }
    data.into_dimensionality::<Ix3>()
        .map_err(|e| Error::Other(e.to_string()))
}

/// Derive the spatial geometry from a NIfTI header.
///
/// When `sform_code > 0` the srow matrix defines spacing, orientation and
/// origin. Otherwise pixdim supplies the spacing, the orientation is
/// identity and the qoffset fields (if qform is set) supply the origin.
fn geometry_from_header(header: &NiftiHeader) -> Geometry {
    if header.sform_code > 0 {
        let rows = [header.srow_x, header.srow_y, header.srow_z];

        let mut spacing = [0.0f64; 3];
        for (c, s) in spacing.iter_mut().enumerate() {
            let col = [rows[0][c] as f64, rows[1][c] as f64, rows[2][c] as f64];
            *s = (col[0] * col[0] + col[1] * col[1] + col[2] * col[2]).sqrt();
        }

        if spacing.iter().all(|s| *s > 0.0) {
            let mut direction = [[0.0f64; 3]; 3];
            for (r, row) in rows.iter().enumerate() {
                for c in 0..3 {
                    direction[r][c] = row[c] as f64 / spacing[c];
                }
            }
            let origin = [rows[0][3] as f64, rows[1][3] as f64, rows[2][3] as f64];
            return Geometry::with_direction(origin, spacing, direction);
        }
    }

    let mut spacing = [1.0f64; 3];
    for (c, s) in spacing.iter_mut().enumerate() {
        let pd = header.pixdim[c + 1].abs() as f64;
        if pd > 0.0 {
            *s = pd;
        }
    }

    let origin = if header.qform_code > 0 {
        [
            header.quatern_x as f64,
            header.quatern_y as f64,
            header.quatern_z as f64,
        ]
    } else {
        [0.0; 3]
    };

    Geometry::new(origin, spacing)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_missing_path_is_io_error() {
        let result: Result<Volume<f64>> = read_nifti("/no/such/volume.nii");
        assert!(matches!(result, Err(Error::Io(_))));
    }

    #[test]
    fn test_garbage_file_is_format_error() {
        let mut tmp = tempfile::NamedTempFile::with_suffix(".nii").unwrap();
        tmp.write_all(b"definitely not a nifti header").unwrap();

        let result: Result<Volume<f64>> = read_nifti(tmp.path());
        assert!(matches!(result, Err(Error::Format(_))));
    }

    #[test]
    fn test_geometry_from_sform() {
        let header = NiftiHeader {
            sform_code: 1,
            srow_x: [2.0, 0.0, 0.0, 10.0],
            srow_y: [0.0, 2.0, 0.0, 20.0],
            srow_z: [0.0, 0.0, 5.0, 30.0],
            ..NiftiHeader::default()
        };
        let geom = geometry_from_header(&header);
        assert_eq!(geom.spacing, [2.0, 2.0, 5.0]);
        assert_eq!(geom.origin, [10.0, 20.0, 30.0]);
        assert!(geom.is_axis_aligned());
    }

    #[test]
    fn test_geometry_from_pixdim_fallback() {
        let header = NiftiHeader {
            sform_code: 0,
            qform_code: 0,
            pixdim: [1.0, 0.5, 0.5, 2.0, 0.0, 0.0, 0.0, 0.0],
            ..NiftiHeader::default()
        };
        let geom = geometry_from_header(&header);
        assert_eq!(geom.spacing, [0.5, 0.5, 2.0]);
        assert_eq!(geom.origin, [0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_collapse_trailing_singleton() {
        let data = ArrayD::<f64>::zeros(ndarray::IxDyn(&[4, 4, 4, 1]));
        let array = collapse_to_3d(data).unwrap();
        assert_eq!(array.dim(), (4, 4, 4));
    }
}

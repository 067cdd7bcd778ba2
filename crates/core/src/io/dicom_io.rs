//! DICOM reading (requires the `dicom` feature)
//!
//! Decodes a single DICOM file (single- or multi-frame) into a [`Volume`]
//! using the dicom-rs ecosystem. Modality LUT handling is delegated to
//! `dicom-pixeldata`. Spatial metadata comes from PixelSpacing,
//! SpacingBetweenSlices / SliceThickness, ImagePositionPatient and
//! ImageOrientationPatient.

use crate::error::{Error, Result};
use crate::volume::{Geometry, Volume, VoxelElement};
use dicom_dictionary_std::tags;
use dicom_object::{open_file, DefaultDicomObject};
use dicom_pixeldata::PixelDecoder;
use ndarray::{Array3, ArrayD, Axis};
use std::fs::File;
use std::path::Path;

/// Read a DICOM file into a Volume
///
/// Frames become the k axis; columns and rows become the i and j axes.
pub fn read_dicom<T, P>(path: P) -> Result<Volume<T>>
where
    T: VoxelElement,
    P: AsRef<Path>,
{
    // Access check first so a missing path reports as an I/O error.
    File::open(path.as_ref())?;

    let obj = open_file(path.as_ref())
        .map_err(|e| Error::Format(format!("DICOM decode error: {}", e)))?;

    let decoded = obj
        .decode_pixel_data()
        .map_err(|e| Error::Format(format!("Cannot decode DICOM pixel data: {}", e)))?;

    let data = decoded
        .to_ndarray::<f64>()
        .map_err(|e| Error::Format(format!("Cannot read DICOM voxel data: {}", e)))?;

    let frames = frames_to_volume(data)?;
    let (nx, ny, nz) = frames.dim();

    let mut voxels: Array3<T> = Array3::zeros((nx, ny, nz));
    for (out, &v) in voxels.iter_mut().zip(frames.iter()) {
        *out = T::from_f64(v).unwrap_or_else(T::default_nodata);
    }

    let mut volume = Volume::from_array(voxels);
    volume.set_geometry(geometry_from_object(&obj));
    Ok(volume)
}

/// Rearrange decoded pixel data into (i, j, k) = (column, row, frame) order.
///
/// `dicom-pixeldata` yields `[frames, rows, columns, samples]`; only
/// single-sample (grayscale) data is supported.
fn frames_to_volume(data: ArrayD<f64>) -> Result<Array3<f64>> {
    let data = match data.ndim() {
        4 => {
            if data.shape()[3] != 1 {
                return Err(Error::UnsupportedDataType(
                    "Multi-sample (color) DICOM data is not supported".to_string(),
                ));
            }
            data.index_axis_move(Axis(3), 0)
        }
        3 => data,
        2 => data.insert_axis(Axis(0)),
        n => {
            return Err(Error::Format(format!(
                "Expected DICOM pixel data with 2-4 dimensions, got {}",
                n
            )))
        }
    };

    // [frames, rows, columns] -> (columns, rows, frames)
    let reordered = data.permuted_axes(ndarray::IxDyn(&[2, 1, 0]));
    let owned = reordered.as_standard_layout().to_owned();
    owned
        .into_dimensionality::<ndarray::Ix3>()
        .map_err(|e| Error::Other(e.to_string()))
}

fn multi_f64(obj: &DefaultDicomObject, tag: dicom_core::Tag) -> Option<Vec<f64>> {
    obj.element(tag).ok().and_then(|e| e.to_multi_float64().ok())
}

fn single_f64(obj: &DefaultDicomObject, tag: dicom_core::Tag) -> Option<f64> {
    obj.element(tag).ok().and_then(|e| e.to_float64().ok())
}

/// Derive the spatial geometry from DICOM attributes, with unit defaults
/// for anything absent.
fn geometry_from_object(obj: &DefaultDicomObject) -> Geometry {
    // PixelSpacing is [row spacing, column spacing]
    let pixel_spacing = multi_f64(obj, tags::PIXEL_SPACING).unwrap_or_else(|| vec![1.0, 1.0]);
    let slice_spacing = single_f64(obj, tags::SPACING_BETWEEN_SLICES)
        .or_else(|| single_f64(obj, tags::SLICE_THICKNESS))
        .unwrap_or(1.0);

    let spacing = [
        pixel_spacing.get(1).copied().unwrap_or(1.0),
        pixel_spacing.first().copied().unwrap_or(1.0),
        slice_spacing,
    ];

    let origin = multi_f64(obj, tags::IMAGE_POSITION_PATIENT)
        .filter(|v| v.len() >= 3)
        .map(|v| [v[0], v[1], v[2]])
        .unwrap_or([0.0; 3]);

    // ImageOrientationPatient: direction cosines of the row axis
    // (increasing column index) then the column axis (increasing row index)
    if let Some(iop) = multi_f64(obj, tags::IMAGE_ORIENTATION_PATIENT).filter(|v| v.len() >= 6) {
        let x = [iop[0], iop[1], iop[2]];
        let y = [iop[3], iop[4], iop[5]];
        let z = [
            x[1] * y[2] - x[2] * y[1],
            x[2] * y[0] - x[0] * y[2],
            x[0] * y[1] - x[1] * y[0],
        ];
        let direction = [
            [x[0], y[0], z[0]],
            [x[1], y[1], z[1]],
            [x[2], y[2], z[2]],
        ];
        return Geometry::with_direction(origin, spacing, direction);
    }

    Geometry::new(origin, spacing)
}

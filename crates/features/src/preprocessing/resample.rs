//! Grid resampling
//!
//! Resamples a volume onto a new spacing, keeping origin and orientation.
//! Images use trilinear interpolation; label masks use nearest-neighbor so
//! labels are never blended.

use ndarray::Array3;
use rayon::prelude::*;
use voxelomics_core::{Error, Result, Volume, VoxelElement};

fn check_spacing(spacing: &[f64; 3]) -> Result<()> {
    if spacing.iter().any(|s| !s.is_finite() || *s <= 0.0) {
        return Err(Error::Configuration(format!(
            "resample spacing must be positive, got {:?}",
            spacing
        )));
    }
    Ok(())
}

fn output_dims(dims: (usize, usize, usize), old: &[f64; 3], new: &[f64; 3]) -> (usize, usize, usize) {
    let scale = |n: usize, o: f64, s: f64| ((n as f64 * o / s).ceil() as usize).max(1);
    (
        scale(dims.0, old[0], new[0]),
        scale(dims.1, old[1], new[1]),
        scale(dims.2, old[2], new[2]),
    )
}

/// Trilinear resampling of an intensity image to a new spacing
pub fn resample_image(image: &Volume<f64>, spacing: [f64; 3]) -> Result<Volume<f64>> {
    check_spacing(&spacing)?;

    let dims = image.dims();
    let old = image.spacing();
    let (nx, ny, nz) = output_dims(dims, &old, &spacing);
    let ratio = [
        spacing[0] / old[0],
        spacing[1] / old[1],
        spacing[2] / old[2],
    ];

    let data: Vec<f64> = (0..nx)
        .into_par_iter()
        .flat_map(|i| {
            let mut plane = Vec::with_capacity(ny * nz);
            let x = i as f64 * ratio[0];
            for j in 0..ny {
                let y = j as f64 * ratio[1];
                for k in 0..nz {
                    let z = k as f64 * ratio[2];
                    plane.push(trilinear(image, x, y, z));
                }
            }
            plane
        })
        .collect();

    let array = Array3::from_shape_vec((nx, ny, nz), data)
        .map_err(|e| Error::Other(e.to_string()))?;

    let mut output = Volume::from_array(array);
    let mut geometry = *image.geometry();
    geometry.spacing = spacing;
    output.set_geometry(geometry);
    output.set_nodata(image.nodata());
    Ok(output)
}

/// Nearest-neighbor resampling of a label mask to a new spacing
pub fn resample_mask<T: VoxelElement>(mask: &Volume<T>, spacing: [f64; 3]) -> Result<Volume<T>> {
    check_spacing(&spacing)?;

    let dims = mask.dims();
    let old = mask.spacing();
    let (nx, ny, nz) = output_dims(dims, &old, &spacing);
    let ratio = [
        spacing[0] / old[0],
        spacing[1] / old[1],
        spacing[2] / old[2],
    ];

    let clamp = |v: f64, n: usize| (v.round().max(0.0) as usize).min(n - 1);

    let data: Vec<T> = (0..nx)
        .into_par_iter()
        .flat_map(|i| {
            let mut plane = Vec::with_capacity(ny * nz);
            let si = clamp(i as f64 * ratio[0], dims.0);
            for j in 0..ny {
                let sj = clamp(j as f64 * ratio[1], dims.1);
                for k in 0..nz {
                    let sk = clamp(k as f64 * ratio[2], dims.2);
                    plane.push(unsafe { mask.get_unchecked(si, sj, sk) });
                }
            }
            plane
        })
        .collect();

    let array = Array3::from_shape_vec((nx, ny, nz), data)
        .map_err(|e| Error::Other(e.to_string()))?;

    let mut output = Volume::from_array(array);
    let mut geometry = *mask.geometry();
    geometry.spacing = spacing;
    output.set_geometry(geometry);
    output.set_nodata(mask.nodata());
    Ok(output)
}

/// Sample the image at a fractional index with trilinear interpolation,
/// clamping to the volume bounds.
fn trilinear(image: &Volume<f64>, x: f64, y: f64, z: f64) -> f64 {
    let (nx, ny, nz) = image.dims();

    let x = x.clamp(0.0, (nx - 1) as f64);
    let y = y.clamp(0.0, (ny - 1) as f64);
    let z = z.clamp(0.0, (nz - 1) as f64);

    let x0 = x.floor() as usize;
    let y0 = y.floor() as usize;
    let z0 = z.floor() as usize;
    let x1 = (x0 + 1).min(nx - 1);
    let y1 = (y0 + 1).min(ny - 1);
    let z1 = (z0 + 1).min(nz - 1);

    let fx = x - x0 as f64;
    let fy = y - y0 as f64;
    let fz = z - z0 as f64;

    let at = |i, j, k| unsafe { image.get_unchecked(i, j, k) };

    let c00 = at(x0, y0, z0) * (1.0 - fx) + at(x1, y0, z0) * fx;
    let c01 = at(x0, y0, z1) * (1.0 - fx) + at(x1, y0, z1) * fx;
    let c10 = at(x0, y1, z0) * (1.0 - fx) + at(x1, y1, z0) * fx;
    let c11 = at(x0, y1, z1) * (1.0 - fx) + at(x1, y1, z1) * fx;

    let c0 = c00 * (1.0 - fy) + c10 * fy;
    let c1 = c01 * (1.0 - fy) + c11 * fy;

    c0 * (1.0 - fz) + c1 * fz
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use voxelomics_core::Geometry;

    fn gradient_volume() -> Volume<f64> {
        let mut v: Volume<f64> = Volume::new(4, 4, 4);
        v.set_geometry(Geometry::new([0.0; 3], [2.0, 2.0, 2.0]));
        for i in 0..4 {
            for j in 0..4 {
                for k in 0..4 {
                    v.set(i, j, k, i as f64).unwrap();
                }
            }
        }
        v
    }

    #[test]
    fn test_resample_image_halved_spacing() {
        let v = gradient_volume();
        let out = resample_image(&v, [1.0, 1.0, 1.0]).unwrap();

        assert_eq!(out.dims(), (8, 8, 8));
        assert_eq!(out.spacing(), [1.0, 1.0, 1.0]);
        // Fractional index 0.5 along the gradient axis interpolates to 0.5
        assert_relative_eq!(out.get(1, 0, 0).unwrap(), 0.5, epsilon = 1e-12);
        assert_relative_eq!(out.get(2, 0, 0).unwrap(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_resample_identity_spacing() {
        let v = gradient_volume();
        let out = resample_image(&v, [2.0, 2.0, 2.0]).unwrap();
        assert_eq!(out.dims(), v.dims());
        for i in 0..4 {
            assert_relative_eq!(out.get(i, 0, 0).unwrap(), i as f64, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_resample_mask_keeps_labels() {
        let mut mask: Volume<u32> = Volume::new(4, 4, 4);
        mask.set_geometry(Geometry::new([0.0; 3], [2.0, 2.0, 2.0]));
        for i in 2..4 {
            for j in 0..4 {
                for k in 0..4 {
                    mask.set(i, j, k, 3).unwrap();
                }
            }
        }

        let out = resample_mask(&mask, [1.0, 1.0, 1.0]).unwrap();
        assert_eq!(out.dims(), (8, 8, 8));
        // Only original label values present
        assert!(out.data().iter().all(|&l| l == 0 || l == 3));
        assert!(out.data().iter().any(|&l| l == 3));
    }

    #[test]
    fn test_invalid_spacing() {
        let v = gradient_volume();
        assert!(resample_image(&v, [0.0, 1.0, 1.0]).is_err());
        assert!(resample_mask::<f64>(&gradient_volume(), [-1.0, 1.0, 1.0]).is_err());
    }
}

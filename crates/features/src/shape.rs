//! 3D shape descriptors
//!
//! Geometry-only features of the masked region: volume, surface area
//! (counting exposed voxel faces), sphericity, maximum 3D diameter and
//! PCA-derived axis lengths. Intensities are not used, so shape features
//! are computed once per extraction regardless of image filters.

use crate::roi::RegionOfInterest;

/// Compute the shape features of a region.
///
/// Returns (feature name, value) pairs in a fixed order.
pub fn shape_features(roi: &RegionOfInterest) -> Vec<(&'static str, f64)> {
    let spacing = roi.spacing();
    let n = roi.voxel_count() as f64;
    let volume = n * roi.voxel_volume();

    let (surface_area, surface_voxels) = surface(roi, &spacing);
    let max_diameter = maximum_diameter(&surface_voxels);

    let sphericity = if surface_area > 0.0 {
        (36.0 * std::f64::consts::PI * volume * volume).cbrt() / surface_area
    } else {
        0.0
    };
    let surface_volume_ratio = if volume > 0.0 {
        surface_area / volume
    } else {
        0.0
    };

    let eig = principal_moments(roi, &spacing);
    let major = 4.0 * eig[0].max(0.0).sqrt();
    let minor = 4.0 * eig[1].max(0.0).sqrt();
    let least = 4.0 * eig[2].max(0.0).sqrt();
    let (elongation, flatness) = if eig[0] > 1e-12 {
        (
            (eig[1].max(0.0) / eig[0]).sqrt(),
            (eig[2].max(0.0) / eig[0]).sqrt(),
        )
    } else {
        // Point-like region: isotropic by convention
        (1.0, 1.0)
    };

    vec![
        ("Elongation", elongation),
        ("Flatness", flatness),
        ("LeastAxisLength", least),
        ("MajorAxisLength", major),
        ("Maximum3DDiameter", max_diameter),
        ("MinorAxisLength", minor),
        ("Sphericity", sphericity),
        ("SurfaceArea", surface_area),
        ("SurfaceVolumeRatio", surface_volume_ratio),
        ("VoxelVolume", volume),
    ]
}

/// Total exposed face area and physical centers of surface voxels
fn surface(roi: &RegionOfInterest, spacing: &[f64; 3]) -> (f64, Vec<[f64; 3]>) {
    let (nx, ny, nz) = roi.mask.dim();
    let face_area = [
        spacing[1] * spacing[2],
        spacing[0] * spacing[2],
        spacing[0] * spacing[1],
    ];
    let neighbors: [(isize, isize, isize, usize); 6] = [
        (-1, 0, 0, 0),
        (1, 0, 0, 0),
        (0, -1, 0, 1),
        (0, 1, 0, 1),
        (0, 0, -1, 2),
        (0, 0, 1, 2),
    ];

    let mut area = 0.0;
    let mut surface_voxels = Vec::new();

    for i in 0..nx {
        for j in 0..ny {
            for k in 0..nz {
                if !roi.mask[(i, j, k)] {
                    continue;
                }
                let mut exposed = false;
                for &(di, dj, dk, axis) in &neighbors {
                    let ni = i as isize + di;
                    let nj = j as isize + dj;
                    let nk = k as isize + dk;
                    let inside = ni >= 0
                        && nj >= 0
                        && nk >= 0
                        && (ni as usize) < nx
                        && (nj as usize) < ny
                        && (nk as usize) < nz
                        && roi.mask[(ni as usize, nj as usize, nk as usize)];
                    if !inside {
                        area += face_area[axis];
                        exposed = true;
                    }
                }
                if exposed {
                    surface_voxels.push([
                        i as f64 * spacing[0],
                        j as f64 * spacing[1],
                        k as f64 * spacing[2],
                    ]);
                }
            }
        }
    }

    (area, surface_voxels)
}

/// Largest pairwise distance between surface voxel centers
fn maximum_diameter(points: &[[f64; 3]]) -> f64 {
    let mut max_sq = 0.0f64;
    for (a, pa) in points.iter().enumerate() {
        for pb in points.iter().skip(a + 1) {
            let d = [pa[0] - pb[0], pa[1] - pb[1], pa[2] - pb[2]];
            let sq = d[0] * d[0] + d[1] * d[1] + d[2] * d[2];
            if sq > max_sq {
                max_sq = sq;
            }
        }
    }
    max_sq.sqrt()
}

/// Eigenvalues (descending) of the covariance of physical voxel coordinates
fn principal_moments(roi: &RegionOfInterest, spacing: &[f64; 3]) -> [f64; 3] {
    let (nx, ny, nz) = roi.mask.dim();

    let mut sum = [0.0f64; 3];
    let mut count = 0usize;
    for i in 0..nx {
        for j in 0..ny {
            for k in 0..nz {
                if roi.mask[(i, j, k)] {
                    sum[0] += i as f64 * spacing[0];
                    sum[1] += j as f64 * spacing[1];
                    sum[2] += k as f64 * spacing[2];
                    count += 1;
                }
            }
        }
    }
    let n = count as f64;
    let mean = [sum[0] / n, sum[1] / n, sum[2] / n];

    let mut cov = [[0.0f64; 3]; 3];
    for i in 0..nx {
        for j in 0..ny {
            for k in 0..nz {
                if roi.mask[(i, j, k)] {
                    let d = [
                        i as f64 * spacing[0] - mean[0],
                        j as f64 * spacing[1] - mean[1],
                        k as f64 * spacing[2] - mean[2],
                    ];
                    for r in 0..3 {
                        for c in 0..3 {
                            cov[r][c] += d[r] * d[c];
                        }
                    }
                }
            }
        }
    }
    for row in cov.iter_mut() {
        for v in row.iter_mut() {
            *v /= n;
        }
    }

    sym_eigenvalues(cov)
}

/// Closed-form eigenvalues of a symmetric 3x3 matrix, sorted descending
fn sym_eigenvalues(a: [[f64; 3]; 3]) -> [f64; 3] {
    let p1 = a[0][1] * a[0][1] + a[0][2] * a[0][2] + a[1][2] * a[1][2];

    let mut eig = if p1.abs() < 1e-30 {
        [a[0][0], a[1][1], a[2][2]]
    } else {
        let q = (a[0][0] + a[1][1] + a[2][2]) / 3.0;
        let p2 = (a[0][0] - q).powi(2) + (a[1][1] - q).powi(2) + (a[2][2] - q).powi(2) + 2.0 * p1;
        let p = (p2 / 6.0).sqrt();

        let mut b = a;
        for (r, row) in b.iter_mut().enumerate() {
            row[r] -= q;
            for v in row.iter_mut() {
                *v /= p;
            }
        }
        let r = (det3(&b) / 2.0).clamp(-1.0, 1.0);
        let phi = r.acos() / 3.0;

        let e1 = q + 2.0 * p * phi.cos();
        let e3 = q + 2.0 * p * (phi + 2.0 * std::f64::consts::FRAC_PI_3).cos();
        let e2 = 3.0 * q - e1 - e3;
        [e1, e2, e3]
    };

    eig.sort_by(|x, y| y.partial_cmp(x).unwrap_or(std::cmp::Ordering::Equal));
    eig
}

fn det3(m: &[[f64; 3]; 3]) -> f64 {
    m[0][0] * (m[1][1] * m[2][2] - m[1][2] * m[2][1])
        - m[0][1] * (m[1][0] * m[2][2] - m[1][2] * m[2][0])
        + m[0][2] * (m[1][0] * m[2][1] - m[1][1] * m[2][0])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roi::extract_roi;
    use approx::assert_relative_eq;
    use voxelomics_core::{Geometry, Volume};

    fn cube_roi(spacing: [f64; 3]) -> RegionOfInterest {
        let mut image: Volume<f64> = Volume::filled(10, 10, 10, 100.0);
        image.set_geometry(Geometry::new([0.0; 3], spacing));
        let mut mask: Volume<u32> = Volume::new(10, 10, 10);
        mask.set_geometry(*image.geometry());
        for i in 4..7 {
            for j in 4..7 {
                for k in 4..7 {
                    mask.set(i, j, k, 1).unwrap();
                }
            }
        }
        extract_roi(&image, &mask, 1).unwrap()
    }

    fn value(features: &[(&'static str, f64)], name: &str) -> f64 {
        features.iter().find(|(n, _)| *n == name).unwrap().1
    }

    #[test]
    fn test_cube_unit_spacing() {
        let features = shape_features(&cube_roi([1.0, 1.0, 1.0]));

        assert_relative_eq!(value(&features, "VoxelVolume"), 27.0, epsilon = 1e-12);
        assert_relative_eq!(value(&features, "SurfaceArea"), 54.0, epsilon = 1e-12);
        assert_relative_eq!(value(&features, "SurfaceVolumeRatio"), 2.0, epsilon = 1e-12);
        // Sphericity of a cube: pi^(1/3) * 6^(2/3) / 6
        let expected = std::f64::consts::PI.cbrt() * 6.0f64.powf(2.0 / 3.0) / 6.0;
        assert_relative_eq!(value(&features, "Sphericity"), expected, epsilon = 1e-9);
        // Opposite corners of a 3x3x3 cube of voxel centers
        assert_relative_eq!(
            value(&features, "Maximum3DDiameter"),
            (12.0f64).sqrt(),
            epsilon = 1e-12
        );
        assert_relative_eq!(value(&features, "Elongation"), 1.0, epsilon = 1e-9);
        assert_relative_eq!(value(&features, "Flatness"), 1.0, epsilon = 1e-9);
    }

    #[test]
    fn test_cube_anisotropic_spacing() {
        let features = shape_features(&cube_roi([2.0, 2.0, 2.0]));
        assert_relative_eq!(value(&features, "VoxelVolume"), 27.0 * 8.0, epsilon = 1e-9);
        assert_relative_eq!(value(&features, "SurfaceArea"), 54.0 * 4.0, epsilon = 1e-9);
    }

    #[test]
    fn test_single_voxel() {
        let image: Volume<f64> = Volume::filled(5, 5, 5, 1.0);
        let mut mask: Volume<u32> = Volume::new(5, 5, 5);
        mask.set(2, 2, 2, 1).unwrap();
        let roi = extract_roi(&image, &mask, 1).unwrap();

        let features = shape_features(&roi);
        assert_relative_eq!(value(&features, "VoxelVolume"), 1.0, epsilon = 1e-12);
        assert_relative_eq!(value(&features, "SurfaceArea"), 6.0, epsilon = 1e-12);
        assert_relative_eq!(value(&features, "Maximum3DDiameter"), 0.0, epsilon = 1e-12);
        assert_relative_eq!(value(&features, "MajorAxisLength"), 0.0, epsilon = 1e-12);
        assert_relative_eq!(value(&features, "Elongation"), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_elongated_region() {
        // A 9x1x1 line of voxels
        let image: Volume<f64> = Volume::filled(11, 5, 5, 1.0);
        let mut mask: Volume<u32> = Volume::new(11, 5, 5);
        for i in 1..10 {
            mask.set(i, 2, 2, 1).unwrap();
        }
        let roi = extract_roi(&image, &mask, 1).unwrap();

        let features = shape_features(&roi);
        assert!(value(&features, "MajorAxisLength") > value(&features, "MinorAxisLength"));
        assert!(value(&features, "Elongation") < 0.2);
        assert_relative_eq!(value(&features, "Maximum3DDiameter"), 8.0, epsilon = 1e-12);
    }

    #[test]
    fn test_eigenvalues_diagonal() {
        let eig = sym_eigenvalues([[3.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 2.0]]);
        assert_relative_eq!(eig[0], 3.0, epsilon = 1e-10);
        assert_relative_eq!(eig[1], 2.0, epsilon = 1e-10);
        assert_relative_eq!(eig[2], 1.0, epsilon = 1e-10);
    }

    #[test]
    fn test_eigenvalues_known_symmetric() {
        // Eigenvalues of [[2,1,0],[1,2,0],[0,0,5]] are 5, 3, 1
        let eig = sym_eigenvalues([[2.0, 1.0, 0.0], [1.0, 2.0, 0.0], [0.0, 0.0, 5.0]]);
        assert_relative_eq!(eig[0], 5.0, epsilon = 1e-9);
        assert_relative_eq!(eig[1], 3.0, epsilon = 1e-9);
        assert_relative_eq!(eig[2], 1.0, epsilon = 1e-9);
    }
}

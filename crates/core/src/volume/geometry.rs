//! Spatial geometry of a volumetric grid

use serde::{Deserialize, Serialize};

/// Spatial metadata of a volumetric image.
///
/// Maps voxel indices `(i, j, k)` to world coordinates (millimetres):
/// ```text
/// world = origin + direction * (index .* spacing)
/// ```
///
/// `direction` is a 3x3 orientation matrix in row-major order. For
/// axis-aligned volumes it is the identity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Geometry {
    /// World coordinate of the center of voxel `[0, 0, 0]`
    pub origin: [f64; 3],
    /// Voxel size along each axis (mm)
    pub spacing: [f64; 3],
    /// Orientation matrix (row-major). Columns are the world directions
    /// of the i, j and k index axes.
    pub direction: [[f64; 3]; 3],
}

impl Geometry {
    /// Create an axis-aligned geometry with the given origin and spacing
    pub fn new(origin: [f64; 3], spacing: [f64; 3]) -> Self {
        Self {
            origin,
            spacing,
            direction: IDENTITY,
        }
    }

    /// Create a geometry with an explicit orientation matrix
    pub fn with_direction(origin: [f64; 3], spacing: [f64; 3], direction: [[f64; 3]; 3]) -> Self {
        Self {
            origin,
            spacing,
            direction,
        }
    }

    /// Convert voxel indices to world coordinates (voxel center)
    pub fn voxel_to_world(&self, i: usize, j: usize, k: usize) -> [f64; 3] {
        let scaled = [
            i as f64 * self.spacing[0],
            j as f64 * self.spacing[1],
            k as f64 * self.spacing[2],
        ];
        let mut world = [0.0; 3];
        for (r, w) in world.iter_mut().enumerate() {
            *w = self.origin[r]
                + self.direction[r][0] * scaled[0]
                + self.direction[r][1] * scaled[1]
                + self.direction[r][2] * scaled[2];
        }
        world
    }

    /// Convert world coordinates to fractional voxel indices
    ///
    /// Returns NaN indices when the orientation matrix is singular.
    pub fn world_to_voxel(&self, x: f64, y: f64, z: f64) -> [f64; 3] {
        // Invert A = direction * diag(spacing) via the adjugate
        let a = [
            [
                self.direction[0][0] * self.spacing[0],
                self.direction[0][1] * self.spacing[1],
                self.direction[0][2] * self.spacing[2],
            ],
            [
                self.direction[1][0] * self.spacing[0],
                self.direction[1][1] * self.spacing[1],
                self.direction[1][2] * self.spacing[2],
            ],
            [
                self.direction[2][0] * self.spacing[0],
                self.direction[2][1] * self.spacing[1],
                self.direction[2][2] * self.spacing[2],
            ],
        ];
        let det = det3(&a);
        if det.abs() < 1e-12 {
            return [f64::NAN, f64::NAN, f64::NAN];
        }

        let d = [x - self.origin[0], y - self.origin[1], z - self.origin[2]];
        let inv = adjugate3(&a);
        let mut idx = [0.0; 3];
        for (r, v) in idx.iter_mut().enumerate() {
            *v = (inv[r][0] * d[0] + inv[r][1] * d[1] + inv[r][2] * d[2]) / det;
        }
        idx
    }

    /// Physical volume of one voxel in mm^3
    pub fn voxel_volume(&self) -> f64 {
        let det = det3(&self.direction).abs();
        self.spacing[0] * self.spacing[1] * self.spacing[2] * det
    }

    /// Whether the orientation matrix is the identity
    pub fn is_axis_aligned(&self) -> bool {
        for r in 0..3 {
            for c in 0..3 {
                if (self.direction[r][c] - IDENTITY[r][c]).abs() > 1e-10 {
                    return false;
                }
            }
        }
        true
    }

    /// Compare two geometries element-wise within a tolerance
    pub fn approx_eq(&self, other: &Geometry, tolerance: f64) -> bool {
        for r in 0..3 {
            if (self.origin[r] - other.origin[r]).abs() > tolerance {
                return false;
            }
            if (self.spacing[r] - other.spacing[r]).abs() > tolerance {
                return false;
            }
            for c in 0..3 {
                if (self.direction[r][c] - other.direction[r][c]).abs() > tolerance {
                    return false;
                }
            }
        }
        true
    }
}

impl Default for Geometry {
    fn default() -> Self {
        Self::new([0.0, 0.0, 0.0], [1.0, 1.0, 1.0])
    }
}

const IDENTITY: [[f64; 3]; 3] = [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]];

fn det3(m: &[[f64; 3]; 3]) -> f64 {
    m[0][0] * (m[1][1] * m[2][2] - m[1][2] * m[2][1])
        - m[0][1] * (m[1][0] * m[2][2] - m[1][2] * m[2][0])
        + m[0][2] * (m[1][0] * m[2][1] - m[1][1] * m[2][0])
}

/// Adjugate (transposed cofactor matrix); inverse = adjugate / det
fn adjugate3(m: &[[f64; 3]; 3]) -> [[f64; 3]; 3] {
    [
        [
            m[1][1] * m[2][2] - m[1][2] * m[2][1],
            m[0][2] * m[2][1] - m[0][1] * m[2][2],
            m[0][1] * m[1][2] - m[0][2] * m[1][1],
        ],
        [
            m[1][2] * m[2][0] - m[1][0] * m[2][2],
            m[0][0] * m[2][2] - m[0][2] * m[2][0],
            m[0][2] * m[1][0] - m[0][0] * m[1][2],
        ],
        [
            m[1][0] * m[2][1] - m[1][1] * m[2][0],
            m[0][1] * m[2][0] - m[0][0] * m[2][1],
            m[0][0] * m[1][1] - m[0][1] * m[1][0],
        ],
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_voxel_to_world_axis_aligned() {
        let geom = Geometry::new([10.0, 20.0, 30.0], [2.0, 2.0, 5.0]);
        let w = geom.voxel_to_world(1, 2, 3);
        assert_relative_eq!(w[0], 12.0, epsilon = 1e-10);
        assert_relative_eq!(w[1], 24.0, epsilon = 1e-10);
        assert_relative_eq!(w[2], 45.0, epsilon = 1e-10);
    }

    #[test]
    fn test_world_to_voxel_roundtrip() {
        // Rotated 90 degrees around z: i axis points along world +y
        let dir = [[0.0, -1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, 1.0]];
        let geom = Geometry::with_direction([5.0, -3.0, 2.0], [1.5, 2.5, 3.0], dir);

        let w = geom.voxel_to_world(4, 7, 2);
        let idx = geom.world_to_voxel(w[0], w[1], w[2]);

        assert_relative_eq!(idx[0], 4.0, epsilon = 1e-9);
        assert_relative_eq!(idx[1], 7.0, epsilon = 1e-9);
        assert_relative_eq!(idx[2], 2.0, epsilon = 1e-9);
    }

    #[test]
    fn test_voxel_volume() {
        let geom = Geometry::new([0.0; 3], [0.5, 0.5, 2.0]);
        assert_relative_eq!(geom.voxel_volume(), 0.5, epsilon = 1e-12);
    }

    #[test]
    fn test_approx_eq_tolerance() {
        let a = Geometry::new([0.0; 3], [1.0, 1.0, 1.0]);
        let mut b = a;
        b.spacing[1] = 1.0 + 1e-8;
        assert!(a.approx_eq(&b, 1e-6));
        assert!(!a.approx_eq(&b, 1e-9));
    }

    #[test]
    fn test_default_is_identity() {
        let geom = Geometry::default();
        assert!(geom.is_axis_aligned());
        assert_relative_eq!(geom.voxel_volume(), 1.0, epsilon = 1e-12);
    }
}

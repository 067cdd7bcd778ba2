//! Undecimated 3D Haar wavelet decomposition
//!
//! Single-level stationary transform: each axis is filtered with the Haar
//! low-pass and high-pass kernels without downsampling, so every sub-band
//! keeps the input dimensions and the ROI mask stays valid. The eight
//! sub-bands are named by the per-axis filter letters, LLL through HHH,
//! first letter for the x axis.

use ndarray::Array3;

const SQRT2: f64 = std::f64::consts::SQRT_2;

/// Compute the eight Haar sub-bands of an image
pub fn haar_subbands(image: &Array3<f64>) -> Vec<(String, Array3<f64>)> {
    let mut bands: Vec<(String, Array3<f64>)> = vec![(String::new(), image.clone())];

    for axis in 0..3 {
        let mut next = Vec::with_capacity(bands.len() * 2);
        for (name, array) in bands {
            next.push((format!("{}L", name), filter_axis(&array, axis, false)));
            next.push((format!("{}H", name), filter_axis(&array, axis, true)));
        }
        bands = next;
    }

    bands
}

/// Apply the Haar kernel along one axis with edge clamping
fn filter_axis(array: &Array3<f64>, axis: usize, high_pass: bool) -> Array3<f64> {
    let dims = array.dim();
    let n = [dims.0, dims.1, dims.2][axis];

    let mut output = Array3::zeros(dims);
    for ((i, j, k), out) in output.indexed_iter_mut() {
        let idx = [i, j, k];
        let mut next_idx = idx;
        next_idx[axis] = (idx[axis] + 1).min(n - 1);

        let a = array[(idx[0], idx[1], idx[2])];
        let b = array[(next_idx[0], next_idx[1], next_idx[2])];
        *out = if high_pass {
            (a - b) / SQRT2
        } else {
            (a + b) / SQRT2
        };
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_eight_named_subbands() {
        let image = Array3::zeros((4, 4, 4));
        let bands = haar_subbands(&image);

        let names: Vec<&str> = bands.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(
            names,
            vec!["LLL", "LLH", "LHL", "LHH", "HLL", "HLH", "HHL", "HHH"]
        );
        for (_, band) in &bands {
            assert_eq!(band.dim(), (4, 4, 4));
        }
    }

    #[test]
    fn test_constant_image() {
        let image = Array3::from_elem((3, 3, 3), 10.0);
        let bands = haar_subbands(&image);

        for (name, band) in &bands {
            if name == "LLL" {
                // Low-pass gains sqrt(2) per axis
                let expected = 10.0 * SQRT2.powi(3);
                for &v in band.iter() {
                    assert_relative_eq!(v, expected, epsilon = 1e-12);
                }
            } else {
                for &v in band.iter() {
                    assert_relative_eq!(v, 0.0, epsilon = 1e-12);
                }
            }
        }
    }

    #[test]
    fn test_high_pass_detects_step() {
        // Step along x: high-pass in x is nonzero only at the edge
        let mut image = Array3::zeros((4, 1, 1));
        image[(2, 0, 0)] = 1.0;
        image[(3, 0, 0)] = 1.0;

        let bands = haar_subbands(&image);
        let (_, hll) = bands.iter().find(|(n, _)| n == "HLL").unwrap();

        assert_relative_eq!(hll[(0, 0, 0)], 0.0, epsilon = 1e-12);
        assert!(hll[(1, 0, 0)].abs() > 0.0);
        assert_relative_eq!(hll[(3, 0, 0)], 0.0, epsilon = 1e-12);
    }
}

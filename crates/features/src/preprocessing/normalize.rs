//! Intensity normalization
//!
//! Centers the whole image at zero mean and unit standard deviation,
//! multiplied by a configurable scale. A flat image is centered only.

use voxelomics_core::{Error, Result, Volume};

/// Z-score normalize an image
pub fn normalize(image: &Volume<f64>, scale: f64) -> Result<Volume<f64>> {
    if !scale.is_finite() || scale <= 0.0 {
        return Err(Error::Configuration(format!(
            "normalization scale must be positive, got {}",
            scale
        )));
    }

    let n = image.len() as f64;
    let mean = image.data().iter().sum::<f64>() / n;
    let var = image
        .data()
        .iter()
        .map(|v| (v - mean) * (v - mean))
        .sum::<f64>()
        / n;
    let std = var.sqrt();

    let mut output = image.clone();
    if std < 1e-12 {
        output.data_mut().mapv_inplace(|v| (v - mean) * scale);
    } else {
        output
            .data_mut()
            .mapv_inplace(|v| (v - mean) / std * scale);
    }
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_normalize_zero_mean_unit_std() {
        let mut image: Volume<f64> = Volume::new(4, 1, 1);
        for (i, v) in [2.0, 4.0, 6.0, 8.0].iter().enumerate() {
            image.set(i, 0, 0, *v).unwrap();
        }

        let out = normalize(&image, 1.0).unwrap();
        let mean: f64 = out.data().iter().sum::<f64>() / 4.0;
        let var: f64 = out.data().iter().map(|v| v * v).sum::<f64>() / 4.0;

        assert_relative_eq!(mean, 0.0, epsilon = 1e-12);
        assert_relative_eq!(var, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_normalize_flat_image() {
        let image: Volume<f64> = Volume::filled(3, 3, 3, 5.0);
        let out = normalize(&image, 100.0).unwrap();
        assert!(out.data().iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_invalid_scale() {
        let image: Volume<f64> = Volume::filled(2, 2, 2, 1.0);
        assert!(normalize(&image, 0.0).is_err());
        assert!(normalize(&image, f64::NAN).is_err());
    }
}

//! I/O operations for reading volumetric medical images
//!
//! Format is chosen by file extension: `.nii` / `.nii.gz` via the `nifti`
//! crate (always available), `.dcm` / `.dicom` via the dicom-rs ecosystem
//! when the `dicom` feature is enabled.

#[cfg(feature = "dicom")]
mod dicom_io;
mod nifti_io;

#[cfg(feature = "dicom")]
pub use dicom_io::read_dicom;
pub use nifti_io::read_nifti;

use crate::error::{Error, Result};
use crate::volume::{Volume, VoxelElement};
use std::path::Path;

/// Supported volumetric file kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum VolumeFormat {
    Nifti,
    Dicom,
}

fn detect_format(path: &Path) -> Result<VolumeFormat> {
    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or_default()
        .to_ascii_lowercase();

    if name.ends_with(".nii") || name.ends_with(".nii.gz") {
        Ok(VolumeFormat::Nifti)
    } else if name.ends_with(".dcm") || name.ends_with(".dicom") {
        Ok(VolumeFormat::Dicom)
    } else {
        Err(Error::Format(format!(
            "Unrecognized volume format: {} (expected .nii, .nii.gz or .dcm)",
            path.display()
        )))
    }
}

/// Read a volumetric file into a Volume, dispatching on extension
pub fn read_volume<T, P>(path: P) -> Result<Volume<T>>
where
    T: VoxelElement,
    P: AsRef<Path>,
{
    match detect_format(path.as_ref())? {
        VolumeFormat::Nifti => read_nifti(path),
        #[cfg(feature = "dicom")]
        VolumeFormat::Dicom => read_dicom(path),
        #[cfg(not(feature = "dicom"))]
        VolumeFormat::Dicom => Err(Error::Format(
            "DICOM support is not compiled in (enable the `dicom` feature)".to_string(),
        )),
    }
}

/// Read an intensity image as `Volume<f64>`
pub fn read_image<P: AsRef<Path>>(path: P) -> Result<Volume<f64>> {
    read_volume(path)
}

/// Read a label mask as `Volume<u32>`
pub fn read_mask<P: AsRef<Path>>(path: P) -> Result<Volume<u32>> {
    read_volume(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_format() {
        assert_eq!(
            detect_format(Path::new("/data/ct.nii")).unwrap(),
            VolumeFormat::Nifti
        );
        assert_eq!(
            detect_format(Path::new("scan.NII.GZ")).unwrap(),
            VolumeFormat::Nifti
        );
        assert_eq!(
            detect_format(Path::new("slice.dcm")).unwrap(),
            VolumeFormat::Dicom
        );
        assert!(detect_format(Path::new("image.png")).is_err());
        assert!(detect_format(Path::new("noextension")).is_err());
    }

    #[test]
    fn test_read_image_missing_path() {
        assert!(matches!(
            read_image("/nowhere/scan.nii"),
            Err(Error::Io(_))
        ));
    }
}

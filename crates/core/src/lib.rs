//! # Voxelomics Core
//!
//! Core types and I/O for the voxelomics radiomics toolkit.
//!
//! This crate provides:
//! - `Volume<T>`: Generic volumetric grid type
//! - `Geometry`: Origin, spacing and orientation of the voxel grid
//! - `VoxelElement`: Trait bounding voxel value types
//! - I/O for volumetric medical image formats (NIfTI, optionally DICOM)

pub mod error;
pub mod io;
pub mod volume;

pub use error::{Error, Result};
pub use volume::{Geometry, Volume, VolumeStatistics, VoxelElement};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::error::{Error, Result};
    pub use crate::volume::{Geometry, Volume, VoxelElement};
}

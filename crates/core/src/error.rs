//! Error types for voxelomics

use thiserror::Error;

/// Main error type for voxelomics operations
#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Format error: {0}")]
    Format(String),

    #[error("Invalid volume dimensions: {nx}x{ny}x{nz}")]
    InvalidDimensions { nx: usize, ny: usize, nz: usize },

    #[error("Index out of bounds: ({i}, {j}, {k}) in volume of size ({nx}, {ny}, {nz})")]
    IndexOutOfBounds {
        i: usize,
        j: usize,
        k: usize,
        nx: usize,
        ny: usize,
        nz: usize,
    },

    #[error("Geometry mismatch between image and mask: {0}")]
    GeometryMismatch(String),

    #[error("Invalid mask: {0}")]
    InvalidMask(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Unsupported data type: {0}")]
    UnsupportedDataType(String),

    #[error("{0}")]
    Other(String),
}

/// Result type alias for voxelomics operations
pub type Result<T> = std::result::Result<T, Error>;

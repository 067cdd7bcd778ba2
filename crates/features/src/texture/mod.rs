//! Texture-matrix feature classes
//!
//! - **glcm**: Gray-Level Co-occurrence Matrix statistics
//! - **glrlm**: Gray-Level Run-Length Matrix statistics
//!
//! Both accumulate a single matrix over the 13 unique directions of the
//! 3D 26-neighborhood, then derive statistics from the normalized matrix.

mod glcm;
mod glrlm;

pub use glcm::glcm_features;
pub use glrlm::glrlm_features;

/// The 13 unique direction vectors of the 26-neighborhood (one per
/// opposite pair).
pub(crate) const DIRECTIONS_13: [(isize, isize, isize); 13] = [
    (1, 0, 0),
    (0, 1, 0),
    (0, 0, 1),
    (1, 1, 0),
    (1, -1, 0),
    (1, 0, 1),
    (1, 0, -1),
    (0, 1, 1),
    (0, 1, -1),
    (1, 1, 1),
    (1, 1, -1),
    (1, -1, 1),
    (1, -1, -1),
];

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_directions_unique_and_unpaired() {
        let set: HashSet<_> = DIRECTIONS_13.iter().collect();
        assert_eq!(set.len(), 13);
        // No direction should co-exist with its opposite
        for &(di, dj, dk) in DIRECTIONS_13.iter() {
            assert!(!set.contains(&(-di, -dj, -dk)));
        }
    }
}

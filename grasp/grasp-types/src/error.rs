//! Error types for the grasp data model.

use thiserror::Error;

/// Errors that can occur when constructing or combining grasp data.
#[derive(Debug, Error)]
pub enum GraspError {
    /// Parallel arrays passed to a constructor disagree in length.
    #[error("shape mismatch: expected {expected} elements, got {actual}")]
    ShapeMismatch {
        /// Expected element count (length of the pose array).
        expected: usize,
        /// Actual element count of the offending array.
        actual: usize,
    },

    /// A selection index lies outside the set.
    #[error("index {index} out of range for set with {len} grasps")]
    IndexOutOfRange {
        /// The invalid index.
        index: usize,
        /// Number of grasps in the set.
        len: usize,
    },

    /// Sets with different attribute schemas cannot be combined.
    #[error("attribute schema mismatch: one set carries scores, the other does not")]
    TypeMismatch,

    /// Gripper opening widths must be non-negative and finite.
    #[error("invalid width {width} at index {index}: widths must be non-negative and finite")]
    InvalidWidth {
        /// Index of the offending grasp.
        index: usize,
        /// The rejected width value.
        width: f64,
    },

    /// A surface normal is too short to normalize.
    #[error("degenerate normal at index {index}: length {length:e} is too small to normalize")]
    DegenerateGeometry {
        /// Index of the offending surface point.
        index: usize,
        /// Euclidean length of the rejected normal.
        length: f64,
    },
}

/// Result type for grasp data model operations.
pub type GraspResult<T> = Result<T, GraspError>;

//! Error types for grasp sampling.

use thiserror::Error;

/// Errors that can occur during grasp sampling.
#[derive(Debug, Error)]
pub enum SampleError {
    /// A surface normal is too short to normalize.
    #[error("degenerate normal at surface point {index}: length {length:e}")]
    DegenerateGeometry {
        /// Index of the offending surface point.
        index: usize,
        /// Euclidean length of the rejected normal.
        length: f64,
    },

    /// Invalid parameter value.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// Error from the grasp data model while assembling the result set.
    #[error(transparent)]
    Grasp(#[from] grasp_types::GraspError),
}

/// Result type for sampling operations.
pub type SampleResult<T> = Result<T, SampleError>;

//! Error types for grasp set metrics.

use thiserror::Error;

/// Errors that can occur when comparing grasp sets.
#[derive(Debug, Error)]
pub enum MetricsError {
    /// A comparison operation received an empty set it cannot handle.
    #[error("{which} set is empty")]
    EmptyInput {
        /// Which input was empty.
        which: &'static str,
    },

    /// A distance threshold outside `[0, inf)`.
    #[error("invalid threshold {value}: must be non-negative and finite")]
    InvalidThreshold {
        /// The rejected threshold value.
        value: f64,
    },

    /// An outcome array does not line up 1:1 with its grasp set.
    #[error("outcome count {outcomes} does not match grasp count {grasps}")]
    ShapeMismatch {
        /// Number of grasps in the set.
        grasps: usize,
        /// Number of outcomes provided.
        outcomes: usize,
    },

    /// Invalid parameter value.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
}

/// Result type for metric operations.
pub type MetricsResult<T> = Result<T, MetricsError>;

//! Symmetric set-to-set similarity.

use grasp_types::GraspSet;

use crate::distance::DistanceWeights;
use crate::error::{MetricsError, MetricsResult};
use crate::nearest::min_distances;

/// Symmetric aggregate distance between two grasp sets.
///
/// Computes the mean nearest-neighbor distance in both directions and
/// averages the two, Chamfer style:
///
/// ```text
/// similarity(A, B) = ½ (mean_a min_b d(a, b) + mean_b min_a d(a, b))
/// ```
///
/// Lower values mean closer sets; two sets containing the same grasps (in
/// any order) have similarity 0. Unlike [`coverage`](fn@crate::coverage)
/// the result has no direction: `similarity(a, b) == similarity(b, a)`.
///
/// # Errors
///
/// - [`MetricsError::EmptyInput`] if either set is empty.
/// - [`MetricsError::InvalidParameter`] for unusable weights.
///
/// # Example
///
/// ```
/// use grasp_metrics::{similarity, DistanceWeights};
/// use grasp_types::GraspSet;
/// use nalgebra::Point3;
///
/// let a = GraspSet::from_translations(&[Point3::new(0.0, 0.0, 0.0)]);
/// let b = GraspSet::from_translations(&[Point3::new(0.1, 0.0, 0.0)]);
///
/// let s = similarity(&a, &b, &DistanceWeights::new()).unwrap();
/// assert!((s - 0.1).abs() < 1e-12);
/// ```
#[allow(clippy::cast_precision_loss)]
// Precision loss: set sizes stay far below 2^52
pub fn similarity(
    a: &GraspSet,
    b: &GraspSet,
    weights: &DistanceWeights,
) -> MetricsResult<f64> {
    weights.validate()?;
    if a.is_empty() {
        return Err(MetricsError::EmptyInput { which: "first" });
    }
    if b.is_empty() {
        return Err(MetricsError::EmptyInput { which: "second" });
    }

    let forward = min_distances(a, b, weights)?;
    let backward = min_distances(b, a, weights)?;

    let mean_forward = forward.iter().sum::<f64>() / forward.len() as f64;
    let mean_backward = backward.iter().sum::<f64>() / backward.len() as f64;

    Ok(0.5 * (mean_forward + mean_backward))
}

//! Aggregation of externally-simulated grasp outcomes.

use grasp_types::{Grasp, GraspSet};

use crate::error::{MetricsError, MetricsResult};

/// Collaborator contract for physics-simulation grasp evaluation.
///
/// An external simulator executes one grasp on one object and reports
/// whether it succeeded. The metrics crate never drives the simulation
/// loop itself; callers invoke the evaluator per grasp (sequentially or in
/// parallel — invocations must be independent) and hand the collected
/// outcomes to [`success_rate`].
pub trait GraspEvaluator<O> {
    /// Executes `grasp` on `object`, returning true on success.
    fn evaluate(&mut self, grasp: &Grasp, object: &O) -> bool;
}

/// Fraction of grasps whose simulated execution succeeded.
///
/// `outcomes` must align 1:1 with the set: `outcomes[i]` is the result of
/// executing grasp `i`.
///
/// # Errors
///
/// - [`MetricsError::EmptyInput`] if the set is empty.
/// - [`MetricsError::ShapeMismatch`] if the outcome count differs from the
///   grasp count.
///
/// # Example
///
/// ```
/// use grasp_metrics::success_rate;
/// use grasp_types::GraspSet;
/// use nalgebra::Point3;
///
/// let set = GraspSet::from_translations(&[
///     Point3::new(0.0, 0.0, 0.0),
///     Point3::new(1.0, 0.0, 0.0),
///     Point3::new(2.0, 0.0, 0.0),
///     Point3::new(3.0, 0.0, 0.0),
/// ]);
///
/// let rate = success_rate(&set, &[true, true, false, true]).unwrap();
/// assert!((rate - 0.75).abs() < 1e-12);
/// ```
#[allow(clippy::cast_precision_loss)]
// Precision loss: set sizes stay far below 2^52
pub fn success_rate(set: &GraspSet, outcomes: &[bool]) -> MetricsResult<f64> {
    if set.is_empty() {
        return Err(MetricsError::EmptyInput { which: "candidate" });
    }
    if outcomes.len() != set.len() {
        return Err(MetricsError::ShapeMismatch {
            grasps: set.len(),
            outcomes: outcomes.len(),
        });
    }

    let successes = outcomes.iter().filter(|&&outcome| outcome).count();
    Ok(successes as f64 / outcomes.len() as f64)
}

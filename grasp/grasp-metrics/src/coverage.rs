//! Coverage of a reference grasp set by a candidate set.

use grasp_types::GraspSet;
use kiddo::SquaredEuclidean;
use rayon::prelude::*;
use tracing::debug;

use crate::distance::{composite, DistanceWeights};
use crate::error::{MetricsError, MetricsResult};
use crate::nearest::{conservative_radius_sq, translation_tree};

/// Fraction of reference grasps with a candidate within `threshold`.
///
/// Recall-style nearest-neighbor coverage: a reference grasp counts as
/// covered when at least one candidate grasp lies within `threshold`
/// composite distance of it. The result is in `[0, 1]`.
///
/// Candidate lookup is pruned through a KD-tree over candidate
/// translations; the pruning radius is derived from the translation term
/// alone, which lower-bounds the composite distance, so no candidate
/// within the threshold can be missed. When the translation weight is
/// zero the scan is exhaustive instead.
///
/// # Errors
///
/// - [`MetricsError::EmptyInput`] if either set is empty. Recall over zero
///   reference grasps is meaningless, and an empty candidate set would
///   silently report zero coverage for every threshold; both are rejected,
///   consistently for all thresholds.
/// - [`MetricsError::InvalidThreshold`] if `threshold` is negative or not
///   finite.
/// - [`MetricsError::InvalidParameter`] for unusable weights.
///
/// # Example
///
/// ```
/// use grasp_metrics::{coverage, DistanceWeights};
/// use grasp_types::GraspSet;
/// use nalgebra::Point3;
///
/// let reference = GraspSet::from_translations(&[
///     Point3::new(0.0, 0.0, 0.0),
///     Point3::new(1.0, 0.0, 0.0),
/// ]);
///
/// // An exact copy covers the reference completely at any threshold.
/// let c = coverage(&reference.clone(), &reference, 0.0, &DistanceWeights::new()).unwrap();
/// assert_eq!(c, 1.0);
/// ```
#[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
// Truncation: tree items are set indices; precision: set sizes stay far below 2^52
pub fn coverage(
    candidates: &GraspSet,
    reference: &GraspSet,
    threshold: f64,
    weights: &DistanceWeights,
) -> MetricsResult<f64> {
    validate_coverage_inputs(candidates, reference, threshold, weights)?;

    if weights.translation <= 0.0 {
        return Ok(coverage_scan(candidates, reference, threshold, weights));
    }

    let tree = translation_tree(candidates);
    let (poses_c, widths_c) = (candidates.poses(), candidates.widths());
    let (poses_r, widths_r) = (reference.poses(), reference.widths());

    let radius = threshold / weights.translation;
    let radius_sq = conservative_radius_sq(radius);

    let covered = (0..reference.len())
        .into_par_iter()
        .filter(|&i| {
            let pose = &poses_r[i];
            let t = &pose.translation;
            tree.within_unsorted::<SquaredEuclidean>(&[t.x, t.y, t.z], radius_sq)
                .into_iter()
                .any(|neighbour| {
                    let j = neighbour.item as usize;
                    composite(pose, widths_r[i], &poses_c[j], widths_c[j], weights) <= threshold
                })
        })
        .count();

    debug!(
        covered,
        reference = reference.len(),
        threshold,
        "coverage computed"
    );

    Ok(covered as f64 / reference.len() as f64)
}

/// Exhaustive coverage, comparing every reference grasp to every candidate.
///
/// Same contract and result as [`coverage`], without spatial pruning. Kept
/// as the straightforward reference path for validating the pruned
/// implementation and for workloads where building the KD-tree does not
/// pay off.
///
/// # Errors
///
/// Same as [`coverage`].
#[allow(clippy::cast_precision_loss)]
pub fn coverage_brute_force(
    candidates: &GraspSet,
    reference: &GraspSet,
    threshold: f64,
    weights: &DistanceWeights,
) -> MetricsResult<f64> {
    validate_coverage_inputs(candidates, reference, threshold, weights)?;
    Ok(coverage_scan(candidates, reference, threshold, weights))
}

fn validate_coverage_inputs(
    candidates: &GraspSet,
    reference: &GraspSet,
    threshold: f64,
    weights: &DistanceWeights,
) -> MetricsResult<()> {
    weights.validate()?;
    if !threshold.is_finite() || threshold < 0.0 {
        return Err(MetricsError::InvalidThreshold { value: threshold });
    }
    if reference.is_empty() {
        return Err(MetricsError::EmptyInput { which: "reference" });
    }
    if candidates.is_empty() {
        return Err(MetricsError::EmptyInput { which: "candidate" });
    }
    Ok(())
}

#[allow(clippy::cast_precision_loss)]
fn coverage_scan(
    candidates: &GraspSet,
    reference: &GraspSet,
    threshold: f64,
    weights: &DistanceWeights,
) -> f64 {
    let (poses_c, widths_c) = (candidates.poses(), candidates.widths());
    let (poses_r, widths_r) = (reference.poses(), reference.widths());

    let covered = (0..reference.len())
        .into_par_iter()
        .filter(|&i| {
            (0..candidates.len()).any(|j| {
                composite(&poses_r[i], widths_r[i], &poses_c[j], widths_c[j], weights)
                    <= threshold
            })
        })
        .count();

    covered as f64 / reference.len() as f64
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use grasp_types::{GraspPose, UnitQuaternion, Vector3};
    use rand::prelude::*;

    fn random_set(n: usize, seed: u64) -> GraspSet {
        let mut rng = StdRng::seed_from_u64(seed);
        let poses = (0..n)
            .map(|_| {
                GraspPose::new(
                    UnitQuaternion::from_euler_angles(
                        rng.gen_range(-3.0..3.0),
                        rng.gen_range(-1.5..1.5),
                        rng.gen_range(-3.0..3.0),
                    ),
                    Vector3::new(
                        rng.gen_range(-0.5..0.5),
                        rng.gen_range(-0.5..0.5),
                        rng.gen_range(-0.5..0.5),
                    ),
                )
            })
            .collect();
        let widths = (0..n).map(|_| rng.gen_range(0.0..0.1)).collect();
        GraspSet::try_new(poses, widths, None).unwrap()
    }

    #[test]
    fn test_exact_copy_covers_fully_at_zero_threshold() {
        let set = random_set(30, 1);
        let c = coverage(&set, &set, 0.0, &DistanceWeights::new()).unwrap();
        assert_eq!(c, 1.0);
    }

    #[test]
    fn test_exact_copy_covers_fully_at_any_threshold() {
        let set = random_set(20, 2);
        for threshold in [0.0, 1e-6, 0.1, 10.0] {
            let c = coverage(&set, &set, threshold, &DistanceWeights::new()).unwrap();
            assert_eq!(c, 1.0);
        }
    }

    #[test]
    fn test_negative_threshold_is_invalid() {
        let set = random_set(5, 3);
        let result = coverage(&set, &set, -1e-9, &DistanceWeights::new());
        assert!(matches!(
            result,
            Err(MetricsError::InvalidThreshold { .. })
        ));
    }

    #[test]
    fn test_nan_threshold_is_invalid() {
        let set = random_set(5, 3);
        let result = coverage(&set, &set, f64::NAN, &DistanceWeights::new());
        assert!(matches!(result, Err(MetricsError::InvalidThreshold { .. })));
    }

    #[test]
    fn test_empty_inputs_are_errors_for_all_thresholds() {
        let set = random_set(5, 4);
        let empty = GraspSet::new();
        for threshold in [0.0, 0.5, 100.0] {
            assert!(matches!(
                coverage(&empty, &set, threshold, &DistanceWeights::new()),
                Err(MetricsError::EmptyInput { .. })
            ));
            assert!(matches!(
                coverage(&set, &empty, threshold, &DistanceWeights::new()),
                Err(MetricsError::EmptyInput { .. })
            ));
        }
    }

    #[test]
    fn test_partial_coverage() {
        let reference = GraspSet::from_translations(&[
            nalgebra::Point3::new(0.0, 0.0, 0.0),
            nalgebra::Point3::new(1.0, 0.0, 0.0),
            nalgebra::Point3::new(2.0, 0.0, 0.0),
            nalgebra::Point3::new(3.0, 0.0, 0.0),
        ]);
        // Candidates near the first two reference grasps only.
        let candidates = GraspSet::from_translations(&[
            nalgebra::Point3::new(0.005, 0.0, 0.0),
            nalgebra::Point3::new(1.005, 0.0, 0.0),
        ]);

        let c = coverage(&candidates, &reference, 0.01, &DistanceWeights::new()).unwrap();
        assert_relative_eq!(c, 0.5, epsilon = 1e-12);
    }

    #[test]
    fn test_pruned_matches_brute_force() {
        let candidates = random_set(50, 5);
        let reference = random_set(70, 6);
        let weights = DistanceWeights::new().with_width(0.2);

        for threshold in [0.0, 0.05, 0.2, 1.0] {
            let pruned = coverage(&candidates, &reference, threshold, &weights).unwrap();
            let brute =
                coverage_brute_force(&candidates, &reference, threshold, &weights).unwrap();
            assert_eq!(pruned, brute);
        }
    }

    #[test]
    fn test_zero_translation_weight_uses_exhaustive_path() {
        let candidates = random_set(10, 7);
        let reference = random_set(12, 8);
        let weights = DistanceWeights::new().with_translation(0.0).with_rotation(1.0);

        let pruned = coverage(&candidates, &reference, 0.5, &weights).unwrap();
        let brute = coverage_brute_force(&candidates, &reference, 0.5, &weights).unwrap();
        assert_eq!(pruned, brute);
    }
}

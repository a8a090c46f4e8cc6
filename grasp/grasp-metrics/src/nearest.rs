//! Nearest-neighbor distances between grasp sets.
//!
//! Both coverage and similarity need, for every grasp of one set, the
//! minimum composite distance to the other set. A full cross scan is
//! O(N·M); here the translation term is used to prune it. Since every
//! weight is non-negative, the composite distance is bounded below by
//! `translation_weight · ‖Δt‖` alone, so once an upper bound `b` on the
//! minimum is known, no grasp whose translation lies farther than
//! `b / translation_weight` can improve on it. The pruning is therefore
//! conservative: the reported nearest-neighbor distance is exact.

use grasp_types::GraspSet;
use kiddo::{KdTree, SquaredEuclidean};
use rayon::prelude::*;

use crate::distance::{composite, DistanceWeights};
use crate::error::{MetricsError, MetricsResult};

/// Builds a KD-tree over the translation components of a set's poses.
#[allow(clippy::cast_possible_truncation)]
// Truncation: tree items are indices into the grasp set and fit in u64/usize
pub(crate) fn translation_tree(set: &GraspSet) -> KdTree<f64, 3> {
    let mut tree: KdTree<f64, 3> = KdTree::new();
    for (i, pose) in set.poses().iter().enumerate() {
        let t = &pose.translation;
        tree.add(&[t.x, t.y, t.z], i as u64);
    }
    tree
}

/// Inflates a squared query radius by one rounding margin.
///
/// Including a few extra candidates is harmless (each is checked against
/// the exact composite distance afterwards); excluding a borderline true
/// nearest neighbor to floating point rounding would not be.
pub(crate) fn conservative_radius_sq(radius: f64) -> f64 {
    let r2 = radius * radius;
    r2 + r2 * 1e-12 + f64::MIN_POSITIVE
}

/// For every grasp in `from`, the minimum composite distance to `to`.
///
/// Uses KD-tree pruning over translations when the translation weight is
/// positive and falls back to an exhaustive scan otherwise. Either way the
/// result is exact.
///
/// # Errors
///
/// - [`MetricsError::EmptyInput`] if `to` is empty (there is no nearest
///   neighbor to report). An empty `from` yields an empty result.
/// - [`MetricsError::InvalidParameter`] for unusable weights.
#[allow(clippy::cast_possible_truncation)]
pub fn min_distances(
    from: &GraspSet,
    to: &GraspSet,
    weights: &DistanceWeights,
) -> MetricsResult<Vec<f64>> {
    weights.validate()?;
    if to.is_empty() {
        return Err(MetricsError::EmptyInput { which: "target" });
    }
    if from.is_empty() {
        return Ok(Vec::new());
    }
    if weights.translation <= 0.0 {
        return Ok(min_distances_exhaustive(from, to, weights));
    }

    let tree = translation_tree(to);
    let (poses_to, widths_to) = (to.poses(), to.widths());
    let (poses_from, widths_from) = (from.poses(), from.widths());

    let result = (0..from.len())
        .into_par_iter()
        .map(|i| {
            let pose = &poses_from[i];
            let width = widths_from[i];
            let t = &pose.translation;
            let query = [t.x, t.y, t.z];

            // Exact distance to the translation-nearest grasp is an upper
            // bound on the minimum.
            let seed = tree.nearest_one::<SquaredEuclidean>(&query);
            let j = seed.item as usize;
            let mut best = composite(pose, width, &poses_to[j], widths_to[j], weights);

            let radius = best / weights.translation;
            for neighbour in
                tree.within_unsorted::<SquaredEuclidean>(&query, conservative_radius_sq(radius))
            {
                let j = neighbour.item as usize;
                let d = composite(pose, width, &poses_to[j], widths_to[j], weights);
                if d < best {
                    best = d;
                }
            }
            best
        })
        .collect();

    Ok(result)
}

/// Exhaustive fallback used when translation pruning is unavailable.
fn min_distances_exhaustive(
    from: &GraspSet,
    to: &GraspSet,
    weights: &DistanceWeights,
) -> Vec<f64> {
    let (poses_to, widths_to) = (to.poses(), to.widths());
    let (poses_from, widths_from) = (from.poses(), from.widths());

    (0..from.len())
        .into_par_iter()
        .map(|i| {
            (0..to.len())
                .map(|j| {
                    composite(
                        &poses_from[i],
                        widths_from[i],
                        &poses_to[j],
                        widths_to[j],
                        weights,
                    )
                })
                .fold(f64::MAX, f64::min)
        })
        .collect()
}

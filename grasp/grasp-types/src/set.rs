//! Structure-of-arrays container for many grasps.

use nalgebra::Point3;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{GraspError, GraspResult};
use crate::grasp::Grasp;
use crate::pose::GraspPose;

/// An ordered, indexable collection of grasps stored as parallel arrays.
///
/// Poses, widths, and (optionally) scores live in separate arrays of equal
/// length; index `i` in every array refers to the same grasp. The score
/// column is an explicit schema tag: either every grasp in the set has a
/// score or none does, and operations that combine sets check this schema
/// instead of probing per grasp.
///
/// Every operation is pure: transforming, selecting, or concatenating
/// returns a new set and leaves the inputs untouched. There is no in-place
/// mutation API, so sets can be shared freely across threads.
///
/// The empty set (`len() == 0`) is a valid, commonly-returned state; a
/// sampler that finds no feasible candidates returns one rather than an
/// error.
///
/// # Example
///
/// ```
/// use grasp_types::GraspSet;
/// use nalgebra::Point3;
///
/// let set = GraspSet::from_translations(&[
///     Point3::new(0.0, 0.0, 0.0),
///     Point3::new(1.0, 0.0, 0.0),
/// ]);
///
/// assert_eq!(set.len(), 2);
/// let doubled = set.concatenate(&set).unwrap();
/// assert_eq!(doubled.len(), 4);
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GraspSet {
    poses: Vec<GraspPose>,
    widths: Vec<f64>,
    scores: Option<Vec<f64>>,
}

impl GraspSet {
    /// Creates an empty set without a score column.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            poses: Vec::new(),
            widths: Vec::new(),
            scores: None,
        }
    }

    /// Creates a set from parallel arrays.
    ///
    /// Pass `scores: Some(..)` to declare the score column; `None` declares
    /// a set without scores.
    ///
    /// # Errors
    ///
    /// - [`GraspError::ShapeMismatch`] if `widths` or `scores` disagree with
    ///   `poses` in length.
    /// - [`GraspError::InvalidWidth`] if any width is negative or not finite.
    pub fn try_new(
        poses: Vec<GraspPose>,
        widths: Vec<f64>,
        scores: Option<Vec<f64>>,
    ) -> GraspResult<Self> {
        if widths.len() != poses.len() {
            return Err(GraspError::ShapeMismatch {
                expected: poses.len(),
                actual: widths.len(),
            });
        }
        if let Some(scores) = &scores {
            if scores.len() != poses.len() {
                return Err(GraspError::ShapeMismatch {
                    expected: poses.len(),
                    actual: scores.len(),
                });
            }
        }
        for (index, &width) in widths.iter().enumerate() {
            if !width.is_finite() || width < 0.0 {
                return Err(GraspError::InvalidWidth { index, width });
            }
        }

        Ok(Self {
            poses,
            widths,
            scores,
        })
    }

    /// Creates a set from a slice of grasps.
    ///
    /// The score schema is taken from the first grasp; every grasp must
    /// agree with it. An empty slice yields an empty set without scores.
    ///
    /// # Errors
    ///
    /// Returns [`GraspError::TypeMismatch`] if some grasps carry a score and
    /// others do not.
    pub fn try_from_grasps(grasps: &[Grasp]) -> GraspResult<Self> {
        let Some(first) = grasps.first() else {
            return Ok(Self::new());
        };

        let scored = first.score.is_some();
        if grasps.iter().any(|g| g.score.is_some() != scored) {
            return Err(GraspError::TypeMismatch);
        }

        let poses = grasps.iter().map(|g| g.pose).collect();
        let widths = grasps.iter().map(|g| g.width).collect();
        let scores = scored.then(|| grasps.iter().filter_map(|g| g.score).collect());

        Self::try_new(poses, widths, scores)
    }

    /// Creates one grasp per point with identity rotation and width 0.
    ///
    /// A convenience constructor for tests and fixtures, not for sampling.
    ///
    /// # Example
    ///
    /// ```
    /// use grasp_types::GraspSet;
    /// use nalgebra::Point3;
    ///
    /// let set = GraspSet::from_translations(&[Point3::new(0.0, 0.0, 0.0)]);
    /// assert_eq!(set.len(), 1);
    /// assert_eq!(set.widths()[0], 0.0);
    /// ```
    #[must_use]
    pub fn from_translations(points: &[Point3<f64>]) -> Self {
        Self {
            poses: points
                .iter()
                .map(|p| GraspPose::from_translation(p.coords))
                .collect(),
            widths: vec![0.0; points.len()],
            scores: None,
        }
    }

    /// Number of grasps in the set.
    #[must_use]
    pub fn len(&self) -> usize {
        self.poses.len()
    }

    /// Returns true if the set contains no grasps.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.poses.is_empty()
    }

    /// Returns true if the set declares a score column.
    #[must_use]
    pub const fn has_scores(&self) -> bool {
        self.scores.is_some()
    }

    /// Poses of all grasps, in order.
    #[must_use]
    pub fn poses(&self) -> &[GraspPose] {
        &self.poses
    }

    /// Opening widths of all grasps, in order.
    #[must_use]
    pub fn widths(&self) -> &[f64] {
        &self.widths
    }

    /// Scores of all grasps, if the set carries them.
    #[must_use]
    pub fn scores(&self) -> Option<&[f64]> {
        self.scores.as_deref()
    }

    /// Returns the grasp at `index`, or `None` if out of range.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<Grasp> {
        let pose = *self.poses.get(index)?;
        Some(Grasp {
            pose,
            width: self.widths[index],
            score: self.scores.as_ref().map(|s| s[index]),
        })
    }

    /// Iterates over the grasps in order.
    pub fn iter(&self) -> impl Iterator<Item = Grasp> + '_ {
        (0..self.len()).filter_map(|i| self.get(i))
    }

    /// Returns a new set containing `self`'s grasps followed by `other`'s.
    ///
    /// Order is preserved. The score schemas must agree; an empty set is
    /// schema-neutral and adopts the schema of the non-empty side, since it
    /// has no grasps whose scores would need defaulting.
    ///
    /// # Errors
    ///
    /// Returns [`GraspError::TypeMismatch`] if one non-empty set carries
    /// scores and the other does not. Missing scores are never silently
    /// defaulted.
    pub fn concatenate(&self, other: &Self) -> GraspResult<Self> {
        if self.is_empty() {
            return Ok(other.clone());
        }
        if other.is_empty() {
            return Ok(self.clone());
        }
        if self.scores.is_some() != other.scores.is_some() {
            return Err(GraspError::TypeMismatch);
        }

        let mut poses = self.poses.clone();
        poses.extend_from_slice(&other.poses);
        let mut widths = self.widths.clone();
        widths.extend_from_slice(&other.widths);
        let scores = match (&self.scores, &other.scores) {
            (Some(a), Some(b)) => {
                let mut s = a.clone();
                s.extend_from_slice(b);
                Some(s)
            }
            _ => None,
        };

        Ok(Self {
            poses,
            widths,
            scores,
        })
    }

    /// Returns a new set with every pose pre-multiplied by `transform`.
    ///
    /// Grasp `i` of the result has pose `transform ∘ poses[i]`; widths and
    /// scores are unchanged. Rotations are renormalized after composition to
    /// counter quaternion drift.
    ///
    /// # Example
    ///
    /// ```
    /// use grasp_types::{GraspPose, GraspSet};
    /// use nalgebra::{Point3, Vector3};
    ///
    /// let set = GraspSet::from_translations(&[Point3::origin()]);
    /// let shift = GraspPose::from_translation(Vector3::new(0.0, 0.0, 1.0));
    /// let moved = set.transform(&shift);
    ///
    /// assert!((moved.poses()[0].translation.z - 1.0).abs() < 1e-12);
    /// ```
    #[must_use]
    pub fn transform(&self, transform: &GraspPose) -> Self {
        Self {
            poses: self
                .poses
                .iter()
                .map(|p| transform.compose(p).renormalized())
                .collect(),
            widths: self.widths.clone(),
            scores: self.scores.clone(),
        }
    }

    /// Returns a new set containing only the given indices, in the given
    /// order. Indices may repeat.
    ///
    /// # Errors
    ///
    /// Returns [`GraspError::IndexOutOfRange`] if any index is out of range.
    pub fn select(&self, indices: &[usize]) -> GraspResult<Self> {
        for &index in indices {
            if index >= self.len() {
                return Err(GraspError::IndexOutOfRange {
                    index,
                    len: self.len(),
                });
            }
        }

        Ok(Self {
            poses: indices.iter().map(|&i| self.poses[i]).collect(),
            widths: indices.iter().map(|&i| self.widths[i]).collect(),
            scores: self
                .scores
                .as_ref()
                .map(|s| indices.iter().map(|&i| s[i]).collect()),
        })
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::float_cmp,
    clippy::cast_precision_loss
)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use nalgebra::{UnitQuaternion, Vector3};
    use std::f64::consts::PI;

    fn scored_set(n: usize) -> GraspSet {
        let poses = (0..n)
            .map(|i| GraspPose::from_translation(Vector3::new(i as f64, 0.0, 0.0)))
            .collect();
        let widths = vec![0.05; n];
        let scores = (0..n).map(|i| i as f64 / 10.0).collect();
        GraspSet::try_new(poses, widths, Some(scores)).unwrap()
    }

    #[test]
    fn test_empty_set_is_valid() {
        let set = GraspSet::new();
        assert!(set.is_empty());
        assert_eq!(set.len(), 0);
        assert!(!set.has_scores());
    }

    #[test]
    fn test_try_new_shape_mismatch_widths() {
        let poses = vec![GraspPose::identity(); 3];
        let result = GraspSet::try_new(poses, vec![0.05; 2], None);
        assert!(matches!(
            result,
            Err(GraspError::ShapeMismatch {
                expected: 3,
                actual: 2
            })
        ));
    }

    #[test]
    fn test_try_new_shape_mismatch_scores() {
        let poses = vec![GraspPose::identity(); 2];
        let result = GraspSet::try_new(poses, vec![0.05; 2], Some(vec![1.0]));
        assert!(matches!(result, Err(GraspError::ShapeMismatch { .. })));
    }

    #[test]
    fn test_try_new_invalid_width() {
        let poses = vec![GraspPose::identity(); 2];
        let result = GraspSet::try_new(poses, vec![0.05, -0.1], None);
        assert!(matches!(
            result,
            Err(GraspError::InvalidWidth { index: 1, .. })
        ));
    }

    #[test]
    fn test_from_translations_scenario() {
        let set = GraspSet::from_translations(&[
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
        ]);

        assert_eq!(set.len(), 2);
        for pose in set.poses() {
            assert_relative_eq!(pose.rotation.angle(), 0.0, epsilon = 1e-12);
        }
        assert_relative_eq!(set.poses()[1].translation.x, 1.0, epsilon = 1e-12);

        // Concatenation with itself yields a 4-grasp set preserving order.
        let doubled = set.concatenate(&set).unwrap();
        assert_eq!(doubled.len(), 4);
        assert_relative_eq!(doubled.poses()[0].translation.x, 0.0, epsilon = 1e-12);
        assert_relative_eq!(doubled.poses()[1].translation.x, 1.0, epsilon = 1e-12);
        assert_relative_eq!(doubled.poses()[2].translation.x, 0.0, epsilon = 1e-12);
        assert_relative_eq!(doubled.poses()[3].translation.x, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_try_from_grasps_consistent_scores() {
        let grasps = vec![
            Grasp::try_new(GraspPose::identity(), 0.04).unwrap().with_score(0.5),
            Grasp::try_new(GraspPose::identity(), 0.06).unwrap().with_score(0.7),
        ];
        let set = GraspSet::try_from_grasps(&grasps).unwrap();
        assert!(set.has_scores());
        assert_eq!(set.scores().unwrap(), &[0.5, 0.7]);
    }

    #[test]
    fn test_try_from_grasps_mixed_scores() {
        let grasps = vec![
            Grasp::try_new(GraspPose::identity(), 0.04).unwrap().with_score(0.5),
            Grasp::try_new(GraspPose::identity(), 0.06).unwrap(),
        ];
        let result = GraspSet::try_from_grasps(&grasps);
        assert!(matches!(result, Err(GraspError::TypeMismatch)));
    }

    #[test]
    fn test_concatenate_schema_mismatch() {
        let unscored = GraspSet::from_translations(&[Point3::origin()]);
        let scored = scored_set(2);
        let result = unscored.concatenate(&scored);
        assert!(matches!(result, Err(GraspError::TypeMismatch)));
    }

    #[test]
    fn test_concatenate_empty_is_schema_neutral() {
        let empty = GraspSet::new();
        let scored = scored_set(3);

        let result = empty.concatenate(&scored).unwrap();
        assert_eq!(result.len(), 3);
        assert!(result.has_scores());

        let result = scored.concatenate(&empty).unwrap();
        assert_eq!(result.len(), 3);
        assert!(result.has_scores());
    }

    #[test]
    fn test_select_order_and_repeats() {
        let set = scored_set(4);
        let selected = set.select(&[2, 0, 2]).unwrap();
        assert_eq!(selected.len(), 3);
        assert_relative_eq!(selected.poses()[0].translation.x, 2.0, epsilon = 1e-12);
        assert_relative_eq!(selected.poses()[1].translation.x, 0.0, epsilon = 1e-12);
        assert_relative_eq!(selected.poses()[2].translation.x, 2.0, epsilon = 1e-12);
        assert_eq!(selected.scores().unwrap(), &[0.2, 0.0, 0.2]);
    }

    #[test]
    fn test_select_out_of_range() {
        let set = scored_set(3);
        let result = set.select(&[0, 3]);
        assert!(matches!(
            result,
            Err(GraspError::IndexOutOfRange { index: 3, len: 3 })
        ));
    }

    #[test]
    fn test_transform_preserves_widths_and_scores() {
        let set = scored_set(3);
        let shift = GraspPose::from_translation(Vector3::new(0.0, 1.0, 0.0));
        let moved = set.transform(&shift);

        assert_eq!(moved.widths(), set.widths());
        assert_eq!(moved.scores(), set.scores());
        assert_relative_eq!(moved.poses()[1].translation.y, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_transform_composition_associativity() {
        let set = scored_set(5);
        let t1 = GraspPose::new(
            UnitQuaternion::from_axis_angle(&Vector3::z_axis(), PI / 7.0),
            Vector3::new(0.1, -0.2, 0.3),
        );
        let t2 = GraspPose::new(
            UnitQuaternion::from_axis_angle(&Vector3::x_axis(), PI / 3.0),
            Vector3::new(-1.0, 0.5, 0.0),
        );

        let stepwise = set.transform(&t1).transform(&t2);
        let composed = set.transform(&t2.compose(&t1));

        for (a, b) in stepwise.poses().iter().zip(composed.poses()) {
            assert_relative_eq!(a.translation, b.translation, epsilon = 1e-9);
            assert_relative_eq!(a.rotation_angle_to(b), 0.0, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_get_and_iter() {
        let set = scored_set(3);
        let grasp = set.get(1).unwrap();
        assert_relative_eq!(grasp.pose.translation.x, 1.0, epsilon = 1e-12);
        assert_eq!(grasp.score, Some(0.1));
        assert!(set.get(3).is_none());

        let collected: Vec<Grasp> = set.iter().collect();
        assert_eq!(collected.len(), 3);
    }
}

//! Pairwise grasp distance and the full distance matrix.

use grasp_types::{Grasp, GraspPose, GraspSet};
use rayon::prelude::*;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{MetricsError, MetricsResult};

/// Weights of the composite grasp distance.
///
/// The distance between two grasps is the weighted sum
///
/// ```text
/// d = translation · ‖Δt‖ + rotation · geodesic(R₁, R₂) + width · |Δw|
/// ```
///
/// where the rotation term is the angle of the relative rotation on SO(3)
/// (radians). Each component is a metric, so any non-negative weighting is
/// symmetric and satisfies the triangle inequality; it is zero iff every
/// component with a positive weight coincides.
///
/// Defaults weigh translation at 1.0 per meter and rotation at 0.05 meters
/// per radian; the width term is disabled (weight 0).
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DistanceWeights {
    /// Weight of the Euclidean translation distance.
    pub translation: f64,
    /// Weight of the geodesic rotation angle.
    pub rotation: f64,
    /// Weight of the absolute opening-width difference.
    pub width: f64,
}

impl Default for DistanceWeights {
    fn default() -> Self {
        Self {
            translation: 1.0,
            rotation: 0.05,
            width: 0.0,
        }
    }
}

impl DistanceWeights {
    /// Creates the default weighting.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the translation weight.
    #[must_use]
    pub const fn with_translation(mut self, translation: f64) -> Self {
        self.translation = translation;
        self
    }

    /// Sets the rotation weight.
    #[must_use]
    pub const fn with_rotation(mut self, rotation: f64) -> Self {
        self.rotation = rotation;
        self
    }

    /// Sets the width weight.
    #[must_use]
    pub const fn with_width(mut self, width: f64) -> Self {
        self.width = width;
        self
    }

    /// Checks that the weights define a usable metric.
    pub(crate) fn validate(&self) -> MetricsResult<()> {
        for (name, value) in [
            ("translation", self.translation),
            ("rotation", self.rotation),
            ("width", self.width),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(MetricsError::InvalidParameter(format!(
                    "{name} weight {value} must be non-negative and finite"
                )));
            }
        }
        if self.translation == 0.0 && self.rotation == 0.0 && self.width == 0.0 {
            return Err(MetricsError::InvalidParameter(
                "at least one distance weight must be positive".to_owned(),
            ));
        }
        Ok(())
    }
}

/// Composite distance over the raw pose/width columns.
pub(crate) fn composite(
    pose_a: &GraspPose,
    width_a: f64,
    pose_b: &GraspPose,
    width_b: f64,
    weights: &DistanceWeights,
) -> f64 {
    let translation = (pose_a.translation - pose_b.translation).norm();
    let rotation = pose_a.rotation_angle_to(pose_b);
    let width = (width_a - width_b).abs();
    weights.translation * translation + weights.rotation * rotation + weights.width * width
}

/// Composite distance between two grasps.
///
/// Symmetric in its grasp arguments, and zero iff translation, rotation,
/// and (when weighted) width are identical. Scores do not participate.
///
/// # Example
///
/// ```
/// use grasp_metrics::{pairwise_distance, DistanceWeights};
/// use grasp_types::{Grasp, GraspPose};
/// use nalgebra::Vector3;
///
/// let a = Grasp::try_new(GraspPose::identity(), 0.05).unwrap();
/// let b = Grasp::try_new(
///     GraspPose::from_translation(Vector3::new(0.1, 0.0, 0.0)),
///     0.05,
/// )
/// .unwrap();
///
/// let weights = DistanceWeights::new();
/// assert!((pairwise_distance(&a, &b, &weights) - 0.1).abs() < 1e-12);
/// assert_eq!(pairwise_distance(&a, &a, &weights), 0.0);
/// ```
#[must_use]
pub fn pairwise_distance(a: &Grasp, b: &Grasp, weights: &DistanceWeights) -> f64 {
    composite(&a.pose, a.width, &b.pose, b.width, weights)
}

/// Full N×M distance matrix between two sets, row-major over `a`.
///
/// Element `i * b.len() + j` is the distance from `a[i]` to `b[j]`. Rows
/// are computed in parallel. Either set may be empty; the matrix is then
/// empty as well.
///
/// # Errors
///
/// Returns [`MetricsError::InvalidParameter`] if the weights are negative,
/// non-finite, or all zero.
pub fn distance_matrix(
    a: &GraspSet,
    b: &GraspSet,
    weights: &DistanceWeights,
) -> MetricsResult<Vec<f64>> {
    weights.validate()?;

    let (poses_a, widths_a) = (a.poses(), a.widths());
    let (poses_b, widths_b) = (b.poses(), b.widths());

    let matrix = (0..a.len())
        .into_par_iter()
        .flat_map_iter(|i| {
            (0..b.len()).map(move |j| {
                composite(&poses_a[i], widths_a[i], &poses_b[j], widths_b[j], weights)
            })
        })
        .collect();

    Ok(matrix)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use grasp_types::UnitQuaternion;
    use nalgebra::Vector3;
    use std::f64::consts::PI;

    fn grasp_at(x: f64, width: f64) -> Grasp {
        Grasp::try_new(
            GraspPose::from_translation(Vector3::new(x, 0.0, 0.0)),
            width,
        )
        .unwrap()
    }

    #[test]
    fn test_distance_to_self_is_zero() {
        let rotation = UnitQuaternion::from_axis_angle(&Vector3::y_axis(), 0.4);
        let grasp = Grasp::try_new(
            GraspPose::new(rotation, Vector3::new(0.2, -0.1, 0.5)),
            0.06,
        )
        .unwrap();
        let weights = DistanceWeights::new().with_width(1.0);
        assert_eq!(pairwise_distance(&grasp, &grasp, &weights), 0.0);
    }

    #[test]
    fn test_distance_is_symmetric() {
        let a = Grasp::try_new(
            GraspPose::new(
                UnitQuaternion::from_axis_angle(&Vector3::z_axis(), PI / 5.0),
                Vector3::new(0.1, 0.2, 0.3),
            ),
            0.02,
        )
        .unwrap();
        let b = Grasp::try_new(
            GraspPose::new(
                UnitQuaternion::from_axis_angle(&Vector3::x_axis(), -PI / 3.0),
                Vector3::new(-0.2, 0.0, 0.1),
            ),
            0.07,
        )
        .unwrap();

        let weights = DistanceWeights::new().with_width(0.5);
        assert_relative_eq!(
            pairwise_distance(&a, &b, &weights),
            pairwise_distance(&b, &a, &weights),
            epsilon = 1e-15
        );
    }

    #[test]
    fn test_translation_component() {
        let weights = DistanceWeights::new();
        let d = pairwise_distance(&grasp_at(0.0, 0.05), &grasp_at(0.3, 0.05), &weights);
        assert_relative_eq!(d, 0.3, epsilon = 1e-12);
    }

    #[test]
    fn test_rotation_component() {
        let a = Grasp::try_new(GraspPose::identity(), 0.05).unwrap();
        let b = Grasp::try_new(
            GraspPose::from_rotation(UnitQuaternion::from_axis_angle(
                &Vector3::z_axis(),
                PI / 2.0,
            )),
            0.05,
        )
        .unwrap();

        let weights = DistanceWeights::new().with_translation(0.0).with_rotation(1.0);
        assert_relative_eq!(pairwise_distance(&a, &b, &weights), PI / 2.0, epsilon = 1e-12);
    }

    #[test]
    fn test_width_component_disabled_by_default() {
        let weights = DistanceWeights::new();
        let d = pairwise_distance(&grasp_at(0.0, 0.01), &grasp_at(0.0, 0.08), &weights);
        assert_eq!(d, 0.0);

        let weighted = DistanceWeights::new().with_width(1.0);
        let d = pairwise_distance(&grasp_at(0.0, 0.01), &grasp_at(0.0, 0.08), &weighted);
        assert_relative_eq!(d, 0.07, epsilon = 1e-12);
    }

    #[test]
    fn test_distance_matrix_layout() {
        let a = GraspSet::try_from_grasps(&[grasp_at(0.0, 0.05), grasp_at(1.0, 0.05)]).unwrap();
        let b = GraspSet::try_from_grasps(&[
            grasp_at(0.0, 0.05),
            grasp_at(2.0, 0.05),
            grasp_at(3.0, 0.05),
        ])
        .unwrap();

        let matrix = distance_matrix(&a, &b, &DistanceWeights::new()).unwrap();
        assert_eq!(matrix.len(), 6);
        // Row 0: distances from a[0] at x=0
        assert_relative_eq!(matrix[0], 0.0, epsilon = 1e-12);
        assert_relative_eq!(matrix[1], 2.0, epsilon = 1e-12);
        assert_relative_eq!(matrix[2], 3.0, epsilon = 1e-12);
        // Row 1: distances from a[1] at x=1
        assert_relative_eq!(matrix[3], 1.0, epsilon = 1e-12);
        assert_relative_eq!(matrix[4], 1.0, epsilon = 1e-12);
        assert_relative_eq!(matrix[5], 2.0, epsilon = 1e-12);
    }

    #[test]
    fn test_distance_matrix_empty_sets() {
        let empty = GraspSet::new();
        let set = GraspSet::try_from_grasps(&[grasp_at(0.0, 0.05)]).unwrap();
        assert!(distance_matrix(&empty, &set, &DistanceWeights::new())
            .unwrap()
            .is_empty());
        assert!(distance_matrix(&set, &empty, &DistanceWeights::new())
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_invalid_weights() {
        let set = GraspSet::try_from_grasps(&[grasp_at(0.0, 0.05)]).unwrap();

        let negative = DistanceWeights::new().with_rotation(-1.0);
        assert!(matches!(
            distance_matrix(&set, &set, &negative),
            Err(MetricsError::InvalidParameter(_))
        ));

        let all_zero = DistanceWeights {
            translation: 0.0,
            rotation: 0.0,
            width: 0.0,
        };
        assert!(matches!(
            distance_matrix(&set, &set, &all_zero),
            Err(MetricsError::InvalidParameter(_))
        ));
    }
}

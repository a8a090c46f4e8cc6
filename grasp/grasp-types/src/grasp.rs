//! Single-grasp value object.

use nalgebra::{Point3, Vector3};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{GraspError, GraspResult};
use crate::pose::GraspPose;

/// A single 6-DoF grasp candidate.
///
/// A grasp is the pose of the gripper's grasping center together with the
/// required opening width and an optional quality score. Score semantics
/// are defined by the producing sampler; higher is better.
///
/// The grasp frame convention is: +X is the closing direction (the axis
/// along which the fingers move), +Z is the approach direction pointing
/// from the gripper toward the object.
///
/// # Example
///
/// ```
/// use grasp_types::{Grasp, GraspPose};
/// use nalgebra::Vector3;
///
/// let pose = GraspPose::from_translation(Vector3::new(0.0, 0.0, 0.1));
/// let grasp = Grasp::try_new(pose, 0.05).unwrap().with_score(0.8);
///
/// assert_eq!(grasp.width, 0.05);
/// assert_eq!(grasp.score, Some(0.8));
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Grasp {
    /// Pose of the grasping center.
    pub pose: GraspPose,
    /// Required gripper opening distance. Always non-negative.
    pub width: f64,
    /// Optional quality estimate, higher is better.
    pub score: Option<f64>,
}

impl Grasp {
    /// Creates a new grasp without a score.
    ///
    /// # Errors
    ///
    /// Returns [`GraspError::InvalidWidth`] if `width` is negative or not
    /// finite.
    pub fn try_new(pose: GraspPose, width: f64) -> GraspResult<Self> {
        if !width.is_finite() || width < 0.0 {
            return Err(GraspError::InvalidWidth { index: 0, width });
        }
        Ok(Self {
            pose,
            width,
            score: None,
        })
    }

    /// Returns this grasp with the given quality score attached.
    #[must_use]
    pub const fn with_score(mut self, score: f64) -> Self {
        self.score = Some(score);
        self
    }

    /// Position of the grasping center.
    #[must_use]
    pub fn translation(&self) -> Point3<f64> {
        Point3::from(self.pose.translation)
    }

    /// Closing direction of the gripper fingers (+X of the grasp frame).
    #[must_use]
    pub fn closing_axis(&self) -> Vector3<f64> {
        self.pose.rotation * Vector3::x()
    }

    /// Approach direction of the gripper (+Z of the grasp frame).
    #[must_use]
    pub fn approach_axis(&self) -> Vector3<f64> {
        self.pose.rotation * Vector3::z()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use nalgebra::UnitQuaternion;
    use std::f64::consts::PI;

    #[test]
    fn test_try_new_valid() {
        let grasp = Grasp::try_new(GraspPose::identity(), 0.08).unwrap();
        assert_eq!(grasp.width, 0.08);
        assert!(grasp.score.is_none());
    }

    #[test]
    fn test_try_new_negative_width() {
        let result = Grasp::try_new(GraspPose::identity(), -0.01);
        assert!(matches!(result, Err(GraspError::InvalidWidth { .. })));
    }

    #[test]
    fn test_try_new_nan_width() {
        let result = Grasp::try_new(GraspPose::identity(), f64::NAN);
        assert!(matches!(result, Err(GraspError::InvalidWidth { .. })));
    }

    #[test]
    fn test_with_score() {
        let grasp = Grasp::try_new(GraspPose::identity(), 0.05)
            .unwrap()
            .with_score(0.9);
        assert_eq!(grasp.score, Some(0.9));
    }

    #[test]
    fn test_axes_identity() {
        let grasp = Grasp::try_new(GraspPose::identity(), 0.05).unwrap();
        assert_relative_eq!(grasp.closing_axis(), Vector3::x(), epsilon = 1e-12);
        assert_relative_eq!(grasp.approach_axis(), Vector3::z(), epsilon = 1e-12);
    }

    #[test]
    fn test_axes_rotated() {
        // 90 degrees around Z maps +X to +Y
        let rotation = UnitQuaternion::from_axis_angle(&Vector3::z_axis(), PI / 2.0);
        let grasp = Grasp::try_new(GraspPose::from_rotation(rotation), 0.05).unwrap();
        assert_relative_eq!(grasp.closing_axis(), Vector3::y(), epsilon = 1e-12);
        assert_relative_eq!(grasp.approach_axis(), Vector3::z(), epsilon = 1e-12);
    }
}

//! Rigid pose type for grasp frames.

use nalgebra::{Matrix4, Point3, UnitQuaternion, Vector3};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A rigid transformation consisting of rotation and translation.
///
/// Grasp poses are rigid: there is no scale channel. The rotation is stored
/// as a unit quaternion, so the proper-rotation invariant (orthonormal,
/// determinant +1) holds by construction. The transformation is applied in
/// the order: rotate -> translate.
///
/// # Example
///
/// ```
/// use grasp_types::GraspPose;
/// use nalgebra::{Point3, UnitQuaternion, Vector3};
/// use std::f64::consts::PI;
///
/// // A pose that rotates 90 degrees around Z and translates
/// let rotation = UnitQuaternion::from_axis_angle(&Vector3::z_axis(), PI / 2.0);
/// let translation = Vector3::new(1.0, 2.0, 3.0);
/// let pose = GraspPose::new(rotation, translation);
///
/// let point = Point3::new(1.0, 0.0, 0.0);
/// let transformed = pose.transform_point(&point);
/// assert!((transformed.y - 3.0).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GraspPose {
    /// Rotation as a unit quaternion.
    pub rotation: UnitQuaternion<f64>,
    /// Translation vector.
    pub translation: Vector3<f64>,
}

impl Default for GraspPose {
    fn default() -> Self {
        Self::identity()
    }
}

impl GraspPose {
    /// Creates a new pose with the given rotation and translation.
    #[must_use]
    pub const fn new(rotation: UnitQuaternion<f64>, translation: Vector3<f64>) -> Self {
        Self {
            rotation,
            translation,
        }
    }

    /// Creates an identity pose (no rotation, no translation).
    #[must_use]
    pub fn identity() -> Self {
        Self {
            rotation: UnitQuaternion::identity(),
            translation: Vector3::zeros(),
        }
    }

    /// Creates a pose with only translation.
    #[must_use]
    pub fn from_translation(translation: Vector3<f64>) -> Self {
        Self {
            rotation: UnitQuaternion::identity(),
            translation,
        }
    }

    /// Creates a pose with only rotation.
    #[must_use]
    pub fn from_rotation(rotation: UnitQuaternion<f64>) -> Self {
        Self {
            rotation,
            translation: Vector3::zeros(),
        }
    }

    /// Transforms a 3D point.
    #[must_use]
    pub fn transform_point(&self, point: &Point3<f64>) -> Point3<f64> {
        Point3::from(self.rotation * point.coords + self.translation)
    }

    /// Transforms a 3D vector (direction).
    ///
    /// Vectors are rotated but not translated.
    #[must_use]
    pub fn transform_vector(&self, vector: &Vector3<f64>) -> Vector3<f64> {
        self.rotation * vector
    }

    /// Composes this pose with another (self * other).
    ///
    /// The result applies `other` first, then `self`.
    #[must_use]
    pub fn compose(&self, other: &Self) -> Self {
        Self {
            rotation: self.rotation * other.rotation,
            translation: self.translation + self.rotation * other.translation,
        }
    }

    /// Computes the inverse of this pose.
    #[must_use]
    pub fn inverse(&self) -> Self {
        let inv_rotation = self.rotation.inverse();
        Self {
            rotation: inv_rotation,
            translation: inv_rotation * (-self.translation),
        }
    }

    /// Geodesic rotation distance to another pose, in radians.
    ///
    /// This is the angle of the relative rotation between the two frames,
    /// i.e. the length of the shortest path on SO(3). It is symmetric and
    /// satisfies the triangle inequality.
    #[must_use]
    pub fn rotation_angle_to(&self, other: &Self) -> f64 {
        self.rotation.angle_to(&other.rotation)
    }

    /// Returns this pose with the quaternion explicitly renormalized.
    ///
    /// Long composition chains accumulate floating point drift in the
    /// quaternion components. This renormalization is the only numerical
    /// correction applied to poses, and it is never performed implicitly
    /// outside of whole-set transformation.
    #[must_use]
    pub fn renormalized(&self) -> Self {
        Self {
            rotation: UnitQuaternion::new_normalize(self.rotation.into_inner()),
            translation: self.translation,
        }
    }

    /// Converts to a 4x4 homogeneous transformation matrix.
    #[must_use]
    pub fn to_matrix4(&self) -> Matrix4<f64> {
        let mut mat = Matrix4::identity();

        let rot_mat = self.rotation.to_rotation_matrix();
        for i in 0..3 {
            for j in 0..3 {
                mat[(i, j)] = rot_mat[(i, j)];
            }
        }

        mat[(0, 3)] = self.translation.x;
        mat[(1, 3)] = self.translation.y;
        mat[(2, 3)] = self.translation.z;

        mat
    }

    /// Returns true if this pose is approximately the identity.
    #[must_use]
    pub fn is_identity(&self, epsilon: f64) -> bool {
        self.rotation.angle().abs() < epsilon && self.translation.norm() < epsilon
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::PI;

    #[test]
    fn test_identity_pose() {
        let pose = GraspPose::identity();
        let point = Point3::new(1.0, 2.0, 3.0);
        let result = pose.transform_point(&point);
        assert_relative_eq!(result.coords, point.coords, epsilon = 1e-12);
    }

    #[test]
    fn test_translation_only() {
        let translation = Vector3::new(1.0, 2.0, 3.0);
        let pose = GraspPose::from_translation(translation);
        let result = pose.transform_point(&Point3::origin());
        assert_relative_eq!(result.coords, translation, epsilon = 1e-12);
    }

    #[test]
    fn test_rotation_90_degrees_z() {
        let rotation = UnitQuaternion::from_axis_angle(&Vector3::z_axis(), PI / 2.0);
        let pose = GraspPose::from_rotation(rotation);
        let result = pose.transform_point(&Point3::new(1.0, 0.0, 0.0));
        assert_relative_eq!(result.x, 0.0, epsilon = 1e-12);
        assert_relative_eq!(result.y, 1.0, epsilon = 1e-12);
        assert_relative_eq!(result.z, 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_compose_translations() {
        let t1 = GraspPose::from_translation(Vector3::new(1.0, 0.0, 0.0));
        let t2 = GraspPose::from_translation(Vector3::new(0.0, 2.0, 0.0));
        let composed = t1.compose(&t2);

        let result = composed.transform_point(&Point3::origin());
        assert_relative_eq!(result.x, 1.0, epsilon = 1e-12);
        assert_relative_eq!(result.y, 2.0, epsilon = 1e-12);
    }

    #[test]
    fn test_compose_matches_sequential_application() {
        let t1 = GraspPose::new(
            UnitQuaternion::from_axis_angle(&Vector3::z_axis(), PI / 3.0),
            Vector3::new(1.0, -2.0, 0.5),
        );
        let t2 = GraspPose::new(
            UnitQuaternion::from_axis_angle(&Vector3::x_axis(), PI / 5.0),
            Vector3::new(0.0, 3.0, -1.0),
        );

        let point = Point3::new(0.3, 0.7, -0.2);
        let sequential = t2.transform_point(&t1.transform_point(&point));
        let composed = t2.compose(&t1).transform_point(&point);

        assert_relative_eq!(sequential.coords, composed.coords, epsilon = 1e-12);
    }

    #[test]
    fn test_inverse() {
        let rotation = UnitQuaternion::from_axis_angle(&Vector3::z_axis(), PI / 4.0);
        let translation = Vector3::new(1.0, 2.0, 3.0);
        let pose = GraspPose::new(rotation, translation);

        let point = Point3::new(1.0, 2.0, 3.0);
        let roundtrip = pose.inverse().transform_point(&pose.transform_point(&point));
        assert_relative_eq!(roundtrip.coords, point.coords, epsilon = 1e-12);
    }

    #[test]
    fn test_rotation_angle_to() {
        let a = GraspPose::identity();
        let b = GraspPose::from_rotation(UnitQuaternion::from_axis_angle(
            &Vector3::y_axis(),
            PI / 6.0,
        ));

        assert_relative_eq!(a.rotation_angle_to(&b), PI / 6.0, epsilon = 1e-12);
        assert_relative_eq!(b.rotation_angle_to(&a), PI / 6.0, epsilon = 1e-12);
        assert_relative_eq!(a.rotation_angle_to(&a), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_renormalized_preserves_rotation() {
        let pose = GraspPose::from_rotation(UnitQuaternion::from_axis_angle(
            &Vector3::x_axis(),
            0.7,
        ));
        let renorm = pose.renormalized();
        assert_relative_eq!(pose.rotation_angle_to(&renorm), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_to_matrix4() {
        let pose = GraspPose::from_translation(Vector3::new(1.0, 2.0, 3.0));
        let mat = pose.to_matrix4();

        assert_relative_eq!(mat[(0, 3)], 1.0, epsilon = 1e-12);
        assert_relative_eq!(mat[(1, 3)], 2.0, epsilon = 1e-12);
        assert_relative_eq!(mat[(2, 3)], 3.0, epsilon = 1e-12);
        assert_relative_eq!(mat[(3, 3)], 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_is_identity() {
        assert!(GraspPose::identity().is_identity(1e-10));
        let shifted = GraspPose::from_translation(Vector3::new(0.001, 0.0, 0.0));
        assert!(!shifted.is_identity(1e-10));
        assert!(shifted.is_identity(0.01));
    }

    #[test]
    fn test_default_is_identity() {
        assert_eq!(GraspPose::default(), GraspPose::identity());
    }
}

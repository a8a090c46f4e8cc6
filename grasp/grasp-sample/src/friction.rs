//! Friction cone feasibility test for contact pairs.
//!
//! A contact can resist force directions within a cone around its surface
//! normal:
//!
//! ```text
//! angle(direction, normal) ≤ atan(μ)
//! ```
//!
//! An antipodal contact pair is feasible only if the line connecting the
//! two contacts lies within the friction cone at each contact. The test is
//! over the contact *line*, not a directed ray, so it is independent of
//! the normal orientation convention of the input data.

use nalgebra::Vector3;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Friction cone at a contact, parameterized by the Coulomb coefficient.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FrictionCone {
    /// Coulomb friction coefficient. Must be non-negative.
    pub mu: f64,
}

impl FrictionCone {
    /// Creates a friction cone with the given coefficient.
    #[must_use]
    pub const fn new(mu: f64) -> Self {
        Self { mu }
    }

    /// Creates a frictionless cone (μ = 0).
    ///
    /// A frictionless contact only resists forces exactly along its normal.
    #[must_use]
    pub const fn frictionless() -> Self {
        Self { mu: 0.0 }
    }

    /// Half-angle of the cone in radians: `atan(μ)`.
    #[must_use]
    pub fn half_angle(&self) -> f64 {
        self.mu.atan()
    }

    /// Angle between a direction and the cone axis, ignoring sign.
    ///
    /// Both `normal` and `direction` must be unit vectors. The deviation is
    /// measured against the normal *line*, so a direction and its negation
    /// deviate equally.
    #[must_use]
    pub fn deviation(normal: &Vector3<f64>, direction: &Vector3<f64>) -> f64 {
        normal.dot(direction).abs().clamp(0.0, 1.0).acos()
    }

    /// Returns true if `direction` lies within the cone around `normal`.
    ///
    /// Both arguments must be unit vectors.
    #[must_use]
    pub fn contains(&self, normal: &Vector3<f64>, direction: &Vector3<f64>) -> bool {
        Self::deviation(normal, direction) <= self.half_angle() + 1e-10
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::FRAC_PI_4;

    #[test]
    fn test_half_angle() {
        assert_relative_eq!(FrictionCone::new(1.0).half_angle(), FRAC_PI_4, epsilon = 1e-12);
        assert_relative_eq!(FrictionCone::frictionless().half_angle(), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_deviation_is_sign_agnostic() {
        let normal = Vector3::z();
        let direction = Vector3::new(0.0, 1.0, 1.0).normalize();
        let dev_pos = FrictionCone::deviation(&normal, &direction);
        let dev_neg = FrictionCone::deviation(&normal, &(-direction));
        assert_relative_eq!(dev_pos, dev_neg, epsilon = 1e-12);
        assert_relative_eq!(dev_pos, FRAC_PI_4, epsilon = 1e-12);
    }

    #[test]
    fn test_contains_aligned_direction() {
        let cone = FrictionCone::new(0.5);
        assert!(cone.contains(&Vector3::z(), &Vector3::z()));
        assert!(cone.contains(&Vector3::z(), &(-Vector3::z())));
    }

    #[test]
    fn test_contains_respects_half_angle() {
        // atan(0.5) ≈ 26.57 degrees
        let cone = FrictionCone::new(0.5);
        let inside = Vector3::new(0.4, 0.0, 1.0).normalize(); // ≈ 21.8 degrees
        let outside = Vector3::new(0.7, 0.0, 1.0).normalize(); // ≈ 35.0 degrees
        assert!(cone.contains(&Vector3::z(), &inside));
        assert!(!cone.contains(&Vector3::z(), &outside));
    }

    #[test]
    fn test_frictionless_requires_exact_alignment() {
        let cone = FrictionCone::frictionless();
        assert!(cone.contains(&Vector3::z(), &Vector3::z()));
        let tilted = Vector3::new(0.01, 0.0, 1.0).normalize();
        assert!(!cone.contains(&Vector3::z(), &tilted));
    }
}

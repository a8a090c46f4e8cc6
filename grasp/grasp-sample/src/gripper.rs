//! Parallel-jaw gripper geometry.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Geometry of a two-finger parallel-jaw gripper.
///
/// Fingers are modeled as cuboids of equal width and height (the finger
/// thickness) and a given length; the insides of the fingers are at most
/// `opening_width` apart. This is all the sampler needs: the opening width
/// bounds the reachable contact separation, and the finger dimensions are
/// available to collision-checking collaborators.
///
/// Defaults correspond to a generic research gripper: 80 mm opening,
/// 50 mm fingers, 3 mm finger thickness.
///
/// # Example
///
/// ```
/// use grasp_sample::ParallelJawGripper;
///
/// let gripper = ParallelJawGripper::new().with_opening_width(0.1);
/// assert!((gripper.opening_width - 0.1).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ParallelJawGripper {
    /// Maximum distance between the insides of the fingers, in meters.
    pub opening_width: f64,
    /// Finger length, in meters.
    pub finger_length: f64,
    /// Finger width and height, in meters.
    pub finger_thickness: f64,
}

impl Default for ParallelJawGripper {
    fn default() -> Self {
        Self {
            opening_width: 0.08,
            finger_length: 0.05,
            finger_thickness: 0.003,
        }
    }
}

impl ParallelJawGripper {
    /// Creates a gripper with default dimensions.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the maximum opening width.
    #[must_use]
    pub const fn with_opening_width(mut self, opening_width: f64) -> Self {
        self.opening_width = opening_width;
        self
    }

    /// Sets the finger length.
    #[must_use]
    pub const fn with_finger_length(mut self, finger_length: f64) -> Self {
        self.finger_length = finger_length;
        self
    }

    /// Sets the finger thickness.
    #[must_use]
    pub const fn with_finger_thickness(mut self, finger_thickness: f64) -> Self {
        self.finger_thickness = finger_thickness;
        self
    }
}

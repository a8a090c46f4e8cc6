//! Core types for grasp-sampling benchmarks.
//!
//! This crate provides the foundational types shared by the grasp sampler
//! and the evaluation metrics:
//!
//! - [`GraspPose`] - A rigid rotation + translation
//! - [`Grasp`] - One 6-DoF grasp candidate with width and optional score
//! - [`GraspSet`] - A structure-of-arrays collection of grasps
//! - [`SurfaceSample`] - Points + outward normals describing an object's
//!   exterior
//!
//! # Units
//!
//! All coordinates and widths are `f64` in meters; angles are radians.
//!
//! # Coordinate System
//!
//! Uses a **right-handed coordinate system**. The grasp frame convention
//! is: +X is the finger closing direction, +Z is the approach direction
//! pointing from the gripper toward the object, and the grasp origin is
//! the grasping center between the finger tips.
//!
//! # Example
//!
//! ```
//! use grasp_types::{Grasp, GraspPose, GraspSet};
//! use nalgebra::Vector3;
//!
//! let grasps = vec![
//!     Grasp::try_new(GraspPose::from_translation(Vector3::new(0.0, 0.0, 0.1)), 0.05)?,
//!     Grasp::try_new(GraspPose::identity(), 0.03)?,
//! ];
//! let set = GraspSet::try_from_grasps(&grasps)?;
//!
//! assert_eq!(set.len(), 2);
//! assert!(!set.has_scores());
//! # Ok::<(), grasp_types::GraspError>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

mod error;
mod grasp;
mod pose;
mod set;
mod surface;

// Re-export core types
pub use error::{GraspError, GraspResult};
pub use grasp::Grasp;
pub use pose::GraspPose;
pub use set::GraspSet;
pub use surface::{SurfacePoint, SurfaceSample, MIN_NORMAL_LENGTH};

// Re-export nalgebra types for convenience
pub use nalgebra::{Point3, UnitQuaternion, Vector3};

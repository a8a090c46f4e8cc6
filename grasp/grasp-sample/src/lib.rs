//! Antipodal grasp candidate sampling.
//!
//! This crate generates physically plausible parallel-jaw grasp candidates
//! from an object's surface geometry. A candidate is a pair of contact
//! points on opposing surface regions whose normals are approximately
//! antiparallel, whose separation fits the gripper, and whose contact line
//! lies within the friction cone at both contacts.
//!
//! # Quick Start
//!
//! ```
//! use grasp_sample::{sample_antipodal_grasps, AntipodalParams, ParallelJawGripper};
//! use grasp_types::SurfaceSample;
//! use nalgebra::{Point3, Vector3};
//!
//! // A tiny two-sided slab: one point per face, 4 cm apart.
//! let surface = SurfaceSample::try_new(
//!     &[Point3::new(0.0, 0.0, 0.0), Point3::new(0.0, 0.0, 0.04)],
//!     &[Vector3::new(0.0, 0.0, 1.0), Vector3::new(0.0, 0.0, -1.0)],
//! )
//! .unwrap();
//!
//! let gripper = ParallelJawGripper::new();
//! let params = AntipodalParams::new().with_seed(0);
//! let grasps = sample_antipodal_grasps(&surface, &gripper, &params).unwrap();
//!
//! assert_eq!(grasps.len(), 1);
//! assert!((grasps.widths()[0] - 0.04).abs() < 1e-12);
//! ```
//!
//! # Determinism
//!
//! With a fixed seed, two runs over identical inputs produce identical
//! output sets: same poses, widths, and scores in the same order. The
//! search is bounded by a candidate-pair budget, not by time.
//!
//! # Collaborators
//!
//! The sampler does not know the object's volume. Callers with a mesh or
//! occupancy representation can prune colliding candidates through the
//! [`CollisionCheck`] trait; [`NoCollisionCheck`] is the no-op stub.

// Safety: Deny unwrap/expect in library code. Tests may use them.
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
#![warn(missing_docs)]
#![warn(clippy::all)]

mod antipodal;
mod collision;
mod error;
mod friction;
mod gripper;

pub use antipodal::{
    sample_antipodal_grasps, sample_antipodal_grasps_with, AntipodalParams,
};
pub use collision::{CollisionCheck, NoCollisionCheck};
pub use error::{SampleError, SampleResult};
pub use friction::FrictionCone;
pub use gripper::ParallelJawGripper;

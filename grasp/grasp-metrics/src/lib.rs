//! Metrics for comparing grasp sets.
//!
//! This crate quantifies how well a sampled candidate grasp set matches a
//! reference (ground-truth) set:
//!
//! - [`pairwise_distance`] - Composite distance between two grasps
//!   (weighted translation, rotation, and optional width terms)
//! - [`distance_matrix`] - Full N×M cross-set distance matrix
//! - [`min_distances`] - Exact nearest-neighbor distances with
//!   conservative KD-tree pruning
//! - [`coverage`] - Recall-style fraction of reference grasps with a
//!   nearby candidate
//! - [`similarity`] - Symmetric Chamfer-style set-to-set distance
//! - [`success_rate`] - Aggregation of externally-simulated outcomes
//!
//! # Quick Start
//!
//! ```
//! use grasp_metrics::{coverage, similarity, DistanceWeights};
//! use grasp_types::GraspSet;
//! use nalgebra::Point3;
//!
//! let reference = GraspSet::from_translations(&[
//!     Point3::new(0.0, 0.0, 0.0),
//!     Point3::new(0.1, 0.0, 0.0),
//! ]);
//! let candidates = GraspSet::from_translations(&[Point3::new(0.001, 0.0, 0.0)]);
//!
//! let weights = DistanceWeights::new();
//! // One of the two reference grasps has a candidate within 5 mm.
//! let c = coverage(&candidates, &reference, 0.005, &weights).unwrap();
//! assert!((c - 0.5).abs() < 1e-12);
//!
//! let s = similarity(&candidates, &reference, &weights).unwrap();
//! assert!(s > 0.0);
//! ```
//!
//! # Exactness
//!
//! The multi-set metrics prune candidate lookups with a KD-tree over
//! translations. Because every distance weight is non-negative, the
//! translation term alone lower-bounds the composite distance, so the
//! pruning is provably conservative: reported nearest-neighbor distances
//! and coverage counts are identical to the exhaustive scan, which
//! [`coverage_brute_force`] keeps available as the reference path.

// Safety: Deny unwrap/expect in library code. Tests may use them.
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
#![warn(missing_docs)]
#![warn(clippy::all)]

mod coverage;
mod distance;
mod error;
mod nearest;
mod similarity;
mod success;

pub use coverage::{coverage, coverage_brute_force};
pub use distance::{distance_matrix, pairwise_distance, DistanceWeights};
pub use error::{MetricsError, MetricsResult};
pub use nearest::min_distances;
pub use similarity::similarity;
pub use success::{success_rate, GraspEvaluator};

//! Antipodal grasp candidate sampling.
//!
//! The sampler walks the surface sample in a seeded random order and, for
//! each first contact point, queries a KD-tree for partner points within
//! the gripper's reach. A pair becomes a grasp candidate when:
//!
//! 1. the contact separation lies within the width bounds,
//! 2. the two normals are antiparallel within a configured tolerance,
//! 3. the contact line lies within the friction cone at both contacts,
//! 4. the optional collision collaborator accepts the resulting pose.
//!
//! The search is bounded by a deterministic pair budget, never by wall
//! time, so a fixed seed reproduces the output set exactly.

use grasp_types::{GraspPose, GraspSet, SurfaceSample, MIN_NORMAL_LENGTH};
use kiddo::{KdTree, SquaredEuclidean};
use nalgebra::{Matrix3, Point3, Rotation3, Unit, UnitQuaternion, Vector3};
use rand::prelude::*;
use tracing::{debug, info};

use crate::collision::{CollisionCheck, NoCollisionCheck};
use crate::error::{SampleError, SampleResult};
use crate::friction::FrictionCone;
use crate::gripper::ParallelJawGripper;

/// Contact pairs closer than this are treated as a single point.
const MIN_CONTACT_SEPARATION: f64 = 1e-9;

/// Parameters for antipodal grasp sampling.
#[derive(Debug, Clone)]
pub struct AntipodalParams {
    /// Coulomb friction coefficient used for the cone test (default: 0.5).
    pub friction: f64,
    /// Maximum angle in radians between one normal and the negated other
    /// for a pair to count as antipodal (default: 15 degrees).
    pub antipodal_tolerance: f64,
    /// Minimum graspable contact separation (default: 0.0).
    pub min_width: f64,
    /// Maximum contact separation. `None` uses the gripper's opening width
    /// (default: `None`). An explicit value must not exceed the opening
    /// width.
    pub max_width: Option<f64>,
    /// Number of grasps to sample before stopping (default: 100).
    pub target_count: usize,
    /// Maximum number of candidate pairs to examine. Bounds the worst-case
    /// cost of the search (default: 500 000).
    pub max_pairs: usize,
    /// Random seed. `Some` makes the output fully reproducible; `None`
    /// draws entropy from the OS (default: `None`).
    pub seed: Option<u64>,
    /// Half-range in radians of the random spin applied to the approach
    /// direction around the contact line. 0 keeps the canonical orientation
    /// and draws no randomness for it (default: 0.0).
    pub rotation_offset_range: f64,
}

impl Default for AntipodalParams {
    fn default() -> Self {
        Self {
            friction: 0.5,
            antipodal_tolerance: 15.0_f64.to_radians(),
            min_width: 0.0,
            max_width: None,
            target_count: 100,
            max_pairs: 500_000,
            seed: None,
            rotation_offset_range: 0.0,
        }
    }
}

impl AntipodalParams {
    /// Creates new sampling parameters with defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the friction coefficient.
    #[must_use]
    pub const fn with_friction(mut self, friction: f64) -> Self {
        self.friction = friction;
        self
    }

    /// Sets the antipodal angle tolerance in radians.
    #[must_use]
    pub const fn with_antipodal_tolerance(mut self, tolerance: f64) -> Self {
        self.antipodal_tolerance = tolerance;
        self
    }

    /// Sets the minimum graspable width.
    #[must_use]
    pub const fn with_min_width(mut self, min_width: f64) -> Self {
        self.min_width = min_width;
        self
    }

    /// Sets an explicit maximum width.
    #[must_use]
    pub const fn with_max_width(mut self, max_width: f64) -> Self {
        self.max_width = Some(max_width);
        self
    }

    /// Sets the target number of output grasps.
    #[must_use]
    pub const fn with_target_count(mut self, target_count: usize) -> Self {
        self.target_count = target_count;
        self
    }

    /// Sets the candidate-pair budget.
    #[must_use]
    pub const fn with_max_pairs(mut self, max_pairs: usize) -> Self {
        self.max_pairs = max_pairs;
        self
    }

    /// Sets the random seed for reproducible sampling.
    #[must_use]
    pub const fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Sets the random spin half-range around the contact line.
    #[must_use]
    pub const fn with_rotation_offset_range(mut self, range: f64) -> Self {
        self.rotation_offset_range = range;
        self
    }
}

/// Samples antipodal grasp candidates from a surface sample.
///
/// Convenience wrapper around [`sample_antipodal_grasps_with`] without a
/// collision collaborator.
///
/// # Errors
///
/// Returns an error if a parameter is invalid or a surface normal is
/// degenerate. Finding no feasible pair is *not* an error: the result is
/// an empty (scored) set.
///
/// # Example
///
/// ```
/// use grasp_sample::{sample_antipodal_grasps, AntipodalParams, ParallelJawGripper};
/// use grasp_types::SurfaceSample;
/// use nalgebra::{Point3, Vector3};
///
/// // Two parallel 3x3 patches, 5 cm apart, normals facing each other.
/// let mut positions = Vec::new();
/// let mut normals = Vec::new();
/// for i in 0..3 {
///     for j in 0..3 {
///         let (x, y) = (f64::from(i) * 0.01, f64::from(j) * 0.01);
///         positions.push(Point3::new(x, y, 0.0));
///         normals.push(Vector3::new(0.0, 0.0, 1.0));
///         positions.push(Point3::new(x, y, 0.05));
///         normals.push(Vector3::new(0.0, 0.0, -1.0));
///     }
/// }
/// let surface = SurfaceSample::try_new(&positions, &normals).unwrap();
///
/// let params = AntipodalParams::new().with_seed(42).with_target_count(10);
/// let grasps =
///     sample_antipodal_grasps(&surface, &ParallelJawGripper::new(), &params).unwrap();
///
/// assert!(!grasps.is_empty());
/// assert!(grasps.has_scores());
/// ```
pub fn sample_antipodal_grasps(
    surface: &SurfaceSample,
    gripper: &ParallelJawGripper,
    params: &AntipodalParams,
) -> SampleResult<GraspSet> {
    sample_antipodal_grasps_with(surface, gripper, params, &NoCollisionCheck)
}

/// Samples antipodal grasp candidates, pruning with a collision checker.
///
/// Candidates whose pose the checker rejects are dropped before scoring.
/// Every accepted grasp carries a geometric quality score in (0, 1]:
/// the product of the cosines of the antipodal deviation and of the cone
/// deviations at the two contacts, so larger margins score higher.
///
/// # Errors
///
/// - [`SampleError::InvalidParameter`] for out-of-range parameters or a
///   non-positive gripper opening.
/// - [`SampleError::DegenerateGeometry`] if a surface normal is too short
///   to normalize.
#[allow(clippy::cast_possible_truncation)]
// Truncation: KD-tree items are indices into the surface sample and fit in u64/usize
pub fn sample_antipodal_grasps_with(
    surface: &SurfaceSample,
    gripper: &ParallelJawGripper,
    params: &AntipodalParams,
    collision: &dyn CollisionCheck,
) -> SampleResult<GraspSet> {
    let max_width = validate(gripper, params)?;
    let normals = unit_normals(surface)?;

    if surface.len() < 2 || params.target_count == 0 {
        return empty_scored_set();
    }

    let cone = FrictionCone::new(params.friction);

    // KD-tree over surface positions for radius-bounded partner lookup.
    let mut tree: KdTree<f64, 3> = KdTree::new();
    for (i, point) in surface.points.iter().enumerate() {
        let p = &point.position;
        tree.add(&[p.x, p.y, p.z], i as u64);
    }

    let mut rng: Box<dyn RngCore> = match params.seed {
        Some(seed) => Box::new(StdRng::seed_from_u64(seed)),
        None => Box::new(rand::thread_rng()),
    };

    // Visit first contacts in a seeded random order; each unordered pair is
    // considered exactly once, at the turn of its smaller index.
    let mut order: Vec<usize> = (0..surface.len()).collect();
    order.shuffle(&mut rng);

    let mut poses = Vec::new();
    let mut widths = Vec::new();
    let mut scores = Vec::new();
    let mut pairs_examined = 0_usize;

    'search: for &i in &order {
        let p1 = surface.points[i].position;
        let n1 = normals[i];

        let neighbours =
            tree.within_unsorted::<SquaredEuclidean>(&[p1.x, p1.y, p1.z], max_width * max_width);

        for neighbour in neighbours {
            let j = neighbour.item as usize;
            if j <= i {
                continue;
            }
            if pairs_examined == params.max_pairs {
                debug!(pairs_examined, "candidate pair budget exhausted");
                break 'search;
            }
            pairs_examined += 1;

            let p2 = surface.points[j].position;
            let n2 = normals[j];

            let chord = p2 - p1;
            let separation = chord.norm();
            if separation < params.min_width.max(MIN_CONTACT_SEPARATION)
                || separation > max_width
            {
                continue;
            }
            let direction = chord / separation;

            // Antiparallel tolerance: angle between n1 and -n2.
            let antipodal_deviation = (-n1.dot(&n2)).clamp(-1.0, 1.0).acos();
            if antipodal_deviation > params.antipodal_tolerance {
                continue;
            }

            // The contact line must lie within both friction cones.
            if !cone.contains(&n1, &direction) || !cone.contains(&n2, &direction) {
                continue;
            }

            let spin = if params.rotation_offset_range > 0.0 {
                rng.gen_range(-params.rotation_offset_range..params.rotation_offset_range)
            } else {
                0.0
            };
            let pose = pair_pose(&p1, &p2, &n1, &n2, spin);

            if collision.in_collision(&pose, separation) {
                continue;
            }

            let score = antipodal_deviation.cos()
                * FrictionCone::deviation(&n1, &direction).cos()
                * FrictionCone::deviation(&n2, &direction).cos();

            poses.push(pose);
            widths.push(separation);
            scores.push(score);

            if poses.len() == params.target_count {
                debug!(accepted = poses.len(), "target grasp count reached");
                break 'search;
            }
        }
    }

    info!(
        surface_points = surface.len(),
        pairs_examined,
        accepted = poses.len(),
        "antipodal sampling finished"
    );

    Ok(GraspSet::try_new(poses, widths, Some(scores))?)
}

/// An empty set that still declares the score column, so that empty and
/// non-empty sampler outputs share a schema and concatenate freely.
fn empty_scored_set() -> SampleResult<GraspSet> {
    Ok(GraspSet::try_new(Vec::new(), Vec::new(), Some(Vec::new()))?)
}

/// Normalizes the surface normals, rejecting degenerate ones.
fn unit_normals(surface: &SurfaceSample) -> SampleResult<Vec<Vector3<f64>>> {
    surface
        .points
        .iter()
        .enumerate()
        .map(|(index, point)| {
            let length = point.normal.norm();
            if !length.is_finite() || length < MIN_NORMAL_LENGTH {
                Err(SampleError::DegenerateGeometry { index, length })
            } else {
                Ok(point.normal / length)
            }
        })
        .collect()
}

/// Builds the grasp pose for a feasible contact pair.
///
/// The closing axis (+X) runs along the contact chord. The approach axis
/// (+Z) is the inward normal bisector projected perpendicular to the chord;
/// for perfectly antipodal contacts the bisector vanishes and a
/// deterministic perpendicular is used instead. `spin` rotates the approach
/// direction around the chord.
fn pair_pose(
    p1: &Point3<f64>,
    p2: &Point3<f64>,
    n1: &Vector3<f64>,
    n2: &Vector3<f64>,
    spin: f64,
) -> GraspPose {
    let chord = p2 - p1;
    let closing = chord.normalize();

    let bisector = -(n1 + n2);
    let projected = bisector - closing * bisector.dot(&closing);
    let mut approach = if projected.norm() < 1e-9 {
        let reference = if closing.x.abs() < 0.9 {
            Vector3::x()
        } else {
            Vector3::y()
        };
        closing.cross(&reference).normalize()
    } else {
        projected.normalize()
    };

    if spin != 0.0 {
        approach = UnitQuaternion::from_axis_angle(&Unit::new_normalize(closing), spin) * approach;
    }

    let side = approach.cross(&closing);
    let rotation = UnitQuaternion::from_rotation_matrix(&Rotation3::from_matrix_unchecked(
        Matrix3::from_columns(&[closing, side, approach]),
    ));
    let midpoint = (p1.coords + p2.coords) * 0.5;

    GraspPose::new(rotation, midpoint)
}

/// Checks parameters and resolves the effective maximum width.
fn validate(gripper: &ParallelJawGripper, params: &AntipodalParams) -> SampleResult<f64> {
    if !gripper.opening_width.is_finite() || gripper.opening_width <= 0.0 {
        return Err(SampleError::InvalidParameter(format!(
            "gripper opening width {} must be positive",
            gripper.opening_width
        )));
    }
    if !params.friction.is_finite() || params.friction < 0.0 {
        return Err(SampleError::InvalidParameter(format!(
            "friction coefficient {} must be non-negative",
            params.friction
        )));
    }
    if !params.antipodal_tolerance.is_finite()
        || params.antipodal_tolerance <= 0.0
        || params.antipodal_tolerance > std::f64::consts::FRAC_PI_2
    {
        return Err(SampleError::InvalidParameter(format!(
            "antipodal tolerance {} must be in (0, pi/2]",
            params.antipodal_tolerance
        )));
    }
    if !params.min_width.is_finite() || params.min_width < 0.0 {
        return Err(SampleError::InvalidParameter(format!(
            "minimum width {} must be non-negative",
            params.min_width
        )));
    }
    if !params.rotation_offset_range.is_finite() || params.rotation_offset_range < 0.0 {
        return Err(SampleError::InvalidParameter(format!(
            "rotation offset range {} must be non-negative",
            params.rotation_offset_range
        )));
    }

    let max_width = params.max_width.unwrap_or(gripper.opening_width);
    if !max_width.is_finite() || max_width <= 0.0 || max_width > gripper.opening_width {
        return Err(SampleError::InvalidParameter(format!(
            "maximum width {max_width} must be in (0, {}]",
            gripper.opening_width
        )));
    }
    if max_width < params.min_width {
        return Err(SampleError::InvalidParameter(format!(
            "maximum width {max_width} is below minimum width {}",
            params.min_width
        )));
    }

    Ok(max_width)
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::float_cmp,
    clippy::cast_lossless
)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    /// Two parallel square patches facing each other across `separation`.
    fn two_patch_surface(separation: f64, side: usize, spacing: f64) -> SurfaceSample {
        let mut positions = Vec::new();
        let mut normals = Vec::new();
        for i in 0..side {
            for j in 0..side {
                let x = i as f64 * spacing;
                let y = j as f64 * spacing;
                positions.push(Point3::new(x, y, 0.0));
                normals.push(Vector3::new(0.0, 0.0, 1.0));
                positions.push(Point3::new(x, y, separation));
                normals.push(Vector3::new(0.0, 0.0, -1.0));
            }
        }
        SurfaceSample::try_new(&positions, &normals).unwrap()
    }

    struct RejectAll;

    impl CollisionCheck for RejectAll {
        fn in_collision(&self, _pose: &GraspPose, _width: f64) -> bool {
            true
        }
    }

    #[test]
    fn test_fewer_than_two_points_returns_empty() {
        let surface = SurfaceSample::try_new(&[Point3::origin()], &[Vector3::z()]).unwrap();
        let set = sample_antipodal_grasps(
            &surface,
            &ParallelJawGripper::new(),
            &AntipodalParams::new().with_seed(1),
        )
        .unwrap();
        assert!(set.is_empty());
        assert!(set.has_scores());
    }

    #[test]
    fn test_zero_length_normal_is_rejected() {
        let mut surface =
            SurfaceSample::try_new(&[Point3::origin(), Point3::new(0.0, 0.0, 0.05)], &[
                Vector3::z(),
                -Vector3::z(),
            ])
            .unwrap();
        // The fields are public; a collaborator could hand over a sample
        // with a bad normal, so the sampler revalidates.
        surface.points[1].normal = Vector3::zeros();

        let result = sample_antipodal_grasps(
            &surface,
            &ParallelJawGripper::new(),
            &AntipodalParams::new().with_seed(1),
        );
        assert!(matches!(
            result,
            Err(SampleError::DegenerateGeometry { index: 1, .. })
        ));
    }

    #[test]
    fn test_parallel_patches_scenario() {
        let separation = 0.05;
        let surface = two_patch_surface(separation, 5, 0.01);
        let params = AntipodalParams::new().with_seed(42).with_target_count(500);
        let set =
            sample_antipodal_grasps(&surface, &ParallelJawGripper::new(), &params).unwrap();

        assert!(!set.is_empty());

        // Every contact pair spans the gap, so no width can undercut the
        // patch separation, and the directly-opposed pairs attain it.
        let min_width = set.widths().iter().copied().fold(f64::MAX, f64::min);
        assert_relative_eq!(min_width, separation, epsilon = 1e-9);

        for (pose, &width) in set.poses().iter().zip(set.widths()) {
            assert!(width <= ParallelJawGripper::new().opening_width + 1e-9);
            // Contact midpoints lie strictly between the patches.
            assert!(pose.translation.z > 0.0 && pose.translation.z < separation);
        }
    }

    #[test]
    fn test_deterministic_with_seed() {
        let surface = two_patch_surface(0.05, 4, 0.01);
        let params = AntipodalParams::new().with_seed(7).with_target_count(20);

        let a = sample_antipodal_grasps(&surface, &ParallelJawGripper::new(), &params).unwrap();
        let b = sample_antipodal_grasps(&surface, &ParallelJawGripper::new(), &params).unwrap();

        assert_eq!(a, b);
        assert_eq!(a.len(), 20);
    }

    #[test]
    fn test_deterministic_with_rotation_offset() {
        let surface = two_patch_surface(0.05, 4, 0.01);
        let params = AntipodalParams::new()
            .with_seed(11)
            .with_target_count(10)
            .with_rotation_offset_range(0.5);

        let a = sample_antipodal_grasps(&surface, &ParallelJawGripper::new(), &params).unwrap();
        let b = sample_antipodal_grasps(&surface, &ParallelJawGripper::new(), &params).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_grasp_frame_is_orthonormal_and_aligned() {
        let surface = two_patch_surface(0.05, 3, 0.01);
        let params = AntipodalParams::new()
            .with_seed(3)
            .with_target_count(50)
            .with_rotation_offset_range(1.0);
        let set =
            sample_antipodal_grasps(&surface, &ParallelJawGripper::new(), &params).unwrap();
        assert!(!set.is_empty());

        for grasp in set.iter() {
            let closing = grasp.closing_axis();
            let approach = grasp.approach_axis();
            assert_relative_eq!(closing.norm(), 1.0, epsilon = 1e-9);
            assert_relative_eq!(approach.norm(), 1.0, epsilon = 1e-9);
            assert_relative_eq!(closing.dot(&approach), 0.0, epsilon = 1e-9);
            // Contacts lie across the gap; the chord tilts from vertical by
            // at most the cone half-angle, atan(0.5).
            assert!(closing.z.abs() > 0.85);
        }
    }

    #[test]
    fn test_scores_in_unit_interval() {
        let surface = two_patch_surface(0.05, 4, 0.01);
        let params = AntipodalParams::new().with_seed(5).with_target_count(100);
        let set =
            sample_antipodal_grasps(&surface, &ParallelJawGripper::new(), &params).unwrap();

        let scores = set.scores().unwrap();
        assert!(!scores.is_empty());
        for &score in scores {
            assert!(score > 0.0 && score <= 1.0);
        }
    }

    #[test]
    fn test_min_width_filter_excludes_everything() {
        // All feasible chords are shorter than 6 cm.
        let surface = two_patch_surface(0.05, 4, 0.01);
        let params = AntipodalParams::new().with_seed(9).with_min_width(0.06);
        let set =
            sample_antipodal_grasps(&surface, &ParallelJawGripper::new(), &params).unwrap();
        assert!(set.is_empty());
    }

    #[test]
    fn test_single_flat_patch_has_no_antipodal_pairs() {
        let mut positions = Vec::new();
        let mut normals = Vec::new();
        for i in 0..4 {
            for j in 0..4 {
                positions.push(Point3::new(i as f64 * 0.01, j as f64 * 0.01, 0.0));
                normals.push(Vector3::z());
            }
        }
        let surface = SurfaceSample::try_new(&positions, &normals).unwrap();
        let set = sample_antipodal_grasps(
            &surface,
            &ParallelJawGripper::new(),
            &AntipodalParams::new().with_seed(2),
        )
        .unwrap();
        assert!(set.is_empty());
    }

    #[test]
    fn test_collision_check_prunes_all() {
        let surface = two_patch_surface(0.05, 3, 0.01);
        let set = sample_antipodal_grasps_with(
            &surface,
            &ParallelJawGripper::new(),
            &AntipodalParams::new().with_seed(4),
            &RejectAll,
        )
        .unwrap();
        assert!(set.is_empty());
    }

    #[test]
    fn test_zero_pair_budget_returns_empty() {
        let surface = two_patch_surface(0.05, 3, 0.01);
        let params = AntipodalParams::new().with_seed(6).with_max_pairs(0);
        let set =
            sample_antipodal_grasps(&surface, &ParallelJawGripper::new(), &params).unwrap();
        assert!(set.is_empty());
    }

    #[test]
    fn test_negative_friction_is_invalid() {
        let surface = two_patch_surface(0.05, 2, 0.01);
        let params = AntipodalParams::new().with_friction(-0.1);
        let result = sample_antipodal_grasps(&surface, &ParallelJawGripper::new(), &params);
        assert!(matches!(result, Err(SampleError::InvalidParameter(_))));
    }

    #[test]
    fn test_max_width_beyond_gripper_is_invalid() {
        let surface = two_patch_surface(0.05, 2, 0.01);
        let params = AntipodalParams::new().with_max_width(0.2);
        let result = sample_antipodal_grasps(&surface, &ParallelJawGripper::new(), &params);
        assert!(matches!(result, Err(SampleError::InvalidParameter(_))));
    }

    #[test]
    fn test_frictionless_accepts_only_aligned_pairs() {
        let separation = 0.05;
        let surface = two_patch_surface(separation, 4, 0.01);
        let params = AntipodalParams::new()
            .with_seed(8)
            .with_friction(0.0)
            .with_target_count(500);
        let set =
            sample_antipodal_grasps(&surface, &ParallelJawGripper::new(), &params).unwrap();

        // Only directly-opposed pairs survive the zero-width cone.
        assert!(!set.is_empty());
        for &width in set.widths() {
            assert_relative_eq!(width, separation, epsilon = 1e-9);
        }
    }
}

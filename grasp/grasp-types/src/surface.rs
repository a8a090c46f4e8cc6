//! Surface-sample input type for grasp sampling.

use nalgebra::{Point3, Vector3};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{GraspError, GraspResult};

/// Minimum length below which a normal is rejected as degenerate.
pub const MIN_NORMAL_LENGTH: f64 = 1e-9;

/// A surface point with its outward unit normal.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SurfacePoint {
    /// Position of the point.
    pub position: Point3<f64>,
    /// Unit normal at the point.
    pub normal: Vector3<f64>,
}

impl SurfacePoint {
    /// Creates a surface point from position and normal.
    #[must_use]
    pub const fn new(position: Point3<f64>, normal: Vector3<f64>) -> Self {
        Self { position, normal }
    }
}

/// A discretized representation of an object's exterior.
///
/// Point positions with per-point unit normals, optionally with a triangle
/// list over the points for consumers that need adjacency. This is the
/// shape in which mesh/point-cloud I/O collaborators deliver geometry to
/// the sampler; no on-disk format is implied.
///
/// # Example
///
/// ```
/// use grasp_types::SurfaceSample;
/// use nalgebra::{Point3, Vector3};
///
/// let surface = SurfaceSample::try_new(
///     &[Point3::new(0.0, 0.0, 0.0), Point3::new(0.0, 0.0, 0.05)],
///     &[Vector3::new(0.0, 0.0, 1.0), Vector3::new(0.0, 0.0, -1.0)],
/// )
/// .unwrap();
///
/// assert_eq!(surface.len(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SurfaceSample {
    /// The surface points.
    pub points: Vec<SurfacePoint>,
    /// Optional triangle list indexing into `points`.
    pub triangles: Option<Vec<[u32; 3]>>,
}

impl SurfaceSample {
    /// Creates an empty surface sample.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            points: Vec::new(),
            triangles: None,
        }
    }

    /// Creates a surface sample from parallel position and normal arrays.
    ///
    /// Normals of non-unit length are explicitly renormalized here; this is
    /// the only place the data model corrects input geometry, and normals
    /// too short to normalize are rejected rather than guessed at.
    ///
    /// # Errors
    ///
    /// - [`GraspError::ShapeMismatch`] if the arrays disagree in length.
    /// - [`GraspError::DegenerateGeometry`] if any normal is shorter than
    ///   [`MIN_NORMAL_LENGTH`].
    pub fn try_new(positions: &[Point3<f64>], normals: &[Vector3<f64>]) -> GraspResult<Self> {
        if normals.len() != positions.len() {
            return Err(GraspError::ShapeMismatch {
                expected: positions.len(),
                actual: normals.len(),
            });
        }

        let mut points = Vec::with_capacity(positions.len());
        for (index, (&position, normal)) in positions.iter().zip(normals).enumerate() {
            let length = normal.norm();
            if !length.is_finite() || length < MIN_NORMAL_LENGTH {
                return Err(GraspError::DegenerateGeometry { index, length });
            }
            points.push(SurfacePoint::new(position, normal / length));
        }

        Ok(Self {
            points,
            triangles: None,
        })
    }

    /// Attaches a triangle list to this sample.
    ///
    /// # Errors
    ///
    /// Returns [`GraspError::IndexOutOfRange`] if any triangle references a
    /// point outside the sample.
    pub fn with_triangles(mut self, triangles: Vec<[u32; 3]>) -> GraspResult<Self> {
        let len = self.points.len();
        for triangle in &triangles {
            for &index in triangle {
                if index as usize >= len {
                    return Err(GraspError::IndexOutOfRange {
                        index: index as usize,
                        len,
                    });
                }
            }
        }
        self.triangles = Some(triangles);
        Ok(self)
    }

    /// Number of surface points.
    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Returns true if the sample has no points.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

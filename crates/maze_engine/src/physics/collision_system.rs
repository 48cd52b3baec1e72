//! Per-frame collision sweep
//!
//! Tests the player sphere against every triangle of the scene. There is no
//! broad phase: the field holds at most a few thousand triangles and each
//! narrow-phase test is a fixed handful of dot products, so a linear sweep is
//! cheap. Triangles never change after scene construction, which lets the
//! sweep run on the rayon thread pool without any locking; both paths return
//! identical, index-ordered results.

use rayon::prelude::*;

use crate::foundation::math::Vec3;
use crate::physics::collision::{BoundingSphere, Triangle};

/// A triangle the sphere overlaps this frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    /// Index of the triangle in the scene
    pub triangle_index: usize,
    /// Closest point of the triangle to the sphere centre
    pub closest_point: Vec3,
    /// Squared distance between that point and the centre
    pub distance_squared: f32,
}

/// Outcome of one sweep
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SweepResult {
    /// Overlapping triangles in ascending index order
    pub contacts: Vec<Contact>,
    /// Closest point of every triangle, by index; empty unless requested
    pub closest_points: Vec<Vec3>,
    /// Whether the goal triangle is among the contacts
    pub goal_reached: bool,
}

impl SweepResult {
    /// True when the sphere overlaps at least one triangle
    pub fn is_colliding(&self) -> bool {
        !self.contacts.is_empty()
    }
}

/// Collision system over an immutable triangle field
pub struct TriangleCollisionSystem {
    triangles: Vec<Triangle>,
    goal_index: Option<usize>,
    parallel: bool,
}

impl TriangleCollisionSystem {
    /// Create a system over `triangles`; touching `goal_index` sets
    /// [`SweepResult::goal_reached`]
    pub fn new(triangles: Vec<Triangle>, goal_index: Option<usize>) -> Self {
        Self {
            triangles,
            goal_index,
            parallel: false,
        }
    }

    /// Choose between the sequential and the rayon sweep
    #[must_use]
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Whether sweeps run in parallel
    pub fn is_parallel(&self) -> bool {
        self.parallel
    }

    /// Triangles in scene order
    pub fn triangles(&self) -> &[Triangle] {
        &self.triangles
    }

    /// Get the number of triangles
    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    /// Index of the goal triangle
    pub fn goal_index(&self) -> Option<usize> {
        self.goal_index
    }

    /// The goal triangle, if configured and present
    pub fn goal_triangle(&self) -> Option<&Triangle> {
        self.goal_index.and_then(|index| self.triangles.get(index))
    }

    /// Test `sphere` against every triangle
    ///
    /// With `collect_closest_points` the closest point of every triangle is
    /// returned as well, for debug overlays.
    pub fn sweep(&self, sphere: &BoundingSphere, collect_closest_points: bool) -> SweepResult {
        let checks: Vec<(Vec3, Option<Contact>)> = if self.parallel {
            self.triangles
                .par_iter()
                .enumerate()
                .map(|(index, triangle)| check_triangle(index, triangle, sphere))
                .collect()
        } else {
            self.triangles
                .iter()
                .enumerate()
                .map(|(index, triangle)| check_triangle(index, triangle, sphere))
                .collect()
        };

        let mut result = SweepResult::default();
        if collect_closest_points {
            result.closest_points.reserve(checks.len());
        }
        for (closest, contact) in checks {
            if collect_closest_points {
                result.closest_points.push(closest);
            }
            if let Some(contact) = contact {
                result.contacts.push(contact);
            }
        }

        result.goal_reached = self
            .goal_index
            .is_some_and(|goal| result.contacts.iter().any(|c| c.triangle_index == goal));

        result
    }

    /// True when `sphere` overlaps any triangle; stops at the first hit
    pub fn is_colliding(&self, sphere: &BoundingSphere) -> bool {
        if self.parallel {
            self.triangles.par_iter().any(|t| sphere.intersect_triangle(t).is_some())
        } else {
            self.triangles.iter().any(|t| sphere.intersect_triangle(t).is_some())
        }
    }
}

fn check_triangle(
    index: usize,
    triangle: &Triangle,
    sphere: &BoundingSphere,
) -> (Vec3, Option<Contact>) {
    let closest_point = triangle.closest_point_to(sphere.center);
    let contact = sphere.contains_point(closest_point).then(|| Contact {
        triangle_index: index,
        closest_point,
        distance_squared: (closest_point - sphere.center).magnitude_squared(),
    });
    (closest_point, contact)
}

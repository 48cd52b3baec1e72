//! Primitive collision shapes and the point-versus-triangle query
//!
//! Provides the geometric primitives (edges, planes, triangles, spheres) used
//! by the collision sweep. All of them are immutable values: every derived
//! quantity is computed once in the constructor and read-only afterwards, so a
//! triangle can be shared freely between threads.
//!
//! The central routine is [`Triangle::closest_point_to`], which classifies the
//! query point into the vertex, edge or face region of the triangle.

use thiserror::Error;

use crate::foundation::math::Vec3;

/// Errors raised by the checked geometry constructors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeometryError {
    /// Both endpoints of an edge coincide
    #[error("degenerate edge: endpoints {0:?} and {1:?} coincide")]
    DegenerateEdge(Vec3, Vec3),

    /// The three vertices of a triangle are collinear
    #[error("degenerate triangle: vertices {0:?}, {1:?}, {2:?} are collinear")]
    DegenerateTriangle(Vec3, Vec3, Vec3),
}

/// A line segment with its direction and squared length cached
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Edge {
    /// Start point
    pub a: Vec3,
    /// End point
    pub b: Vec3,
    /// `b - a`
    pub delta: Vec3,
    /// `|b - a|²`
    pub length_squared: f32,
}

impl Edge {
    /// Creates an edge from `a` to `b`
    ///
    /// The endpoints must differ; [`Edge::project`] divides by the squared length.
    pub fn new(a: Vec3, b: Vec3) -> Self {
        let delta = b - a;
        let length_squared = delta.magnitude_squared();
        debug_assert!(length_squared > 0.0, "edge endpoints coincide");
        Self { a, b, delta, length_squared }
    }

    /// Creates an edge, rejecting coincident endpoints
    pub fn try_new(a: Vec3, b: Vec3) -> Result<Self, GeometryError> {
        let length_squared = (b - a).magnitude_squared();
        if length_squared > 0.0 && length_squared.is_finite() {
            Ok(Self::new(a, b))
        } else {
            Err(GeometryError::DegenerateEdge(a, b))
        }
    }

    /// Point `a + t * delta`; `t` is not clamped
    pub fn point_at(&self, t: f32) -> Vec3 {
        self.a + self.delta * t
    }

    /// Parameter of the orthogonal projection of `p` onto the infinite line
    /// through the edge. Values in `[0, 1]` fall on the segment itself.
    pub fn project(&self, p: Vec3) -> f32 {
        (p - self.a).dot(&self.delta) / self.length_squared
    }
}

/// A plane given by a point on it and a (not necessarily unit) normal
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Plane {
    /// Any point on the plane
    pub point: Vec3,
    /// Normal; its length carries no meaning
    pub direction: Vec3,
}

impl Plane {
    /// Creates a plane through `point` with normal `direction`
    pub fn new(point: Vec3, direction: Vec3) -> Self {
        Self { point, direction }
    }

    /// True when `q` lies strictly on the side `direction` points to
    pub fn is_above(&self, q: Vec3) -> bool {
        self.direction.dot(&(q - self.point)) > 0.0
    }

    /// Signed distance of `q` from the plane, positive on the `direction` side
    pub fn signed_distance(&self, q: Vec3) -> f32 {
        self.direction.normalize().dot(&(q - self.point))
    }

    /// Orthogonal projection of `p` onto the plane
    pub fn project(&self, p: Vec3) -> Vec3 {
        let unit = self.direction.normalize();
        p - unit * unit.dot(&(p - self.point))
    }
}

/// A triangle with its edges, face plane and side planes precomputed
///
/// Vertices are expected counter-clockwise when seen from the side the face
/// normal points to. `tri_norm` is not normalized; its length is twice the
/// area of the triangle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Triangle {
    /// First vertex
    pub a: Vec3,
    /// Second vertex
    pub b: Vec3,
    /// Third vertex
    pub c: Vec3,
    /// Edge from `a` to `b`
    pub edge_ab: Edge,
    /// Edge from `b` to `c`
    pub edge_bc: Edge,
    /// Edge from `c` to `a`
    pub edge_ca: Edge,
    /// `cross(a - b, a - c)`
    pub tri_norm: Vec3,
    /// Plane of the face
    pub tri_plane: Plane,
    /// Plane through `ab`, perpendicular to the face, normal pointing inward
    pub plane_ab: Plane,
    /// Plane through `bc`, perpendicular to the face, normal pointing inward
    pub plane_bc: Plane,
    /// Plane through `ca`, perpendicular to the face, normal pointing inward
    pub plane_ca: Plane,
}

impl Triangle {
    /// Creates a triangle and derives its edges and planes
    ///
    /// The vertices must not be collinear. Use [`Triangle::try_new`] for
    /// untrusted input.
    pub fn new(a: Vec3, b: Vec3, c: Vec3) -> Self {
        let edge_ab = Edge::new(a, b);
        let edge_bc = Edge::new(b, c);
        let edge_ca = Edge::new(c, a);
        let tri_norm = (a - b).cross(&(a - c));
        debug_assert!(tri_norm.magnitude_squared() > 0.0, "triangle vertices are collinear");

        Self {
            a,
            b,
            c,
            edge_ab,
            edge_bc,
            edge_ca,
            tri_norm,
            tri_plane: Plane::new(a, tri_norm),
            plane_ab: Plane::new(a, tri_norm.cross(&edge_ab.delta)),
            plane_bc: Plane::new(b, tri_norm.cross(&edge_bc.delta)),
            plane_ca: Plane::new(c, tri_norm.cross(&edge_ca.delta)),
        }
    }

    /// Creates a triangle, rejecting coincident or collinear vertices
    pub fn try_new(a: Vec3, b: Vec3, c: Vec3) -> Result<Self, GeometryError> {
        Edge::try_new(a, b)?;
        Edge::try_new(b, c)?;
        Edge::try_new(c, a)?;

        // Relative test so tiny but well-shaped triangles still pass
        let normal_squared = (a - b).cross(&(a - c)).magnitude_squared();
        let scale = (b - a).magnitude_squared() * (c - a).magnitude_squared();
        if !normal_squared.is_finite() || normal_squared <= scale * f32::EPSILON {
            return Err(GeometryError::DegenerateTriangle(a, b, c));
        }

        Ok(Self::new(a, b, c))
    }

    /// Area of the triangle
    pub fn area(&self) -> f32 {
        self.tri_norm.magnitude() * 0.5
    }

    /// Calculates the centroid (center point) of the triangle
    pub fn centroid(&self) -> Vec3 {
        (self.a + self.b + self.c) / 3.0
    }

    /// Closest point on the filled triangle to `p`
    ///
    /// Vertex regions are tested before edge regions: a point beyond a shared
    /// vertex projects outside `[0, 1]` on both adjacent edges, which the
    /// per-edge side-plane test alone would misclassify.
    pub fn closest_point_to(&self, p: Vec3) -> Vec3 {
        let uab = self.edge_ab.project(p);
        let uca = self.edge_ca.project(p);

        if uca > 1.0 && uab < 0.0 {
            return self.a;
        }

        let ubc = self.edge_bc.project(p);

        if uab > 1.0 && ubc < 0.0 {
            return self.b;
        }

        if ubc > 1.0 && uca < 0.0 {
            return self.c;
        }

        if (0.0..=1.0).contains(&uab) && !self.plane_ab.is_above(p) {
            return self.edge_ab.point_at(uab);
        }

        if (0.0..=1.0).contains(&ubc) && !self.plane_bc.is_above(p) {
            return self.edge_bc.point_at(ubc);
        }

        if (0.0..=1.0).contains(&uca) && !self.plane_ca.is_above(p) {
            return self.edge_ca.point_at(uca);
        }

        self.tri_plane.project(p)
    }

    /// Squared distance from `p` to the triangle
    pub fn distance_squared_to(&self, p: Vec3) -> f32 {
        (self.closest_point_to(p) - p).magnitude_squared()
    }

    /// Barycentric coordinates `(u, v, w)` of `p` projected onto the face,
    /// so that the projection equals `u * a + v * b + w * c`
    pub fn barycentric(&self, p: Vec3) -> (f32, f32, f32) {
        let v0 = self.b - self.a;
        let v1 = self.c - self.a;
        let v2 = p - self.a;
        let d00 = v0.dot(&v0);
        let d01 = v0.dot(&v1);
        let d11 = v1.dot(&v1);
        let d20 = v2.dot(&v0);
        let d21 = v2.dot(&v1);
        let denom = d00 * d11 - d01 * d01;
        let v = (d11 * d20 - d01 * d21) / denom;
        let w = (d00 * d21 - d01 * d20) / denom;
        (1.0 - v - w, v, w)
    }
}

/// A bounding sphere for collision detection
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingSphere {
    /// The center position of the sphere in world space
    pub center: Vec3,
    /// The radius of the sphere
    pub radius: f32,
}

impl BoundingSphere {
    /// Creates a new bounding sphere with the given center and radius
    pub fn new(center: Vec3, radius: f32) -> Self {
        Self { center, radius }
    }

    /// True when `point` lies strictly inside the sphere
    pub fn contains_point(&self, point: Vec3) -> bool {
        (point - self.center).magnitude_squared() < self.radius * self.radius
    }

    /// Closest point of `triangle` and its squared distance, if that point
    /// lies strictly inside the sphere
    pub fn intersect_triangle(&self, triangle: &Triangle) -> Option<(Vec3, f32)> {
        let closest = triangle.closest_point_to(self.center);
        self.contains_point(closest)
            .then(|| (closest, (closest - self.center).magnitude_squared()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::Transform;
    use approx::assert_relative_eq;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    const EPSILON: f32 = 1e-5;

    fn unit_triangle() -> Triangle {
        Triangle::new(
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
        )
    }

    fn random_vec(rng: &mut StdRng, extent: f32) -> Vec3 {
        Vec3::new(
            rng.gen_range(-extent..extent),
            rng.gen_range(-extent..extent),
            rng.gen_range(-extent..extent),
        )
    }

    /// Random triangle with a reasonable area so barycentric checks stay stable
    fn random_triangle(rng: &mut StdRng) -> Triangle {
        loop {
            let (a, b, c) = (random_vec(rng, 1.0), random_vec(rng, 1.0), random_vec(rng, 1.0));
            if let Ok(triangle) = Triangle::try_new(a, b, c) {
                let shortest = triangle
                    .edge_ab
                    .length_squared
                    .min(triangle.edge_bc.length_squared)
                    .min(triangle.edge_ca.length_squared);
                if triangle.area() > 0.1 && shortest > 0.05 {
                    return triangle;
                }
            }
        }
    }

    fn random_point_on(rng: &mut StdRng, triangle: &Triangle) -> Vec3 {
        let mut s: f32 = rng.gen_range(0.0..1.0);
        let mut t: f32 = rng.gen_range(0.0..1.0);
        if s + t > 1.0 {
            s = 1.0 - s;
            t = 1.0 - t;
        }
        triangle.a + (triangle.b - triangle.a) * s + (triangle.c - triangle.a) * t
    }

    #[test]
    fn test_edge_project_and_point_at() {
        let edge = Edge::new(Vec3::new(1.0, 1.0, 0.0), Vec3::new(3.0, 1.0, 0.0));
        assert_relative_eq!(edge.length_squared, 4.0);
        assert_relative_eq!(edge.project(Vec3::new(2.0, 5.0, -3.0)), 0.5);
        assert_relative_eq!(edge.project(Vec3::new(-1.0, 0.0, 0.0)), -1.0);
        assert_relative_eq!(edge.point_at(1.5), Vec3::new(4.0, 1.0, 0.0));
    }

    #[test]
    fn test_edge_try_new_rejects_zero_length() {
        let p = Vec3::new(0.5, 0.5, 0.5);
        assert_eq!(Edge::try_new(p, p), Err(GeometryError::DegenerateEdge(p, p)));
    }

    #[test]
    fn test_plane_is_above_is_strict() {
        let plane = Plane::new(Vec3::new(0.0, 0.0, 1.0), Vec3::new(0.0, 0.0, 3.0));
        assert!(plane.is_above(Vec3::new(5.0, -2.0, 1.5)));
        assert!(!plane.is_above(Vec3::new(5.0, -2.0, 1.0)));
        assert!(!plane.is_above(Vec3::new(0.0, 0.0, 0.0)));
    }

    #[test]
    fn test_plane_project_ignores_normal_length() {
        let direction = Vec3::new(0.0, 0.0, 7.0);
        let plane = Plane::new(Vec3::new(0.0, 0.0, 2.0), direction);
        assert_relative_eq!(plane.project(Vec3::new(1.0, 2.0, 9.0)), Vec3::new(1.0, 2.0, 2.0));
        assert_relative_eq!(plane.signed_distance(Vec3::new(1.0, 2.0, -1.0)), -3.0);
        assert_eq!(plane.direction, direction);
    }

    #[test]
    fn test_derived_state() {
        let triangle = unit_triangle();
        // cross(a - b, a - c) for the unit triangle points along +z
        assert_relative_eq!(triangle.tri_norm, Vec3::new(0.0, 0.0, 1.0));
        assert_relative_eq!(triangle.area(), 0.5);
        // side planes point toward the interior
        assert!(triangle.plane_ab.is_above(Vec3::new(0.25, 0.25, 0.0)));
        assert!(triangle.plane_bc.is_above(Vec3::new(0.25, 0.25, 0.0)));
        assert!(triangle.plane_ca.is_above(Vec3::new(0.25, 0.25, 0.0)));
    }

    #[test]
    fn test_try_new_rejects_collinear() {
        let result = Triangle::try_new(
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(1.0, 1.0, 1.0),
            Vec3::new(2.0, 2.0, 2.0),
        );
        assert!(matches!(result, Err(GeometryError::DegenerateTriangle(..))));

        let repeated = Triangle::try_new(Vec3::zeros(), Vec3::zeros(), Vec3::new(1.0, 0.0, 0.0));
        assert!(matches!(repeated, Err(GeometryError::DegenerateEdge(..))));
    }

    #[test]
    fn test_vertex_regions() {
        let triangle = unit_triangle();
        assert_eq!(triangle.closest_point_to(Vec3::new(-1.0, -1.0, 0.0)), triangle.a);
        assert_eq!(triangle.closest_point_to(Vec3::new(2.0, -0.5, 0.3)), triangle.b);
        assert_eq!(triangle.closest_point_to(Vec3::new(-0.5, 2.0, -0.3)), triangle.c);
    }

    #[test]
    fn test_edge_regions() {
        let triangle = unit_triangle();
        assert_relative_eq!(
            triangle.closest_point_to(Vec3::new(0.5, -1.0, 0.0)),
            Vec3::new(0.5, 0.0, 0.0),
            epsilon = EPSILON
        );
        assert_relative_eq!(
            triangle.closest_point_to(Vec3::new(1.0, 1.0, 2.0)),
            Vec3::new(0.5, 0.5, 0.0),
            epsilon = EPSILON
        );
        assert_relative_eq!(
            triangle.closest_point_to(Vec3::new(-3.0, 0.25, -1.0)),
            Vec3::new(0.0, 0.25, 0.0),
            epsilon = EPSILON
        );
    }

    #[test]
    fn test_face_region() {
        let triangle = unit_triangle();
        assert_relative_eq!(
            triangle.closest_point_to(Vec3::new(0.2, 0.2, 5.0)),
            Vec3::new(0.2, 0.2, 0.0),
            epsilon = EPSILON
        );
        assert_relative_eq!(
            triangle.closest_point_to(Vec3::new(0.1, 0.6, -2.0)),
            Vec3::new(0.1, 0.6, 0.0),
            epsilon = EPSILON
        );
    }

    #[test]
    fn test_points_on_surface_are_fixed() {
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..200 {
            let triangle = random_triangle(&mut rng);
            let p = random_point_on(&mut rng, &triangle);
            assert_relative_eq!(triangle.closest_point_to(p), p, epsilon = 1e-4);
        }
        let triangle = unit_triangle();
        for vertex in [triangle.a, triangle.b, triangle.c] {
            assert_relative_eq!(triangle.closest_point_to(vertex), vertex, epsilon = EPSILON);
        }
    }

    #[test]
    fn test_result_lies_on_triangle() {
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..500 {
            let triangle = random_triangle(&mut rng);
            let p = random_vec(&mut rng, 2.0);
            let closest = triangle.closest_point_to(p);

            assert!(triangle.tri_plane.signed_distance(closest).abs() < 1e-4);

            let (u, v, w) = triangle.barycentric(closest);
            for coordinate in [u, v, w] {
                assert!((-1e-3..=1.0 + 1e-3).contains(&coordinate), "{u} {v} {w}");
            }
            assert_relative_eq!(u + v + w, 1.0, epsilon = 1e-4);
        }
    }

    #[test]
    fn test_result_is_nearest_point() {
        let mut rng = StdRng::seed_from_u64(29);
        for _ in 0..200 {
            let triangle = random_triangle(&mut rng);
            let p = random_vec(&mut rng, 2.0);
            let best = triangle.distance_squared_to(p).sqrt();

            for _ in 0..100 {
                let q = random_point_on(&mut rng, &triangle);
                assert!(best <= (q - p).magnitude() + 1e-4);
            }
            for vertex in [triangle.a, triangle.b, triangle.c] {
                assert!(best <= (vertex - p).magnitude() + 1e-4);
            }
        }
    }

    #[test]
    fn test_rigid_transform_commutes() {
        let mut rng = StdRng::seed_from_u64(47);
        for _ in 0..200 {
            let triangle = random_triangle(&mut rng);
            let p = random_vec(&mut rng, 2.0);
            let transform = Transform::from_position_euler_degrees(
                random_vec(&mut rng, 3.0),
                Vec3::new(
                    rng.gen_range(0.0..360.0),
                    rng.gen_range(0.0..360.0),
                    rng.gen_range(0.0..360.0),
                ),
            );

            let moved = Triangle::new(
                transform.transform_point(triangle.a),
                transform.transform_point(triangle.b),
                transform.transform_point(triangle.c),
            );
            let expected = transform.transform_point(triangle.closest_point_to(p));
            let actual = moved.closest_point_to(transform.transform_point(p));
            assert_relative_eq!(actual, expected, epsilon = 1e-3);
        }
    }

    #[test]
    fn test_sphere_contains_point_is_strict() {
        let sphere = BoundingSphere::new(Vec3::zeros(), 1.0);
        assert!(sphere.contains_point(Vec3::new(0.5, 0.5, 0.5)));
        assert!(!sphere.contains_point(Vec3::new(1.0, 0.0, 0.0)));
    }

    #[test]
    fn test_sphere_triangle_intersection() {
        let triangle = unit_triangle();

        let touching = BoundingSphere::new(Vec3::new(0.2, 0.2, 0.05), 0.1);
        let (point, distance_squared) = touching.intersect_triangle(&triangle).unwrap();
        assert_relative_eq!(point, Vec3::new(0.2, 0.2, 0.0), epsilon = EPSILON);
        assert_relative_eq!(distance_squared, 0.0025, epsilon = EPSILON);

        let clear = BoundingSphere::new(Vec3::new(-0.5, -0.5, 0.0), 0.5);
        assert!(clear.intersect_triangle(&triangle).is_none());
    }
}

//! Scene builder - seeded population of the triangle field
//!
//! Cells are visited z-major, then y, then x. Every cell draws three whole
//! degrees in `[0, 360)` from a `StdRng` seeded with the configured seed, so
//! one seed always yields the same field on every platform.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use thiserror::Error;

use crate::core::config::{SceneConfig, MAX_GRID_SIZE};
use crate::foundation::math::utils::vec3_from_array;
use crate::foundation::math::{Quat, Transform, Vec3};
use crate::physics::collision::{GeometryError, Triangle};

/// Scene construction errors
#[derive(Error, Debug)]
pub enum SceneError {
    /// The grid has no cells
    #[error("scene grid must have at least one cell per axis")]
    EmptyGrid,

    /// The grid has more cells than the scene may hold
    #[error("scene grid of {0} cells per axis is too large (maximum {MAX_GRID_SIZE})")]
    GridTooLarge(u32),

    /// The base triangle or one of its transformed copies is degenerate
    #[error("geometry error: {0}")]
    Geometry(#[from] GeometryError),
}

/// Placement of one triangle copy, as a renderer would upload it per instance
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TriangleInstance {
    /// Cell centre the base triangle is moved to
    pub translation: Vec3,
    /// Rotation applied to the base triangle before translating
    pub rotation: Quat,
    /// The drawn rotation angles in whole degrees, about X, Y and Z
    pub euler_degrees: [u32; 3],
}

impl TriangleInstance {
    /// Rigid transform of this instance
    pub fn transform(&self) -> Transform {
        Transform::from_position_rotation(self.translation, self.rotation)
    }
}

/// Immutable triangle field
#[derive(Debug, Clone)]
pub struct Scene {
    grid_size: u32,
    triangles: Vec<Triangle>,
    instances: Vec<TriangleInstance>,
}

impl Scene {
    /// Cells per axis
    pub fn grid_size(&self) -> u32 {
        self.grid_size
    }

    /// Triangles in generation order
    pub fn triangles(&self) -> &[Triangle] {
        &self.triangles
    }

    /// Instance data in generation order
    pub fn instances(&self) -> &[TriangleInstance] {
        &self.instances
    }

    /// Number of triangles
    pub fn len(&self) -> usize {
        self.triangles.len()
    }

    /// True when the scene holds no triangles
    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    /// Linear index of cell `(x, y, z)`, each in `0..grid_size`
    pub fn linear_index(&self, x: u32, y: u32, z: u32) -> usize {
        let n = self.grid_size as usize;
        (z as usize * n + y as usize) * n + x as usize
    }

    /// Triangle generated for cell `(x, y, z)`
    ///
    /// Returns `None` for coordinates outside the grid or for the cell whose
    /// triangle was dropped.
    pub fn triangle_at(&self, x: u32, y: u32, z: u32) -> Option<&Triangle> {
        if x >= self.grid_size || y >= self.grid_size || z >= self.grid_size {
            return None;
        }
        self.triangles.get(self.linear_index(x, y, z))
    }

    /// Give up the triangles, e.g. to hand them to the collision system
    pub fn into_triangles(self) -> Vec<Triangle> {
        self.triangles
    }
}

/// Builds a [`Scene`] from a [`SceneConfig`]
pub struct SceneBuilder {
    config: SceneConfig,
}

impl SceneBuilder {
    /// Create a builder for `config`
    pub fn new(config: &SceneConfig) -> Self {
        Self {
            config: config.clone(),
        }
    }

    /// Centre of cell `index` along one axis: `(-N + 2 * index) / N + 1 / N`
    #[allow(clippy::cast_precision_loss)]
    fn cell_center(index: u32, grid_size: u32) -> f32 {
        let n = grid_size as f32;
        let coordinate = 2.0 * index as f32 - n;
        coordinate / n + 1.0 / n
    }

    /// Generate the triangle field
    pub fn build(&self) -> Result<Scene, SceneError> {
        let grid_size = self.config.grid_size;
        if grid_size == 0 {
            return Err(SceneError::EmptyGrid);
        }

        let [a, b, c] = self.config.base_triangle.map(vec3_from_array);
        Triangle::try_new(a, b, c)?;

        let cells = (grid_size <= MAX_GRID_SIZE)
            .then(|| (grid_size as usize).checked_pow(3))
            .flatten()
            .ok_or(SceneError::GridTooLarge(grid_size))?;
        let mut triangles = Vec::with_capacity(cells);
        let mut instances = Vec::with_capacity(cells);
        let mut rng = StdRng::seed_from_u64(self.config.seed);

        for z in 0..grid_size {
            for y in 0..grid_size {
                for x in 0..grid_size {
                    let translation = Vec3::new(
                        Self::cell_center(x, grid_size),
                        Self::cell_center(y, grid_size),
                        Self::cell_center(z, grid_size),
                    );
                    let euler_degrees: [u32; 3] = [
                        rng.gen_range(0..360),
                        rng.gen_range(0..360),
                        rng.gen_range(0..360),
                    ];

                    #[allow(clippy::cast_precision_loss)]
                    let transform = Transform::from_position_euler_degrees(
                        translation,
                        Vec3::new(
                            euler_degrees[0] as f32,
                            euler_degrees[1] as f32,
                            euler_degrees[2] as f32,
                        ),
                    );

                    triangles.push(Triangle::try_new(
                        transform.transform_point(a),
                        transform.transform_point(b),
                        transform.transform_point(c),
                    )?);
                    instances.push(TriangleInstance {
                        translation,
                        rotation: transform.rotation,
                        euler_degrees,
                    });
                }
            }
        }

        if self.config.drop_last_triangle {
            triangles.pop();
            instances.pop();
            log::debug!("Dropped last generated triangle");
        }

        log::info!(
            "Built scene: {} triangles on a {}³ grid (seed {})",
            triangles.len(),
            grid_size,
            self.config.seed
        );

        Ok(Scene {
            grid_size,
            triangles,
            instances,
        })
    }
}

//! # Game Configuration
//!
//! Every tunable of the sphere maze lives here: the engine loop, the generated
//! triangle field, the player sphere and the arena it is confined to. All
//! sections use `#[serde(default)]`, so a config file only has to mention the
//! values it changes.
//!
//! ```toml
//! [scene]
//! seed = 7
//! grid_size = 6
//!
//! [engine]
//! log_level = "debug"
//! ```

use serde::{Serialize, Deserialize};

use crate::config::{Config, ConfigError};
use crate::foundation::math::utils::vec3_from_array;
use crate::foundation::math::Vec3;
use crate::physics::collision::Triangle;

/// # Engine Configuration
///
/// Frame loop behavior, logging and debug features.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Default log filter (overridden by `RUST_LOG`)
    pub log_level: String,
    /// Collect per-triangle closest points every frame for debug overlays
    pub debug_mode: bool,
    /// Whether the renderer should draw the extra fixed-camera viewports
    pub multi_view: bool,
    /// Target FPS for frame rate limiting
    pub target_fps: Option<u32>,
    /// Stop the loop after this many frames
    pub max_frames: Option<u64>,
    /// Run the per-frame triangle sweep on the rayon thread pool
    pub parallel_collision: bool,
}

impl EngineConfig {
    /// Create a new engine configuration
    pub fn new() -> Self {
        Self {
            log_level: "info".to_string(),
            debug_mode: true,
            multi_view: true,
            target_fps: None,
            max_frames: None,
            parallel_collision: false,
        }
    }

    /// Set log level
    #[must_use]
    pub fn with_log_level(mut self, level: impl Into<String>) -> Self {
        self.log_level = level.into();
        self
    }

    /// Enable or disable debug mode
    #[must_use]
    pub fn with_debug(mut self, enabled: bool) -> Self {
        self.debug_mode = enabled;
        self
    }

    /// Set target FPS
    #[must_use]
    pub fn with_target_fps(mut self, fps: u32) -> Self {
        self.target_fps = Some(fps);
        self
    }

    /// Limit the number of frames the loop runs
    #[must_use]
    pub fn with_max_frames(mut self, frames: u64) -> Self {
        self.max_frames = Some(frames);
        self
    }

    /// Enable the parallel collision sweep
    #[must_use]
    pub fn with_parallel_collision(mut self, enabled: bool) -> Self {
        self.parallel_collision = enabled;
        self
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Largest accepted grid size; 128³ is about two million triangles
pub const MAX_GRID_SIZE: u32 = 128;

/// # Scene Configuration
///
/// Describes the N×N×N grid of randomly rotated copies of one base triangle.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    /// Seed for the rotation generator; the same seed always builds the same scene
    pub seed: u64,
    /// Cells per axis (N)
    pub grid_size: u32,
    /// Model-space vertices of the triangle copied into every cell
    pub base_triangle: [[f32; 3]; 3],
    /// Discard the last generated triangle, the one occupying the default start cell
    pub drop_last_triangle: bool,
    /// Index of the triangle that ends the game when touched
    pub goal_triangle_index: Option<usize>,
}

impl SceneConfig {
    /// Create a scene configuration with the default base triangle
    pub fn new(seed: u64, grid_size: u32) -> Self {
        Self {
            seed,
            grid_size,
            base_triangle: [
                [-0.05, 0.05, 0.0],
                [0.05, -0.05, 0.0],
                [-0.05, -0.05, 0.0],
            ],
            drop_last_triangle: true,
            goal_triangle_index: Some(0),
        }
    }

    /// Number of triangles the scene builder will produce
    pub fn triangle_count(&self) -> usize {
        let n = self.grid_size as usize;
        let cells = n.saturating_mul(n).saturating_mul(n);
        if self.drop_last_triangle {
            cells.saturating_sub(1)
        } else {
            cells
        }
    }

    /// Base triangle as engine geometry, rejecting degenerate vertices
    pub fn base_triangle(&self) -> Result<Triangle, ConfigError> {
        let [a, b, c] = self.base_triangle;
        Triangle::try_new(vec3_from_array(a), vec3_from_array(b), vec3_from_array(c))
            .map_err(|e| ConfigError::Validation(format!("base triangle: {e}")))
    }

    /// Validate the scene settings
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.grid_size == 0 {
            return Err(ConfigError::Validation("grid size must be at least 1".to_string()));
        }
        if self.grid_size > MAX_GRID_SIZE {
            return Err(ConfigError::Validation(format!(
                "grid size {} exceeds the maximum of {MAX_GRID_SIZE}",
                self.grid_size
            )));
        }

        self.base_triangle()?;

        if let Some(goal) = self.goal_triangle_index {
            let count = self.triangle_count();
            if goal >= count {
                return Err(ConfigError::Validation(format!(
                    "goal triangle index {goal} out of range for {count} triangles"
                )));
            }
        }

        Ok(())
    }
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self::new(0, 10)
    }
}

/// # Sphere Configuration
///
/// The player sphere. Its radius shrinks as the grid gets denser so the maze
/// stays navigable: `radius = base_radius * reference_grid_size / grid_size`.
/// Without an explicit start position the sphere starts at the centre of the
/// last grid cell, `(N - 1) / N` on every axis.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SphereConfig {
    /// Centre of the sphere on the first frame; `None` for the last grid cell
    pub start_position: Option<[f32; 3]>,
    /// Radius at the reference grid size
    pub base_radius: f32,
    /// Grid size at which `base_radius` applies unscaled
    pub reference_grid_size: u32,
}

impl SphereConfig {
    /// Effective radius for a grid with `grid_size` cells per axis
    #[allow(clippy::cast_precision_loss)]
    pub fn radius_for_grid(&self, grid_size: u32) -> f32 {
        self.base_radius * (self.reference_grid_size as f32 / grid_size.max(1) as f32)
    }

    /// Start position for a grid with `grid_size` cells per axis
    #[allow(clippy::cast_precision_loss)]
    pub fn start_for_grid(&self, grid_size: u32) -> Vec3 {
        self.start_position.map_or_else(
            || {
                let n = grid_size.max(1) as f32;
                Vec3::repeat((n - 1.0) / n)
            },
            vec3_from_array,
        )
    }
}

impl Default for SphereConfig {
    fn default() -> Self {
        Self {
            start_position: None,
            base_radius: 0.05,
            reference_grid_size: 10,
        }
    }
}

/// # Arena Configuration
///
/// Axis-aligned cube centred on the origin that the sphere may not leave.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ArenaConfig {
    /// Half the edge length of the arena cube
    pub half_extent: f32,
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self { half_extent: 1.0 }
    }
}

/// # Complete Game Configuration
///
/// Top-level configuration loaded by the app and handed to the engine.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Engine loop configuration
    pub engine: EngineConfig,
    /// Triangle field configuration
    pub scene: SceneConfig,
    /// Player sphere configuration
    pub sphere: SphereConfig,
    /// Arena bounds
    pub arena: ArenaConfig,
}

impl GameConfig {
    /// Effective sphere radius for the configured grid
    pub fn sphere_radius(&self) -> f32 {
        self.sphere.radius_for_grid(self.scene.grid_size)
    }

    /// Effective start position for the configured grid
    pub fn start_position(&self) -> Vec3 {
        self.sphere.start_for_grid(self.scene.grid_size)
    }

    /// Validate the entire configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.scene.validate()?;
        self.validate_sphere()
    }

    /// Validate the sphere against the arena, independent of the scene
    pub fn validate_sphere(&self) -> Result<(), ConfigError> {
        let radius = self.sphere_radius();
        if !(radius > 0.0 && radius.is_finite()) {
            return Err(ConfigError::Validation(format!(
                "sphere radius must be positive, got {radius}"
            )));
        }

        let half_extent = self.arena.half_extent;
        if !(half_extent > radius && half_extent.is_finite()) {
            return Err(ConfigError::Validation(format!(
                "arena half extent {half_extent} must exceed the sphere radius {radius}"
            )));
        }

        let limit = half_extent - radius;
        let start = self.start_position();
        if !start.iter().all(|c| c.abs() < limit) {
            return Err(ConfigError::Validation(format!(
                "start position ({}, {}, {}) lies outside the arena",
                start.x, start.y, start.z
            )));
        }

        Ok(())
    }
}

impl Config for GameConfig {
    fn check(&self) -> Result<(), ConfigError> {
        self.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigFormat;
    use approx::assert_relative_eq;

    #[test]
    fn test_defaults_are_valid() {
        let config = GameConfig::default();
        config.validate().unwrap();
        assert_eq!(config.scene.triangle_count(), 999);
        assert_relative_eq!(config.sphere_radius(), 0.05);
        assert_relative_eq!(config.start_position(), Vec3::new(0.9, 0.9, 0.9), epsilon = 1e-6);
    }

    #[test]
    fn test_radius_scales_with_grid() {
        let sphere = SphereConfig::default();
        assert_relative_eq!(sphere.radius_for_grid(20), 0.025);
        assert_relative_eq!(sphere.radius_for_grid(5), 0.1);
    }

    #[test]
    fn test_default_start_fits_every_grid() {
        for grid_size in 1..=30 {
            let mut config = GameConfig::default();
            config.scene.grid_size = grid_size;
            config.scene.goal_triangle_index = None;
            config.validate().unwrap();
        }
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config: GameConfig = toml::from_str(
            r#"
            [scene]
            seed = 42
            grid_size = 4
            drop_last_triangle = true

            [engine]
            log_level = "debug"
            "#,
        )
        .unwrap();

        assert_eq!(config.scene.seed, 42);
        assert_eq!(config.scene.grid_size, 4);
        assert_eq!(config.scene.triangle_count(), 63);
        assert_eq!(config.scene.goal_triangle_index, Some(0));
        assert_eq!(config.engine.log_level, "debug");
        assert_relative_eq!(config.arena.half_extent, 1.0);
        config.validate().unwrap();
    }

    #[test]
    fn test_zero_grid_rejected() {
        let mut config = GameConfig::default();
        config.scene.grid_size = 0;
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn test_oversized_grid_rejected() {
        let mut config = GameConfig::default();
        config.scene.goal_triangle_index = None;

        config.scene.grid_size = MAX_GRID_SIZE;
        config.validate().unwrap();

        for grid_size in [MAX_GRID_SIZE + 1, 2_000, 3_000_000, u32::MAX] {
            config.scene.grid_size = grid_size;
            assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));
        }
    }

    #[test]
    fn test_collinear_base_triangle_rejected() {
        let mut config = GameConfig::default();
        config.scene.base_triangle = [[0.0, 0.0, 0.0], [1.0, 1.0, 1.0], [2.0, 2.0, 2.0]];
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn test_goal_index_out_of_range_rejected() {
        let mut config = GameConfig::default();
        config.scene.grid_size = 2;
        config.scene.drop_last_triangle = false;
        config.scene.goal_triangle_index = Some(8);
        assert!(config.validate().is_err());

        config.scene.goal_triangle_index = Some(7);
        config.validate().unwrap();

        config.scene.drop_last_triangle = true;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_start_outside_arena_rejected() {
        let mut config = GameConfig::default();
        config.sphere.start_position = Some([0.0, 0.97, 0.0]);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_unsupported_extension() {
        let result = GameConfig::load_from_file("settings.ini");
        assert!(matches!(result, Err(ConfigError::UnsupportedFormat(_))));
        let saved = GameConfig::default().save_to_file("settings.ini");
        assert!(matches!(saved, Err(ConfigError::UnsupportedFormat(_))));
    }

    #[test]
    fn test_ron_text_round_trip_keeps_start_position() {
        let mut config = GameConfig::default();
        config.sphere.start_position = Some([0.1, -0.2, 0.3]);
        config.scene.goal_triangle_index = None;

        let text = config.render(ConfigFormat::Ron).unwrap();
        let parsed = GameConfig::parse(&text, ConfigFormat::Ron).unwrap();
        assert_eq!(parsed.sphere.start_position, Some([0.1, -0.2, 0.3]));
        assert_eq!(parsed.scene.goal_triangle_index, None);
    }

    #[test]
    fn test_parse_rejects_invalid_values() {
        let result = GameConfig::parse("[arena]\nhalf_extent = 0.01\n", ConfigFormat::Toml);
        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }

    #[test]
    fn test_save_and_load_toml_file() {
        let file_name = format!("maze_engine_config_{}.toml", std::process::id());
        let path = std::env::temp_dir().join(file_name);
        let path = path.to_str().unwrap().to_string();

        let mut config = GameConfig::default();
        config.scene.seed = 99;
        config.engine.parallel_collision = true;
        config.save_to_file(&path).unwrap();

        let loaded = GameConfig::load_from_file(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(loaded.scene.seed, 99);
        assert!(loaded.engine.parallel_collision);
    }
}

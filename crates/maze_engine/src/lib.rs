//! # Maze Engine
//!
//! A headless sphere-in-a-maze game engine: a field of randomly rotated
//! triangles fills a cube, and a sphere has to find its way to a goal
//! triangle without touching any other.
//!
//! ## Features
//!
//! - **Closest Point Queries**: Exact closest point on a triangle via Voronoi regions
//! - **Seeded Scenes**: The same seed always builds the same triangle field
//! - **Parallel Sweeps**: Optional rayon-backed collision sweep
//! - **File Configuration**: TOML and RON configs with partial-file defaults
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use maze_engine::prelude::*;
//!
//! struct Forward;
//!
//! impl Application for Forward {
//!     fn initialize(&mut self, _engine: &mut Engine) -> Result<(), AppError> {
//!         Ok(())
//!     }
//!
//!     fn update(
//!         &mut self,
//!         _engine: &mut Engine,
//!         delta_time: f32,
//!     ) -> Result<FrameInput, AppError> {
//!         Ok(FrameInput::moving(Vec3::new(0.0, 0.0, -delta_time)))
//!     }
//!
//!     fn cleanup(&mut self, _engine: &mut Engine) {}
//! }
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = GameConfig::default();
//!     let summary = Engine::run(config, &mut Forward)?;
//!     println!("goal reached: {}", summary.reached_goal);
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod config;
pub mod core;

pub mod foundation;
pub mod physics;
pub mod scene;

mod application;
mod engine;

pub use application::{AppError, AppEvent, AppState, Application, FrameInput};
pub use engine::{Blocked, Engine, EngineError, FrameReport, RunSummary};

/// Common imports for engine users
pub mod prelude {
    pub use crate::{
        AppError, AppEvent, AppState, Application, Blocked, Engine, EngineError, FrameInput,
        FrameReport, RunSummary,
        config::{Config, ConfigError, ConfigFormat},
        core::config::{ArenaConfig, EngineConfig, GameConfig, SceneConfig, SphereConfig},
        foundation::{
            math::{Quat, Transform, Vec3},
            time::{Stopwatch, Timer},
        },
        physics::{BoundingSphere, Contact, SweepResult, Triangle, TriangleCollisionSystem},
        scene::{Scene, SceneBuilder, TriangleInstance},
    };
}

//! Scene construction
//!
//! Builds the triangle field the sphere has to navigate: one randomly rotated
//! copy of a base triangle per cell of an N×N×N grid filling the arena.
//!
//! ## Architecture
//!
//! ```text
//! SceneConfig (seed, N, base triangle)
//!      ↓
//! SceneBuilder (seeded rotations)
//!      ↓
//! Scene (triangles for collision, instances for a renderer)
//! ```

mod scene_builder;

pub use scene_builder::{Scene, SceneBuilder, SceneError, TriangleInstance};

//! Physics module for collision detection
//!
//! Provides the closest-point geometry core and the per-frame sweep that tests
//! the player sphere against every triangle of the scene.

pub mod collision;
pub mod collision_system;

pub use collision::{BoundingSphere, Edge, GeometryError, Plane, Triangle};
pub use collision_system::{Contact, SweepResult, TriangleCollisionSystem};

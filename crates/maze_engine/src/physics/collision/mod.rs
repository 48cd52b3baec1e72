//! Collision primitives for the sphere-versus-triangle-field game
//!
//! # Key Types
//!
//! - [`Edge`], [`Plane`] - Building blocks cached inside every triangle
//! - [`Triangle`] - Immutable triangle with the closest-point query
//! - [`BoundingSphere`] - The player sphere used for contact tests

pub mod primitives;

// Re-export commonly used types
pub use primitives::{BoundingSphere, Edge, GeometryError, Plane, Triangle};

//! # Core Engine Module
//!
//! Shared configuration types used by the engine, the scene builder and the
//! app.

pub mod config;

// Re-export commonly used config types
pub use config::{ArenaConfig, EngineConfig, GameConfig, SceneConfig, SphereConfig, MAX_GRID_SIZE};
pub use crate::config::{Config, ConfigError, ConfigFormat};

//! Application trait, per-frame input and shared game state

use crate::engine::{Engine, EngineError, FrameReport};
use crate::foundation::math::Vec3;
use crate::foundation::time::Stopwatch;
use thiserror::Error;

/// Application lifecycle trait
///
/// Implement this trait to drive the sphere: the engine owns the scene and the
/// collision rules, the application decides where the sphere tries to go and
/// what to do with the result (draw it, log it, steer an autopilot).
pub trait Application {
    /// Initialize the application
    ///
    /// Called once after the engine has built its scene.
    fn initialize(&mut self, engine: &mut Engine) -> Result<(), AppError>;

    /// Produce this frame's input
    ///
    /// # Arguments
    /// * `engine` - Mutable reference to the engine
    /// * `delta_time` - Time since last frame in seconds
    fn update(&mut self, engine: &mut Engine, delta_time: f32) -> Result<FrameInput, AppError>;

    /// Consume the result of a frame
    ///
    /// Called after the engine resolved the frame's movement. A renderer would
    /// draw the sphere and the debug markers here.
    fn on_frame(&mut self, engine: &mut Engine, report: &FrameReport) -> Result<(), AppError> {
        let _ = (engine, report);
        Ok(())
    }

    /// Cleanup the application
    ///
    /// Called when the loop ends, whether the goal was reached or not.
    fn cleanup(&mut self, engine: &mut Engine);
}

/// Application-level errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Engine error propagated to application level
    #[error("Engine error: {0}")]
    Engine(#[from] EngineError),

    /// Custom application error
    #[error("Application error: {0}")]
    Custom(String),

    /// Configuration error
    #[error("Config error: {0}")]
    Config(String),
}

/// Discrete requests an application can make during a frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEvent {
    /// Flip collection of per-triangle closest points
    ToggleDebug,

    /// Flip the extra fixed-camera viewports
    ToggleMultiView,

    /// Stop the loop after this frame
    Quit,
}

/// Everything an application asks of one frame
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameInput {
    /// Requested movement of the sphere centre
    pub displacement: Vec3,
    /// Events applied before the movement
    pub events: Vec<AppEvent>,
}

impl FrameInput {
    /// Input that only moves the sphere
    pub fn moving(displacement: Vec3) -> Self {
        Self {
            displacement,
            events: Vec::new(),
        }
    }

    /// Add an event
    #[must_use]
    pub fn with_event(mut self, event: AppEvent) -> Self {
        self.events.push(event);
        self
    }
}

/// Per-frame state shared between the application and the engine
#[derive(Debug, Clone)]
pub struct AppState {
    /// Current sphere centre; only ever holds collision-free positions
    pub sphere_center: Vec3,
    /// Collect closest points every frame
    pub debug_mode: bool,
    /// Draw the fixed-camera viewports
    pub multi_view: bool,
    /// The goal triangle has been touched
    pub end_game: bool,
    /// The application asked to stop
    pub quit_requested: bool,
    /// Frames stepped so far
    pub frame: u64,
    /// Time since the engine started, frozen when the goal is reached
    pub play_time: Stopwatch,
}

impl AppState {
    /// Create the initial state
    pub fn new(sphere_center: Vec3, debug_mode: bool, multi_view: bool) -> Self {
        Self {
            sphere_center,
            debug_mode,
            multi_view,
            end_game: false,
            quit_requested: false,
            frame: 0,
            play_time: Stopwatch::start_new(),
        }
    }

    /// Apply a discrete event
    pub fn apply(&mut self, event: AppEvent) {
        match event {
            AppEvent::ToggleDebug => self.debug_mode = !self.debug_mode,
            AppEvent::ToggleMultiView => self.multi_view = !self.multi_view,
            AppEvent::Quit => self.quit_requested = true,
        }
    }
}

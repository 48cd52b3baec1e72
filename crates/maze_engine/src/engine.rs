//! Core engine implementation
//!
//! Owns the triangle field, the collision system and the [`AppState`], and
//! resolves one frame of sphere movement at a time. Rendering and input stay
//! with the [`Application`].

use std::time::Duration;

use crate::{
    application::{AppEvent, AppState, Application, FrameInput},
    config::ConfigError,
    core::config::GameConfig,
    foundation::{
        logging::{debug, info},
        math::Vec3,
        time::Timer,
    },
    physics::{BoundingSphere, Contact, Triangle, TriangleCollisionSystem},
    scene::{SceneBuilder, SceneError, TriangleInstance},
};
use thiserror::Error;

/// Why a frame's movement was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Blocked {
    /// The sphere would overlap at least one triangle
    Triangle,
    /// The sphere would leave the arena
    Arena,
}

/// Result of one engine step, handed to [`Application::on_frame`]
#[derive(Debug, Clone, PartialEq)]
pub struct FrameReport {
    /// Frame number, starting at 1
    pub frame: u64,
    /// Where the application asked the sphere to go
    pub proposed_center: Vec3,
    /// Where the sphere is after resolution
    pub sphere_center: Vec3,
    /// Triangles overlapped at the proposed position
    pub contacts: Vec<Contact>,
    /// Closest point of every triangle to the proposed position (debug mode only)
    pub closest_points: Vec<Vec3>,
    /// Set when the movement was rejected
    pub blocked: Option<Blocked>,
    /// Set on the frame the goal triangle is first touched
    pub reached_goal: bool,
}

/// Summary returned by [`Engine::run`]
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    /// Frames stepped
    pub frames: u64,
    /// Whether the goal triangle was touched
    pub reached_goal: bool,
    /// Seconds from engine start to the goal, or to the end of the loop
    pub play_time_secs: f32,
    /// Final sphere centre
    pub final_center: Vec3,
}

/// Main engine struct
pub struct Engine {
    config: GameConfig,
    collision: TriangleCollisionSystem,
    instances: Vec<TriangleInstance>,
    state: AppState,
    sphere_radius: f32,
    timer: Timer,
}

impl Engine {
    /// Create an engine and generate its scene from `config`
    pub fn new(config: GameConfig) -> Result<Self, EngineError> {
        info!("Initializing engine...");
        config.validate()?;

        let scene = SceneBuilder::new(&config.scene).build()?;
        let instances = scene.instances().to_vec();
        let mut engine = Self::with_triangles(config, scene.into_triangles())?;
        engine.instances = instances;
        Ok(engine)
    }

    /// Create an engine over caller-supplied triangles instead of a generated scene
    ///
    /// The scene section of `config` is ignored except for the goal index.
    pub fn with_triangles(
        config: GameConfig,
        triangles: Vec<Triangle>,
    ) -> Result<Self, EngineError> {
        config.validate_sphere()?;

        let goal_index = config.scene.goal_triangle_index;
        if let Some(goal) = goal_index {
            if goal >= triangles.len() {
                return Err(EngineError::InitializationFailed(format!(
                    "goal triangle {goal} does not exist ({} triangles)",
                    triangles.len()
                )));
            }
        }

        let sphere_radius = config.sphere_radius();
        let collision = TriangleCollisionSystem::new(triangles, goal_index)
            .with_parallel(config.engine.parallel_collision);
        let state = AppState::new(
            config.start_position(),
            config.engine.debug_mode,
            config.engine.multi_view,
        );

        info!(
            "Engine ready: {} triangles, sphere radius {:.4}, parallel sweep {}",
            collision.triangle_count(),
            sphere_radius,
            collision.is_parallel()
        );

        Ok(Self {
            config,
            collision,
            instances: Vec::new(),
            state,
            sphere_radius,
            timer: Timer::new(),
        })
    }

    /// Run the engine main loop with the given application
    pub fn run<T: Application>(config: GameConfig, app: &mut T) -> Result<RunSummary, EngineError> {
        let mut engine = Self::new(config)?;

        app.initialize(&mut engine)
            .map_err(|e| EngineError::ApplicationError(format!("App initialization: {e}")))?;

        info!("Starting main loop...");

        while engine.is_running() {
            engine.timer.update();
            let delta_time = engine.timer.delta_time();

            let input = app
                .update(&mut engine, delta_time)
                .map_err(|e| EngineError::ApplicationError(format!("App update: {e}")))?;

            let report = engine.step(&input);

            app.on_frame(&mut engine, &report)
                .map_err(|e| EngineError::ApplicationError(format!("App frame: {e}")))?;

            engine.limit_frame_rate();
        }

        app.cleanup(&mut engine);

        let summary = engine.summary();
        info!(
            "Engine shutdown complete after {} frames ({:.1} fps)",
            summary.frames,
            engine.timer.average_fps()
        );
        Ok(summary)
    }

    /// Resolve one frame of movement
    ///
    /// Events are applied first. The sphere then moves to the proposed centre
    /// unless it would overlap a triangle or leave the arena, in which case it
    /// stays where it was. Touching the goal ends the game even when the
    /// movement itself is rejected.
    pub fn step(&mut self, input: &FrameInput) -> FrameReport {
        for event in &input.events {
            self.handle_event(*event);
        }
        self.state.frame += 1;

        let proposed_center = self.state.sphere_center + input.displacement;
        let sphere = BoundingSphere::new(proposed_center, self.sphere_radius);
        let sweep = self.collision.sweep(&sphere, self.state.debug_mode);

        let blocked = if sweep.is_colliding() {
            Some(Blocked::Triangle)
        } else if !self.is_inside_arena(proposed_center) {
            Some(Blocked::Arena)
        } else {
            None
        };

        match blocked {
            Some(reason) => debug!(
                "Frame {}: movement to {:?} blocked by {:?} ({} contacts)",
                self.state.frame,
                proposed_center,
                reason,
                sweep.contacts.len()
            ),
            None => self.state.sphere_center = proposed_center,
        }

        let reached_goal = sweep.goal_reached && !self.state.end_game;
        if reached_goal {
            self.state.end_game = true;
            self.state.play_time.stop();
            info!("Goal reached! Play time: {:.2}s", self.state.play_time.elapsed_secs());
        }

        FrameReport {
            frame: self.state.frame,
            proposed_center,
            sphere_center: self.state.sphere_center,
            contacts: sweep.contacts,
            closest_points: sweep.closest_points,
            blocked,
            reached_goal,
        }
    }

    /// Apply a discrete application event
    pub fn handle_event(&mut self, event: AppEvent) {
        debug!("Event: {event:?}");
        self.state.apply(event);
    }

    /// Whether the loop should keep going
    pub fn is_running(&self) -> bool {
        let frames_left = self
            .config
            .engine
            .max_frames
            .map_or(true, |max| self.state.frame < max);
        !self.state.end_game && !self.state.quit_requested && frames_left
    }

    /// True when a sphere centred at `center` stays strictly inside the arena
    pub fn is_inside_arena(&self, center: Vec3) -> bool {
        let limit = self.config.arena.half_extent - self.sphere_radius;
        center.iter().all(|c| c.abs() < limit)
    }

    /// The player sphere at its current position
    pub fn sphere(&self) -> BoundingSphere {
        BoundingSphere::new(self.state.sphere_center, self.sphere_radius)
    }

    /// Effective sphere radius
    pub fn sphere_radius(&self) -> f32 {
        self.sphere_radius
    }

    /// Shared game state
    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Active configuration
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// The collision system and its triangles
    pub fn collision_system(&self) -> &TriangleCollisionSystem {
        &self.collision
    }

    /// Per-instance placement data of the generated scene
    ///
    /// Empty for engines created with [`Engine::with_triangles`].
    pub fn instances(&self) -> &[TriangleInstance] {
        &self.instances
    }

    /// Snapshot of the run so far
    pub fn summary(&self) -> RunSummary {
        RunSummary {
            frames: self.state.frame,
            reached_goal: self.state.end_game,
            play_time_secs: self.state.play_time.elapsed_secs(),
            final_center: self.state.sphere_center,
        }
    }

    fn limit_frame_rate(&self) {
        let Some(fps) = self.config.engine.target_fps.filter(|fps| *fps > 0) else {
            return;
        };
        let frame_budget = Duration::from_secs_f64(1.0 / f64::from(fps));
        let spent = self.timer.since_last_update();
        if spent < frame_budget {
            std::thread::sleep(frame_budget - spent);
        }
    }
}

/// Engine errors
#[derive(Error, Debug)]
pub enum EngineError {
    /// Engine initialization failed
    #[error("Engine initialization failed: {0}")]
    InitializationFailed(String),

    /// Invalid configuration
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Scene generation failed
    #[error("Scene error: {0}")]
    Scene(#[from] SceneError),

    /// Application error
    #[error("Application error: {0}")]
    ApplicationError(String),
}

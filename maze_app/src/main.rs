//! Sphere maze demo application
//!
//! Builds the triangle field and lets an autopilot fly the sphere from its
//! start cell toward the goal triangle. There is no window: progress goes to
//! the log and the outcome to stdout.
//!
//! ```text
//! maze_app [seed] [grid_size] [--config PATH] [--frames N]
//! ```

use std::path::PathBuf;

use clap::Parser;
use maze_engine::foundation::logging;
use maze_engine::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Frame budget used when neither the config nor the command line sets one
const DEFAULT_MAX_FRAMES: u64 = 20_000;

/// Simulated frame time, so runs are reproducible regardless of machine speed
const FIXED_STEP: f32 = 1.0 / 60.0;

/// Fly a sphere through a seeded field of random triangles
#[derive(Parser, Debug, Default)]
#[command(name = "maze_app", version)]
struct Cli {
    /// Seed for the triangle rotations
    seed: Option<u64>,

    /// Cells per axis of the triangle grid
    grid_size: Option<u32>,

    /// TOML or RON configuration file
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Stop after this many frames
    #[arg(long, value_name = "N")]
    frames: Option<u64>,
}

impl Cli {
    fn into_config(self) -> Result<GameConfig, ConfigError> {
        let mut config = match &self.config {
            Some(path) => GameConfig::load_from_file(path)?,
            None => GameConfig::default(),
        };

        if let Some(seed) = self.seed {
            config.scene.seed = seed;
        }
        if let Some(grid_size) = self.grid_size {
            config.scene.grid_size = grid_size;
        }
        if let Some(frames) = self.frames {
            config.engine.max_frames = Some(frames);
        }
        if config.engine.max_frames.is_none() {
            config.engine.max_frames = Some(DEFAULT_MAX_FRAMES);
        }

        Ok(config)
    }
}

/// Steers straight at the goal and takes a random detour whenever blocked
struct Autopilot {
    speed: f32,
    target: Vec3,
    detour: Option<(Vec3, u32)>,
    rng: StdRng,
    blocked_frames: u64,
}

impl Autopilot {
    fn new(seed: u64) -> Self {
        Self {
            speed: 0.5,
            target: Vec3::zeros(),
            detour: None,
            rng: StdRng::seed_from_u64(seed),
            blocked_frames: 0,
        }
    }

    fn random_direction(&mut self) -> Vec3 {
        loop {
            let candidate = Vec3::new(
                self.rng.gen_range(-1.0..1.0),
                self.rng.gen_range(-1.0..1.0),
                self.rng.gen_range(-1.0..1.0),
            );
            let length = candidate.magnitude();
            if length > 1e-3 && length <= 1.0 {
                return candidate / length;
            }
        }
    }
}

impl Application for Autopilot {
    fn initialize(&mut self, engine: &mut Engine) -> Result<(), AppError> {
        let goal = engine
            .collision_system()
            .goal_triangle()
            .ok_or_else(|| AppError::Config("the autopilot needs a goal triangle".to_string()))?;
        self.target = goal.centroid();

        log::info!(
            "Autopilot heading from {:?} to goal centroid {:?}",
            engine.state().sphere_center,
            self.target
        );
        Ok(())
    }

    fn update(&mut self, engine: &mut Engine, _delta_time: f32) -> Result<FrameInput, AppError> {
        let step = self.speed * FIXED_STEP;

        if let Some((direction, frames_left)) = self.detour.take() {
            if frames_left > 0 {
                self.detour = Some((direction, frames_left - 1));
            }
            return Ok(FrameInput::moving(direction * step));
        }

        let to_goal = self.target - engine.state().sphere_center;
        let distance = to_goal.magnitude();
        if distance <= f32::EPSILON {
            return Ok(FrameInput::default());
        }
        Ok(FrameInput::moving(to_goal * (step.min(distance) / distance)))
    }

    fn on_frame(&mut self, _engine: &mut Engine, report: &FrameReport) -> Result<(), AppError> {
        if report.blocked.is_some() && !report.reached_goal {
            self.blocked_frames += 1;
            let direction = self.random_direction();
            self.detour = Some((direction, 15));
        }

        if report.frame % 1000 == 0 {
            log::info!(
                "Frame {}: sphere at {:?}, {:.3} from goal",
                report.frame,
                report.sphere_center,
                (self.target - report.sphere_center).magnitude()
            );
        }
        Ok(())
    }

    fn cleanup(&mut self, _engine: &mut Engine) {
        log::debug!("Autopilot was blocked on {} frames", self.blocked_frames);
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Cli::parse().into_config()?;

    logging::init_with_level(&config.engine.log_level);
    log::info!(
        "Starting sphere maze (seed {}, grid {})",
        config.scene.seed,
        config.scene.grid_size
    );

    println!("{}", config.scene.triangle_count());

    let mut app = Autopilot::new(config.scene.seed);
    match Engine::run(config, &mut app) {
        Ok(summary) => {
            if summary.reached_goal {
                println!(
                    "Goal reached after {} frames in {:.2}s",
                    summary.frames, summary.play_time_secs
                );
            } else {
                let center = summary.final_center;
                println!(
                    "Goal not reached after {} frames, sphere stopped at ({:.3}, {:.3}, {:.3})",
                    summary.frames, center.x, center.y, center.z
                );
            }
            Ok(())
        }
        Err(e) => {
            log::error!("Sphere maze failed: {e}");
            Err(e.into())
        }
    }
}

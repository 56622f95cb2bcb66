//! # Stagecraft Demos
//!
//! Small games built on the scene graph, plus the `stage-demo` binary that
//! runs them against the headless renderer.
//!
//! ## Usage
//!
//! ```bash
//! cargo run -p stage-demos -- --frames 600 --seed 7
//! ```
//!
//! ## Architecture
//!
//! - `CliArgs` - Command-line arguments parsed with clap
//! - `DemoConfig` - Grid size, timing and surface size for a run
//! - `SnakeGame` - Snake on a grid of fractional cells, stepped by a scheduler

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]

mod snake;

pub use snake::{Direction, GameEnd, GridCell, SnakeGame, StepOutcome};

use clap::Parser;
use serde::Serialize;

/// Command-line arguments for stage-demo.
#[derive(Debug, Clone, Parser)]
#[command(name = "stage-demo")]
#[command(about = "Run a Stagecraft demo game headless")]
#[command(version)]
pub struct CliArgs {
    /// Frames to run before exiting
    #[arg(long, env = "STAGE_DEMO_FRAMES", default_value = "600")]
    pub frames: u32,

    /// Cells per side of the board
    #[arg(long, env = "STAGE_DEMO_GRID", default_value = "20")]
    pub grid: u32,

    /// Seed for food placement
    #[arg(long, env = "STAGE_DEMO_SEED", default_value = "1")]
    pub seed: u64,

    /// Frames between snake steps
    #[arg(long, default_value = "6")]
    pub step_interval: f64,

    /// Surface width in pixels
    #[arg(long, default_value = "400")]
    pub width: u32,

    /// Surface height in pixels
    #[arg(long, default_value = "400")]
    pub height: u32,

    /// Steer the snake automatically
    #[arg(long)]
    pub autopilot: bool,

    /// Outline node bounds
    #[arg(long)]
    pub debug_bounds: bool,

    /// Print the run summary as JSON
    #[arg(long)]
    pub json: bool,
}

/// Configuration for a demo run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DemoConfig {
    /// Frames to run.
    pub frames: u32,
    /// Cells per side.
    pub grid: u32,
    /// Food placement seed.
    pub seed: u64,
    /// Frames between steps.
    pub step_interval: f64,
    /// Surface width in pixels.
    pub width: u32,
    /// Surface height in pixels.
    pub height: u32,
    /// Automatic steering.
    pub autopilot: bool,
    /// Outline node bounds.
    pub debug_bounds: bool,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl DemoConfig {
    /// Create a demo configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self {
            frames: 600,
            grid: 20,
            seed: 1,
            step_interval: 6.0,
            width: 400,
            height: 400,
            autopilot: false,
            debug_bounds: false,
        }
    }
}

impl From<CliArgs> for DemoConfig {
    fn from(args: CliArgs) -> Self {
        Self {
            frames: args.frames,
            grid: args.grid,
            seed: args.seed,
            step_interval: args.step_interval,
            width: args.width,
            height: args.height,
            autopilot: args.autopilot,
            debug_bounds: args.debug_bounds,
        }
    }
}

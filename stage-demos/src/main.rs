//! # Stagecraft Demo
//!
//! Runs the snake demo against the headless renderer and reports how the
//! game went.

use clap::Parser;
use serde::Serialize;
use stage_demos::{CliArgs, DemoConfig, SnakeGame};
use stage_renderer::{BackendType, HeadlessBackend, Renderer, RendererConfig};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Serialize)]
struct RunSummary {
    frames: u64,
    steps: u64,
    score: u32,
    length: usize,
    ended: Option<String>,
    ops_recorded: u64,
}

fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "stage_demos=info,stage_renderer=info,stage_core=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = CliArgs::parse();
    let json = args.json;
    let config = DemoConfig::from(args);
    tracing::info!(
        "Snake demo: {}x{} grid, {} frames, seed {}",
        config.grid,
        config.grid,
        config.frames,
        config.seed
    );

    let renderer_config = RendererConfig {
        preferred_backend: BackendType::Headless,
        debug_bounds: config.debug_bounds,
        width: config.width,
        height: config.height,
        ..RendererConfig::default()
    };
    let backend = HeadlessBackend::new(config.width, config.height);
    let mut renderer = Renderer::with_backend(renderer_config, backend)?;
    let frame_ms = 1000.0 / f64::from(renderer.config().target_fps);

    let mut game = SnakeGame::new(&config);
    for frame in 0..config.frames {
        renderer.frame(&mut game, f64::from(frame) * frame_ms)?;
        if game.ended().is_some() {
            tracing::debug!("Stopping after frame {frame}");
            break;
        }
    }

    let summary = RunSummary {
        frames: renderer.frame_count(),
        steps: game.steps(),
        score: game.score(),
        length: game.segments().len(),
        ended: game.ended().map(|end| format!("{end:?}")),
        ops_recorded: renderer.backend().total_ops(),
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        println!(
            "{} frames, {} steps, score {}, length {}{}",
            summary.frames,
            summary.steps,
            summary.score,
            summary.length,
            summary
                .ended
                .as_deref()
                .map(|end| format!(", ended by {end}"))
                .unwrap_or_default()
        );
    }
    Ok(())
}

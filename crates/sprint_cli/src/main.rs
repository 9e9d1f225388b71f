//! Sprint - headless animation runner
//!
//! Plays the demo scene against in-memory nodes on a fixed tick:
//! - title and subtitle slide in, the button bounces up, the circle loops
//! - once the intro settles, simulated button clicks replay the entry with
//!   each easing family in turn
//! - the final node properties are logged on exit

mod config;
mod demo;

use anyhow::{Context, Result};
use clap::Parser;
use config::SprintConfig;
use demo::DemoScene;
use sprint_animation::AnimationScheduler;
use sprint_core::Size;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Headless runner for the Sprint demo scene
#[derive(Parser, Debug)]
#[command(name = "sprint")]
#[command(about = "Run the Sprint animation demo headless")]
#[command(version)]
struct Args {
    /// Configuration file (defaults to ./sprint.toml when present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Tick rate
    #[arg(long)]
    fps: Option<u32>,

    /// Simulated seconds to run
    #[arg(long)]
    seconds: Option<f32>,

    /// Button clicks to simulate
    #[arg(long)]
    clicks: Option<u32>,

    /// Pace ticks with the wall clock instead of simulating time
    #[arg(long)]
    realtime: bool,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,

    /// Print the effective configuration and exit
    #[arg(long)]
    print_config: bool,
}

impl Args {
    /// Flags take precedence over the file
    fn apply(&self, config: &mut SprintConfig) {
        if let Some(fps) = self.fps {
            config.playback.fps = fps;
        }
        if let Some(seconds) = self.seconds {
            config.playback.seconds = seconds;
        }
        if let Some(clicks) = self.clicks {
            config.playback.clicks = clicks;
        }
        if self.verbose {
            config.log.level = "debug".to_string();
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => SprintConfig::load(path)?,
        None => SprintConfig::load_from_dir(Path::new("."))?,
    };
    args.apply(&mut config);
    config.validate()?;

    if args.print_config {
        print!("{}", config.to_toml()?);
        return Ok(());
    }

    init_logging(&config)?;
    run(&config, args.realtime)
}

fn init_logging(config: &SprintConfig) -> Result<()> {
    // RUST_LOG wins over the configured level
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log.level))
        .with_context(|| format!("Invalid log filter '{}'", config.log.level))?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
    Ok(())
}

fn run(config: &SprintConfig, realtime: bool) -> Result<()> {
    let playback = &config.playback;

    let mut scheduler = AnimationScheduler::new();
    scheduler.set_target_fps(playback.fps);
    let dt = 1.0 / scheduler.target_fps() as f32;
    let frames = (playback.seconds * scheduler.target_fps() as f32).ceil() as u64;

    let viewport = Size::new(config.viewport.width, config.viewport.height);
    let mut scene = DemoScene::new(viewport, &mut scheduler);
    scene.setup().context("Failed to start intro animations")?;

    tracing::info!(
        fps = scheduler.target_fps(),
        seconds = playback.seconds,
        clicks = playback.clicks,
        realtime,
        "starting playback"
    );

    let mut failures = 0usize;
    for _ in 0..frames {
        if scene.clicks() < playback.clicks && scene.is_idle() {
            scene
                .button_clicked()
                .context("Failed to replay animations")?;
        }

        let ticked = if realtime {
            std::thread::sleep(scheduler.frame_interval());
            scheduler.tick_frame()
        } else {
            scheduler.tick(dt)
        };

        if let Err(err) = ticked {
            for (id, failure) in &err.failures {
                tracing::warn!(?id, error = %failure, "timeline failed");
            }
            failures += err.failures.len();
        }
    }

    tracing::info!(
        frames,
        clicks = scene.clicks(),
        failures,
        idle = scene.is_idle(),
        circle_looping = scene.circle_is_animating(),
        active = scheduler.has_active_animations(),
        "playback finished"
    );
    scene.log_summary();

    Ok(())
}

// Arc Preview - CLI tool for exercising the teleport arc outside the game
//
// Loads a scene of tagged planes and boxes, throws an arc into it and prints
// what the arc would show and where the player would land, frame by frame.

use anyhow::{Context, Result};
use cgmath::Vector3;
use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};
use teleport_arc::logging::DEFAULT_LOG_ENV;
use teleport_arc::teleport::{TeleportConfig, TeleportMover, TrajectorySampler};
use teleport_arc::{ArcInput, SceneTracer, TeleportArc};
use tracing::info;

mod report;
mod scene_loader;

use report::FrameReport;
use scene_loader::{load_config, load_scene, parse_vec3};

#[derive(Parser)]
#[command(name = "arc_preview")]
#[command(about = "Preview teleport arcs against a JSON scene")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

/// Pointer kinematics shared by every command
#[derive(Args)]
struct PointerArgs {
    /// Launch position as x,y,z
    #[arg(long, value_parser = parse_vec3, default_value = "0,1.5,0")]
    origin: Vector3<f32>,

    /// Launch velocity as x,y,z
    #[arg(long, value_parser = parse_vec3, default_value = "0,2.5,-4")]
    velocity: Vector3<f32>,

    /// Disable gravity (straight-line pointer)
    #[arg(long)]
    no_gravity: bool,

    /// Flag the pointer as held at a bad angle
    #[arg(long)]
    bad_angle: bool,

    /// Flag the target as a bad teleport destination
    #[arg(long)]
    bad_target: bool,

    /// Arc configuration JSON (defaults are used when omitted)
    #[arg(long)]
    config: Option<PathBuf>,
}

impl PointerArgs {
    fn input(&self) -> ArcInput {
        ArcInput {
            origin: self.origin,
            velocity: self.velocity,
            use_gravity: !self.no_gravity,
            pointer_at_bad_angle: self.bad_angle,
            bad_teleport: self.bad_target,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Run the arc for a number of frames and report each one
    Simulate {
        /// Scene description JSON
        scene: PathBuf,

        #[command(flatten)]
        pointer: PointerArgs,

        /// Number of frames to simulate
        #[arg(long, default_value_t = 10)]
        frames: usize,

        /// Seconds between frames
        #[arg(long, default_value_t = 1.0 / 72.0)]
        frame_time: f32,

        /// Emit one JSON object per frame instead of text
        #[arg(long)]
        json: bool,
    },
    /// Print sampled trajectory points, ignoring the scene
    Sample {
        #[command(flatten)]
        pointer: PointerArgs,

        /// Number of intervals to sample
        #[arg(long, default_value_t = 10)]
        points: usize,
    },
    /// Aim once, then smoothly move a player to the landing point
    Teleport {
        /// Scene description JSON
        scene: PathBuf,

        #[command(flatten)]
        pointer: PointerArgs,

        /// Player start position as x,y,z
        #[arg(long, value_parser = parse_vec3, default_value = "0,0,0")]
        player: Vector3<f32>,

        /// Travel speed in units per second
        #[arg(long)]
        speed: Option<f32>,

        /// Seconds between printed steps
        #[arg(long, default_value_t = 0.5)]
        step: f32,
    },
}

fn init_logging(verbose: bool) -> Result<()> {
    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };

    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .init();

    // Scope table for the library's own logging; the subscriber above wins
    teleport_arc::logging::init_logging_with_level(DEFAULT_LOG_ENV, library_log_level(verbose));

    Ok(())
}

/// Level for library scopes that `TELEPORT_ARC_LOG` does not mention
fn library_log_level(verbose: bool) -> tracing::Level {
    if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    }
}

/// Upper bound on printed steps for a move, so float rounding on very long
/// moves cannot stall the loop
fn max_teleport_steps(duration: f32, step: f32) -> usize {
    (duration / step).ceil().max(0.0) as usize + 1
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose)?;

    match cli.command {
        Commands::Simulate {
            scene,
            pointer,
            frames,
            frame_time,
            json,
        } => handle_simulate(&scene, &pointer, frames, frame_time, json),
        Commands::Sample { pointer, points } => handle_sample(&pointer, points),
        Commands::Teleport {
            scene,
            pointer,
            player,
            speed,
            step,
        } => handle_teleport(&scene, &pointer, player, speed, step),
    }
}

fn build_arc(scene: &Path, pointer: &PointerArgs) -> Result<TeleportArc<SceneTracer>> {
    let scene = load_scene(scene)?;
    let config = load_config(pointer.config.as_deref())?;

    let mut arc = TeleportArc::new(SceneTracer::from_description(&scene), config, 0.0)
        .context("Failed to create arc")?;
    arc.show();
    arc.set_input(pointer.input());

    Ok(arc)
}

fn handle_simulate(
    scene: &Path,
    pointer: &PointerArgs,
    frames: usize,
    frame_time: f32,
    json: bool,
) -> Result<()> {
    let mut arc = build_arc(scene, pointer)?;

    info!("Simulating {} frames at {:.4}s", frames, frame_time);

    for frame in 0..frames {
        let now = frame as f32 * frame_time;
        arc.update(now);

        let report = FrameReport::capture(frame, now, &arc);
        if json {
            println!("{}", serde_json::to_string(&report)?);
        } else {
            report.print();
        }
    }

    Ok(())
}

fn handle_sample(pointer: &PointerArgs, points: usize) -> Result<()> {
    let config = load_config(pointer.config.as_deref())?;
    let sampler = TrajectorySampler::new(&pointer.input(), config.gravity, config.scale);

    let step = config.duration / points.max(1) as f32;
    for (i, point) in sampler
        .sample_points(config.duration, points)
        .iter()
        .enumerate()
    {
        println!(
            "t={:>6.3}  ({:>8.3}, {:>8.3}, {:>8.3})",
            i as f32 * step,
            point.x,
            point.y,
            point.z
        );
    }

    println!(
        "arc length over {:.2}s: {:.3}",
        config.duration,
        sampler.arc_length(config.duration, points)
    );

    Ok(())
}

fn handle_teleport(
    scene: &Path,
    pointer: &PointerArgs,
    player: Vector3<f32>,
    speed: Option<f32>,
    step: f32,
) -> Result<()> {
    let mut arc = build_arc(scene, pointer)?;
    arc.update(0.0);

    let Some(target) = arc.teleport_position_candidate().filter(|_| arc.is_valid()) else {
        println!("No valid teleport target");
        return Ok(());
    };

    let mut config = TeleportConfig::default();
    if let Some(speed) = speed {
        config.speed = speed;
    }

    let mut mover = TeleportMover::start(player, target, config.speed);
    info!("Teleporting over {:.2}s", mover.duration());

    let step = step.max(0.001);
    let mut elapsed = 0.0;
    for _ in 0..max_teleport_steps(mover.duration(), step) {
        if mover.is_finished() {
            break;
        }

        let position = mover.advance(step);
        elapsed += step;
        println!(
            "t={:>6.2}  ({:>7.3}, {:>7.3}, {:>7.3})",
            elapsed, position.x, position.y, position.z
        );
    }

    println!("Arrived at ({:.3}, {:.3}, {:.3})", target.x, target.y, target.z);
    Ok(())
}

//! Director Camera Simulator
//!
//! Runs a scene headlessly through the camera and prints one line per frame.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use director_core::CameraConfig;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::scene::Scene;
use crate::simulation::Simulation;

mod scene;
mod simulation;
mod world;

#[derive(Parser)]
#[command(name = "director-sim")]
#[command(version, about = "Headless runner for the director camera")]
struct Args {
    /// Scene file (JSON). Runs the built-in demo when omitted.
    #[arg(short, long)]
    scene: Option<PathBuf>,

    /// Camera configuration file (JSON)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Frames to simulate; defaults to the scene's own length
    #[arg(short, long)]
    frames: Option<u64>,

    /// Print the final save snapshot as JSON
    #[arg(long)]
    snapshot: bool,

    /// Print frame records as JSON lines instead of a table
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    let config = match &args.config {
        Some(path) => CameraConfig::from_json_file(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => CameraConfig::default(),
    };

    let scene = match &args.scene {
        Some(path) => Scene::from_json_file(path)?,
        None => Scene::demo()?,
    };
    let frames = args.frames.unwrap_or(scene.frames);

    let mut sim = Simulation::new(scene, config);
    tracing::info!("[sim] Running '{}' for {} frames", sim.scene().name, frames);

    for record in sim.run(frames) {
        if args.json {
            println!("{}", serde_json::to_string(&record)?);
        } else {
            println!(
                "{:>6}  display=({:>9.4}, {:>9.4})  focus=({:>9.4}, {:>9.4})  anchors={}{}{}",
                record.frame,
                record.display.x,
                record.display.y,
                record.focus.x,
                record.focus.y,
                record.active_anchors,
                if record.tweening { "  tween" } else { "" },
                if record.scrolling { "  scroll" } else { "" },
            );
        }
    }

    let player = sim.world().player.position;
    tracing::info!("[sim] Done, player at ({:.2}, {:.2})", player.x, player.y);

    if args.snapshot {
        let snapshot = sim.director().snapshot();
        println!("{}", snapshot.to_json()?);
    }

    Ok(())
}

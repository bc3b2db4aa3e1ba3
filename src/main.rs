//! Command-line demo runner for the tilebound physics core.
use std::path::PathBuf;

use anyhow::{ensure, Context, Result};
use clap::Parser;
use glam::Vec2;
use log::{info, warn};
use tilebound::{
    init_logging, ActorKind, Body, Intent, PhysicsEvent, ProjectileKind, ShapeLayout, TileGrid,
    TileLookup, TuningFile, World,
};

/// Built-in level: a walled room with a ledge, a spike strip, a breakable
/// wall and a hookable ceiling patch.
const DEMO_LEVEL: &str = "\
1,192,192,192,192,1,1,1,1,1
1,0,0,0,0,0,0,0,0,1
1,0,0,0,0,0,0,0,0,1
1,0,0,0,0,0,210,210,0,1
1,0,0,0,0,0,0,0,242,1
1,0,0,0,0,0,0,0,242,1
1,1,1,245,245,1,1,1,1,1
1,1,1,1,1,1,1,1,1,1
";

/// Headless runner for the tile physics core
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
    /// JSON tuning file
    #[arg(long)]
    params: Option<PathBuf>,
    /// CSV level file; the built-in demo level is used when omitted
    #[arg(long)]
    level: Option<PathBuf>,
    /// Simulated wall-clock seconds
    #[arg(long, default_value_t = 5.0)]
    seconds: f32,
    /// Display frames per second fed to the accumulator
    #[arg(long, default_value_t = 60.0)]
    fps: f32,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);
    ensure!(args.fps > 0.0, "--fps must be positive, got {}", args.fps);

    let tuning = match &args.params {
        Some(path) => TuningFile::from_path(path)
            .with_context(|| format!("loading tuning from {}", path.display()))?,
        None => TuningFile::default(),
    };
    let csv = match &args.level {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("reading level {}", path.display()))?,
        None => DEMO_LEVEL.to_owned(),
    };
    let grid = TileGrid::from_csv(&csv, TileLookup::default(), tuning.world.cell_size)
        .context("parsing level")?;

    let mut world = World::new(grid, tuning.world).context("building world")?;
    let cell = tuning.world.cell_size;
    let body = Body::new(&tuning.player)
        .context("player tuning")?
        .with_position(Vec2::new(cell * 1.25, cell * 5.0));
    let player = world.spawn_actor(
        ActorKind::Player,
        body,
        ShapeLayout::uniform(Vec2::splat(cell * 0.5)),
        4,
    );
    world.set_intent(
        player,
        Intent {
            force: Vec2::new(0.15, 0.0),
            horizontal: 1.0,
            ..Intent::default()
        },
    );
    let muzzle = Body::new(&tuning.projectile)
        .context("projectile tuning")?
        .with_position(Vec2::new(cell * 1.75, cell * 5.25));
    let shot = world.fire(
        player,
        ProjectileKind::Bullet,
        tuning.bullet,
        muzzle,
        ShapeLayout::uniform(Vec2::splat(cell * 0.125)),
        Vec2::new(cell * 0.25, 0.0),
    );
    if shot.is_none() {
        warn!("opening shot was not fired");
    }

    let frame = args.fps.recip();
    let mut elapsed = 0.0;
    while elapsed < args.seconds {
        world.advance(frame);
        elapsed += frame;
        for event in world.drain_events() {
            log_event(world.tick(), &event);
        }
    }

    if let Some(actor) = world.actor(player) {
        info!(
            "after {} ticks: position {} velocity {} hp {}/{} grounded {}",
            world.tick(),
            actor.body.interpolated_position(world.alpha()),
            actor.body.velocity,
            actor.health.hp(),
            actor.health.max_hp(),
            actor.grounded()
        );
    }
    Ok(())
}

fn log_event(tick: u64, event: &PhysicsEvent) {
    info!("tick {tick}: {event:?}");
}

//! Headless runner: plays a seeded session at the fixed tick rate with a
//! fixed pointer position and prints the result.
//!
//! Usage:
//!   cargo run --release -- --seed 7 --seconds 30 --pointer-x 600 --pointer-y 300
//!   RUST_LOG=debug cargo run -- --db scores.db --events

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use glam::Vec2;

use turret_defense::consts::SIM_DT;
use turret_defense::gesture::UnavailableBackend;
use turret_defense::settings::ScoreBackend;
use turret_defense::sim::GameEvent;
use turret_defense::{GameSession, GameSettings, SpawnRate};

#[derive(Parser)]
#[command(name = "turret-defense")]
#[command(about = "Run a headless Turret Defense session")]
struct Args {
    /// Run seed
    #[arg(long, default_value_t = 1)]
    seed: u64,

    /// Simulated seconds to play
    #[arg(long, default_value_t = 10.0)]
    seconds: f32,

    /// Settings file (JSON); defaults are used when absent
    #[arg(long)]
    settings: Option<PathBuf>,

    /// SQLite score database, overriding the settings file
    #[arg(long)]
    db: Option<PathBuf>,

    /// Spawn rate: fast, medium or slow
    #[arg(long, value_parser = parse_spawn_rate)]
    spawn_rate: Option<SpawnRate>,

    /// Pointer x in play-area coordinates
    #[arg(long, requires = "pointer_y")]
    pointer_x: Option<f32>,

    /// Pointer y in play-area coordinates
    #[arg(long, requires = "pointer_x")]
    pointer_y: Option<f32>,

    /// Print every game event as a JSON line
    #[arg(long)]
    events: bool,
}

fn parse_spawn_rate(s: &str) -> Result<SpawnRate, String> {
    SpawnRate::from_str(s).ok_or_else(|| format!("unknown spawn rate '{s}'"))
}

fn main() -> ExitCode {
    env_logger::init();
    let args = Args::parse();

    let mut settings = match &args.settings {
        Some(path) => GameSettings::load(path),
        None => GameSettings::default(),
    };
    if let Some(db) = args.db {
        settings.scores = ScoreBackend::Sqlite { path: db };
    }
    if let Some(rate) = args.spawn_rate {
        settings.spawn_rate = rate;
    }

    let has_assets = settings.asset_dir.is_some();
    let mut session = match GameSession::new(settings, args.seed, Arc::new(UnavailableBackend)) {
        Ok(session) => session,
        Err(e) => {
            eprintln!("Invalid settings: {e}");
            return ExitCode::FAILURE;
        }
    };

    let pointer = args.pointer_x.zip(args.pointer_y).map(|(x, y)| Vec2::new(x, y));
    let ticks = (args.seconds.max(0.0) / SIM_DT).round() as u64;

    let mut spawned = 0usize;
    let mut fired = 0usize;
    let mut destroyed = 0usize;
    for _ in 0..ticks {
        let Some(report) = session.tick_once(pointer) else {
            break;
        };
        for notice in &report.notices {
            eprintln!("notice: {notice:?}");
        }
        for event in &report.events {
            match event {
                GameEvent::EnemySpawned { .. } => spawned += 1,
                GameEvent::ProjectileFired { .. } => fired += 1,
                GameEvent::EnemyDestroyed { .. } => destroyed += 1,
                _ => {}
            }
            if args.events {
                match serde_json::to_string(event) {
                    Ok(line) => println!("{} {line}", report.tick),
                    Err(e) => log::warn!("Event not printable: {e}"),
                }
            }
        }
    }

    let world = session.world();
    println!("Seed:      {}", args.seed);
    println!("Ticks:     {}", world.time_ticks);
    println!("Spawned:   {spawned}");
    println!("Fired:     {fired}");
    println!("Destroyed: {destroyed}");
    println!("{}", world.score.hud_line());
    if has_assets {
        println!("Sprites:   {} missing", session.assets().missing().len());
    }

    if !session.shutdown() {
        eprintln!("Score was not saved");
    }
    ExitCode::SUCCESS
}

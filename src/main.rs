//! Shape Sprint entry point
//!
//! Headless driver: plays a level through the real engine with a seeded
//! autoplayer standing in for the keyboard, and reports how the run ended.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use shape_sprint::menu::MenuKind;
use shape_sprint::platform::{Action, FrameLimiter};
use shape_sprint::renderer::NullSurface;
use shape_sprint::sim::LevelTable;
use shape_sprint::{Engine, Flow, Screen, Settings, Tuning};

/// Longest autoplayer jump press, in frames
const MAX_HOLD_FRAMES: u32 = 5;

#[derive(Parser, Debug)]
#[command(author, version, about = "Play a Shape Sprint level headlessly", long_about = None)]
struct Args {
    /// Level id to play
    #[arg(long, default_value_t = 0)]
    level: u32,
    /// Autoplayer RNG seed
    #[arg(long, default_value_t = 1)]
    seed: u64,
    /// Stop after this many frames
    #[arg(long, default_value_t = 3600)]
    frames: u64,
    /// Pace frames at 60 Hz instead of running flat out
    #[arg(long)]
    realtime: bool,
    /// Settings file (created on exit if missing)
    #[arg(long)]
    settings: Option<PathBuf>,
    /// Level table JSON replacing the built-in levels
    #[arg(long)]
    levels: Option<PathBuf>,
    /// Physics tuning JSON
    #[arg(long)]
    tuning: Option<PathBuf>,
    /// Chance per grounded frame that the autoplayer starts a jump
    #[arg(long, default_value_t = 0.04)]
    jump_chance: f64,
    /// Silence all audio commands
    #[arg(long)]
    mute: bool,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();
    log::info!("Shape Sprint (headless) starting...");

    let settings = match &args.settings {
        Some(path) => Settings::load_or_default(path),
        None => Settings::default(),
    };
    let levels = match &args.levels {
        Some(path) => {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("read level table {:?}", path))?;
            LevelTable::from_json(&json).with_context(|| format!("parse level table {:?}", path))?
        }
        None => LevelTable::builtin().context("load built-in levels")?,
    };
    let tuning = match &args.tuning {
        Some(path) => {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("read tuning {:?}", path))?;
            Tuning::from_json(&json).with_context(|| format!("parse tuning {:?}", path))?
        }
        None => Tuning::default(),
    };
    anyhow::ensure!(
        (0.0..=1.0).contains(&args.jump_chance),
        "--jump-chance must be within 0..=1, got {}",
        args.jump_chance
    );

    let mut engine = Engine::new(settings, levels, tuning);
    if args.mute {
        engine.audio_mut().set_muted(true);
    }
    engine
        .start_level(args.level, None)
        .with_context(|| format!("start level {}", args.level))?;

    let mut rng = Pcg32::seed_from_u64(args.seed);
    let mut surface = NullSurface::default();
    let mut limiter = FrameLimiter::default();
    let mut hold = 0u32;

    for frame in 0..args.frames {
        if hold == 0 && rng.random_bool(args.jump_chance) {
            hold = rng.random_range(1..=MAX_HOLD_FRAMES);
        }
        engine.keyboard_mut().set_action_down(Action::Up, hold > 0);
        hold = hold.saturating_sub(1);

        surface.reset();
        let flow = engine.frame(&mut surface)?;
        for command in engine.audio_mut().drain() {
            log::trace!("audio: {:?}", command);
        }

        if let Screen::Menu(menu) = engine.screen() {
            if let MenuKind::GameOver {
                level_id, result, ..
            } = menu.kind()
            {
                log::info!("Level {} ended after {} frames: {:?}", level_id, frame + 1, result);
                println!("level {level_id}: {result:?} after {} frames", frame + 1);
                break;
            }
        }
        if flow == Flow::Quit {
            break;
        }
        if args.realtime {
            limiter.wait();
        }
    }

    if let Some(run) = engine.run() {
        println!(
            "level {}: still running after {} frames, {} scroll steps (checkpoint {:?})",
            run.level_id(),
            run.frame(),
            run.scroller().steps(),
            run.checkpoint()
        );
    }

    if let Some(path) = &args.settings {
        engine.settings().save(path).context("save settings")?;
    }
    Ok(())
}

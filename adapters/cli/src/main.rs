#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that runs a headless Alien Creep session.

mod config;
mod simulation;

use std::path::PathBuf;

use alien_creep_core::GameState;
use anyhow::Result;
use clap::Parser;

use crate::{config::SimulationConfig, simulation::Simulation};

/// Command-line arguments accepted by the Alien Creep binary.
#[derive(Debug, Parser)]
#[command(name = "alien-creep", about = "Runs a headless Alien Creep session")]
struct CliArgs {
    /// Path to a TOML file describing the group, gun and session.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Overrides the frame budget from the configuration.
    #[arg(long, value_name = "N")]
    max_frames: Option<u64>,
    /// Overrides the autopilot seed from the configuration.
    #[arg(long, value_name = "N")]
    seed: Option<u64>,
}

/// Entry point for the Alien Creep command-line interface.
fn main() -> Result<()> {
    env_logger::init();
    let args = CliArgs::parse();

    let mut config = SimulationConfig::load(args.config.as_deref())?;
    if let Some(max_frames) = args.max_frames {
        config.session.max_frames = max_frames;
    }
    if let Some(seed) = args.seed {
        config.session.seed = seed;
    }

    let mut simulation = Simulation::new(&config)?;
    println!("{}", simulation.welcome_banner());

    let report = simulation.run(config.session.max_frames);
    match report.outcome {
        Some(GameState::Win) => println!("YOU WIN!"),
        Some(GameState::Lose) => println!("YOU LOSE!"),
        _ => println!("No verdict after {} frames.", report.frames),
    }
    println!("SCORE : {}", report.score);
    log::info!(
        "session finished after {} frames ({:.1}s simulated) with {} terminal events",
        report.frames,
        report.elapsed.as_secs_f32(),
        report.terminal_events
    );
    Ok(())
}

#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that generates a Scorch match terrain, optionally
//! shells it with a random barrage, and prints a report.

mod barrage;
mod config;
mod report;

use std::{path::PathBuf, time::Duration};

use anyhow::{Context, Result};
use clap::Parser;
use log::info;
use scorch_core::Command;
use scorch_system_generation::{seed_stream, Generation, GenerationParams, DEFAULT_EDGE_MARGIN};
use scorch_world::{self as world, World};

use config::CliConfig;
use report::EventTally;

/// Length of one simulated frame between barrage shots.
const FRAME: Duration = Duration::from_nanos(16_666_667);

#[derive(Debug, Parser)]
#[command(name = "scorch", about = "Generate and inspect artillery terrain")]
struct Cli {
    /// Match seed; every random stream derives from it.
    #[arg(long, default_value_t = 1)]
    seed: u64,
    /// Number of terrain columns.
    #[arg(long, default_value_t = 1_600)]
    width: u32,
    /// Canvas height bound.
    #[arg(long, default_value_t = 900.0)]
    height_bound: f32,
    /// Spawn x position; repeat for every tank.
    #[arg(long = "spawn")]
    spawns: Vec<f32>,
    /// Width of the edge fade on each side.
    #[arg(long, default_value_t = DEFAULT_EDGE_MARGIN)]
    edge_margin: f32,
    /// TOML file with `[generation]` tuning and `[barrage]` settings.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Random shots fired at the terrain after generation.
    #[arg(long)]
    barrage: Option<u32>,
    /// Character columns of the side view.
    #[arg(long, default_value_t = 100)]
    columns: usize,
    /// Character rows of the side view.
    #[arg(long, default_value_t = 24)]
    rows: usize,
}

/// Entry point for the Scorch command-line interface.
fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();
    let report = run(&cli)?;
    print!("{report}");
    Ok(())
}

fn run(cli: &Cli) -> Result<String> {
    let config = match &cli.config {
        Some(path) => config::load(path)?,
        None => CliConfig::default(),
    };

    let params = GenerationParams::new(cli.width, cli.height_bound)
        .with_spawns(cli.spawns.clone())
        .with_edge_margin(cli.edge_margin);
    let generation = Generation::new(config.generation.clone());
    let terrain = generation
        .generate(&params, &mut seed_stream(cli.seed, "terrain"))
        .with_context(|| format!("failed to generate terrain for seed {}", cli.seed))?;

    let mut world = World::new();
    let mut operators = seed_stream(cli.seed, "operators");
    let mut tally = EventTally::default();
    let mut events = Vec::new();
    world::apply(&mut world, terrain.into_command(), &mut operators, &mut events);
    tally.record(&events);

    let shots = cli.barrage.unwrap_or(config.barrage.shots);
    if shots > 0 {
        info!("firing a barrage of {shots} shots");
    }
    let mut aim = seed_stream(cli.seed, "barrage");
    for _ in 0..shots {
        let shot = barrage::random_shot(&world, &config.barrage, &mut aim);
        events.clear();
        world::apply(&mut world, shot, &mut operators, &mut events);
        for _ in 0..config.barrage.ticks_between_shots {
            world::apply(&mut world, Command::Tick { dt: FRAME }, &mut operators, &mut events);
        }
        tally.record(&events);
    }

    Ok(report::render(&world, &tally, cli.columns, cli.rows))
}

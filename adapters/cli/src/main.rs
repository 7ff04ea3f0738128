#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that plays Snake Duel headlessly.
//!
//! The adapter owns the frame loop: every frame it feeds the world's events
//! and the scripted key state to the controls system, applies the resulting
//! commands and then advances simulated time by one fixed frame.

mod config;
mod render;
mod script;

use std::{path::PathBuf, time::Duration};

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use snake_duel_core::{Command, Event};
use snake_duel_system_controls::Controls;
use snake_duel_world::{self as world, query, World, DEFAULT_BARRIER_OFFSET, DEFAULT_GRID};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::{config::SessionConfig, script::InputScript};

/// Command-line arguments accepted by the Snake Duel binary.
#[derive(Debug, Parser)]
#[command(name = "snake-duel", about = "Runs a headless two-player Snake Duel session")]
struct Args {
    /// TOML file with grid and rule overrides.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
    /// TOML file with scripted key presses.
    #[arg(long, value_name = "PATH")]
    script: Option<PathBuf>,
    /// Number of frames to simulate.
    #[arg(long, default_value_t = 600)]
    frames: u64,
    /// Simulated duration of one frame in milliseconds.
    #[arg(long, default_value_t = 16)]
    frame_ms: u64,
    /// Format of the final snapshot.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,
    /// Food placement seed; overrides the config file.
    #[arg(long)]
    seed: Option<u64>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

/// Entry point for the Snake Duel command-line interface.
fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let config = match &args.config {
        Some(path) => SessionConfig::load(path)?,
        None => SessionConfig::default(),
    };
    let session = config.resolve(args.seed)?;
    let script = match &args.script {
        Some(path) => InputScript::load(path)?,
        None => InputScript::default(),
    };
    if script.last_frame().is_some_and(|frame| frame >= args.frames) {
        warn!(frames = args.frames, "input script extends past the final frame");
    }

    let mut events = Vec::new();
    let mut world = World::start(session.rules, &mut events);
    println!("{}", query::welcome_banner(&world));

    if session.grid != DEFAULT_GRID || session.barrier_offset != DEFAULT_BARRIER_OFFSET {
        events.clear();
        world::apply(
            &mut world,
            Command::Configure {
                grid: session.grid,
                barrier_offset: session.barrier_offset,
            },
            &mut events,
        );
    }

    run(
        &mut world,
        &script,
        args.frames,
        Duration::from_millis(args.frame_ms),
        events,
    );

    let snapshot = query::snapshot(&world);
    info!(
        round = query::round_index(&world),
        ticks = query::tick_index(&world),
        terminal = snapshot.terminal,
        "session finished"
    );
    match args.format {
        OutputFormat::Text => print!("{}", render::render_text(&snapshot)),
        OutputFormat::Json => println!(
            "{}",
            serde_json::to_string_pretty(&snapshot).context("failed to serialize snapshot")?
        ),
    }
    Ok(())
}

fn run(
    world: &mut World,
    script: &InputScript,
    frames: u64,
    dt: Duration,
    mut events: Vec<Event>,
) {
    let mut controls = Controls::default();
    let mut commands = Vec::new();

    for frame in 0..frames {
        let observed = std::mem::take(&mut events);
        controls.handle(&observed, &script.frame(frame), &mut commands);
        for command in commands.drain(..) {
            world::apply(world, command, &mut events);
        }
        world::apply(world, Command::Advance { dt }, &mut events);
    }
}

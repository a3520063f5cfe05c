//! Grid Chase headless runner
//!
//! Drives the simulation with the built-in autopilot for a fixed number of
//! ticks and reports the outcome.

use std::path::PathBuf;

use clap::Parser;

use grid_chase::Settings;
use grid_chase::consts::FRAME_DT;
use grid_chase::sim::{GameEvent, GameState, autopilot, tick};

#[derive(Parser)]
#[command(name = "grid-chase", about = "Run a headless grid chase session")]
struct Cli {
    /// RNG seed for the session
    #[arg(long, default_value_t = 12345)]
    seed: u64,
    /// Number of ticks to simulate
    #[arg(long, default_value_t = 3600)]
    ticks: u64,
    /// Seconds per tick
    #[arg(long, default_value_t = FRAME_DT)]
    dt: f32,
    /// JSON settings file (defaults are used if missing or invalid)
    #[arg(long, short)]
    config: Option<PathBuf>,
    /// Print the final snapshot as JSON on stdout
    #[arg(long)]
    json: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let cli = Cli::parse();

    if !(cli.dt.is_finite() && cli.dt > 0.0) {
        return Err(format!("--dt must be a positive number, got {}", cli.dt).into());
    }

    let settings = Settings::load_or_default(cli.config.as_deref());
    let mut state = GameState::new(settings, cli.seed);

    let mut deaths = 0u32;
    let mut total_kills = 0u32;
    for _ in 0..cli.ticks {
        let input = autopilot(&state);
        tick(&mut state, &input, cli.dt);
        for event in &state.events {
            match event {
                GameEvent::GameOver => {
                    deaths += 1;
                    total_kills += state.kills;
                }
                GameEvent::Restarted => log::info!("Session restarted with seed {}", state.seed),
                _ => {}
            }
        }
    }
    if !state.is_over() {
        total_kills += state.kills;
    }

    log::info!(
        "Ran {} ticks: {} deaths, {} kills, final HP {}, {} enemies on the field",
        cli.ticks,
        deaths,
        total_kills,
        state.player_hp(),
        state.enemies.len()
    );

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&state.snapshot())?);
    }
    Ok(())
}

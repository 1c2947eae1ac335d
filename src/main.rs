//! Space Dodge entry point
//!
//! Headless host: runs the simulation under the demo autopilot and reports
//! the leaderboard.
//!
//! Usage: `space-dodge [settings.json] [--runs N] [--realtime] [--write-settings PATH]`

use std::path::PathBuf;
use std::time::{Duration, Instant};

use clap::Parser;
use space_dodge::consts::*;
use space_dodge::sim::{GamePhase, GameState, TickInput, tick};
use space_dodge::{Mixer, Settings};

/// Upper bound on frames per run so a perfect autopilot still terminates
const MAX_FRAMES_PER_RUN: u64 = 60 * 60 * 10;

/// Game instance holding all state
struct Game {
    state: GameState,
    mixer: Mixer,
    accumulator: f32,
    input: TickInput,
    last_phase: GamePhase,
    runs_finished: u32,
    frames: u64,
    sounds_played: usize,
}

impl Game {
    fn new(settings: Settings) -> Self {
        let mut mixer = Mixer::new();
        mixer.set_master_volume(settings.master_volume);
        mixer.set_sfx_volume(settings.sfx_volume);
        mixer.set_muted(settings.muted);

        let state = GameState::new(settings, mixer.queue());
        Self {
            last_phase: state.phase,
            state,
            mixer,
            accumulator: 0.0,
            input: TickInput {
                idle_mode: true,
                ..Default::default()
            },
            runs_finished: 0,
            frames: 0,
            sounds_played: 0,
        }
    }

    fn update(&mut self, dt: f32) {
        let dt = dt.min(0.1);
        self.accumulator += dt;

        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            tick(&mut self.state, &self.input, SIM_DT);
            self.accumulator -= SIM_DT;
            self.frames += 1;
            substeps += 1;

            let phase = self.state.phase;
            if phase != self.last_phase {
                if phase == GamePhase::GameOver {
                    self.runs_finished += 1;
                }
                self.last_phase = phase;
            }
        }

        // No audio backend: the mixer logs and discards
        self.sounds_played += self.mixer.drain().len();
    }
}

/// Headless Space Dodge runner
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Settings file (JSON). Defaults are used when omitted or unreadable
    settings: Option<PathBuf>,

    /// Number of runs to play before exiting
    #[arg(short, long, default_value_t = 3)]
    runs: u32,

    /// Pace the simulation at 60 Hz instead of running flat out
    #[arg(long)]
    realtime: bool,

    /// Write the effective settings to this file and exit
    #[arg(long, value_name = "PATH")]
    write_settings: Option<PathBuf>,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Space Dodge (headless) starting...");

    let args = Cli::parse();
    let settings = match &args.settings {
        Some(path) => Settings::load_or_default(path),
        None => Settings::default(),
    };

    if let Some(path) = &args.write_settings {
        match settings.save(path) {
            Ok(()) => log::info!("Settings written to {}", path.display()),
            Err(e) => {
                log::error!("Failed to write settings to {}: {e}", path.display());
                std::process::exit(1);
            }
        }
        return;
    }

    let mut game = Game::new(settings);
    let frame_budget = u64::from(args.runs) * MAX_FRAMES_PER_RUN;
    let frame_time = Duration::from_secs_f32(SIM_DT);

    while game.runs_finished < args.runs && game.frames < frame_budget {
        let started = Instant::now();
        game.update(SIM_DT);

        if args.realtime {
            if let Some(rest) = frame_time.checked_sub(started.elapsed()) {
                std::thread::sleep(rest);
            }
        }
    }

    if game.runs_finished < args.runs {
        log::warn!("stopped after {} frames with {} run(s) finished", game.frames, game.runs_finished);
    }

    log::info!("{} frames simulated, {} sounds played", game.frames, game.sounds_played);

    println!("\nHigh scores:");
    if game.state.high_scores.is_empty() {
        println!("  (none)");
    }
    for (i, entry) in game.state.high_scores.entries.iter().enumerate() {
        println!("  {:>2}. {:>6}  survived {}", i + 1, entry.score, entry.survival_time());
    }
}

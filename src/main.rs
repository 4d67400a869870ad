//! Missile Invader entry point
//!
//! Headless autoplay: runs a scripted session on simulated time and prints
//! one JSON snapshot per projectile tick. Rendering hosts drive [`Game`] the
//! same way, replacing the script with real input.
//!
//! Usage: `missile-invader [config.json]`

use std::process::ExitCode;

use missile_invader::sim::{LifecyclePhase, TickInput, tick};
use missile_invader::{Game, GameConfig};

/// Stop after this much simulated time
const MAX_SIM_MS: u64 = 30 * 60 * 1000;

/// Steer toward the invader and fire whenever possible
fn autoplay_input(game: &Game) -> TickInput {
    let state = game.state();
    let target = if state.invader.is_active() {
        state.invader.col
    } else {
        state.ufo.entity.col
    };
    TickInput {
        move_left: target < state.player.col,
        move_right: target > state.player.col,
        fire: state.phase == LifecyclePhase::Running,
        restart: state.phase == LifecyclePhase::RestartArmed,
        ..Default::default()
    }
}

fn main() -> ExitCode {
    env_logger::init();
    log::info!("Missile Invader (headless) starting...");

    let config = match std::env::args().nth(1) {
        Some(path) => match GameConfig::load(&path) {
            Ok(config) => config,
            Err(e) => {
                log::error!("Failed to load {}: {}", path, e);
                return ExitCode::FAILURE;
            }
        },
        None => GameConfig::default(),
    };

    let frame_ms = config.projectile_interval_ms;
    let mut game = match Game::new(config) {
        Ok(game) => game,
        Err(e) => {
            log::error!("Invalid configuration: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let mut restarts = 0;
    while game.now_ms() < MAX_SIM_MS {
        let input = autoplay_input(&game);
        if input.restart {
            // One replay is enough to exercise the restart path
            if restarts == 1 {
                break;
            }
            restarts += 1;
        }
        tick(&mut game, &input, frame_ms);

        for event in game.drain_events() {
            log::debug!("{:?}", event);
        }
        match serde_json::to_string(&game.snapshot()) {
            Ok(line) => println!("{}", line),
            Err(e) => {
                log::error!("Snapshot serialization failed: {}", e);
                return ExitCode::FAILURE;
            }
        }
    }

    log::info!("Finished at {} ms", game.now_ms());
    ExitCode::SUCCESS
}

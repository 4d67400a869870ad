//! Missile Invader - A fixed-grid arcade shooter core
//!
//! Core modules:
//! - `sim`: Deterministic simulation (grid, entities, projectiles, scheduler, collisions)
//! - `config`: Validated game configuration
//! - `error`: Configuration errors
//!
//! Rendering, input wiring and window lifecycle live outside this crate. The
//! core consumes abstract input events and elapsed time, and exposes a
//! read-only [`sim::Snapshot`] for presentation.

pub mod config;
pub mod error;
pub mod sim;

pub use config::GameConfig;
pub use error::{ConfigError, Result};
pub use sim::{Game, Snapshot};

/// Game configuration constants
pub mod consts {
    /// Grid dimensions (columns x rows)
    pub const GRID_COLS: u32 = 4;
    pub const GRID_ROWS: u32 = 8;

    /// Fixed rows for each actor
    pub const UFO_ROW: i32 = 1;
    pub const INVADER_ROW: i32 = 2;

    /// Starting columns
    pub const PLAYER_START_COL: i32 = 1;
    pub const INVADER_START_COL: i32 = 1;
    pub const UFO_START_COL: i32 = 0;

    /// Projectile advance cadence (ms)
    pub const PROJECTILE_INTERVAL_MS: u64 = 100;
    /// Enemy AI advance cadence (ms)
    pub const ENEMY_INTERVAL_MS: u64 = 400;
    /// Score blink cadence (ms)
    pub const BLINK_INTERVAL_MS: u64 = 300;
    /// Delay before a hidden UFO/invader reappears (ms)
    pub const RESPAWN_DELAY_MS: u64 = 1000;
    /// Delay between game over and accepting a restart (ms)
    pub const RESTART_DELAY_MS: u64 = 2000;

    /// Post-hit flash duration, in projectile ticks
    pub const FLASH_TICKS: u32 = 6;
    /// Steps in one score blink sequence
    pub const BLINK_STEPS: u32 = 6;

    /// Missiles available at the start of a game
    pub const INITIAL_AMMO: u32 = 150;
    /// Ammo lost when the player is hit
    pub const HIT_AMMO_PENALTY: u32 = 5;

    /// Chance per enemy tick that the invader fires (only with no enemy missile in flight)
    pub const ENEMY_FIRE_CHANCE: f64 = 0.5;

    /// Score values
    pub const UFO_POINTS: u32 = 5;
    pub const INVADER_POINTS: u32 = 1;
    /// Score at which the two-digit display wraps to 0 and starts blinking
    pub const SCORE_OVERFLOW: u32 = 160;
    /// Largest value a single display digit can show
    pub const MAX_DIGIT: u8 = 15;
}

//! Game configuration
//!
//! Every field defaults to the matching constant in [`crate::consts`], so a
//! JSON document only needs the keys it wants to override.

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::{ConfigError, Result};
use crate::sim::GridSpec;

/// Tunable game parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    // === Grid ===
    pub cols: u32,
    pub rows: u32,

    // === Layout ===
    /// Player row (defaults to the bottom row)
    pub player_row: u32,
    pub ufo_row: u32,
    pub invader_row: u32,
    pub player_start_col: u32,
    pub ufo_start_col: u32,
    pub invader_start_col: u32,

    // === Timing (ms) ===
    pub projectile_interval_ms: u64,
    pub enemy_interval_ms: u64,
    pub blink_interval_ms: u64,
    pub respawn_delay_ms: u64,
    pub restart_delay_ms: u64,

    // === Animation ===
    /// Flash length in projectile ticks
    pub flash_ticks: u32,
    /// Steps per score blink sequence
    pub blink_steps: u32,

    // === Rules ===
    pub initial_ammo: u32,
    pub enemy_fire_chance: f64,

    /// RNG seed (random when absent)
    pub seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            cols: GRID_COLS,
            rows: GRID_ROWS,

            player_row: GRID_ROWS - 1,
            ufo_row: UFO_ROW as u32,
            invader_row: INVADER_ROW as u32,
            player_start_col: PLAYER_START_COL as u32,
            ufo_start_col: UFO_START_COL as u32,
            invader_start_col: INVADER_START_COL as u32,

            projectile_interval_ms: PROJECTILE_INTERVAL_MS,
            enemy_interval_ms: ENEMY_INTERVAL_MS,
            blink_interval_ms: BLINK_INTERVAL_MS,
            respawn_delay_ms: RESPAWN_DELAY_MS,
            restart_delay_ms: RESTART_DELAY_MS,

            flash_ticks: FLASH_TICKS,
            blink_steps: BLINK_STEPS,

            initial_ammo: INITIAL_AMMO,
            enemy_fire_chance: ENEMY_FIRE_CHANCE,

            seed: None,
        }
    }
}

impl GameConfig {
    /// Parse a JSON document and validate it
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read and validate a JSON config file
    pub fn load(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Default config with a fixed seed
    pub fn seeded(seed: u64) -> Self {
        Self {
            seed: Some(seed),
            ..Self::default()
        }
    }

    pub fn grid(&self) -> GridSpec {
        GridSpec::new(self.cols, self.rows)
    }

    /// Check every invariant the simulation relies on
    pub fn validate(&self) -> Result<()> {
        // Cells are addressed with i32 coordinates
        let max_dim = i32::MAX as u32;
        if self.cols == 0 || self.rows == 0 || self.cols > max_dim || self.rows > max_dim {
            return Err(ConfigError::InvalidGrid {
                cols: self.cols,
                rows: self.rows,
            });
        }

        let cadences = [
            ("projectile_interval_ms", self.projectile_interval_ms),
            ("enemy_interval_ms", self.enemy_interval_ms),
            ("blink_interval_ms", self.blink_interval_ms),
            ("respawn_delay_ms", self.respawn_delay_ms),
            ("restart_delay_ms", self.restart_delay_ms),
        ];
        if let Some((name, _)) = cadences.iter().find(|(_, ms)| *ms == 0) {
            return Err(ConfigError::InvalidCadence { name: *name });
        }

        if self.flash_ticks == 0 {
            return Err(ConfigError::InvalidAnimation { name: "flash_ticks" });
        }
        if self.blink_steps == 0 {
            return Err(ConfigError::InvalidAnimation { name: "blink_steps" });
        }

        if !(0.0..=1.0).contains(&self.enemy_fire_chance) {
            return Err(ConfigError::InvalidProbability {
                name: "enemy_fire_chance",
                value: self.enemy_fire_chance,
            });
        }

        self.validate_layout()
    }

    fn validate_layout(&self) -> Result<()> {
        if self.player_row >= self.rows {
            return Err(ConfigError::InvalidLayout(format!(
                "player_row {} outside {} rows",
                self.player_row, self.rows
            )));
        }
        // Player missiles spawn one row above the player
        if self.player_row == 0 {
            return Err(ConfigError::InvalidLayout(
                "player_row must leave room to fire".to_string(),
            ));
        }
        for (name, row) in [("ufo_row", self.ufo_row), ("invader_row", self.invader_row)] {
            if row >= self.player_row {
                return Err(ConfigError::InvalidLayout(format!(
                    "{name} {row} must be above player_row {}",
                    self.player_row
                )));
            }
        }
        for (name, col) in [
            ("player_start_col", self.player_start_col),
            ("ufo_start_col", self.ufo_start_col),
            ("invader_start_col", self.invader_start_col),
        ] {
            if col >= self.cols {
                return Err(ConfigError::InvalidLayout(format!(
                    "{name} {col} outside {} columns",
                    self.cols
                )));
            }
        }
        Ok(())
    }
}

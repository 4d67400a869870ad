//! Read-only view of the game for presentation

use serde::{Deserialize, Serialize};

use super::grid::GridSpec;
use super::score::ScoreDisplay;
use super::state::{Entity, GameState, LifecyclePhase, Projectile};

/// Drawable state of one actor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActorView {
    pub col: i32,
    pub row: i32,
    pub visible: bool,
    pub flashing: bool,
}

impl From<&Entity> for ActorView {
    fn from(e: &Entity) -> Self {
        Self {
            col: e.col,
            row: e.row,
            visible: e.is_visible(),
            flashing: e.is_flashing(),
        }
    }
}

/// Everything a renderer needs after a tick
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub time_ms: u64,
    pub grid: GridSpec,
    pub player: ActorView,
    pub ufo: ActorView,
    pub invader: ActorView,
    pub player_projectiles: Vec<Projectile>,
    pub enemy_projectiles: Vec<Projectile>,
    pub score_display: ScoreDisplay,
    pub score: u32,
    pub overflowed: bool,
    pub ammo: u32,
    /// Full ammo gauge
    pub ammo_capacity: u32,
    pub phase: LifecyclePhase,
    pub paused: bool,
}

impl Snapshot {
    pub fn capture(state: &GameState, time_ms: u64) -> Self {
        Self {
            time_ms,
            grid: state.grid,
            player: ActorView::from(&state.player),
            ufo: ActorView::from(&state.ufo.entity),
            invader: ActorView::from(&state.invader),
            player_projectiles: state.projectiles.player.clone(),
            enemy_projectiles: state.projectiles.enemy.clone(),
            score_display: state.score.display(),
            score: state.score.score,
            overflowed: state.score.overflowed,
            ammo: state.ammo.remaining,
            ammo_capacity: state.ammo.capacity,
            phase: state.phase,
            paused: state.paused,
        }
    }
}

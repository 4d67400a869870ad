//! Game state and core simulation types
//!
//! Everything a session mutates lives in [`GameState`]; the scheduler only
//! holds commands that point back into it.

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::grid::GridSpec;
use super::score::ScoreState;
use crate::config::GameConfig;
use crate::consts::HIT_AMMO_PENALTY;

/// Coarse session phase gating which inputs are accepted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LifecyclePhase {
    /// Active gameplay
    Running,
    /// Out of ammo; waiting on nothing but the transition itself
    GameOverPending,
    /// Run ended, restart input debounced
    GameOver,
    /// Restart input accepted
    RestartArmed,
}

/// Per-entity visibility state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntityState {
    /// Visible and hittable
    Active,
    /// Post-hit flicker; inert and invulnerable
    Flashing { ticks_left: u32 },
    /// Off the field with a reappearance scheduled
    RespawnPending,
    /// Off the field, nothing scheduled
    Hidden,
}

/// Which edge the UFO enters from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntrySide {
    /// Enters at column 0 travelling right
    Left,
    /// Enters at the last column travelling left
    Right,
}

impl EntrySide {
    /// Side that continues travel in `direction` (+1 right, -1 left)
    pub fn continuing(direction: i32) -> Self {
        if direction >= 0 {
            EntrySide::Left
        } else {
            EntrySide::Right
        }
    }

    pub fn entry_col(&self, grid: &GridSpec) -> i32 {
        match self {
            EntrySide::Left => 0,
            EntrySide::Right => grid.last_col(),
        }
    }

    pub fn direction(&self) -> i32 {
        match self {
            EntrySide::Left => 1,
            EntrySide::Right => -1,
        }
    }
}

/// Identifies one of the three actors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Actor {
    Player,
    Ufo,
    Invader,
}

/// A grid-bound actor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entity {
    pub col: i32,
    pub row: i32,
    pub state: EntityState,
}

impl Entity {
    pub fn new(col: i32, row: i32) -> Self {
        Self {
            col,
            row,
            state: EntityState::Active,
        }
    }

    /// Drawn on screen (active or flashing)
    pub fn is_visible(&self) -> bool {
        matches!(
            self.state,
            EntityState::Active | EntityState::Flashing { .. }
        )
    }

    pub fn is_flashing(&self) -> bool {
        matches!(self.state, EntityState::Flashing { .. })
    }

    /// Visible and not flashing: can move, fire and be hit
    pub fn is_active(&self) -> bool {
        self.state == EntityState::Active
    }

    pub fn occupies(&self, col: i32, row: i32) -> bool {
        self.col == col && self.row == row
    }

    pub fn start_flash(&mut self, ticks: u32) {
        self.state = EntityState::Flashing { ticks_left: ticks };
    }

    /// Count down one flash tick. Returns true on the tick the flash ends;
    /// the caller decides what the entity becomes next.
    pub fn step_flash(&mut self) -> bool {
        if let EntityState::Flashing { ticks_left } = &mut self.state {
            *ticks_left = ticks_left.saturating_sub(1);
            return *ticks_left == 0;
        }
        false
    }
}

/// The UFO crossing the top of the field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ufo {
    pub entity: Entity,
    /// +1 travelling right, -1 travelling left
    pub direction: i32,
    /// Side to reappear from after a hit
    pub reentry: EntrySide,
}

/// Who fired a projectile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Owner {
    Player,
    Enemy,
}

/// A missile in flight
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Projectile {
    pub col: i32,
    pub row: i32,
    /// Row before the last advance (for crossed-over detection)
    pub prev_row: i32,
    pub owner: Owner,
}

impl Projectile {
    pub fn new(col: i32, row: i32, owner: Owner) -> Self {
        Self {
            col,
            row,
            prev_row: row,
            owner,
        }
    }

    /// Player missiles climb toward row 0, enemy missiles fall
    pub fn advance(&mut self) {
        self.prev_row = self.row;
        self.row += match self.owner {
            Owner::Player => -1,
            Owner::Enemy => 1,
        };
    }
}

/// Player-fired and enemy-fired missiles, in spawn order
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Projectiles {
    pub player: Vec<Projectile>,
    pub enemy: Vec<Projectile>,
}

impl Projectiles {
    /// Advance every missile one row, then drop those that left the grid.
    /// Returns how many were pruned.
    pub fn advance_all(&mut self, grid: &GridSpec) -> usize {
        self.player.iter_mut().for_each(Projectile::advance);
        self.enemy.iter_mut().for_each(Projectile::advance);
        self.prune(grid)
    }

    /// Advance enemy missiles only
    pub fn advance_enemy(&mut self, grid: &GridSpec) -> usize {
        self.enemy.iter_mut().for_each(Projectile::advance);
        self.prune(grid)
    }

    pub fn prune(&mut self, grid: &GridSpec) -> usize {
        let before = self.player.len() + self.enemy.len();
        self.player.retain(|p| grid.contains(p.col, p.row));
        self.enemy.retain(|p| grid.contains(p.col, p.row));
        before - (self.player.len() + self.enemy.len())
    }

    pub fn clear(&mut self) {
        self.player.clear();
        self.enemy.clear();
    }
}

/// Missile supply
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ammo {
    pub remaining: u32,
    pub capacity: u32,
}

impl Ammo {
    pub fn new(capacity: u32) -> Self {
        Self {
            remaining: capacity,
            capacity,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.remaining == 0
    }

    /// Spend one missile; false if none left
    pub fn consume(&mut self) -> bool {
        if self.remaining == 0 {
            return false;
        }
        self.remaining -= 1;
        true
    }

    /// Hit penalty, floored at zero
    pub fn penalize(&mut self) {
        self.remaining = self.remaining.saturating_sub(HIT_AMMO_PENALTY);
    }
}

/// Notable things that happened, drained by the presentation layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    ShotFired { col: i32 },
    AmmoChanged { remaining: u32 },
    EnemyFired { col: i32 },
    /// A player missile was stopped by an enemy missile
    ProjectilesCollided { col: i32, row: i32 },
    UfoHit,
    InvaderHit,
    PlayerHit,
    ScoreChanged { score: u32 },
    ScoreOverflow,
    Respawned { actor: Actor },
    GameOver,
    RestartArmed,
    Restarted,
}

/// Complete game state for one session
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub rng: Pcg32,
    pub grid: GridSpec,
    /// Restart counter; scheduled commands from older sessions are stale
    pub session: u64,
    pub phase: LifecyclePhase,
    pub paused: bool,
    /// Projectile ticks processed this session
    pub ticks: u64,
    pub player: Entity,
    pub ufo: Ufo,
    pub invader: Entity,
    pub projectiles: Projectiles,
    pub score: ScoreState,
    pub ammo: Ammo,
    pub events: Vec<GameEvent>,
    pub config: GameConfig,
}

impl GameState {
    /// Build a fresh session; `config` must already be validated
    pub fn new(config: &GameConfig) -> Self {
        let seed = config.seed.unwrap_or_else(rand::random);
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            grid: config.grid(),
            session: 0,
            phase: LifecyclePhase::Running,
            paused: false,
            ticks: 0,
            player: Entity::new(config.player_start_col as i32, config.player_row as i32),
            ufo: Self::initial_ufo(config),
            invader: Entity::new(config.invader_start_col as i32, config.invader_row as i32),
            projectiles: Projectiles::default(),
            score: ScoreState::new(config.blink_steps),
            ammo: Ammo::new(config.initial_ammo),
            events: Vec::new(),
            config: config.clone(),
        }
    }

    fn initial_ufo(config: &GameConfig) -> Ufo {
        Ufo {
            entity: Entity::new(config.ufo_start_col as i32, config.ufo_row as i32),
            direction: 1,
            reentry: EntrySide::Left,
        }
    }

    /// Reset everything but the RNG stream and bump the session
    pub fn reset(&mut self) {
        let config = self.config.clone();
        self.session += 1;
        self.phase = LifecyclePhase::Running;
        self.paused = false;
        self.ticks = 0;
        self.player = Entity::new(config.player_start_col as i32, config.player_row as i32);
        self.ufo = Self::initial_ufo(&config);
        self.invader = Entity::new(config.invader_start_col as i32, config.invader_row as i32);
        self.projectiles.clear();
        self.score = ScoreState::new(config.blink_steps);
        self.ammo = Ammo::new(config.initial_ammo);
    }

    pub fn entity(&self, actor: Actor) -> &Entity {
        match actor {
            Actor::Player => &self.player,
            Actor::Ufo => &self.ufo.entity,
            Actor::Invader => &self.invader,
        }
    }

    pub fn any_flashing(&self) -> bool {
        self.player.is_flashing() || self.ufo.entity.is_flashing() || self.invader.is_flashing()
    }

    /// Count down every flash by one tick; returns actors whose flash just ended
    pub fn step_flashes(&mut self) -> Vec<Actor> {
        let mut ended = Vec::new();
        if self.player.step_flash() {
            // The player never leaves the field
            self.player.state = EntityState::Active;
            ended.push(Actor::Player);
        }
        if self.ufo.entity.step_flash() {
            self.ufo.entity.state = EntityState::RespawnPending;
            ended.push(Actor::Ufo);
        }
        if self.invader.step_flash() {
            self.invader.state = EntityState::RespawnPending;
            ended.push(Actor::Invader);
        }
        ended
    }

    pub fn push_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }
}

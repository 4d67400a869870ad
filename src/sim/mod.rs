//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Simulated time only (the host supplies elapsed milliseconds)
//! - Seeded RNG only
//! - Stable iteration order (spawn order)
//! - No rendering or platform dependencies

pub mod collision;
pub mod grid;
pub mod scheduler;
pub mod score;
pub mod snapshot;
pub mod state;
pub mod tick;

pub use collision::{CollisionReport, projectiles_meet, resolve};
pub use grid::GridSpec;
pub use scheduler::{Scheduler, TimerId};
pub use score::{ScoreDisplay, ScoreState};
pub use snapshot::{ActorView, Snapshot};
pub use state::{
    Actor, Ammo, Entity, EntityState, EntrySide, GameEvent, GameState, LifecyclePhase, Owner,
    Projectile, Projectiles, Ufo,
};
pub use tick::{Game, Task, TickInput, tick};

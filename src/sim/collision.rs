//! Collision detection and scoring on the grid
//!
//! The tricky part of a stepped grid: two missiles flying toward each other
//! can swap cells within one tick without ever sharing one. Each missile
//! remembers its previous row so those crossings are still caught.

use super::state::{EntrySide, GameEvent, GameState, Projectile};
use crate::consts::{INVADER_POINTS, UFO_POINTS};

/// What one collision pass did
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CollisionReport {
    /// Player missiles stopped by enemy missiles
    pub intercepted: usize,
    pub ufo_hit: bool,
    pub invader_hit: bool,
    pub player_hit: bool,
    /// Score display overflowed during this pass
    pub overflowed: bool,
    /// A score blink sequence was started by the display update
    pub blink_started: bool,
}

impl CollisionReport {
    pub fn scored(&self) -> bool {
        self.ufo_hit || self.invader_hit
    }
}

/// Same cell, or swapped cells across the last advance
pub fn projectiles_meet(player: &Projectile, enemy: &Projectile) -> bool {
    if player.col != enemy.col {
        return false;
    }
    let same_spot = player.row == enemy.row;
    let crossed = player.prev_row == enemy.row && player.row == enemy.prev_row;
    same_spot || crossed
}

/// Run every collision rule, in order, against the current positions
pub fn resolve(state: &mut GameState) -> CollisionReport {
    let mut report = CollisionReport::default();

    resolve_projectile_pairs(state, &mut report);
    resolve_enemy_hits(state, &mut report);
    resolve_player_hit(state, &mut report);

    if report.scored() {
        let score = state.score.score;
        state.push_event(GameEvent::ScoreChanged { score });
        report.blink_started = state.score.publish();
    }

    report
}

/// Player missile meets enemy missile: only the player missile is destroyed
fn resolve_projectile_pairs(state: &mut GameState, report: &mut CollisionReport) {
    let enemy = &state.projectiles.enemy;
    let mut stopped = Vec::new();
    state.projectiles.player.retain(|p| {
        if enemy.iter().any(|e| projectiles_meet(p, e)) {
            stopped.push((p.col, p.row));
            false
        } else {
            true
        }
    });

    for (col, row) in stopped {
        log::debug!("Player missile intercepted at ({}, {})", col, row);
        state.push_event(GameEvent::ProjectilesCollided { col, row });
        report.intercepted += 1;
    }
}

/// Player missiles against UFO then invader; first match wins
fn resolve_enemy_hits(state: &mut GameState, report: &mut CollisionReport) {
    let flash_ticks = state.config.flash_ticks;
    let mut i = 0;
    while i < state.projectiles.player.len() {
        let p = state.projectiles.player[i];

        if state.ufo.entity.is_active() && state.ufo.entity.occupies(p.col, p.row) {
            state.ufo.entity.start_flash(flash_ticks);
            state.ufo.reentry = EntrySide::continuing(state.ufo.direction);
            report.overflowed |= state.score.add(UFO_POINTS);
            report.ufo_hit = true;
            state.projectiles.player.remove(i);
            log::debug!("UFO hit at ({}, {})", p.col, p.row);
            state.push_event(GameEvent::UfoHit);
            continue;
        }

        if state.invader.is_active() && state.invader.occupies(p.col, p.row) {
            state.invader.start_flash(flash_ticks);
            report.overflowed |= state.score.add(INVADER_POINTS);
            report.invader_hit = true;
            state.projectiles.player.remove(i);
            log::debug!("Invader hit at ({}, {})", p.col, p.row);
            state.push_event(GameEvent::InvaderHit);
            continue;
        }

        i += 1;
    }

    if report.overflowed {
        log::info!("Score overflow, display wrapped to 0");
        state.push_event(GameEvent::ScoreOverflow);
    }
}

/// Enemy missile reaches the player: ammo penalty and the field is cleared
fn resolve_player_hit(state: &mut GameState, report: &mut CollisionReport) {
    if !state.player.is_active() {
        return;
    }
    let (col, row) = (state.player.col, state.player.row);
    if !state.projectiles.enemy.iter().any(|e| e.col == col && e.row == row) {
        return;
    }

    state.ammo.penalize();
    state.projectiles.enemy.clear();
    state.player.start_flash(state.config.flash_ticks);
    report.player_hit = true;

    log::debug!("Player hit, ammo now {}", state.ammo.remaining);
    state.push_event(GameEvent::PlayerHit);
    let remaining = state.ammo.remaining;
    state.push_event(GameEvent::AmmoChanged { remaining });
}

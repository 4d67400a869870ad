//! Scheduled simulation ticks
//!
//! [`Game`] owns the state and the scheduler. Projectile advance, enemy
//! advance and score blink run as periodic timers; respawns and the restart
//! unlock run as one-shot timers. Every task runs to completion against the
//! state before the next one is popped.

use rand::Rng;

use super::collision::{self, CollisionReport};
use super::scheduler::{Scheduler, TimerId};
use super::snapshot::Snapshot;
use super::state::{
    Actor, EntityState, EntrySide, GameEvent, GameState, LifecyclePhase, Owner, Projectile,
};
use crate::config::GameConfig;
use crate::error::Result;

/// Scheduled command. One-shots carry the session they were scheduled in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Task {
    AdvanceProjectiles,
    AdvanceEnemies,
    BlinkStep,
    RespawnUfo { side: EntrySide, session: u64 },
    RespawnInvader { col: i32, session: u64 },
    ArmRestart { session: u64 },
}

/// Input commands for a single host frame
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    pub move_left: bool,
    pub move_right: bool,
    pub fire: bool,
    pub pause: bool,
    pub resume: bool,
    /// Restart tap (only honoured once the restart is armed)
    pub restart: bool,
}

/// Live timer handles
#[derive(Debug, Clone, Default)]
struct Timers {
    projectile: Option<TimerId>,
    enemy: Option<TimerId>,
    blink: Option<TimerId>,
    ufo_respawn: Option<TimerId>,
    invader_respawn: Option<TimerId>,
    restart: Option<TimerId>,
}

/// A game session: state plus its timeline
#[derive(Debug, Clone)]
pub struct Game {
    state: GameState,
    scheduler: Scheduler<Task>,
    timers: Timers,
}

/// Apply one frame of input, then advance the clock by `elapsed_ms`
pub fn tick(game: &mut Game, input: &TickInput, elapsed_ms: u64) {
    if input.pause {
        game.pause();
    }
    if input.resume {
        game.resume();
    }
    if input.move_left {
        game.move_left();
    }
    if input.move_right {
        game.move_right();
    }
    if input.fire {
        game.fire();
    }
    if input.restart {
        game.restart_or_advance();
    }
    game.advance(elapsed_ms);
}

impl Game {
    /// Validate `config` and start a session
    pub fn new(config: GameConfig) -> Result<Self> {
        config.validate()?;
        let state = GameState::new(&config);
        log::info!(
            "Game initialized: {}x{} grid, seed {}",
            state.grid.cols,
            state.grid.rows,
            state.seed
        );

        let mut game = Self {
            state,
            scheduler: Scheduler::new(),
            timers: Timers::default(),
        };
        game.start_loops();
        Ok(game)
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Direct state access for hosts that stage scenarios
    pub fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }

    pub fn phase(&self) -> LifecyclePhase {
        self.state.phase
    }

    pub fn now_ms(&self) -> u64 {
        self.scheduler.now_ms()
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot::capture(&self.state, self.scheduler.now_ms())
    }

    /// Take all events recorded since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.state.events)
    }

    // === Input ===

    fn accepts_play_input(&self) -> bool {
        self.state.phase == LifecyclePhase::Running && !self.state.paused
    }

    pub fn move_left(&mut self) {
        if self.accepts_play_input() {
            self.state.player.col = self.state.grid.clamp_col(self.state.player.col - 1);
        }
    }

    pub fn move_right(&mut self) {
        if self.accepts_play_input() {
            self.state.player.col = self.state.grid.clamp_col(self.state.player.col + 1);
        }
    }

    /// Fire a missile. One player missile in flight at a time. Once the
    /// restart is armed, fire doubles as the restart tap.
    pub fn fire(&mut self) {
        if self.state.phase == LifecyclePhase::RestartArmed && !self.state.paused {
            self.restart();
            return;
        }
        if !self.accepts_play_input() || !self.state.projectiles.player.is_empty() {
            return;
        }
        if !self.state.ammo.consume() {
            return;
        }

        let (col, row) = (self.state.player.col, self.state.player.row - 1);
        self.state
            .projectiles
            .player
            .push(Projectile::new(col, row, Owner::Player));

        let remaining = self.state.ammo.remaining;
        self.state.push_event(GameEvent::ShotFired { col });
        self.state.push_event(GameEvent::AmmoChanged { remaining });

        // The spawn cell may already hold an enemy missile
        let report = collision::resolve(&mut self.state);
        self.after_collision(&report);
    }

    pub fn pause(&mut self) {
        if !self.state.paused {
            self.state.paused = true;
            log::info!("Paused at {} ms", self.now_ms());
        }
    }

    pub fn resume(&mut self) {
        if self.state.paused {
            self.state.paused = false;
            log::info!("Resumed at {} ms", self.now_ms());
        }
    }

    /// Restart if armed; a no-op in every other phase
    pub fn restart_or_advance(&mut self) {
        if self.state.phase == LifecyclePhase::RestartArmed && !self.state.paused {
            self.restart();
        }
    }

    // === Time ===

    /// Advance simulated time, running every task that falls due
    pub fn advance(&mut self, elapsed_ms: u64) {
        if self.state.paused {
            return;
        }
        let until = self.scheduler.now_ms().saturating_add(elapsed_ms);
        while let Some((_, task)) = self.scheduler.pop_due(until) {
            self.run_task(task);
        }
        self.scheduler.advance_to(until);
    }

    fn run_task(&mut self, task: Task) {
        match task {
            Task::AdvanceProjectiles => self.projectile_tick(),
            Task::AdvanceEnemies => self.enemy_tick(),
            Task::BlinkStep => self.blink_step(),
            Task::RespawnUfo { side, session } => {
                if self.is_stale(session, "UFO respawn") {
                    return;
                }
                self.timers.ufo_respawn = None;
                let ufo = &mut self.state.ufo;
                ufo.entity.col = side.entry_col(&self.state.grid);
                ufo.direction = side.direction();
                ufo.entity.state = EntityState::Active;
                log::debug!("UFO reappears from {:?}", side);
                self.state.push_event(GameEvent::Respawned { actor: Actor::Ufo });
            }
            Task::RespawnInvader { col, session } => {
                if self.is_stale(session, "invader respawn") {
                    return;
                }
                self.timers.invader_respawn = None;
                self.state.invader.col = col;
                self.state.invader.state = EntityState::Active;
                log::debug!("Invader reappears at column {}", col);
                self.state.push_event(GameEvent::Respawned {
                    actor: Actor::Invader,
                });
            }
            Task::ArmRestart { session } => {
                if self.is_stale(session, "restart unlock") {
                    return;
                }
                self.timers.restart = None;
                if self.state.phase == LifecyclePhase::GameOver {
                    self.state.phase = LifecyclePhase::RestartArmed;
                    log::info!("Restart armed");
                    self.state.push_event(GameEvent::RestartArmed);
                }
            }
        }
    }

    fn is_stale(&self, session: u64, what: &str) -> bool {
        if session != self.state.session {
            log::trace!(
                "Dropping stale {} from session {} (now {})",
                what,
                session,
                self.state.session
            );
            return true;
        }
        false
    }

    fn projectile_tick(&mut self) {
        self.state.ticks += 1;

        for actor in self.state.step_flashes() {
            match actor {
                Actor::Ufo => {
                    let side = self.state.ufo.reentry;
                    self.schedule_ufo_respawn(side);
                }
                Actor::Invader => self.schedule_invader_respawn(),
                Actor::Player => log::debug!("Player recovered"),
            }
        }

        let grid = self.state.grid;
        self.state.projectiles.advance_all(&grid);
        let report = collision::resolve(&mut self.state);
        self.after_collision(&report);

        self.check_game_over();
    }

    fn enemy_tick(&mut self) {
        let grid = self.state.grid;

        if self.state.ufo.entity.is_active() {
            let next = self.state.ufo.entity.col + self.state.ufo.direction;
            if grid.contains_col(next) {
                self.state.ufo.entity.col = next;
            } else {
                // Flew off the edge: come back from a random side
                self.state.ufo.entity.state = EntityState::RespawnPending;
                let side = if self.state.rng.random_bool(0.5) {
                    EntrySide::Left
                } else {
                    EntrySide::Right
                };
                self.schedule_ufo_respawn(side);
            }
        }

        if self.state.invader.is_active() {
            let step = if self.state.rng.random_bool(0.5) { 1 } else { -1 };
            self.state.invader.col = grid.clamp_col(self.state.invader.col + step);

            if self.state.projectiles.enemy.is_empty()
                && self.state.rng.random_bool(self.state.config.enemy_fire_chance)
            {
                let (col, row) = (self.state.invader.col, self.state.invader.row);
                self.state
                    .projectiles
                    .enemy
                    .push(Projectile::new(col, row, Owner::Enemy));
                self.state.push_event(GameEvent::EnemyFired { col });
            }
        }

        self.state.projectiles.advance_enemy(&grid);
        let report = collision::resolve(&mut self.state);
        self.after_collision(&report);
    }

    fn after_collision(&mut self, report: &CollisionReport) {
        if report.blink_started {
            self.ensure_blink_timer();
        }
    }

    fn ensure_blink_timer(&mut self) {
        if self.timers.blink.is_none() {
            let period = self.state.config.blink_interval_ms;
            self.timers.blink = Some(self.scheduler.schedule_every(period, Task::BlinkStep));
        }
    }

    fn blink_step(&mut self) {
        if !self.state.score.step_blink() {
            if let Some(id) = self.timers.blink.take() {
                self.scheduler.cancel(id);
            }
        }
    }

    fn schedule_ufo_respawn(&mut self, side: EntrySide) {
        let task = Task::RespawnUfo {
            side,
            session: self.state.session,
        };
        let delay = self.state.config.respawn_delay_ms;
        self.timers.ufo_respawn = Some(self.scheduler.schedule_once(delay, task));
    }

    fn schedule_invader_respawn(&mut self) {
        let col = self.state.rng.random_range(0..self.state.grid.cols as i32);
        let task = Task::RespawnInvader {
            col,
            session: self.state.session,
        };
        let delay = self.state.config.respawn_delay_ms;
        self.timers.invader_respawn = Some(self.scheduler.schedule_once(delay, task));
    }

    // === Lifecycle ===

    fn check_game_over(&mut self) {
        if self.state.phase != LifecyclePhase::Running {
            return;
        }
        if self.state.ammo.is_empty()
            && self.state.projectiles.player.is_empty()
            && !self.state.any_flashing()
        {
            self.state.phase = LifecyclePhase::GameOverPending;
            self.enter_game_over();
        }
    }

    fn enter_game_over(&mut self) {
        for id in [
            self.timers.projectile.take(),
            self.timers.enemy.take(),
            self.timers.ufo_respawn.take(),
            self.timers.invader_respawn.take(),
        ]
        .into_iter()
        .flatten()
        {
            self.scheduler.cancel(id);
        }

        // Nothing will bring pending actors back now
        for entity in [&mut self.state.ufo.entity, &mut self.state.invader] {
            if entity.state == EntityState::RespawnPending {
                entity.state = EntityState::Hidden;
            }
        }

        self.state.phase = LifecyclePhase::GameOver;
        let task = Task::ArmRestart {
            session: self.state.session,
        };
        let delay = self.state.config.restart_delay_ms;
        self.timers.restart = Some(self.scheduler.schedule_once(delay, task));

        log::info!(
            "Game over at {} ms, score {}",
            self.now_ms(),
            self.state.score.score
        );
        self.state.push_event(GameEvent::GameOver);
    }

    fn start_loops(&mut self) {
        let config = &self.state.config;
        let (projectile_ms, enemy_ms) = (config.projectile_interval_ms, config.enemy_interval_ms);
        self.timers.projectile =
            Some(self.scheduler.schedule_every(projectile_ms, Task::AdvanceProjectiles));
        self.timers.enemy = Some(self.scheduler.schedule_every(enemy_ms, Task::AdvanceEnemies));
    }

    /// Full reset back to Running. Every outstanding timer is cancelled
    /// before the new session's loops start.
    fn restart(&mut self) {
        self.scheduler.cancel_all();
        self.timers = Timers::default();
        self.state.reset();
        self.start_loops();
        log::info!("Restarted (session {})", self.state.session);
        self.state.push_event(GameEvent::Restarted);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::score::ScoreDisplay;

    /// No enemy fire, fixed seed
    fn calm_config() -> GameConfig {
        GameConfig {
            enemy_fire_chance: 0.0,
            seed: Some(12345),
            ..Default::default()
        }
    }

    fn calm_game() -> Game {
        Game::new(calm_config()).unwrap()
    }

    /// Take the UFO and invader off the field
    fn clear_field(game: &mut Game) {
        game.state.ufo.entity.state = EntityState::Hidden;
        game.state.invader.state = EntityState::Hidden;
    }

    #[test]
    fn test_invalid_config_fails_fast() {
        let config = GameConfig {
            rows: 0,
            ..Default::default()
        };
        assert!(Game::new(config).is_err());
    }

    #[test]
    fn test_move_clamps_to_grid() {
        let mut game = calm_game();
        game.move_left();
        game.move_left();
        game.move_left();
        assert_eq!(game.state.player.col, 0);
        for _ in 0..10 {
            game.move_right();
        }
        assert_eq!(game.state.player.col, 3);
    }

    #[test]
    fn test_fire_is_rate_limited() {
        let mut game = calm_game();
        game.fire();
        assert_eq!(game.state.ammo.remaining, 149);
        assert_eq!(game.state.projectiles.player.len(), 1);
        assert_eq!(game.state.projectiles.player[0].row, 6);

        game.fire();
        game.fire();
        assert_eq!(game.state.ammo.remaining, 149);
        assert_eq!(game.state.projectiles.player.len(), 1);

        let events = game.drain_events();
        assert_eq!(
            events,
            vec![
                GameEvent::ShotFired { col: 1 },
                GameEvent::AmmoChanged { remaining: 149 }
            ]
        );
    }

    #[test]
    fn test_crossed_over_removes_player_missile_only() {
        let mut game = calm_game();
        clear_field(&mut game);
        game.state
            .projectiles
            .player
            .push(Projectile::new(3, 3, Owner::Player));
        game.state
            .projectiles
            .enemy
            .push(Projectile::new(3, 2, Owner::Enemy));

        game.advance(100);
        assert!(game.state.projectiles.player.is_empty());
        assert_eq!(game.state.projectiles.enemy.len(), 1);
        assert_eq!(game.state.projectiles.enemy[0].row, 3);

        game.advance(100);
        assert_eq!(game.state.projectiles.enemy[0].row, 4);
    }

    #[test]
    fn test_pruning_is_monotonic_and_scores_once() {
        let mut game = calm_game();
        game.state.ufo.entity.state = EntityState::Hidden;
        game.state.invader.col = 3;
        game.state
            .projectiles
            .player
            .push(Projectile::new(3, 4, Owner::Player));

        game.advance(100);
        assert_eq!(game.state.projectiles.player[0].row, 3);
        game.advance(100);
        // Reached the invader's cell at row 2
        assert!(game.state.projectiles.player.is_empty());
        assert_eq!(game.state.score.score, 1);

        game.advance(300);
        assert_eq!(game.state.score.score, 1);
        assert!(game.state.invader.is_flashing());
    }

    #[test]
    fn test_ufo_hit_flash_and_respawn() {
        let mut game = calm_game();
        game.state.invader.state = EntityState::Hidden;
        game.state
            .projectiles
            .player
            .push(Projectile::new(0, 2, Owner::Player));

        game.advance(100);
        assert_eq!(game.state.score.score, 5);
        assert!(game.state.ufo.entity.is_flashing());
        assert_eq!(game.state.ufo.reentry, EntrySide::Left);

        // Five more ticks: still flashing
        game.advance(500);
        assert!(game.state.ufo.entity.is_flashing());
        assert!(game.state.ufo.entity.is_visible());

        // Sixth tick after the hit: gone
        game.advance(100);
        assert!(!game.state.ufo.entity.is_visible());
        assert_eq!(game.state.ufo.entity.state, EntityState::RespawnPending);

        game.advance(999);
        assert!(!game.state.ufo.entity.is_visible());
        game.advance(1);
        assert!(game.state.ufo.entity.is_active());
        assert_eq!(game.state.ufo.entity.col, 0);
        assert_eq!(game.state.ufo.direction, 1);
    }

    #[test]
    fn test_ufo_leaves_field_and_returns() {
        let mut game = calm_game();
        game.state.invader.state = EntityState::Hidden;
        // Enemy ticks at 400, 800, 1200 walk it to column 3
        game.advance(1200);
        assert_eq!(game.state.ufo.entity.col, 3);
        game.advance(400);
        assert_eq!(game.state.ufo.entity.state, EntityState::RespawnPending);

        game.advance(999);
        assert!(!game.state.ufo.entity.is_visible());
        game.advance(1);
        let ufo = game.state.ufo;
        assert!(ufo.entity.is_active());
        let entered_at_edge = (ufo.entity.col == 0 && ufo.direction == 1)
            || (ufo.entity.col == 3 && ufo.direction == -1);
        assert!(entered_at_edge);
    }

    #[test]
    fn test_ufo_reentry_side_is_random() {
        let mut sides = Vec::new();
        for seed in 0..32 {
            let config = GameConfig {
                enemy_fire_chance: 0.0,
                seed: Some(seed),
                ..Default::default()
            };
            let mut game = Game::new(config).unwrap();
            game.state.invader.state = EntityState::Hidden;
            // Leaves at 1600, back at 2600
            game.advance(2600);
            assert!(game.state.ufo.entity.is_active());
            sides.push(EntrySide::continuing(game.state.ufo.direction));
        }
        assert!(sides.contains(&EntrySide::Left));
        assert!(sides.contains(&EntrySide::Right));
    }

    #[test]
    fn test_invader_hit_flash_and_respawn() {
        let mut game = calm_game();
        game.state.ufo.entity.state = EntityState::Hidden;
        game.state
            .projectiles
            .player
            .push(Projectile::new(1, 3, Owner::Player));

        game.advance(100);
        assert_eq!(game.state.score.score, 1);
        assert!(game.state.invader.is_flashing());

        game.advance(500);
        assert!(game.state.invader.is_flashing());

        // Sixth tick after the hit
        game.advance(100);
        assert_eq!(game.state.invader.state, EntityState::RespawnPending);
        assert!(!game.state.invader.is_visible());
        assert!(game.timers.invader_respawn.is_some());

        game.advance(999);
        assert!(!game.state.invader.is_visible());
        game.advance(1);
        assert!(game.state.invader.is_active());
        assert!(game.state.grid.contains_col(game.state.invader.col));
        assert_eq!(game.state.invader.row, 2);
        assert!(game.timers.invader_respawn.is_none());
        assert!(
            game.drain_events()
                .contains(&GameEvent::Respawned { actor: Actor::Invader })
        );
    }

    #[test]
    fn test_fire_into_enemy_missile_is_intercepted() {
        let mut game = calm_game();
        clear_field(&mut game);
        // Enemy missile sitting in the spawn cell above the player
        game.state
            .projectiles
            .enemy
            .push(Projectile::new(1, 6, Owner::Enemy));

        game.fire();
        assert_eq!(game.state.ammo.remaining, 149);
        assert!(game.state.projectiles.player.is_empty());
        assert_eq!(game.state.projectiles.enemy.len(), 1);
        assert!(
            game.drain_events()
                .contains(&GameEvent::ProjectilesCollided { col: 1, row: 6 })
        );

        // Rate limit is released, so the next shot goes out
        game.state.projectiles.enemy.clear();
        game.fire();
        assert_eq!(game.state.projectiles.player.len(), 1);
    }

    #[test]
    fn test_huge_elapsed_time_saturates() {
        let mut game = calm_game();
        clear_field(&mut game);
        game.state.ammo.remaining = 0;
        game.advance(100);
        assert_eq!(game.phase(), LifecyclePhase::GameOver);

        game.advance(u64::MAX);
        assert_eq!(game.now_ms(), u64::MAX);
        assert_eq!(game.phase(), LifecyclePhase::RestartArmed);
        game.advance(u64::MAX);
        assert_eq!(game.now_ms(), u64::MAX);
    }

    #[test]
    fn test_player_hit_costs_ammo_and_flashes() {
        let mut game = calm_game();
        clear_field(&mut game);
        game.state
            .projectiles
            .enemy
            .push(Projectile::new(1, 6, Owner::Enemy));

        game.advance(100);
        assert_eq!(game.state.ammo.remaining, 145);
        assert!(game.state.player.is_flashing());
        assert!(game.state.projectiles.enemy.is_empty());

        game.advance(600);
        assert!(game.state.player.is_active());
        assert!(game.state.player.is_visible());
    }

    #[test]
    fn test_overflow_blinks_score() {
        let mut game = calm_game();
        game.state.invader.state = EntityState::Hidden;
        game.state.score.score = 155;
        game.state
            .projectiles
            .player
            .push(Projectile::new(0, 2, Owner::Player));

        game.advance(100);
        assert_eq!(game.state.score.score, 0);
        assert!(game.state.score.overflowed);
        assert!(game.state.score.blinking);
        assert_eq!(game.state.score.blink_steps_left, 6);
        assert_eq!(
            game.snapshot().score_display,
            ScoreDisplay::Digits { tens: 0, ones: 0 }
        );

        game.advance(300);
        assert_eq!(game.snapshot().score_display, ScoreDisplay::Blank);

        // Six steps later the overflow restarts the sequence
        game.advance(1500);
        assert!(game.state.score.blinking);
        assert_eq!(game.state.score.blink_steps_left, 6);
    }

    #[test]
    fn test_ammo_depletion_game_over_and_restart() {
        let mut game = calm_game();
        clear_field(&mut game);
        game.move_right();
        game.state.ammo.remaining = 1;

        game.fire();
        assert_eq!(game.state.ammo.remaining, 0);
        game.fire();
        assert_eq!(game.state.projectiles.player.len(), 1);

        // Missile climbs rows 5..0 over six ticks
        game.advance(600);
        assert_eq!(game.phase(), LifecyclePhase::Running);
        assert_eq!(game.state.projectiles.player[0].row, 0);

        // Leaves the grid: game over on the same tick
        game.advance(100);
        assert!(game.state.projectiles.player.is_empty());
        assert_eq!(game.phase(), LifecyclePhase::GameOver);
        assert!(game.drain_events().contains(&GameEvent::GameOver));

        let col = game.state.player.col;
        game.move_left();
        assert_eq!(game.state.player.col, col);

        game.restart_or_advance();
        game.fire();
        assert_eq!(game.phase(), LifecyclePhase::GameOver);

        game.advance(1999);
        assert_eq!(game.phase(), LifecyclePhase::GameOver);
        game.advance(1);
        assert_eq!(game.phase(), LifecyclePhase::RestartArmed);

        game.restart_or_advance();
        assert_eq!(game.phase(), LifecyclePhase::Running);
        assert_eq!(game.state.score.score, 0);
        assert_eq!(game.state.ammo.remaining, 150);
        assert_eq!(game.state.player.col, 1);
        assert_eq!(game.scheduler.pending(), 2);
    }

    #[test]
    fn test_fire_restarts_when_armed() {
        let mut game = calm_game();
        clear_field(&mut game);
        game.state.ammo.remaining = 0;
        game.advance(100);
        assert_eq!(game.phase(), LifecyclePhase::GameOver);
        game.advance(2000);
        game.fire();
        assert_eq!(game.phase(), LifecyclePhase::Running);
        assert!(game.state.projectiles.player.is_empty());
    }

    #[test]
    fn test_game_over_waits_for_flash() {
        let mut game = calm_game();
        clear_field(&mut game);
        game.state.ammo.remaining = 0;
        game.state.player.start_flash(3);

        game.advance(200);
        assert_eq!(game.phase(), LifecyclePhase::Running);
        game.advance(100);
        assert_eq!(game.phase(), LifecyclePhase::GameOver);
    }

    #[test]
    fn test_restart_cancels_pending_respawn() {
        let mut game = calm_game();
        game.state.ufo.direction = -1;
        game.state.ufo.entity.start_flash(1);
        game.advance(100);
        assert_eq!(game.state.ufo.entity.state, EntityState::RespawnPending);
        assert!(game.timers.ufo_respawn.is_some());

        game.restart();
        game.state.ufo.entity.state = EntityState::Hidden;
        game.advance(2000);
        assert_eq!(game.state.ufo.entity.state, EntityState::Hidden);
        assert!(
            !game
                .drain_events()
                .contains(&GameEvent::Respawned { actor: Actor::Ufo })
        );
    }

    #[test]
    fn test_stale_task_is_ignored() {
        let mut game = calm_game();
        game.state.invader.state = EntityState::Hidden;
        game.state.session = 3;
        game.run_task(Task::RespawnInvader { col: 2, session: 2 });
        assert_eq!(game.state.invader.state, EntityState::Hidden);
        game.run_task(Task::RespawnInvader { col: 2, session: 3 });
        assert!(game.state.invader.is_active());
        assert_eq!(game.state.invader.col, 2);
    }

    #[test]
    fn test_pause_freezes_time_and_input() {
        let mut game = calm_game();
        game.pause();
        game.advance(1000);
        assert_eq!(game.now_ms(), 0);
        game.fire();
        game.move_left();
        assert!(game.state.projectiles.player.is_empty());
        assert_eq!(game.state.player.col, 1);

        game.resume();
        game.advance(100);
        assert_eq!(game.now_ms(), 100);
        assert_eq!(game.state.ticks, 1);
    }

    #[test]
    fn test_tick_applies_input_then_time() {
        let mut game = calm_game();
        clear_field(&mut game);
        let input = TickInput {
            move_right: true,
            fire: true,
            ..Default::default()
        };
        tick(&mut game, &input, 100);
        assert_eq!(game.state.player.col, 2);
        assert_eq!(game.state.projectiles.player[0].col, 2);
        assert_eq!(game.state.projectiles.player[0].row, 5);
    }

    #[test]
    fn test_invader_fires_when_field_empty() {
        let config = GameConfig {
            enemy_fire_chance: 1.0,
            seed: Some(9),
            ..Default::default()
        };
        let mut game = Game::new(config).unwrap();
        game.state.ufo.entity.state = EntityState::Hidden;

        game.advance(400);
        assert_eq!(game.state.projectiles.enemy.len(), 1);
        let missile = game.state.projectiles.enemy[0];
        assert_eq!(missile.col, game.state.invader.col);
        assert_eq!(missile.row, game.state.invader.row + 1);

        // Still in flight at the next enemy tick, so no second shot
        game.advance(400);
        let shots = game
            .drain_events()
            .into_iter()
            .filter(|e| matches!(e, GameEvent::EnemyFired { .. }))
            .count();
        assert_eq!(shots, 1);
    }

    #[test]
    fn test_determinism() {
        let inputs = [
            TickInput {
                fire: true,
                ..Default::default()
            },
            TickInput {
                move_left: true,
                ..Default::default()
            },
            TickInput::default(),
            TickInput {
                move_right: true,
                fire: true,
                ..Default::default()
            },
        ];

        let mut game1 = Game::new(GameConfig::seeded(99999)).unwrap();
        let mut game2 = Game::new(GameConfig::seeded(99999)).unwrap();
        for _ in 0..20 {
            for input in &inputs {
                tick(&mut game1, input, 150);
                tick(&mut game2, input, 150);
                assert_eq!(game1.snapshot(), game2.snapshot());
            }
        }
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        fn apply(game: &mut Game, op: u8) {
            match op {
                0 => game.move_left(),
                1 => game.move_right(),
                2 => game.fire(),
                3 => game.restart_or_advance(),
                _ => {}
            }
        }

        proptest! {
            #[test]
            fn projectiles_stay_in_bounds(
                seed in any::<u64>(),
                steps in prop::collection::vec((0u8..6, 0u64..700), 1..120),
            ) {
                let mut game = Game::new(GameConfig::seeded(seed)).unwrap();
                for (op, elapsed) in steps {
                    apply(&mut game, op);
                    game.advance(elapsed);

                    let state = game.state();
                    let all = state.projectiles.player.iter().chain(&state.projectiles.enemy);
                    for p in all {
                        prop_assert!(state.grid.contains(p.col, p.row));
                    }
                    prop_assert!(state.projectiles.player.len() <= 1);
                    prop_assert!(state.ammo.remaining <= state.ammo.capacity);
                    prop_assert!(state.score.score < crate::consts::SCORE_OVERFLOW);
                    prop_assert!(state.grid.contains_col(state.player.col));
                }
            }

            #[test]
            fn player_missile_rows_strictly_decrease(start_row in 0i32..7, col in 0i32..4) {
                let mut game = calm_game();
                clear_field(&mut game);
                game.state
                    .projectiles
                    .player
                    .push(Projectile::new(col, start_row, Owner::Player));

                let mut last = start_row;
                for _ in 0..10 {
                    game.advance(100);
                    match game.state.projectiles.player.first() {
                        Some(p) => {
                            prop_assert_eq!(p.row, last - 1);
                            prop_assert_eq!(p.prev_row, last);
                            last = p.row;
                        }
                        None => {
                            prop_assert_eq!(last, 0);
                            break;
                        }
                    }
                }
                prop_assert!(game.state.projectiles.player.is_empty());
            }
        }
    }
}

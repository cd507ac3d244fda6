#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Session orchestration for Lone Tower.
//!
//! A [`Session`] owns the authoritative world together with the pure systems
//! and runs them in a fixed order once per simulated frame:
//!
//! 1. enemies and projectiles advance,
//! 2. the tower regenerates, cools down, (re)targets and fires,
//! 3. contact damage is resolved,
//! 4. dead enemies are swept and their bounty credited,
//! 5. the wave director decides whether a wave is due,
//! 6. game over is evaluated.
//!
//! Nothing is simulated while the session is paused or over.

mod config;

use std::time::Duration;

use lone_tower_core::{
    Command, EnemyView, Event, ProjectileView, SessionStatus, TowerSnapshot, UpgradeCosts,
    UpgradeError, UpgradeKind, UpgradeReceipt,
};
use lone_tower_system_analytics::Analytics;
use lone_tower_system_spawning::WaveDirector;
use lone_tower_system_tower_combat::TowerCombat;
use lone_tower_system_tower_targeting::TowerTargeting;
use lone_tower_world::{self as world, query, World, WorldTuning};
use tracing::{debug, info};

pub use config::{ConfigError, SessionConfig};
pub use lone_tower_system_analytics::SessionStats;

/// Most frames [`Session::advance`] simulates in one call before dropping the backlog.
pub const MAX_CATCH_UP_TICKS: u32 = 8;

/// A running game: world state, systems and the fixed-step clock.
#[derive(Debug)]
pub struct Session {
    world: World,
    targeting: TowerTargeting,
    combat: TowerCombat,
    director: WaveDirector,
    analytics: Analytics,
    events: Vec<Event>,
    commands: Vec<Command>,
    tick_length: Duration,
    accumulator: Duration,
}

impl Session {
    /// Starts a new session from a validated configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when `config` fails validation.
    pub fn new(config: SessionConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let region = config.spawn_region()?;
        let tick_length = config.tick_length();

        info!(
            seed = config.waves.seed,
            fps = config.world.arena.fps,
            "session started"
        );

        Ok(Self {
            world: World::with_tuning(config.world),
            targeting: TowerTargeting::new(),
            combat: TowerCombat::new(),
            director: WaveDirector::new(config.waves, region),
            analytics: Analytics::new(),
            events: Vec::new(),
            commands: Vec::new(),
            tick_length,
            accumulator: Duration::ZERO,
        })
    }

    /// Simulates exactly one frame and returns the events it produced.
    pub fn update(&mut self) -> &[Event] {
        self.events.clear();
        if self.status().is_running() {
            self.run_frame();
            self.analytics.handle(&self.events);
            log_events(&self.events);
        }
        &self.events
    }

    /// Accumulates wall-clock time and simulates every whole frame it covers,
    /// at most [`MAX_CATCH_UP_TICKS`] of them. Returns the number of frames run.
    pub fn advance(&mut self, dt: Duration) -> u32 {
        if !self.status().is_running() {
            self.accumulator = Duration::ZERO;
            return 0;
        }

        self.accumulator = self.accumulator.saturating_add(dt);
        let mut ticks = 0;
        while self.accumulator >= self.tick_length && ticks < MAX_CATCH_UP_TICKS {
            self.accumulator -= self.tick_length;
            let _ = self.update();
            ticks += 1;
        }

        if ticks == MAX_CATCH_UP_TICKS && self.accumulator >= self.tick_length {
            debug!(
                dropped = ?self.accumulator,
                "simulation fell behind, dropping backlog"
            );
            self.accumulator = Duration::ZERO;
        }

        ticks
    }

    /// Pauses or resumes the simulation. Ignored once the game is over.
    /// Returns whether the session is paused afterwards.
    pub fn toggle_pause(&mut self) -> bool {
        let _ = self.act(Command::TogglePause);
        self.accumulator = Duration::ZERO;
        self.status().paused
    }

    /// Discards the current game and starts over with the same configuration.
    pub fn reset(&mut self) {
        let _ = self.act(Command::Reset);
        self.director.reset();
        self.accumulator = Duration::ZERO;
    }

    /// Buys `kind` for the tower.
    ///
    /// # Errors
    ///
    /// Returns the reason the upgrade was refused. Nothing changes on refusal.
    pub fn upgrade(&mut self, kind: UpgradeKind) -> Result<UpgradeReceipt, UpgradeError> {
        let events = self.act(Command::Upgrade { kind });
        events
            .into_iter()
            .find_map(|event| match event {
                Event::UpgradeApplied { receipt } => Some(Ok(receipt)),
                Event::UpgradeRejected { reason, .. } => Some(Err(reason)),
                _ => None,
            })
            .unwrap_or(Err(UpgradeError::SessionInactive))
    }

    /// Buys a damage upgrade.
    ///
    /// # Errors
    ///
    /// See [`Session::upgrade`].
    pub fn upgrade_damage(&mut self) -> Result<UpgradeReceipt, UpgradeError> {
        self.upgrade(UpgradeKind::Damage)
    }

    /// Buys an attack speed upgrade.
    ///
    /// # Errors
    ///
    /// See [`Session::upgrade`].
    pub fn upgrade_speed(&mut self) -> Result<UpgradeReceipt, UpgradeError> {
        self.upgrade(UpgradeKind::Speed)
    }

    /// Buys an armor upgrade.
    ///
    /// # Errors
    ///
    /// See [`Session::upgrade`].
    pub fn upgrade_armor(&mut self) -> Result<UpgradeReceipt, UpgradeError> {
        self.upgrade(UpgradeKind::Armor)
    }

    /// Session flags, purse and counters.
    #[must_use]
    pub fn status(&self) -> SessionStatus {
        query::status(&self.world)
    }

    /// Current tower state.
    #[must_use]
    pub fn tower(&self) -> TowerSnapshot {
        query::tower(&self.world)
    }

    /// Enemies on the field in spawn order.
    #[must_use]
    pub fn enemies(&self) -> EnemyView {
        query::enemy_view(&self.world)
    }

    /// Projectiles in flight.
    #[must_use]
    pub fn projectiles(&self) -> ProjectileView {
        query::projectile_view(&self.world)
    }

    /// Current price of every upgrade.
    #[must_use]
    pub fn upgrade_costs(&self) -> UpgradeCosts {
        query::upgrade_costs(&self.world)
    }

    /// Statistics gathered since the session started or was last reset.
    #[must_use]
    pub fn stats(&self) -> &SessionStats {
        self.analytics.stats()
    }

    /// Tuning the world was built with.
    #[must_use]
    pub fn tuning(&self) -> &WorldTuning {
        query::tuning(&self.world)
    }

    /// Wall-clock length of one simulated frame.
    #[must_use]
    pub fn tick_length(&self) -> Duration {
        self.tick_length
    }

    fn run_frame(&mut self) {
        self.apply(Command::Tick);
        self.apply(Command::AdvanceEntities);

        self.apply(Command::TickTower);
        self.targeting.handle(
            &query::status(&self.world),
            &query::tower(&self.world),
            &query::enemy_view(&self.world),
            &mut self.commands,
        );
        self.flush_commands();
        self.combat.handle(
            &query::status(&self.world),
            &query::tower(&self.world),
            &mut self.commands,
        );
        self.flush_commands();

        self.apply(Command::ResolveContacts);
        self.apply(Command::SweepEnemies);

        self.director.handle(
            &query::status(&self.world),
            query::active_enemy_count(&self.world),
            &mut self.commands,
        );
        self.flush_commands();

        self.apply(Command::EvaluateGameOver);
    }

    fn apply(&mut self, command: Command) {
        world::apply(&mut self.world, command, &mut self.events);
    }

    fn flush_commands(&mut self) {
        for command in self.commands.drain(..) {
            world::apply(&mut self.world, command, &mut self.events);
        }
    }

    /// Applies a player action outside the frame loop.
    fn act(&mut self, command: Command) -> Vec<Event> {
        let mut events = Vec::new();
        world::apply(&mut self.world, command, &mut events);
        self.analytics.handle(&events);
        log_events(&events);
        events
    }
}

fn log_events(events: &[Event]) {
    let mut expired = 0_usize;
    for event in events {
        match event {
            Event::WaveStarted { wave, enemy_count } => {
                info!(wave, enemy_count, "wave started");
            }
            Event::GameOver { wave } => info!(wave, "tower destroyed"),
            Event::UpgradeApplied { receipt } => info!(
                kind = %receipt.kind,
                cost = %receipt.cost,
                remaining = %receipt.remaining,
                "upgrade applied"
            ),
            Event::UpgradeRejected { kind, reason } => {
                debug!(kind = %kind, %reason, "upgrade rejected");
            }
            Event::PauseToggled { paused } => info!(paused, "pause toggled"),
            Event::SessionReset => info!("session reset"),
            Event::ProjectileExpired { .. } => expired += 1,
            _ => {}
        }
    }

    if expired > 0 {
        debug!(expired, "projectiles left the arena");
    }
}

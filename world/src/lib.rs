#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for Lone Tower.
//!
//! The world owns the tower, the enemy and projectile arenas, the player's
//! purse and the session flags. It is mutated exclusively through [`apply`]
//! and observed through the [`query`] module.

mod enemies;
mod projectiles;
mod tower;
pub mod tuning;

use lone_tower_core::{
    Command, Currency, EnemyId, Event, Position, ProjectileId, UpgradeError, UpgradeKind,
};

use self::{
    enemies::{Enemy, EnemyStep},
    projectiles::{Projectile, ProjectileStep},
    tower::Tower,
};
pub use self::tuning::{
    ArenaTuning, ContactDamage, EconomyTuning, EnemyTuning, ProjectileTuning, TowerTuning,
    WorldTuning,
};

/// Behaviour shared by the entities stored in the world's arenas.
pub(crate) trait Entity {
    /// Read-only description handed to systems and renderers.
    type Snapshot;

    /// Captures the entity's presentable state.
    fn snapshot(&self) -> Self::Snapshot;

    /// Reports whether the entity should leave its arena at the next compaction.
    fn is_spent(&self) -> bool;
}

/// Removes spent entities, reporting each one before it is dropped.
fn compact<E: Entity>(entities: &mut Vec<E>, mut on_removed: impl FnMut(&E)) {
    entities.retain(|entity| {
        if entity.is_spent() {
            on_removed(entity);
            false
        } else {
            true
        }
    });
}

/// Represents the authoritative Lone Tower world state.
#[derive(Debug)]
pub struct World {
    tuning: WorldTuning,
    tower: Tower,
    enemies: Vec<Enemy>,
    projectiles: Vec<Projectile>,
    purse: Currency,
    wave: u32,
    paused: bool,
    game_over: bool,
    tick: u64,
    next_enemy_id: u32,
    next_projectile_id: u32,
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

impl World {
    /// Creates a new world using the default tuning.
    #[must_use]
    pub fn new() -> Self {
        Self::with_tuning(WorldTuning::default())
    }

    /// Creates a new world ready for simulation with the provided tuning.
    #[must_use]
    pub fn with_tuning(tuning: WorldTuning) -> Self {
        let tower = Tower::new(&tuning.tower, &tuning.arena);
        let purse = tuning.economy.starting_currency;
        Self {
            tuning,
            tower,
            enemies: Vec::new(),
            projectiles: Vec::new(),
            purse,
            wave: 0,
            paused: false,
            game_over: false,
            tick: 0,
            next_enemy_id: 0,
            next_projectile_id: 0,
        }
    }

    fn is_running(&self) -> bool {
        !self.paused && !self.game_over
    }

    fn allocate_enemy_id(&mut self) -> EnemyId {
        let id = EnemyId::new(self.next_enemy_id);
        self.next_enemy_id = self.next_enemy_id.wrapping_add(1);
        id
    }

    fn allocate_projectile_id(&mut self) -> ProjectileId {
        let id = ProjectileId::new(self.next_projectile_id);
        self.next_projectile_id = self.next_projectile_id.wrapping_add(1);
        id
    }

    fn targetable_enemy(&self, id: EnemyId) -> Option<&Enemy> {
        self.enemies
            .iter()
            .find(|enemy| enemy.id() == id && enemy.is_targetable())
    }

    fn advance_entities(&mut self, out_events: &mut Vec<Event>) {
        let tower_position = self.tower.position();
        let contact_radius = self.tower.radius();
        for enemy in &mut self.enemies {
            if enemy.advance(tower_position, contact_radius) == EnemyStep::Killed {
                out_events.push(Event::EnemyKilled { enemy: enemy.id() });
            }
        }

        let arena = self.tuning.arena;
        for projectile in &mut self.projectiles {
            match projectile.advance(&mut self.enemies, &arena) {
                ProjectileStep::Travelling => {}
                ProjectileStep::Hit {
                    enemy,
                    damage,
                    killed,
                } => {
                    out_events.push(Event::ProjectileHit {
                        projectile: projectile.id(),
                        enemy,
                        damage,
                    });
                    if killed {
                        out_events.push(Event::EnemyKilled { enemy });
                    }
                }
                ProjectileStep::Expired => out_events.push(Event::ProjectileExpired {
                    projectile: projectile.id(),
                }),
            }
        }

        compact(&mut self.projectiles, |_| {});
    }

    fn set_target(&mut self, target: Option<EnemyId>, out_events: &mut Vec<Event>) {
        let validated = target.filter(|id| {
            self.targetable_enemy(*id)
                .is_some_and(|enemy| self.tower.in_range(enemy.position()))
        });

        let previous = self.tower.target();
        if previous == validated {
            return;
        }

        if let Some(enemy) = previous {
            out_events.push(Event::TargetCleared { enemy });
        }
        self.tower.set_target(validated);
        if let Some(enemy) = validated {
            out_events.push(Event::TargetAcquired { enemy });
        }
    }

    fn fire(&mut self, target: EnemyId, out_events: &mut Vec<Event>) {
        if !self.tower.is_ready() || self.tower.target() != Some(target) {
            return;
        }

        let Some(aim) = self.targetable_enemy(target).map(Enemy::position) else {
            return;
        };

        let id = self.allocate_projectile_id();
        let projectile = Projectile::fire(
            id,
            self.tower.position(),
            (target, aim),
            self.tower.damage(),
            self.tuning.projectile.speed,
            self.tuning.projectile.hit_radius,
        );
        self.projectiles.push(projectile);
        self.tower.rearm();
        out_events.push(Event::ProjectileFired {
            projectile: id,
            target,
        });
    }

    fn resolve_contacts(&mut self, out_events: &mut Vec<Event>) {
        let tower_position = self.tower.position();
        let contact_radius = self.tower.radius();
        let mode = self.tuning.contact_damage;
        let arena = self.tuning.arena;

        let total: f32 = self
            .enemies
            .iter()
            .filter(|enemy| enemy.is_targetable() && enemy.touches(tower_position, contact_radius))
            .map(|enemy| mode.per_frame(enemy.damage(), &arena))
            .sum();

        if total > 0.0 {
            self.tower.take_damage(total);
            out_events.push(Event::TowerDamaged {
                amount: total,
                remaining: self.tower.snapshot().health,
            });
        }
    }

    fn sweep_enemies(&mut self, out_events: &mut Vec<Event>) {
        for enemy in &mut self.enemies {
            if let Some(bounty) = enemy.claim_bounty() {
                self.purse = self.purse.saturating_add(bounty);
                out_events.push(Event::BountyAwarded {
                    enemy: enemy.id(),
                    bounty,
                });
            }
        }

        compact(&mut self.enemies, |enemy| {
            out_events.push(Event::EnemyRemoved { enemy: enemy.id() });
        });

        if let Some(target) = self.tower.target() {
            if self.targetable_enemy(target).is_none() {
                self.tower.set_target(None);
                out_events.push(Event::TargetCleared { enemy: target });
            }
        }
    }

    fn spawn_wave(&mut self, positions: Vec<Position>, out_events: &mut Vec<Event>) {
        self.wave = self.wave.saturating_add(1);
        out_events.push(Event::WaveStarted {
            wave: self.wave,
            enemy_count: u32::try_from(positions.len()).unwrap_or(u32::MAX),
        });

        self.enemies.reserve(positions.len());
        for position in positions {
            let id = self.allocate_enemy_id();
            self.enemies
                .push(Enemy::spawn(id, position, &self.tuning.enemy));
            out_events.push(Event::EnemySpawned {
                enemy: id,
                position,
            });
        }
    }

    fn evaluate_game_over(&mut self, out_events: &mut Vec<Event>) {
        if self.game_over || !self.tower.is_destroyed() {
            return;
        }
        self.game_over = true;
        out_events.push(Event::GameOver { wave: self.wave });
    }

    fn upgrade(&mut self, kind: UpgradeKind, out_events: &mut Vec<Event>) {
        let outcome = if self.is_running() {
            self.tower.upgrade(kind, &mut self.purse)
        } else {
            Err(UpgradeError::SessionInactive)
        };

        out_events.push(match outcome {
            Ok(receipt) => Event::UpgradeApplied { receipt },
            Err(reason) => Event::UpgradeRejected { kind, reason },
        });
    }
}

/// Applies the provided command to the world, mutating state deterministically.
///
/// Simulation commands are ignored while the session is paused or over.
/// Upgrades are rejected in that state; pause toggles are ignored once the
/// game is over. Reset is always honoured.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::Upgrade { kind } => world.upgrade(kind, out_events),
        Command::TogglePause => {
            if !world.game_over {
                world.paused = !world.paused;
                out_events.push(Event::PauseToggled {
                    paused: world.paused,
                });
            }
        }
        Command::Reset => {
            let tuning = world.tuning.clone();
            *world = World::with_tuning(tuning);
            out_events.push(Event::SessionReset);
        }
        _ if !world.is_running() => {}
        Command::Tick => {
            world.tick = world.tick.saturating_add(1);
            out_events.push(Event::TimeAdvanced { tick: world.tick });
        }
        Command::AdvanceEntities => world.advance_entities(out_events),
        Command::TickTower => {
            world.tower.regenerate();
            world.tower.tick_cooldown();
        }
        Command::SetTowerTarget { target } => world.set_target(target, out_events),
        Command::FireProjectile { target } => world.fire(target, out_events),
        Command::ResolveContacts => world.resolve_contacts(out_events),
        Command::SweepEnemies => world.sweep_enemies(out_events),
        Command::SpawnWave { positions } => world.spawn_wave(positions, out_events),
        Command::EvaluateGameOver => world.evaluate_game_over(out_events),
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use lone_tower_core::{
        EnemyView, ProjectileView, SessionStatus, TowerSnapshot, UpgradeCosts,
    };

    use super::{Entity, World, WorldTuning};

    /// Provides read-only access to the tuning the world was built with.
    #[must_use]
    pub fn tuning(world: &World) -> &WorldTuning {
        &world.tuning
    }

    /// Captures the tower's current state.
    #[must_use]
    pub fn tower(world: &World) -> TowerSnapshot {
        world.tower.snapshot()
    }

    /// Captures a read-only view of the active enemies in spawn order.
    #[must_use]
    pub fn enemy_view(world: &World) -> EnemyView {
        EnemyView::from_snapshots(world.enemies.iter().map(Entity::snapshot).collect())
    }

    /// Captures a read-only view of the projectiles in flight.
    #[must_use]
    pub fn projectile_view(world: &World) -> ProjectileView {
        ProjectileView::from_snapshots(world.projectiles.iter().map(Entity::snapshot).collect())
    }

    /// Number of enemies still in the arena, including dying ones.
    #[must_use]
    pub fn active_enemy_count(world: &World) -> usize {
        world.enemies.len()
    }

    /// Session flags, purse and counters.
    #[must_use]
    pub fn status(world: &World) -> SessionStatus {
        SessionStatus {
            paused: world.paused,
            game_over: world.game_over,
            wave: world.wave,
            currency: world.purse,
            tick: world.tick,
        }
    }

    /// Current price of every upgrade.
    #[must_use]
    pub fn upgrade_costs(world: &World) -> UpgradeCosts {
        world.tower.upgrade_costs()
    }
}

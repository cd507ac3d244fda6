#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Lone Tower engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. The session submits [`Command`]
//! values describing desired mutations, the world executes those commands via
//! its `apply` entry point, and then broadcasts [`Event`] values for systems to
//! react to deterministically. Systems consume event streams, query immutable
//! snapshots, and respond exclusively with new command batches.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Title shown by adapters when the experience boots.
pub const GAME_TITLE: &str = "Lone Tower";

/// Point in continuous world space measured in world units.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    x: f32,
    y: f32,
}

impl Position {
    /// Origin of the world coordinate system.
    pub const ORIGIN: Self = Self::new(0.0, 0.0);

    /// Creates a new position from raw coordinates.
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Horizontal coordinate.
    #[must_use]
    pub const fn x(&self) -> f32 {
        self.x
    }

    /// Vertical coordinate.
    #[must_use]
    pub const fn y(&self) -> f32 {
        self.y
    }

    /// Squared Euclidean distance to `other`.
    ///
    /// Range and contact checks compare squared distances so no square root
    /// is taken on the hot path.
    #[must_use]
    pub fn distance_squared(self, other: Position) -> f32 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        dx * dx + dy * dy
    }

    /// Euclidean distance to `other`.
    #[must_use]
    pub fn distance(self, other: Position) -> f32 {
        self.distance_squared(other).sqrt()
    }

    /// Unit heading pointing from `self` toward `other`.
    ///
    /// Returns `None` when both points coincide, which callers treat as
    /// "already arrived" instead of dividing by a zero length.
    #[must_use]
    pub fn direction_to(self, other: Position) -> Option<Heading> {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        let length = (dx * dx + dy * dy).sqrt();
        if length <= f32::EPSILON || !length.is_finite() {
            return None;
        }

        Some(Heading {
            dx: dx / length,
            dy: dy / length,
        })
    }

    /// Returns the position reached by travelling `distance` along `heading`.
    #[must_use]
    pub fn moved(self, heading: Heading, distance: f32) -> Self {
        Self {
            x: self.x + heading.dx * distance,
            y: self.y + heading.dy * distance,
        }
    }
}

/// Normalised direction of travel.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Heading {
    dx: f32,
    dy: f32,
}

/// Unique identifier assigned to an enemy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EnemyId(u32);

impl EnemyId {
    /// Creates a new enemy identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }
}

/// Unique identifier assigned to a projectile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ProjectileId(u32);

impl ProjectileId {
    /// Creates a new projectile identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }
}

/// Amount of currency held by the player or charged for an upgrade.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Currency(u32);

impl Currency {
    /// Empty purse.
    pub const ZERO: Self = Self(0);

    /// Wraps a raw currency amount.
    #[must_use]
    pub const fn new(amount: u32) -> Self {
        Self(amount)
    }

    /// Raw amount.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }

    /// Adds `other`, saturating at the numeric bound.
    #[must_use]
    pub const fn saturating_add(self, other: Currency) -> Self {
        Self(self.0.saturating_add(other.0))
    }

    /// Subtracts `other`, returning `None` when the balance would go negative.
    #[must_use]
    pub fn checked_sub(self, other: Currency) -> Option<Self> {
        self.0.checked_sub(other.0).map(Self)
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "${}", self.0)
    }
}

/// Lifecycle of an enemy. Transitions only move forward.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EnemyState {
    /// Walking toward the tower or attacking it.
    Alive,
    /// Health dropped to zero; the death animation is playing.
    Dying,
    /// Terminal state. Removed by the next sweep.
    Dead,
}

/// Tower attributes the player can buy improvements for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UpgradeKind {
    /// Increases projectile damage.
    Damage,
    /// Shortens the cooldown between shots.
    Speed,
    /// Raises maximum health and heals by the same amount.
    Armor,
}

impl UpgradeKind {
    /// Every upgrade in presentation order.
    pub const ALL: [UpgradeKind; 3] = [Self::Damage, Self::Speed, Self::Armor];

    /// Short label used by HUDs and logs.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Damage => "DMG+",
            Self::Speed => "SPD+",
            Self::Armor => "ARM+",
        }
    }
}

impl fmt::Display for UpgradeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Damage => "damage",
            Self::Speed => "speed",
            Self::Armor => "armor",
        };
        f.write_str(name)
    }
}

/// Reasons an upgrade request may be rejected. Rejections never mutate state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Error)]
pub enum UpgradeError {
    /// The player cannot afford the upgrade.
    #[error("not enough currency: need {cost}, have {available}")]
    InsufficientFunds {
        /// Price of the requested upgrade.
        cost: Currency,
        /// Balance at the time of the request.
        available: Currency,
    },
    /// The cooldown already sits at or below the speed upgrade floor.
    #[error("attack speed already at maximum (cooldown {cooldown})")]
    CooldownFloor {
        /// Cooldown in frames at the time of the request.
        cooldown: u32,
    },
    /// The session is paused or over.
    #[error("session is paused or over")]
    SessionInactive,
}

/// Confirmation returned for a successful upgrade.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct UpgradeReceipt {
    /// Upgrade that was applied.
    pub kind: UpgradeKind,
    /// Amount deducted from the purse.
    pub cost: Currency,
    /// Balance left after the purchase.
    pub remaining: Currency,
}

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Opens a new simulation frame.
    Tick,
    /// Advances every enemy and then every projectile by one frame.
    AdvanceEntities,
    /// Applies tower regeneration and ticks the weapon cooldown.
    TickTower,
    /// Replaces the tower's held target. `None` clears it.
    SetTowerTarget {
        /// Enemy the tower should track.
        target: Option<EnemyId>,
    },
    /// Fires a projectile from the tower at the provided enemy.
    FireProjectile {
        /// Enemy the projectile homes toward.
        target: EnemyId,
    },
    /// Applies contact damage from every living enemy touching the tower.
    ResolveContacts,
    /// Credits pending bounties and removes dead enemies.
    SweepEnemies,
    /// Starts the next wave with enemies at the provided positions.
    SpawnWave {
        /// Starting position of each enemy in the wave.
        positions: Vec<Position>,
    },
    /// Ends the session when the tower has been destroyed.
    EvaluateGameOver,
    /// Purchases an upgrade if the purse allows it.
    Upgrade {
        /// Upgrade to purchase.
        kind: UpgradeKind,
    },
    /// Flips the paused flag.
    TogglePause,
    /// Discards all state and reinitialises the session.
    Reset,
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Indicates that a new simulation frame started.
    TimeAdvanced {
        /// Index of the frame, starting at one.
        tick: u64,
    },
    /// Announces that a wave started.
    WaveStarted {
        /// Wave number after the increment.
        wave: u32,
        /// Number of enemies in the wave.
        enemy_count: u32,
    },
    /// Confirms that an enemy entered the arena.
    EnemySpawned {
        /// Identifier assigned to the enemy.
        enemy: EnemyId,
        /// Position the enemy spawned at.
        position: Position,
    },
    /// Reports that the tower started tracking an enemy.
    TargetAcquired {
        /// Enemy now tracked by the tower.
        enemy: EnemyId,
    },
    /// Reports that the tower dropped its target.
    TargetCleared {
        /// Enemy that was previously tracked.
        enemy: EnemyId,
    },
    /// Confirms that the tower fired.
    ProjectileFired {
        /// Identifier assigned to the projectile.
        projectile: ProjectileId,
        /// Enemy the projectile was aimed at.
        target: EnemyId,
    },
    /// Reports that a projectile struck its target.
    ProjectileHit {
        /// Projectile that struck.
        projectile: ProjectileId,
        /// Enemy that was struck.
        enemy: EnemyId,
        /// Damage applied by the hit.
        damage: u32,
    },
    /// Reports that a projectile left the arena without hitting anything.
    ProjectileExpired {
        /// Projectile that was discarded.
        projectile: ProjectileId,
    },
    /// Reports that an enemy entered its death animation.
    EnemyKilled {
        /// Enemy that died.
        enemy: EnemyId,
    },
    /// Reports that a bounty was credited to the purse.
    BountyAwarded {
        /// Enemy whose bounty was paid.
        enemy: EnemyId,
        /// Amount credited.
        bounty: Currency,
    },
    /// Reports that a dead enemy was removed from the arena.
    EnemyRemoved {
        /// Enemy that was removed.
        enemy: EnemyId,
    },
    /// Reports contact damage applied to the tower during a frame.
    TowerDamaged {
        /// Total health removed this frame.
        amount: f32,
        /// Health left after the damage.
        remaining: f32,
    },
    /// Confirms a purchased upgrade.
    UpgradeApplied {
        /// Receipt describing the purchase.
        receipt: UpgradeReceipt,
    },
    /// Reports that an upgrade request was rejected.
    UpgradeRejected {
        /// Upgrade that was requested.
        kind: UpgradeKind,
        /// Specific reason the upgrade failed.
        reason: UpgradeError,
    },
    /// Announces a change of the paused flag.
    PauseToggled {
        /// Whether the session is now paused.
        paused: bool,
    },
    /// Announces that the tower fell.
    GameOver {
        /// Wave reached when the tower fell.
        wave: u32,
    },
    /// Confirms that the session was reinitialised.
    SessionReset,
}

/// Immutable representation of the tower used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TowerSnapshot {
    /// Fixed centre of the tower.
    pub position: Position,
    /// Contact radius; enemies within it attack the tower.
    pub radius: f32,
    /// Targeting range.
    pub range: f32,
    /// Current health. May drop below zero on the frame the tower falls.
    pub health: f32,
    /// Maximum health.
    pub max_health: u32,
    /// Damage dealt per projectile.
    pub damage: u32,
    /// Frames between shots.
    pub cooldown: u32,
    /// Frames left before the next shot may be fired.
    pub cooldown_remaining: u32,
    /// Enemy currently tracked, if any.
    pub target: Option<EnemyId>,
}

impl TowerSnapshot {
    /// Health as a fraction of maximum, clamped to `0.0..=1.0`.
    #[must_use]
    pub fn health_ratio(&self) -> f32 {
        if self.max_health == 0 {
            return 0.0;
        }
        (self.health / self.max_health as f32).clamp(0.0, 1.0)
    }

    /// Reports whether the weapon may fire this frame.
    #[must_use]
    pub const fn is_ready(&self) -> bool {
        self.cooldown_remaining == 0
    }
}

/// Immutable representation of a single enemy used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EnemySnapshot {
    /// Unique identifier assigned to the enemy.
    pub id: EnemyId,
    /// Current position.
    pub position: Position,
    /// Half the side length of the enemy's square footprint.
    pub half_size: f32,
    /// Current health. Zero or below once killed.
    pub health: i32,
    /// Health the enemy spawned with.
    pub max_health: i32,
    /// Lifecycle state.
    pub state: EnemyState,
    /// Progress through the death animation in `0.0..=1.0`.
    pub death_progress: f32,
}

impl EnemySnapshot {
    /// Reports whether the enemy can be targeted or struck.
    #[must_use]
    pub fn is_targetable(&self) -> bool {
        self.state == EnemyState::Alive && self.health > 0
    }

    /// Health as a fraction of the spawn health, clamped to `0.0..=1.0`.
    #[must_use]
    pub fn health_ratio(&self) -> f32 {
        if self.max_health <= 0 {
            return 0.0;
        }
        (self.health as f32 / self.max_health as f32).clamp(0.0, 1.0)
    }
}

/// Read-only snapshot describing all active enemies.
#[derive(Clone, Debug, Default)]
pub struct EnemyView {
    snapshots: Vec<EnemySnapshot>,
}

impl EnemyView {
    /// Creates a new enemy view from snapshots in arena order.
    ///
    /// Arena order is spawn order, which breaks targeting ties.
    #[must_use]
    pub fn from_snapshots(snapshots: Vec<EnemySnapshot>) -> Self {
        Self { snapshots }
    }

    /// Iterator over the captured snapshots in arena order.
    pub fn iter(&self) -> impl Iterator<Item = &EnemySnapshot> {
        self.snapshots.iter()
    }

    /// Looks up a single enemy.
    #[must_use]
    pub fn get(&self, id: EnemyId) -> Option<&EnemySnapshot> {
        self.snapshots.iter().find(|snapshot| snapshot.id == id)
    }

    /// Number of captured enemies.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Reports whether no enemies are active.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<EnemySnapshot> {
        self.snapshots
    }
}

/// Immutable representation of a single projectile used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProjectileSnapshot {
    /// Identifier allocated to the projectile.
    pub id: ProjectileId,
    /// Current position.
    pub position: Position,
    /// Enemy the projectile was fired at.
    pub target: EnemyId,
    /// Whether the projectile still steers toward its target.
    pub homing: bool,
}

/// Read-only snapshot describing all projectiles in flight.
#[derive(Clone, Debug, Default)]
pub struct ProjectileView {
    snapshots: Vec<ProjectileSnapshot>,
}

impl ProjectileView {
    /// Creates a new projectile view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(snapshots: Vec<ProjectileSnapshot>) -> Self {
        Self { snapshots }
    }

    /// Iterator over the captured snapshots in firing order.
    pub fn iter(&self) -> impl Iterator<Item = &ProjectileSnapshot> {
        self.snapshots.iter()
    }

    /// Number of projectiles in flight.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Reports whether no projectiles are in flight.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }
}

/// Session-level flags and counters exposed to the HUD.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SessionStatus {
    /// Whether the simulation is frozen by the player.
    pub paused: bool,
    /// Whether the tower fell.
    pub game_over: bool,
    /// Number of waves started so far.
    pub wave: u32,
    /// Player purse.
    pub currency: Currency,
    /// Number of simulated frames.
    pub tick: u64,
}

impl SessionStatus {
    /// Reports whether frames are currently simulated.
    #[must_use]
    pub const fn is_running(&self) -> bool {
        !self.paused && !self.game_over
    }
}

/// Current price of each upgrade.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct UpgradeCosts {
    /// Price of the next damage upgrade.
    pub damage: Currency,
    /// Price of the next speed upgrade, `None` once the cooldown floor is reached.
    pub speed: Option<Currency>,
    /// Price of the next armor upgrade.
    pub armor: Currency,
}

impl UpgradeCosts {
    /// Price of the provided upgrade, if it is still available.
    #[must_use]
    pub const fn cost_of(&self, kind: UpgradeKind) -> Option<Currency> {
        match kind {
            UpgradeKind::Damage => Some(self.damage),
            UpgradeKind::Speed => self.speed,
            UpgradeKind::Armor => Some(self.armor),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distance_matches_pythagoras() {
        let origin = Position::new(1.0, 1.0);
        let destination = Position::new(4.0, 5.0);
        assert!((origin.distance(destination) - 5.0).abs() < f32::EPSILON);
        assert!((origin.distance_squared(destination) - 25.0).abs() < f32::EPSILON);
    }

    #[test]
    fn direction_to_same_point_is_none() {
        let point = Position::new(600.0, 600.0);
        assert!(point.direction_to(point).is_none());
    }

    #[test]
    fn moving_along_heading_covers_requested_distance() {
        let start = Position::new(0.0, 0.0);
        let heading = start
            .direction_to(Position::new(3.0, 4.0))
            .expect("distinct points");
        let moved = start.moved(heading, 10.0);
        assert!((moved.x() - 6.0).abs() < 1e-5);
        assert!((moved.y() - 8.0).abs() < 1e-5);
    }

    #[test]
    fn currency_checked_sub_refuses_overdraft() {
        let purse = Currency::new(40);
        assert_eq!(purse.checked_sub(Currency::new(50)), None);
        assert_eq!(purse.checked_sub(Currency::new(15)), Some(Currency::new(25)));
    }

    #[test]
    fn upgrade_error_messages_name_the_cost() {
        let error = UpgradeError::InsufficientFunds {
            cost: Currency::new(80),
            available: Currency::new(40),
        };
        assert_eq!(error.to_string(), "not enough currency: need $80, have $40");
    }

    #[test]
    fn enemy_with_no_health_is_not_targetable() {
        let snapshot = EnemySnapshot {
            id: EnemyId::new(1),
            position: Position::ORIGIN,
            half_size: 10.0,
            health: 0,
            max_health: 10,
            state: EnemyState::Alive,
            death_progress: 0.0,
        };
        assert!(!snapshot.is_targetable());
        assert_eq!(snapshot.health_ratio(), 0.0);
    }

    #[test]
    fn tower_health_ratio_clamps_negative_health() {
        let snapshot = TowerSnapshot {
            position: Position::ORIGIN,
            radius: 40.0,
            range: 150.0,
            health: -3.0,
            max_health: 100,
            damage: 15,
            cooldown: 25,
            cooldown_remaining: 0,
            target: None,
        };
        assert_eq!(snapshot.health_ratio(), 0.0);
        assert!(snapshot.is_ready());
    }

    #[test]
    fn speed_cost_is_absent_at_the_floor() {
        let costs = UpgradeCosts {
            damage: Currency::new(80),
            speed: None,
            armor: Currency::new(250),
        };
        assert_eq!(costs.cost_of(UpgradeKind::Speed), None);
        assert_eq!(costs.cost_of(UpgradeKind::Armor), Some(Currency::new(250)));
    }
}

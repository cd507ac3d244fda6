//! Tuning knobs that shape the simulation.
//!
//! Every section deserialises with defaults so configuration files only need
//! to name the values they override.

use lone_tower_core::{Currency, Position};
use serde::Deserialize;

/// Aggregated tuning consumed by the world.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct WorldTuning {
    /// Play area and frame rate.
    pub arena: ArenaTuning,
    /// Starting tower statistics.
    pub tower: TowerTuning,
    /// Statistics every spawned enemy starts with.
    pub enemy: EnemyTuning,
    /// Projectile flight parameters.
    pub projectile: ProjectileTuning,
    /// Player purse parameters.
    pub economy: EconomyTuning,
    /// How enemy damage is applied while touching the tower.
    pub contact_damage: ContactDamage,
}

/// Dimensions of the visible play area. The tower sits at its centre.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct ArenaTuning {
    /// Width of the visible play area in world units.
    pub width: f32,
    /// Height of the visible play area in world units.
    pub height: f32,
    /// Simulated frames per second.
    pub fps: u32,
}

impl Default for ArenaTuning {
    fn default() -> Self {
        Self {
            width: 1200.0,
            height: 1200.0,
            fps: 60,
        }
    }
}

impl ArenaTuning {
    /// Centre of the play area, where the tower stands.
    #[must_use]
    pub fn center(&self) -> Position {
        Position::new(self.width / 2.0, self.height / 2.0)
    }

    /// Reports whether `position` lies inside the visible play area.
    #[must_use]
    pub fn contains(&self, position: Position) -> bool {
        (0.0..=self.width).contains(&position.x()) && (0.0..=self.height).contains(&position.y())
    }

    /// Frame rate with a zero value treated as one frame per second.
    #[must_use]
    pub fn frames_per_second(&self) -> f32 {
        self.fps.max(1) as f32
    }
}

/// Statistics the tower starts every session with.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct TowerTuning {
    /// Starting and maximum health.
    pub health: u32,
    /// Health regenerated per second while damaged.
    pub regen_per_second: f32,
    /// Damage carried by each projectile.
    pub damage: u32,
    /// Targeting range in world units.
    pub range: f32,
    /// Frames between shots.
    pub cooldown: u32,
    /// Contact radius; enemies within it stop and attack.
    pub radius: f32,
}

impl Default for TowerTuning {
    fn default() -> Self {
        Self {
            health: 100,
            regen_per_second: 0.5,
            damage: 15,
            range: 150.0,
            cooldown: 25,
            radius: 40.0,
        }
    }
}

/// Statistics every enemy spawns with.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct EnemyTuning {
    /// Starting health.
    pub health: i32,
    /// Contact damage; see [`ContactDamage`] for the unit.
    pub damage: f32,
    /// World units travelled per frame.
    pub speed: f32,
    /// Currency awarded when the enemy is killed.
    pub bounty: Currency,
    /// Frames the death animation lasts.
    pub death_duration: u32,
    /// Half the side length of the enemy's square footprint.
    pub half_size: f32,
}

impl Default for EnemyTuning {
    fn default() -> Self {
        Self {
            health: 10,
            damage: 5.0,
            speed: 1.0,
            bounty: Currency::new(5),
            death_duration: 30,
            half_size: 10.0,
        }
    }
}

/// Projectile flight parameters.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct ProjectileTuning {
    /// World units travelled per frame.
    pub speed: f32,
    /// Distance at which a projectile strikes its target.
    pub hit_radius: f32,
}

impl Default for ProjectileTuning {
    fn default() -> Self {
        Self {
            speed: 10.0,
            hit_radius: 5.0,
        }
    }
}

/// Player purse parameters.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct EconomyTuning {
    /// Currency available when a session starts.
    pub starting_currency: Currency,
}

impl Default for EconomyTuning {
    fn default() -> Self {
        Self {
            starting_currency: Currency::new(100),
        }
    }
}

/// Unit of the enemy contact damage value.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContactDamage {
    /// Damage per second of contact, applied as `damage / fps` each frame.
    #[default]
    PerSecond,
    /// Full damage applied on every frame of contact.
    PerFrame,
}

impl ContactDamage {
    /// Health removed from the tower by one enemy during a single frame.
    #[must_use]
    pub fn per_frame(self, damage: f32, arena: &ArenaTuning) -> f32 {
        match self {
            Self::PerSecond => damage / arena.frames_per_second(),
            Self::PerFrame => damage,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tower_stands_in_the_middle_of_the_arena() {
        let arena = ArenaTuning::default();
        assert_eq!(arena.center(), Position::new(600.0, 600.0));
    }

    #[test]
    fn arena_bounds_are_inclusive() {
        let arena = ArenaTuning::default();
        assert!(arena.contains(Position::new(0.0, 1200.0)));
        assert!(!arena.contains(Position::new(-0.5, 10.0)));
        assert!(!arena.contains(Position::new(10.0, 1200.5)));
    }

    #[test]
    fn per_second_contact_damage_is_spread_across_frames() {
        let arena = ArenaTuning::default();
        let per_frame = ContactDamage::PerSecond.per_frame(6.0, &arena);
        assert!((per_frame - 0.1).abs() < 1e-6);
        assert_eq!(ContactDamage::PerFrame.per_frame(6.0, &arena), 6.0);
    }

    #[test]
    fn zero_fps_does_not_divide_by_zero() {
        let arena = ArenaTuning {
            fps: 0,
            ..ArenaTuning::default()
        };
        assert_eq!(ContactDamage::PerSecond.per_frame(5.0, &arena), 5.0);
    }
}
